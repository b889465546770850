use std::{fs, io};
use std::path::{Path, PathBuf};
use std::fmt::Debug;

use crate::error::{Result, Chainable};
use crate::io::{Contents, IntoContents};

pub trait Sink: Debug {
    fn write<C: IntoContents>(&self, contents: C) -> Result<()> {
        self.write_contents(contents.into_contents())
    }

    fn write_contents(&self, contents: Contents) -> Result<()>;
}

impl Sink for fs::File {
    fn write_contents(&self, contents: Contents) -> Result<()> {
        use io::Write;

        let mut file = io::BufWriter::new(self);
        let bytes = contents.as_ref().either(|s| s.as_bytes(), |b| b.as_slice());
        file.write_all(bytes)?;
        Ok(file.flush()?)
    }
}

/// Writing to a path creates any missing parent directories.
impl Sink for &Path {
    fn write_contents(&self, contents: Contents) -> Result<()> {
        if let Some(parent) = self.parent() {
            fs::create_dir_all(parent).chain_with(|| error! {
                "failed to create output directory",
                "directory" => parent.display(),
            })?;
        }

        fs::File::create(self)
            .chain(error! {
                "failed to open/create file for writing",
                "file path" => self.display()
            })?
            .write_contents(contents)
    }
}

impl Sink for PathBuf {
    fn write_contents(&self, contents: Contents) -> Result<()> {
        self.as_path().write_contents(contents)
    }
}

impl<T: Sink> Sink for &T {
    fn write_contents(&self, contents: Contents) -> Result<()> {
        <T as Sink>::write_contents(self, contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_sink_creates_parents() {
        let root = std::env::temp_dir().join(format!("saltaire-sink-{}", std::process::id()));
        let path = root.join("vets").join("index.html");
        path.write("<h1>Vets</h1>").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "<h1>Vets</h1>");
        fs::remove_dir_all(&root).unwrap();
    }
}
