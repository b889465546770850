use std::{fs, io};
use std::path::{Path, PathBuf};
use std::fmt::Debug;
use std::sync::Arc;

use either::Either;

use crate::error::{Result, Chainable};
use crate::io::{Contents, Sink};

pub trait Source: Debug {
    fn read(self) -> Result<Contents>;

    fn path(&self) -> Option<&Path> {
        None
    }

    fn read_text(self) -> Result<Arc<str>> where Self: Sized {
        let path = self.path().map(|p| p.display().to_string());
        match self.read()? {
            Either::Left(text) => Ok(text.into()),
            Either::Right(_) => err! {
                "expected UTF-8 text but found binary data",
                "path" => path.as_deref().unwrap_or("<memory>"),
            },
        }
    }

    #[inline]
    fn read_to<S: Sink>(self, sink: S) -> Result<()> where Self: Sized {
        sink.write(self.read()?)
    }
}

impl Source for &str {
    fn read(self) -> Result<Contents> {
        Ok(Either::Left(self.to_string()))
    }
}

impl Source for String {
    fn read(self) -> Result<Contents> {
        Ok(Either::Left(self))
    }
}

impl Source for &fs::File {
    fn read(self) -> Result<Contents> {
        use io::Read;

        let mut data = Vec::new();
        io::BufReader::new(self).read_to_end(&mut data)?;
        let contents = String::from_utf8(data)
            .map(Either::Left)
            .unwrap_or_else(|e| Either::Right(e.into_bytes()));

        Ok(contents)
    }
}

impl Source for &Path {
    fn read(self) -> Result<Contents> {
        let file = fs::File::open(self).chain(error! {
            "failed to open file for reading",
            "file path" => self.display()
        })?;

        file.read()
    }

    fn path(&self) -> Option<&Path> {
        Some(self)
    }
}

impl Source for &PathBuf {
    fn read(self) -> Result<Contents> {
        self.as_path().read()
    }

    fn path(&self) -> Option<&Path> {
        Some(self.as_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_files_read_as_bytes() {
        let path = std::env::temp_dir().join(format!("saltaire-source-{}.bin", std::process::id()));
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let contents = path.as_path().read().unwrap();
        assert_eq!(contents, Either::Right(vec![0xff, 0xfe, 0x00]));

        let error = path.as_path().read_text().unwrap_err();
        assert_eq!(error.messages(), ["expected UTF-8 text but found binary data"]);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_files_report_path() {
        let error = Path::new("/definitely/not/here.toml").read().unwrap_err();
        assert_eq!(error.messages()[0], "failed to open file for reading");
        assert!(error.to_string().contains("/definitely/not/here.toml"));
    }
}
