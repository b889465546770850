mod source;
mod sink;
mod format;

pub use source::*;
pub use sink::*;
pub use format::*;

use either::Either;

/// The contents of a file: UTF-8 text or raw bytes.
pub type Contents = Either<String, Vec<u8>>;

pub trait IntoContents {
    fn into_contents(self) -> Contents;
}

impl IntoContents for Contents {
    fn into_contents(self) -> Contents {
        self
    }
}

impl IntoContents for String {
    fn into_contents(self) -> Contents {
        Either::Left(self)
    }
}

impl IntoContents for &str {
    fn into_contents(self) -> Contents {
        Either::Left(self.to_string())
    }
}

impl IntoContents for Vec<u8> {
    fn into_contents(self) -> Contents {
        Either::Right(self)
    }
}
