use std::{fmt, io};
use std::panic::Location;
use std::convert::Infallible;
use std::error::Error as StdError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A chain of error details, most recent first.
///
/// Every detail carries a headline and a list of optional-key/value context
/// lines. `prev` holds the error this one was chained in front of.
#[derive(Debug)]
pub struct Error {
    detail: Vec<Box<dyn ErrorDetail>>,
    prev: Option<Box<Error>>,
    location: &'static Location<'static>,
}

pub type Param = (Option<String>, String);

pub trait ErrorDetail: fmt::Display + fmt::Debug + Send + Sync {
    fn params(&self) -> Vec<Param> { vec![] }
}

impl Error {
    /// Places `self` behind `other`: `other` becomes the headline.
    pub fn chain(self, mut other: Error) -> Self {
        fn push_back(error: Error, behind: &mut Error) {
            match behind.prev.as_mut() {
                Some(prev) => push_back(error, prev),
                None => behind.prev = Some(Box::new(error)),
            }
        }

        push_back(self, &mut other);
        other
    }

    /// Headlines of this error and every error behind it, outermost first.
    pub fn messages(&self) -> Vec<String> {
        let mut messages: Vec<String> = self.detail.iter().map(|d| d.to_string()).collect();
        if let Some(prev) = &self.prev {
            messages.extend(prev.messages());
        }

        messages
    }

    /// Context parameters of this error and every error behind it.
    pub fn params(&self) -> Vec<Param> {
        let mut params: Vec<Param> = self.detail.iter().flat_map(|d| d.params()).collect();
        if let Some(prev) = &self.prev {
            params.extend(prev.params());
        }

        params
    }
}

fn source_chain(error: &(dyn StdError + 'static)) -> Vec<Param> {
    let mut params = vec![];
    let mut source = error.source();
    while let Some(e) = source {
        params.push((None, e.to_string()));
        source = e.source();
    }

    params
}

macro_rules! impl_error_detail_with_std_error {
    ($($T:ty),+ $(,)?) => {
        $(
            impl $crate::error::ErrorDetail for $T {
                fn params(&self) -> Vec<$crate::error::Param> {
                    source_chain(self)
                }
            }
        )+
    }
}

impl_error_detail_with_std_error! {
    io::Error,
    toml::de::Error,
    serde_json::Error,
    minijinja::Error,
    fmt::Error,
}

impl ErrorDetail for String { }
impl ErrorDetail for &'static str { }

impl ErrorDetail for Infallible { }

impl<T: ErrorDetail + 'static> From<T> for Error {
    #[track_caller]
    fn from(detail: T) -> Self {
        Error {
            prev: None,
            detail: vec![Box::new(detail)],
            location: Location::caller(),
        }
    }
}

impl Clone for Error {
    fn clone(&self) -> Self {
        Error {
            detail: self.detail.iter()
                .map(|detail| Box::new(Message::from(&**detail)) as Box<dyn ErrorDetail>)
                .collect(),
            prev: self.prev.clone(),
            location: self.location,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_nested(f: &mut fmt::Formatter<'_>, depth: usize, e: &Error) -> fmt::Result {
            let indent = " ".repeat(depth * 4);
            let newline = format!("\n{indent}");
            for detail in &e.detail {
                writeln!(f, "{indent}{}", detail.to_string().replace('\n', &newline))?;
                for (key, value) in detail.params() {
                    let value = value.replace('\n', &newline);
                    match key {
                        Some(key) => writeln!(f, "{indent}{key}: {value}")?,
                        None => writeln!(f, "{indent}{value}")?,
                    }
                }

                if std::env::var_os("RUST_BACKTRACE").is_some() {
                    writeln!(f, "{indent}[{}]", e.location)?;
                }
            }

            match &e.prev {
                Some(prev) => write_nested(f, depth + 1, prev),
                None => Ok(()),
            }
        }

        write_nested(f, 0, self)
    }
}

/// An ad-hoc error built by [`error!`] or copied out of another detail.
#[derive(Debug)]
pub struct Message {
    pub message: String,
    pub params: Vec<Param>,
}

impl From<&dyn ErrorDetail> for Message {
    #[inline]
    fn from(detail: &dyn ErrorDetail) -> Self {
        Message { message: detail.to_string(), params: detail.params() }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.message.fmt(f)
    }
}

impl ErrorDetail for Message {
    fn params(&self) -> Vec<Param> {
        self.params.clone()
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! err {
    ($($token:tt)*) => (Err($crate::error!($($token)*)));
}

/// Builds an [`Error`] from a headline and context parameters.
///
/// ```rust
/// let e = saltaire::error!("duplicate slug", "slug" => "acme", "first seen at 1");
/// assert_eq!(e.messages(), ["duplicate slug"]);
/// assert_eq!(e.params()[0], (Some("slug".into()), "acme".into()));
/// assert_eq!(e.params()[1], (None, "first seen at 1".into()));
/// ```
#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($msg:expr $(, $($rest:tt)*)?) => (
        $crate::error::Error::from($crate::error::Message {
            message: $msg.to_string(),
            params: {
                #[allow(unused_mut)]
                let mut v: Vec<$crate::error::Param> = Vec::new();
                $($crate::error!(@param v $($rest)*);)?
                v
            },
        })
    );

    (@param $v:ident $key:expr => $value:expr $(, $($rest:tt)*)?) => {
        $v.push((Some($key.to_string()), $value.to_string()));
        $($crate::error!(@param $v $($rest)*);)?
    };

    (@param $v:ident $value:expr $(, $($rest:tt)*)?) => {
        $v.push((None, $value.to_string()));
        $($crate::error!(@param $v $($rest)*);)?
    };

    (@param $v:ident) => { };
}

pub trait Chainable<T> {
    fn chain(self, other: impl Into<Error>) -> Result<T>;

    fn chain_with<F, E>(self, f: F) -> Result<T>
        where F: FnOnce() -> E, E: Into<Error>;
}

impl<T, E: Into<Error>> Chainable<T> for Result<T, E> {
    #[track_caller]
    fn chain(self, other: impl Into<Error>) -> Result<T> {
        self.map_err(|e| e.into().chain(other.into()))
    }

    #[track_caller]
    fn chain_with<F, Err>(self, f: F) -> Result<T>
        where F: FnOnce() -> Err, Err: Into<Error>,
    {
        self.map_err(|e| e.into().chain(f().into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chained_errors_display_nested() {
        let inner: Result<()> = err!("could not read file", "path" => "a.toml");
        let e = inner.chain(error!("failed to load category")).unwrap_err();

        assert_eq!(e.messages(), ["failed to load category", "could not read file"]);
        let display = e.to_string();
        assert!(display.starts_with("failed to load category\n"));
        assert!(display.contains("    could not read file\n    path: a.toml\n"));
    }

    #[test]
    fn std_errors_convert() {
        let e: Error = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert_eq!(e.messages(), ["gone"]);

        let cloned = e.clone();
        assert_eq!(cloned.messages(), e.messages());
    }

    #[test]
    fn trailing_commas_are_accepted() {
        let e = error! {
            "bad listing",
            "slug" => "x",
        };

        assert_eq!(e.params().len(), 1);
    }
}
