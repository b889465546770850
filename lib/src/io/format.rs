use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{ErrorDetail, Result, Chainable};
use crate::io::{IntoContents, Sink, Source};

pub trait Format: Sized {
    /// The data format's error type.
    type Error: serde::de::Error + ErrorDetail + 'static;

    /// Parses `string` as the data format `Self` into a `T`.
    fn from_str<T: DeserializeOwned>(string: &str) -> Result<T, Self::Error>;

    fn read<I: Source, T: DeserializeOwned>(input: I) -> Result<T> {
        let path = input.path().map(|p| p.display().to_string());
        let text = input.read_text()?;
        Self::from_str(&text).chain_with(|| error! {
            format!("failed to parse {}", std::any::type_name::<Self>().rsplit("::").next().unwrap_or("data")),
            "path" => path.as_deref().unwrap_or("<memory>"),
        })
    }
}

macro_rules! impl_format {
    ($($name:ident : $func:expr, $E:ty);+ $(;)?) => ($(
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl Format for $name {
            type Error = $E;

            fn from_str<T: DeserializeOwned>(s: &str) -> Result<T, $E> {
                $func(s)
            }
        }
    )+);
}

impl_format! {
    Toml: toml::from_str, toml::de::Error;
    Json: serde_json::from_str, serde_json::Error;
}

/// A data format chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Toml,
    Json,
}

impl DataFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(DataFormat::Toml),
            "json" => Some(DataFormat::Json),
            _ => None,
        }
    }

    pub fn read<I: Source, T: DeserializeOwned>(self, input: I) -> Result<T> {
        match self {
            DataFormat::Toml => Toml::read(input),
            DataFormat::Json => Json::read(input),
        }
    }
}

pub trait Mapper {
    type Output: IntoContents;

    fn map<I: Source>(&self, input: I) -> Result<Self::Output>;

    fn map_copy<I: Source, O: Sink>(&self, input: I, output: O) -> Result<()> {
        output.write(self.map(input)?)
    }
}

/// Compiles SCSS/Sass into CSS.
#[cfg(feature = "sass")]
#[derive(Debug, Default)]
pub struct Grass {
    options: grass::Options<'static>,
}

#[cfg(feature = "sass")]
impl Mapper for Grass {
    type Output = String;

    fn map<I: Source>(&self, input: I) -> Result<Self::Output> {
        let result = match input.path() {
            Some(path) => grass::from_path(path, &self.options),
            None => input.read_text().map(|text| grass::from_string(&*text, &self.options))?,
        };

        result.map_err(|e| error!("failed to render sass as css", e))
    }
}
