use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("missing argument for format specifier '{specifier}'")]
    MissingArgument { specifier: String },
    #[error("unknown format conversion '{conversion}'")]
    UnknownConversion { conversion: char },
    #[error("conversion '{conversion}' cannot format a {kind} argument")]
    IllegalConversion { conversion: char, kind: &'static str },
    #[error("flag '{flag}' is not allowed with conversion '{conversion}'")]
    IllegalFlag { flag: char, conversion: char },
    #[error("format specifier '{specifier}' is incomplete")]
    Incomplete { specifier: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("messages were accessed before the store was loaded")]
    NotLoaded,
    #[error("no message or default exists for key '{key}'")]
    MissingKey { key: String },
    #[error("message '{key}' is not a string or a list of strings (found {found})")]
    Malformed { key: String, found: String },
    #[error("failed to access message file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse message file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
    #[error("message file {path} must be a mapping of keys to messages")]
    NotAMapping { path: PathBuf },
    #[error("failed to serialize messages for {path}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
    #[error("failed to format message '{key}'")]
    Format {
        key: String,
        #[source]
        source: FormatError,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("config file {path} is not valid TOML")]
    Syntax {
        path: PathBuf,
        #[source]
        source: toml_edit::TomlError,
    },
    #[error("config file {path} has an invalid value")]
    Invalid {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
