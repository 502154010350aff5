use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AddrSiftError {
    #[error("Malformed JSON in {path}: {source}")]
    MalformedInput {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Expected a top-level JSON array in {path}")]
    InvalidShape { path: PathBuf },

    #[error("Statistics input contains no records")]
    EmptyInput,

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid path: {path}")]
    InvalidPath { path: String },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for AddrSiftError {
    fn user_message(&self) -> String {
        match self {
            AddrSiftError::MalformedInput { path, source } => {
                format!(
                    "Could not parse {} even after comma repair: {}",
                    path.display(),
                    source
                )
            }
            AddrSiftError::InvalidShape { path } => {
                format!(
                    "{} does not contain a top-level JSON array",
                    path.display()
                )
            }
            AddrSiftError::EmptyInput => {
                "The statistics input file contains zero records".to_string()
            }
            AddrSiftError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            AddrSiftError::InvalidPath { path } => {
                format!("Invalid path: {}", path)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            AddrSiftError::MalformedInput { .. } => Some(
                "The only repair attempted is inserting commas between adjacent objects. \
                 Fix the file by hand or regenerate it from the log producer."
                    .to_string(),
            ),
            AddrSiftError::InvalidShape { .. } => Some(
                "Input files must be a JSON array of objects: [ {...}, {...} ]. \
                 In directory mode non-array files are skipped with a warning instead."
                    .to_string(),
            ),
            AddrSiftError::EmptyInput => Some(
                "Category names are derived from the first record, so an empty array \
                 cannot be aggregated. Check that the input file is the right one."
                    .to_string(),
            ),
            AddrSiftError::Config { .. } => Some(
                "Check the TOML syntax and that the selected source profile exists. \
                 Use --generate-config to emit a sample configuration."
                    .to_string(),
            ),
            AddrSiftError::Io(_) => Some(
                "Verify the input paths exist and the output directory is writable."
                    .to_string(),
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for AddrSiftError {
    fn from(error: toml::de::Error) -> Self {
        AddrSiftError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AddrSiftError>;
