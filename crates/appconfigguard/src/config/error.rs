use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),

    #[error("Settings validation failed: {message}")]
    Validation { message: String },

    #[error("Invalid tag '{tag}': expected key=value")]
    InvalidTag { tag: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
