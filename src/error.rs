use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EcogenError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    // Descriptor errors
    #[error("Process name '{name}' appears more than once")]
    DuplicateProcess { name: String },

    #[error("Process '{process}' uses a path that is not valid UTF-8: {}", .path.display())]
    NonUtf8Path { process: String, path: PathBuf },

    #[error("Failed to write ecosystem file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EcogenError {
    /// True for failures that leave the process manager without a fresh descriptor.
    pub fn is_output_failure(&self) -> bool {
        matches!(
            self,
            Self::Write { .. } | Self::Json(_) | Self::NonUtf8Path { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, EcogenError>;
