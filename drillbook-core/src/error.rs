use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Unknown style role: {0}")]
    UnknownStyleRole(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write export to {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Compression error: {0}")]
    Compression(String),

    #[cfg(feature = "serde")]
    #[error("Invalid style configuration document: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExportError {
    /// Configuration mistakes are fatal and must not be retried.
    pub fn is_configuration_error(&self) -> bool {
        match self {
            ExportError::InvalidConfiguration(_) | ExportError::UnknownStyleRole(_) => true,
            #[cfg(feature = "serde")]
            ExportError::Json(_) => true,
            _ => false,
        }
    }

    /// Failures while producing or moving the artifact into place.
    ///
    /// These leave the destination untouched and can be reported to the
    /// user without losing previously saved state.
    pub fn is_io_error(&self) -> bool {
        matches!(
            self,
            ExportError::Io(_) | ExportError::Persist { .. } | ExportError::Compression(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
