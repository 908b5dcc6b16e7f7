#![forbid(unsafe_code)]

use std::path::PathBuf;

use sheet_core::SheetError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("sheet error: {0}")]
    Sheet(#[from] SheetError),

    #[error("invalid script: {message}")]
    InvalidScript { message: String },

    #[error("script not found: {path}")]
    MissingScript { path: PathBuf },
}

impl HarnessError {
    /// Process exit code for this error.
    ///
    /// Bad input (unreadable, malformed, or rejected scripts) exits with 2;
    /// a script that the controller refuses at runtime exits with 3.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Json(_) | Self::InvalidScript { .. } | Self::MissingScript { .. } => 2,
            Self::Sheet(_) => 3,
            Self::Io(_) => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidScript {
            message: message.into(),
        }
    }
}
