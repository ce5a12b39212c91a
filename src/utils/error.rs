//! Error handling for worksheet conversions
//!
//! Parsing and rendering never fail on document content. Errors only come from
//! the environment: reading files, downloading media, and running external
//! programs.

use thiserror::Error;

/// Conversion error type
#[derive(Error, Debug)]
pub enum ConvertError {
    /// IO error (reading the worksheet, copying media, scratch directory)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An output record was not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Remote media could not be downloaded
    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// An external program could not be run or exited unsuccessfully
    #[error("{program} failed: {message}")]
    Process { program: String, message: String },

    /// Invalid input
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Operation not available with the current media store
    #[error("Not supported: {0}")]
    NotSupported(String),
}

/// Result type for conversion operations
pub type ConvertResult<T> = Result<T, ConvertError>;

// Convenience constructors for errors
impl ConvertError {
    pub fn fetch(url: impl Into<String>, message: impl ToString) -> Self {
        ConvertError::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }

    pub fn process(program: impl Into<String>, message: impl ToString) -> Self {
        ConvertError::Process {
            program: program.into(),
            message: message.to_string(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ConvertError::InvalidInput {
            message: message.into(),
        }
    }
}
