//! Error types for model-backed structuring.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StructuringError>;

/// Reasons a structuring attempt produced nothing usable.
#[derive(Error, Debug)]
pub enum StructuringError {
    /// The request could not be sent or its body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The reply carried no text.
    #[error("Model returned an empty reply")]
    EmptyReply,

    /// The reply text did not hold a usable slide array.
    #[error(transparent)]
    Parse(#[from] deck_core::Error),
}
