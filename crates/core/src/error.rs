//! Error types for deck generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while structuring text or rendering a deck.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read an input file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing or writing error (for PPTX).
    #[error("XML error: {0}")]
    XmlError(String),

    /// The template package is missing a required part or relationship.
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    /// The template defines no slide layouts to build slides from.
    #[error("Template has no usable slide layouts")]
    NoLayouts,

    /// Model output contained no bracketed JSON array.
    #[error("No JSON array found in model output")]
    NoJsonArray,

    /// The bracketed text in model output was not a valid slide array.
    #[error("Invalid slide JSON: {0}")]
    InvalidJson(String),

    /// The slide array parsed but held no slides.
    #[error("Model output contained no slides")]
    EmptyDeck,
}
