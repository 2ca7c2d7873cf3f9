//! Error types for document scanning

use thiserror::Error;

/// Errors that can occur while extracting text from a document
#[derive(Error, Debug)]
pub enum ScanError {
    /// The compound container could not be opened or its directory read
    #[error("Unreadable compound container: {0}")]
    Container(String),

    /// A property stream could not be read or decoded
    #[error("Failed to decode message stream: {0}")]
    Decode(String),

    /// A collaborator failed to extract or convert the document
    #[error("Text extraction failed: {0}")]
    Extraction(String),

    /// The document content is not a format any extractor understands
    #[error("Unsupported document content: {0}")]
    Unsupported(String),

    /// Underlying filesystem failure
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for scanning operations
pub type Result<T> = std::result::Result<T, ScanError>;
