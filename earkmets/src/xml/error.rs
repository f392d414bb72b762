//! Error types for the XML tree codec.

use thiserror::Error;

/// Errors raised while parsing or serializing a document.
#[derive(Debug, Error)]
pub enum XmlError {
    /// The input is not well-formed.
    #[error("malformed XML at byte {position}: {message}")]
    Syntax { position: usize, message: String },

    /// The input contains no root element.
    #[error("document has no root element")]
    NoRoot,

    /// A closing tag does not match the open element.
    #[error("unexpected closing tag </{found}> at byte {position}")]
    UnbalancedEnd { found: String, position: usize },

    /// The input ended while elements were still open.
    #[error("document ended inside <{0}>")]
    UnexpectedEof(String),

    /// Writing the tree failed.
    #[error("failed to serialize XML: {0}")]
    Serialize(String),
}
