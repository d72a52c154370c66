/*!
 * Error types for the teiprep application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

use crate::convert::DataFormat;

/// Errors that can occur while parsing, querying or mutating an XML document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The document could not be parsed
    #[error("failed to parse XML: {0}")]
    Parse(#[from] quick_xml::Error),

    /// An attribute inside a start tag was malformed
    #[error("malformed attribute: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    /// The document contains no root element
    #[error("document has no root element")]
    NoRoot,

    /// The document could not be serialized back to XML
    #[error("failed to serialize XML: {0}")]
    Serialize(#[from] std::io::Error),

    /// A token element is missing the identifier attribute required for
    /// round-trip keying; the whole serialization aborts on this
    #[error("element <{element}> has no {attribute} attribute")]
    MissingAttribute {
        /// Local name of the offending element
        element: String,
        /// The identifier attribute that was expected
        attribute: String,
    },

    /// An IOB tag did not match `O` | `B-<TYPE>` | `I-<TYPE>`
    #[error("invalid IOB tag: {0}")]
    InvalidIobTag(String),
}

/// Errors that can occur when talking to the external annotation service
#[derive(Error, Debug)]
pub enum AnnotatorError {
    /// Error when making the request fails
    #[error("annotation request failed: {0}")]
    RequestFailed(String),

    /// Error when reading the response body fails
    #[error("failed to read annotator response: {0}")]
    ResponseFailed(String),

    /// The service responded with a non-success status; the call fails and is
    /// surfaced to the caller, never retried here
    #[error("annotator responded with status {status_code}: {message}")]
    StatusError {
        /// HTTP status code
        status_code: u16,
        /// Response body or status text
        message: String,
    },

    /// A pipeline stage was requested that the annotator does not provide
    #[error("pipeline stage '{0}' is not supported by this annotator")]
    UnsupportedStage(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from document parsing or mutation
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Error from the annotation service
    #[error("Annotator error: {0}")]
    Annotator(#[from] AnnotatorError),

    /// A conversion between two payload formats that is not implemented
    #[error("unsupported conversion from {from} to {to}")]
    UnsupportedConversion {
        /// Source format
        from: DataFormat,
        /// Requested target format
        to: DataFormat,
    },

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
