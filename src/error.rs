//! Error types for aacorpus library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for aacorpus operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for aacorpus library.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Directory traversal failed.
    #[error("Directory walk error: {0}")]
    Walk(String),

    /// The annotation service failed on the given input.
    #[error("Annotation error: {0}")]
    Annotation(String),

    /// No annotator is available for the requested model identifier.
    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),

    /// A file name lacks the `_-_` author delimiter.
    #[error("No author delimiter in file name: {}", .0.display())]
    MissingAuthorDelimiter(PathBuf),

    /// A file name lacks a `(dddd)` year group.
    #[error("No four-digit year in file name: {}", .0.display())]
    MissingYear(PathBuf),

    /// A token span does not address a valid slice of its text.
    #[error("Invalid span {start}..{end} in text of length {len}")]
    InvalidSpan { start: usize, end: usize, len: usize },

    /// Edits were not strictly descending and non-overlapping.
    #[error("Edit at {start} overlaps or follows the previous edit at {previous}")]
    OverlappingEdit { start: usize, previous: usize },

    /// Invalid or malformed data.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::Walk(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidData(err.to_string())
    }
}

#[cfg(feature = "spacy")]
impl From<pyo3::PyErr> for Error {
    fn from(err: pyo3::PyErr) -> Self {
        Error::Annotation(err.to_string())
    }
}
