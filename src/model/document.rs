//! Metadata encoded in corpus file names.
//!
//! Raw fiction files follow the naming convention
//! `<Author>_-_<Title> (<Year>).txt`. The author decides the corpus directory
//! a document belongs to, and the year drives time-span selection.

use crate::error::{Error, Result};
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Separator between author name and title in a file name.
pub const AUTHOR_DELIMITER: &str = "_-_";

static RE_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([0-9]{4})\)").unwrap());

/// Metadata derived from a document's file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentName {
    /// Path the metadata was derived from
    pub path: PathBuf,
    /// Author name (text before the first `_-_`)
    pub author: String,
    /// Last bracketed four-digit year, if any
    pub year: Option<u16>,
}

impl DocumentName {
    /// Parses the author and, when present, the year of a document path.
    pub fn parse(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        Ok(Self {
            path: path.to_path_buf(),
            author: author_name(path)?,
            year: parse_year(file_name(path)),
        })
    }
}

/// Returns the author name encoded in a file name.
///
/// # Example
///
/// ```
/// use aacorpus::model::author_name;
///
/// let author = author_name("corpus/Fontane,_Theodor_-_Effi_Briest_(1896).txt")?;
/// assert_eq!(author, "Fontane,_Theodor");
/// # Ok::<(), aacorpus::Error>(())
/// ```
pub fn author_name(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let name = file_name(path);
    match name.find(AUTHOR_DELIMITER) {
        Some(idx) => Ok(name[..idx].trim().to_string()),
        None => Err(Error::MissingAuthorDelimiter(path.to_path_buf())),
    }
}

/// Returns the last `(dddd)` year in a file name.
pub fn document_year(path: impl AsRef<Path>) -> Result<u16> {
    let path = path.as_ref();
    parse_year(file_name(path)).ok_or_else(|| Error::MissingYear(path.to_path_buf()))
}

fn parse_year(name: &str) -> Option<u16> {
    RE_YEAR
        .captures_iter(name)
        .last()
        .and_then(|caps| caps[1].parse().ok())
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
}
