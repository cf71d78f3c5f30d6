//! Corpus curation: grouping raw files by author and pruning the corpus.
//!
//! A corpus lives at `base/<author>/<file>.txt`. Every operation here edits
//! that tree in place and returns a [`CurationReport`] describing what it
//! moved or deleted. Nothing is transactional; an interrupted run is
//! recovered by running the same operation again.

use crate::batch::{ErrorMode, FailedDocument};
use crate::error::{Error, Result};
use crate::fs_utils::{
    list_filepaths, list_filepaths_with_sizes, list_subdirectories, move_file, FileSizeOrder,
    TXT_EXTENSION,
};
use crate::model::{author_name, document_year};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default minimum document length in characters.
pub const DEFAULT_MIN_LENGTH: usize = 1000;

/// What a curation operation changed on disk.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CurationReport {
    /// Operation name
    pub operation: &'static str,
    /// Files moved into author directories
    pub moved: Vec<PathBuf>,
    /// Files or directories removed
    pub deleted: Vec<PathBuf>,
    /// Files or authors skipped because of an error
    pub failed: Vec<FailedDocument>,
}

impl CurationReport {
    fn new(operation: &'static str) -> Self {
        Self {
            operation,
            ..Default::default()
        }
    }

    /// Returns true if nothing failed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Serializes the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn record_failure(&mut self, path: &Path, err: Error, mode: ErrorMode) -> Result<()> {
        if mode == ErrorMode::Strict {
            return Err(err);
        }
        tracing::warn!(
            path = %path.display(),
            error = %err,
            operation = self.operation,
            "skipping"
        );
        self.failed.push(FailedDocument {
            path: path.to_path_buf(),
            error: err.to_string(),
        });
        Ok(())
    }

    fn finish(self) -> Self {
        tracing::info!(
            operation = self.operation,
            moved = self.moved.len(),
            deleted = self.deleted.len(),
            failed = self.failed.len(),
            "curation finished"
        );
        self
    }
}

/// Comparison applied to an author's document count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountOperator {
    Lt,
    Le,
    Eq,
    Ne,
    Ge,
    Gt,
}

impl CountOperator {
    /// Evaluates `count <op> threshold`.
    pub fn apply(self, count: usize, threshold: usize) -> bool {
        match self {
            CountOperator::Lt => count < threshold,
            CountOperator::Le => count <= threshold,
            CountOperator::Eq => count == threshold,
            CountOperator::Ne => count != threshold,
            CountOperator::Ge => count >= threshold,
            CountOperator::Gt => count > threshold,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CountOperator::Lt => "lt",
            CountOperator::Le => "le",
            CountOperator::Eq => "eq",
            CountOperator::Ne => "ne",
            CountOperator::Ge => "ge",
            CountOperator::Gt => "gt",
        }
    }
}

impl fmt::Display for CountOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CountOperator {
    type Err = Error;

    /// Accepts both mnemonic (`lt`) and symbolic (`<`) forms.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lt" | "<" => Ok(CountOperator::Lt),
            "le" | "<=" => Ok(CountOperator::Le),
            "eq" | "=" | "==" => Ok(CountOperator::Eq),
            "ne" | "!=" => Ok(CountOperator::Ne),
            "ge" | ">=" => Ok(CountOperator::Ge),
            "gt" | ">" => Ok(CountOperator::Gt),
            other => Err(Error::InvalidData(format!("unknown count operator: {other}"))),
        }
    }
}

/// Groups paths by the author encoded in their file names.
///
/// Fails on the first path without an author delimiter.
pub fn group_by_author(paths: &[PathBuf]) -> Result<BTreeMap<String, Vec<PathBuf>>> {
    let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for path in paths {
        groups.entry(author_name(path)?).or_default().push(path.clone());
    }
    Ok(groups)
}

/// Moves every `.txt` file directly in `base` into `base/<author>/`.
///
/// Author directories are created on first use. Files without an author
/// delimiter are handled according to `mode`.
pub fn create_author_corpus(base: impl AsRef<Path>, mode: ErrorMode) -> Result<CurationReport> {
    let base = base.as_ref();
    let mut report = CurationReport::new("create_author_corpus");

    for path in list_filepaths(base, TXT_EXTENSION, false, false)? {
        let author = match author_name(&path) {
            Ok(author) => author,
            Err(err) => {
                report.record_failure(&path, err, mode)?;
                continue;
            }
        };
        let author_dir = base.join(&author);
        fs::create_dir_all(&author_dir)?;
        let target = move_file(&path, &author_dir)?;
        tracing::debug!(author = %author, path = %target.display(), "moved document");
        report.moved.push(target);
    }

    Ok(report.finish())
}

/// Deletes every author directory whose `.txt` count satisfies
/// `count <op> threshold`.
pub fn delete_authors_by_file_count(
    base: impl AsRef<Path>,
    op: CountOperator,
    threshold: usize,
) -> Result<CurationReport> {
    let mut report = CurationReport::new("delete_authors_by_file_count");

    for author_dir in list_subdirectories(base)? {
        let count = list_filepaths(&author_dir, TXT_EXTENSION, false, false)?.len();
        if op.apply(count, threshold) {
            tracing::debug!(
                author = %author_dir.display(),
                count,
                %op,
                threshold,
                "deleting author"
            );
            fs::remove_dir_all(&author_dir)?;
            report.deleted.push(author_dir);
        }
    }

    Ok(report.finish())
}

/// Deletes every `.txt` document under `base` shorter than `min_length`
/// characters. Documents of exactly `min_length` characters are kept.
///
/// Bytes that are not valid UTF-8 count as one replacement character each.
pub fn delete_documents_by_length(
    base: impl AsRef<Path>,
    min_length: usize,
) -> Result<CurationReport> {
    let mut report = CurationReport::new("delete_documents_by_length");

    for path in list_filepaths(base, TXT_EXTENSION, true, false)? {
        let length = String::from_utf8_lossy(&fs::read(&path)?).chars().count();
        if length < min_length {
            tracing::debug!(path = %path.display(), length, "deleting short document");
            fs::remove_file(&path)?;
            report.deleted.push(path);
        }
    }

    Ok(report.finish())
}

/// Keeps, per author, only the earliest and the latest document.
///
/// Documents are ordered by year ascending, then by size descending, so the
/// largest document wins among those sharing the earliest year. Authors with
/// two or fewer documents are untouched. An author with any undated document
/// is left intact and reported according to `mode`.
pub fn maximize_time_span(base: impl AsRef<Path>, mode: ErrorMode) -> Result<CurationReport> {
    let mut report = CurationReport::new("maximize_time_span");

    for author_dir in list_subdirectories(base)? {
        let files =
            list_filepaths_with_sizes(&author_dir, TXT_EXTENSION, false, FileSizeOrder::Unordered)?;

        let dated: Result<Vec<(u16, u64, PathBuf)>> = files
            .into_iter()
            .map(|(path, size)| Ok((document_year(&path)?, size, path)))
            .collect();
        let mut dated = match dated {
            Ok(dated) => dated,
            Err(err) => {
                report.record_failure(&author_dir, err, mode)?;
                continue;
            }
        };

        if dated.len() <= 2 {
            continue;
        }
        dated.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        let inner = dated.len() - 1;
        for (_, _, path) in dated.drain(1..inner) {
            fs::remove_file(&path)?;
            report.deleted.push(path);
        }
    }

    Ok(report.finish())
}

/// Keeps the first `n` documents of every author in `order` and deletes the
/// rest.
pub fn keep_n_documents_per_author(
    base: impl AsRef<Path>,
    n: usize,
    order: FileSizeOrder,
) -> Result<CurationReport> {
    let mut report = CurationReport::new("keep_n_documents_per_author");

    for author_dir in list_subdirectories(base)? {
        let files = list_filepaths_with_sizes(&author_dir, TXT_EXTENSION, true, order)?;
        for (path, _) in files.into_iter().skip(n) {
            fs::remove_file(&path)?;
            report.deleted.push(path);
        }
    }

    Ok(report.finish())
}
