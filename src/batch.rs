//! Batch execution options and reports.

use crate::error::Result;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Options for controlling batch processing behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchOptions {
    /// How to handle per-document errors.
    pub error_mode: ErrorMode,

    /// Whether to process documents on the rayon thread pool.
    pub parallel: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            parallel: false,
        }
    }
}

impl BatchOptions {
    /// Creates new options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets lenient error handling (log and skip failed documents).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Sets strict error handling (abort on the first failed document).
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Enables parallel processing. Each document is still handled by
    /// exactly one worker.
    pub fn parallel(mut self) -> Self {
        self.parallel = true;
        self
    }

    /// Returns true if failed documents should be skipped.
    pub fn is_lenient(&self) -> bool {
        matches!(self.error_mode, ErrorMode::Lenient)
    }
}

/// How to handle per-document errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Fail immediately on any error.
    Strict,
    /// Log the failure, record it in the report and continue.
    #[default]
    Lenient,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    /// Documents processed successfully, in input order
    pub processed: Vec<PathBuf>,
    /// Documents that failed, with the error message
    pub failed: Vec<FailedDocument>,
}

/// A document skipped because of an error.
#[derive(Debug, Clone, Serialize)]
pub struct FailedDocument {
    pub path: PathBuf,
    pub error: String,
}

impl BatchReport {
    /// Returns true if every document succeeded.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Total number of documents seen.
    pub fn total(&self) -> usize {
        self.processed.len() + self.failed.len()
    }

    /// Serializes the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Applies `op` to every path according to `options`.
///
/// In strict mode the first error (in input order) is returned. In lenient
/// mode failures are logged and collected in the report.
pub fn run_batch<F>(paths: &[PathBuf], options: &BatchOptions, op: F) -> Result<BatchReport>
where
    F: Fn(&Path) -> Result<()> + Sync,
{
    fn run_one<'a, F: Fn(&Path) -> Result<()>>(
        op: &F,
        path: &'a PathBuf,
    ) -> (&'a PathBuf, Result<()>) {
        tracing::debug!(path = %path.display(), "processing document");
        (path, op(path))
    }

    let outcomes: Vec<(&PathBuf, Result<()>)> = if options.parallel {
        paths.par_iter().map(|path| run_one(&op, path)).collect()
    } else {
        paths.iter().map(|path| run_one(&op, path)).collect()
    };

    let mut report = BatchReport::default();
    for (path, outcome) in outcomes {
        match outcome {
            Ok(()) => report.processed.push(path.clone()),
            Err(err) if options.is_lenient() => {
                tracing::warn!(path = %path.display(), error = %err, "skipping document");
                report.failed.push(FailedDocument {
                    path: path.clone(),
                    error: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    }

    tracing::info!(
        processed = report.processed.len(),
        failed = report.failed.len(),
        "batch finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn paths() -> Vec<PathBuf> {
        vec![PathBuf::from("a.txt"), PathBuf::from("b.txt"), PathBuf::from("c.txt")]
    }

    fn fail_on_b(path: &Path) -> Result<()> {
        if path == Path::new("b.txt") {
            Err(Error::InvalidData("broken".into()))
        } else {
            Ok(())
        }
    }

    #[test]
    fn test_lenient_collects_failures() {
        let report = run_batch(&paths(), &BatchOptions::default(), fail_on_b).unwrap();
        assert_eq!(report.processed, vec![PathBuf::from("a.txt"), PathBuf::from("c.txt")]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].path, PathBuf::from("b.txt"));
        assert!(!report.is_success());
        assert_eq!(report.total(), 3);
    }

    #[test]
    fn test_strict_aborts() {
        let result = run_batch(&paths(), &BatchOptions::new().strict(), fail_on_b);
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_parallel_keeps_input_order() {
        let options = BatchOptions::new().parallel();
        let report = run_batch(&paths(), &options, |_| Ok(())).unwrap();
        assert_eq!(report.processed, paths());
    }

    #[test]
    fn test_defaults() {
        let options = BatchOptions::default();
        assert!(options.is_lenient());
        assert!(!options.parallel);
    }
}
