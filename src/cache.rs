//! Per-process memoization of annotators and safe-pattern lists.
//!
//! Loading an annotation model or tokenizing the pattern resource is far more
//! expensive than masking a single document. [`ResourceCache`] builds each
//! resource at most once per model identifier and hands out shared handles.
//! Entries are never invalidated.

use crate::annotate::{load_annotator, Annotator};
use crate::error::Result;
use crate::model::SafePattern;
use crate::posnoise::{load_safe_patterns, parse_safe_patterns, BUNDLED_PATTERNS};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

/// Where safe patterns are read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PatternSource {
    /// The German list compiled into the crate.
    #[default]
    Bundled,
    /// A newline-delimited pattern file.
    File(PathBuf),
}

/// Shared annotators and safe patterns, keyed by model identifier.
#[derive(Default)]
pub struct ResourceCache {
    lexicon: Option<PathBuf>,
    pattern_source: PatternSource,
    annotators: Mutex<HashMap<String, Arc<dyn Annotator>>>,
    patterns: Mutex<HashMap<String, Arc<[SafePattern]>>>,
}

impl ResourceCache {
    /// Creates an empty cache using the bundled pattern list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Extends the rule-based tagger with a `word<TAB>TAG` lexicon file.
    pub fn with_lexicon(mut self, path: impl Into<PathBuf>) -> Self {
        self.lexicon = Some(path.into());
        self
    }

    /// Reads safe patterns from `path` instead of the bundled list.
    pub fn with_pattern_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.pattern_source = PatternSource::File(path.into());
        self
    }

    pub fn pattern_source(&self) -> &PatternSource {
        &self.pattern_source
    }

    /// Returns the annotator for `model`, loading it on first use.
    pub fn annotator(&self, model: &str) -> Result<Arc<dyn Annotator>> {
        let mut annotators = lock(&self.annotators);
        if let Some(annotator) = annotators.get(model) {
            return Ok(Arc::clone(annotator));
        }

        tracing::debug!(model, "loading annotator");
        let annotator = load_annotator(model, self.lexicon.as_deref())?;
        annotators.insert(model.to_string(), Arc::clone(&annotator));
        Ok(annotator)
    }

    /// Returns the safe patterns tokenized with `model`'s annotator, parsing
    /// them on first use.
    pub fn safe_patterns(&self, model: &str) -> Result<Arc<[SafePattern]>> {
        let annotator = self.annotator(model)?;

        let mut patterns = lock(&self.patterns);
        if let Some(list) = patterns.get(model) {
            return Ok(Arc::clone(list));
        }

        let list: Arc<[SafePattern]> = match &self.pattern_source {
            PatternSource::Bundled => parse_safe_patterns(BUNDLED_PATTERNS, annotator.as_ref())?,
            PatternSource::File(path) => load_safe_patterns(path, annotator.as_ref())?,
        }
        .into();
        tracing::info!(model, patterns = list.len(), "safe patterns loaded");
        patterns.insert(model.to_string(), Arc::clone(&list));
        Ok(list)
    }
}

// A poisoned lock only means another thread panicked mid-insert; the map
// itself is still consistent.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;

    #[test]
    fn test_annotator_loaded_once() {
        let cache = ResourceCache::new();
        let first = cache.annotator("rule-de").unwrap();
        let second = cache.annotator("rule-de").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_patterns_loaded_once() {
        let cache = ResourceCache::new();
        let first = cache.safe_patterns("rule-de").unwrap();
        let second = cache.safe_patterns("rule-de").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(!first.is_empty());
    }

    #[test]
    fn test_unsupported_model_not_cached() {
        let cache = ResourceCache::new();
        assert!(matches!(cache.annotator("xx"), Err(Error::UnsupportedModel(_))));
        assert!(matches!(cache.safe_patterns("xx"), Err(Error::UnsupportedModel(_))));
    }

    #[test]
    fn test_pattern_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "nach und nach").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "Es").unwrap();

        let cache = ResourceCache::new().with_pattern_file(file.path());
        let patterns = cache.safe_patterns("rule-de").unwrap();
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].tokens(), ["nach", "und", "nach"]);
        assert_eq!(patterns[1].tokens(), ["es"]);
    }

    #[test]
    fn test_lexicon_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fontane\tPROPN").unwrap();

        let cache = ResourceCache::new().with_lexicon(file.path());
        let annotator = cache.annotator("rule-de").unwrap();
        let tokens = annotator.annotate("fontane").unwrap();
        assert_eq!(tokens[0].pos, crate::model::PosTag::Propn);
    }
}
