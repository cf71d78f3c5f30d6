//! Annotation service: tokenization, sentence boundaries and coarse POS tags.
//!
//! The cleaning pipeline and the masking engine only see the [`Annotator`]
//! trait. Two implementations ship with the crate:
//!
//! - [`RuleAnnotator`] (`rule-de`): a pure-Rust German tokenizer, sentence
//!   splitter and lexicon/suffix tagger. Always available.
//! - `SpacyAnnotator` (`spacy:<model>`, `spacy` feature): delegates to a spaCy
//!   pipeline running in an embedded CPython interpreter.
//!
//! Annotators are expensive to build; obtain them through
//! [`ResourceCache`](crate::cache::ResourceCache) so each model is loaded once
//! per process.

mod rule;
#[cfg(feature = "spacy")]
mod spacy;

pub use rule::{Lexicon, RuleAnnotator};
#[cfg(feature = "spacy")]
pub use spacy::SpacyAnnotator;

use crate::error::{Error, Result};
use crate::model::Token;
use std::path::Path;
use std::sync::Arc;

/// Identifier of the built-in rule-based German annotator.
pub const DEFAULT_MODEL: &str = "rule-de";

/// Prefix selecting a spaCy pipeline, e.g. `spacy:de_core_news_lg`.
pub const SPACY_PREFIX: &str = "spacy:";

/// A linguistic annotation service.
///
/// Implementations must be deterministic for identical input.
pub trait Annotator: Send + Sync {
    /// Model identifier this annotator was built for.
    fn model(&self) -> &str;

    /// Tokenizes and tags `text`. Token offsets are byte offsets into `text`
    /// and tokens are returned in text order.
    fn annotate(&self, text: &str) -> Result<Vec<Token>>;

    /// Splits a paragraph into trimmed sentence strings, in order.
    fn split_sentences(&self, paragraph: &str) -> Result<Vec<String>>;
}

/// Builds the annotator for a model identifier.
///
/// `lexicon` optionally points to a `word<TAB>TAG` file that extends the
/// rule-based tagger; it is ignored by other backends.
pub fn load_annotator(model: &str, lexicon: Option<&Path>) -> Result<Arc<dyn Annotator>> {
    match model {
        DEFAULT_MODEL | "de" => {
            let annotator = match lexicon {
                Some(path) => RuleAnnotator::with_lexicon(Lexicon::from_file(path)?),
                None => RuleAnnotator::new(),
            };
            Ok(Arc::new(annotator))
        }
        #[cfg(feature = "spacy")]
        m if m.starts_with(SPACY_PREFIX) => {
            let name = &m[SPACY_PREFIX.len()..];
            Ok(Arc::new(SpacyAnnotator::load(name)?))
        }
        #[cfg(not(feature = "spacy"))]
        m if m.starts_with(SPACY_PREFIX) => Err(Error::UnsupportedModel(format!(
            "{m} requires the 'spacy' feature"
        ))),
        other => Err(Error::UnsupportedModel(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_model() {
        let annotator = load_annotator(DEFAULT_MODEL, None).unwrap();
        assert_eq!(annotator.model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_unknown_model() {
        let result = load_annotator("en_core_web_sm", None);
        assert!(matches!(result, Err(Error::UnsupportedModel(_))));
    }

    #[cfg(not(feature = "spacy"))]
    #[test]
    fn test_spacy_model_requires_feature() {
        let result = load_annotator("spacy:de_core_news_lg", None);
        match result {
            Err(Error::UnsupportedModel(msg)) => assert!(msg.contains("spacy")),
            _ => panic!("Expected UnsupportedModel without the spacy feature"),
        }
    }
}
