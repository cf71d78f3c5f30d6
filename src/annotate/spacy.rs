//! spaCy-backed annotator.
//!
//! Requires a Python environment with `spacy` and the requested pipeline
//! installed. The pipeline is loaded once in [`SpacyAnnotator::load`] and
//! shared across calls.

use super::{Annotator, SPACY_PREFIX};
use crate::error::Result;
use crate::model::{PosTag, Token};
use pyo3::prelude::*;
use pyo3::types::PyDict;

/// Annotator delegating to a loaded spaCy `Language` object.
pub struct SpacyAnnotator {
    model: String,
    nlp: Py<PyAny>,
}

impl SpacyAnnotator {
    /// Loads `spacy.load(name)`. Named-entity recognition is disabled; the
    /// dependency parser stays enabled because it drives sentence boundaries.
    pub fn load(name: &str) -> Result<Self> {
        let nlp = Python::with_gil(|py| -> PyResult<Py<PyAny>> {
            let spacy = PyModule::import(py, "spacy")?;
            let kwargs = PyDict::new(py);
            kwargs.set_item("disable", vec!["ner"])?;
            let nlp = spacy.call_method("load", (name,), Some(&kwargs))?;
            Ok(nlp.unbind())
        })?;

        tracing::info!(model = name, "loaded spaCy pipeline");
        Ok(Self {
            model: format!("{SPACY_PREFIX}{name}"),
            nlp,
        })
    }
}

impl Annotator for SpacyAnnotator {
    fn model(&self) -> &str {
        &self.model
    }

    fn annotate(&self, text: &str) -> Result<Vec<Token>> {
        // spaCy reports character offsets; tokens need byte offsets.
        let byte_offsets: Vec<usize> = text
            .char_indices()
            .map(|(b, _)| b)
            .chain(std::iter::once(text.len()))
            .collect();

        let tokens = Python::with_gil(|py| -> PyResult<Vec<Token>> {
            let doc = self.nlp.bind(py).call1((text,))?;
            let mut tokens = Vec::new();
            let mut sentence = 0;
            for token in doc.try_iter()? {
                let token = token?;
                let surface: String = token.getattr("text")?.extract()?;
                let idx: usize = token.getattr("idx")?.extract()?;
                let pos: String = token.getattr("pos_")?.extract()?;
                let is_start: Option<bool> = token.getattr("is_sent_start")?.extract()?;
                if is_start == Some(true) && !tokens.is_empty() {
                    sentence += 1;
                }
                let start = byte_offsets.get(idx).copied().unwrap_or(text.len());
                tokens.push(Token::new(surface, start, PosTag::from_label(&pos), sentence));
            }
            Ok(tokens)
        })?;

        Ok(tokens)
    }

    fn split_sentences(&self, paragraph: &str) -> Result<Vec<String>> {
        let sentences = Python::with_gil(|py| -> PyResult<Vec<String>> {
            let doc = self.nlp.bind(py).call1((paragraph,))?;
            let mut sentences = Vec::new();
            for sent in doc.getattr("sents")?.try_iter()? {
                let text: String = sent?.getattr("text")?.extract()?;
                let text = text.trim();
                if !text.is_empty() {
                    sentences.push(text.to_string());
                }
            }
            Ok(sentences)
        })?;

        Ok(sentences)
    }
}
