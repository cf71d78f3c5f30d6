//! Masking configuration.

use crate::annotate::DEFAULT_MODEL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default suffix appended to the stem of a masked file.
pub const DEFAULT_OUTPUT_SUFFIX: &str = ".posnoise.txt";

/// Options for masking files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PosnoiseOptions {
    /// Annotation model identifier (`rule-de`, `spacy:<name>`).
    pub model: String,

    /// Suffix replacing the input's extension in the output file name.
    pub output_suffix: String,

    /// Directory for masked files. `None` writes next to each input.
    pub output_dir: Option<PathBuf>,
}

impl Default for PosnoiseOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            output_dir: None,
        }
    }
}

impl PosnoiseOptions {
    /// Creates new options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the annotation model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the output file suffix.
    pub fn with_output_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.output_suffix = suffix.into();
        self
    }

    /// Writes masked files into `dir` instead of next to the inputs.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Output path for a given input: `<dir>/<stem><suffix>`.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = format!("{stem}{}", self.output_suffix);
        match &self.output_dir {
            Some(dir) => dir.join(name),
            None => input.with_file_name(name),
        }
    }
}
