//! POSNoise masking.
//!
//! Content words are replaced by a glyph for their coarse POS tag while
//! function words, listed phrases, clitics and unusual numerals keep their
//! surface form:
//!
//! ```text
//! Auf einmal kam der Müller.  ->  Auf einmal Ø der #.
//! ```
//!
//! The engine has three stages:
//!
//! 1. **Annotation**: the model's [`Annotator`] tokenizes and tags the text.
//! 2. **Bitmask**: [`compute_bitmask`] marks tokens covered by a
//!    [`SafePattern`] and the always-kept classes.
//! 3. **Reconstruction**: [`reconstruct`] rewrites masked spans right to left.
//!
//! Annotators and pattern lists come from a [`ResourceCache`] so repeated
//! calls do not reload them.

mod bitmask;
mod options;
mod patterns;
mod reconstruct;

pub use bitmask::{compute_bitmask, Bitmask};
pub use options::{PosnoiseOptions, DEFAULT_OUTPUT_SUFFIX};
pub use patterns::{load_safe_patterns, parse_safe_patterns, BUNDLED_PATTERNS};
pub use reconstruct::{apply_edits, glyph, mask_edits, reconstruct, Edit, GLYPHS};

use crate::annotate::Annotator;
use crate::batch::{run_batch, BatchOptions, BatchReport};
use crate::cache::ResourceCache;
use crate::error::Result;
use crate::model::{SafePattern, Token};
use std::path::{Path, PathBuf};

/// Masks `text` with an explicit annotator and pattern list.
pub fn posnoise_with(
    text: &str,
    annotator: &dyn Annotator,
    patterns: &[SafePattern],
) -> Result<String> {
    let tokens = annotator.annotate(text)?;
    let bitmask = compute_bitmask(&tokens, patterns);
    reconstruct(text, &tokens, &bitmask)
}

/// Annotates `text` with `model` and returns its tokens with their bitmask.
pub fn posnoise_bitmask(
    text: &str,
    model: &str,
    cache: &ResourceCache,
) -> Result<(Vec<Token>, Bitmask)> {
    let annotator = cache.annotator(model)?;
    let patterns = cache.safe_patterns(model)?;
    let tokens = annotator.annotate(text)?;
    let bitmask = compute_bitmask(&tokens, &patterns);
    Ok((tokens, bitmask))
}

/// Masks `text` using the annotator and safe patterns cached for `model`.
///
/// # Example
///
/// ```
/// use aacorpus::{posnoise, ResourceCache};
///
/// let cache = ResourceCache::new();
/// let masked = posnoise("Auf einmal kam der Müller.", "rule-de", &cache)?;
/// assert!(masked.starts_with("Auf einmal "));
/// assert!(masked.ends_with(" der #."));
/// # Ok::<(), aacorpus::Error>(())
/// ```
pub fn posnoise(text: &str, model: &str, cache: &ResourceCache) -> Result<String> {
    let (tokens, bitmask) = posnoise_bitmask(text, model, cache)?;
    tracing::debug!(tokens = tokens.len(), kept = bitmask.kept_count(), "masking text");
    reconstruct(text, &tokens, &bitmask)
}

/// Masks one file and writes the result to [`PosnoiseOptions::output_path`].
///
/// The input is left untouched. Returns the path written.
pub fn posnoise_file(
    path: impl AsRef<Path>,
    options: &PosnoiseOptions,
    cache: &ResourceCache,
) -> Result<PathBuf> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let masked = posnoise(&text, &options.model, cache)?;

    let output = options.output_path(path);
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&output, masked)?;
    tracing::debug!(input = %path.display(), output = %output.display(), "wrote masked document");
    Ok(output)
}

/// Masks many files. See [`run_batch`] for error handling.
pub fn posnoise_files(
    paths: &[PathBuf],
    options: &PosnoiseOptions,
    batch: &BatchOptions,
    cache: &ResourceCache,
) -> Result<BatchReport> {
    // Load once up front so workers share the resources and a bad model
    // fails the whole batch instead of every document.
    cache.safe_patterns(&options.model)?;
    run_batch(paths, batch, |path| posnoise_file(path, options, cache).map(|_| ()))
}
