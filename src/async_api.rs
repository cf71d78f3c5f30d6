//! Async API for callers running inside a Tokio runtime.
//!
//! Enable the `async` feature to use these APIs:
//!
//! ```toml
//! [dependencies]
//! aacorpus = { version = "0.1", features = ["async"] }
//! ```
//!
//! Annotation and masking are CPU-bound, so every wrapper reads with
//! `tokio::fs` and runs the work on the blocking pool.

use crate::annotate::Annotator;
use crate::cache::ResourceCache;
use crate::cleanup::CleanupOptions;
use crate::error::{Error, Result};
use crate::posnoise::PosnoiseOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e.to_string())))?
}

/// Asynchronously cleans a raw document without modifying it.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> aacorpus::Result<()> {
/// use std::sync::Arc;
/// use aacorpus::annotate::RuleAnnotator;
/// use aacorpus::CleanupOptions;
///
/// let text = aacorpus::async_api::clean_file(
///     "raw/Kafka_-_Der Prozess (1925).txt",
///     &CleanupOptions::default(),
///     Arc::new(RuleAnnotator::new()),
/// )
/// .await?;
/// println!("{}", text);
/// # Ok(())
/// # }
/// ```
pub async fn clean_file(
    path: impl AsRef<Path>,
    options: &CleanupOptions,
    annotator: Arc<dyn Annotator>,
) -> Result<String> {
    let raw = fs::read_to_string(path).await?;
    let options = options.clone();
    blocking(move || crate::cleanup::clean_text(&raw, &options, annotator.as_ref())).await
}

/// Asynchronously cleans a file and overwrites it with the result.
///
/// **Destructive**, see [`crate::cleanup::construct_document`].
pub async fn construct_document(
    path: impl AsRef<Path>,
    options: &CleanupOptions,
    annotator: Arc<dyn Annotator>,
) -> Result<()> {
    let path = path.as_ref();
    let text = clean_file(path, options, annotator).await?;
    fs::write(path, text).await?;
    Ok(())
}

/// Asynchronously masks a string with the resources cached for `model`.
pub async fn posnoise(text: String, model: String, cache: Arc<ResourceCache>) -> Result<String> {
    blocking(move || crate::posnoise::posnoise(&text, &model, &cache)).await
}

/// Asynchronously masks a file. Returns the path written.
pub async fn posnoise_file(
    path: impl AsRef<Path>,
    options: &PosnoiseOptions,
    cache: Arc<ResourceCache>,
) -> Result<PathBuf> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).await?;
    let masked = posnoise(text, options.model.clone(), cache).await?;

    let output = options.output_path(path);
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    fs::write(&output, masked).await?;
    Ok(output)
}
