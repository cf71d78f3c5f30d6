//! # aacorpus
//!
//! Builds cleaned, author-balanced corpora of German-language fiction and
//! applies POSNoise masking for authorship analysis.
//!
//! ## Pipeline
//!
//! 1. **Grouping**: raw files named `<Author>_-_<Title> (<Year>).txt` are
//!    moved into per-author directories ([`create_author_corpus`]).
//! 2. **Cleaning**: each document is reduced to its narrative sentences under
//!    a character budget ([`construct_documents`], destructive).
//! 3. **Pruning**: short documents, sparse authors and documents between an
//!    author's earliest and latest work are removed ([`curation`]).
//! 4. **Masking**: content words are replaced by POS glyphs while function
//!    words and safe phrases survive ([`posnoise`]).
//!
//! ## Quick Start
//!
//! ```no_run
//! use aacorpus::{posnoise, ResourceCache};
//!
//! fn main() -> aacorpus::Result<()> {
//!     let cache = ResourceCache::new();
//!     let masked = posnoise("Auf einmal kam der Müller.", "rule-de", &cache)?;
//!     println!("{}", masked);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `async`: Tokio wrappers in [`async_api`]
//! - `spacy`: spaCy annotator (`spacy:<model>` identifiers) via an embedded
//!   Python interpreter

pub mod annotate;
pub mod batch;
pub mod cache;
pub mod cleanup;
pub mod curation;
pub mod error;
pub mod fs_utils;
pub mod model;
pub mod posnoise;

#[cfg(feature = "async")]
pub mod async_api;

// Re-exports
pub use annotate::{load_annotator, Annotator, RuleAnnotator, DEFAULT_MODEL};
pub use batch::{BatchOptions, BatchReport, ErrorMode};
pub use cache::ResourceCache;
pub use cleanup::{clean_text, construct_document, construct_documents, CleanupOptions};
pub use curation::{
    create_author_corpus, delete_authors_by_file_count, delete_documents_by_length,
    keep_n_documents_per_author, maximize_time_span, CountOperator, CurationReport,
};
pub use error::{Error, Result};
pub use fs_utils::FileSizeOrder;
pub use model::{PosTag, SafePattern, Token};
pub use posnoise::{posnoise, posnoise_file, posnoise_files, Bitmask, PosnoiseOptions};
