//! Corpus data model.
//!
//! Tokens and tags produced by the annotation service, safe patterns used by
//! the masking engine, and the metadata encoded in corpus file names.

mod document;
mod pattern;
mod token;

pub use document::*;
pub use pattern::*;
pub use token::*;
