//! # Cleanup Pipeline
//!
//! Turns a raw fiction file into a single budgeted string of clean sentences.
//!
//! ## Pipeline Stages
//!
//! 1. **Stage 1: Paragraph Extraction** - Isolate long prose blocks framed by blank lines
//! 2. **Stage 2: Sentence Extraction** - Split paragraphs via the annotator, drop label lines
//! 3. **Stage 3: Sentence Filtering** - Drop front matter, headers and noise; normalize the rest
//! 4. **Stage 4: Budgeted Concatenation** - Keep the longest sentence prefix within the budget
//!
//! [`construct_document`] runs all stages and **overwrites** the source file
//! with the result. The original multi-paragraph text is not kept anywhere;
//! work on a copy if you need it later.

use crate::annotate::Annotator;
use crate::batch::{run_batch, BatchOptions, BatchReport};
use crate::error::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Cleanup configuration options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupOptions {
    /// A paragraph must have strictly more whitespace tokens than this
    pub min_paragraph_tokens: usize,
    /// Character budget of the concatenated document
    pub max_total_chars: usize,
    /// NFC-normalize and convert CRLF line endings before extraction
    pub normalize_unicode: bool,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            min_paragraph_tokens: 30,
            max_total_chars: 7000,
            normalize_unicode: true,
        }
    }
}

impl CleanupOptions {
    /// Creates new options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options that leave the raw text byte-for-byte as read.
    pub fn verbatim() -> Self {
        Self {
            normalize_unicode: false,
            ..Self::default()
        }
    }

    /// Sets the minimum paragraph size in whitespace tokens (exclusive).
    pub fn with_min_paragraph_tokens(mut self, tokens: usize) -> Self {
        self.min_paragraph_tokens = tokens;
        self
    }

    /// Sets the character budget.
    pub fn with_max_total_chars(mut self, chars: usize) -> Self {
        self.max_total_chars = chars;
        self
    }
}

// ============================================================================
// Stage 1: Paragraph Extraction
// ============================================================================

static RE_PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{2,}[a-zäöüßA-ZÄÖÜ0-9 \n,.;:!?'–-]+\n{2,}").unwrap());

/// Unicode NFC normalization and CRLF/CR to LF conversion.
pub fn normalize_raw_text(input: &str) -> String {
    let text: String = input.nfc().filter(|&c| c != '\u{FEFF}').collect();
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Stage 1: Extract prose paragraphs
///
/// - Find blocks framed by two or more newlines on both sides
/// - Keep the text after each block's first inner blank line
/// - Drop blocks with too few whitespace tokens
/// - Join the remaining lines with single spaces
pub fn extract_paragraphs(text: &str, options: &CleanupOptions) -> Vec<String> {
    RE_PARAGRAPH
        .find_iter(text)
        .filter_map(|m| {
            let block = m.as_str().trim();
            block.find("\n\n").map(|idx| block[idx..].trim())
        })
        .filter(|block| block.split_whitespace().count() > options.min_paragraph_tokens)
        .map(|block| block.lines().collect::<Vec<_>>().join(" "))
        .collect()
}

// ============================================================================
// Stage 2: Sentence Extraction
// ============================================================================

/// Stage 2: Split paragraphs into sentences
///
/// Sentences ending with `:` are labels or headings and are dropped.
pub fn extract_sentences(paragraphs: &[String], annotator: &dyn Annotator) -> Result<Vec<String>> {
    let mut sentences = Vec::new();
    for paragraph in paragraphs {
        for sentence in annotator.split_sentences(paragraph)? {
            let sentence = sentence.trim();
            if !sentence.is_empty() && !sentence.ends_with(':') {
                sentences.push(sentence.to_string());
            }
        }
    }
    Ok(sentences)
}

// ============================================================================
// Stage 3: Sentence Filtering
// ============================================================================

static RE_DASH_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[–-]+").unwrap());

static RE_CHAPTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Kapitel[.:]+").unwrap());

static RE_MULTI_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

static RE_LEADING_DASHES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[–-]+\s*").unwrap());

const SENTENCE_TERMINATORS: &[char] = &['.', '!', '?', ':', ';'];

/// Stage 3: Filter and normalize sentences
///
/// Dropped, in order, are sentences that:
/// - mention a copyright ("opyright")
/// - consist of a single token
/// - consist only of title-case tokens (captions, name lists)
/// - contain more than three dash runs
/// - contain a `Kapitel.`/`Kapitel:` chapter header
/// - lack a terminator (`. ! ? : ;`)
/// - contain three or more runs of consecutive whitespace
///
/// Survivors get `". . ."`/`" ..."` collapsed to `"..."`, leading dashes
/// stripped and whitespace runs collapsed to one space.
pub fn preprocess_sentences<I, S>(sentences: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    sentences
        .into_iter()
        .filter_map(|sentence| clean_sentence(sentence.as_ref()))
        .collect()
}

fn clean_sentence(sentence: &str) -> Option<String> {
    let sentence = sentence.trim();
    let tokens: Vec<&str> = sentence.split_whitespace().collect();

    if sentence.contains("opyright") {
        return None;
    }
    if tokens.len() <= 1 {
        return None;
    }
    if tokens.iter().all(|t| is_title_case(t)) {
        return None;
    }
    if RE_DASH_RUN.find_iter(sentence).count() > 3 {
        return None;
    }
    if RE_CHAPTER.is_match(sentence) {
        return None;
    }
    if !sentence.ends_with(SENTENCE_TERMINATORS) {
        return None;
    }
    if RE_MULTI_WHITESPACE.find_iter(sentence).count() >= 3 {
        return None;
    }

    let sentence = sentence.replace(". . .", "...").replace(" ...", "...");
    let sentence = RE_LEADING_DASHES.replace(&sentence, "");
    Some(RE_MULTI_WHITESPACE.replace_all(&sentence, " ").into_owned())
}

/// Title-case check with the same rules as Python's `str.istitle`: at least
/// one cased character, uppercase only at the start of a cased run and
/// lowercase only inside one.
pub fn is_title_case(token: &str) -> bool {
    let mut cased = false;
    let mut previous_cased = false;
    for c in token.chars() {
        if c.is_uppercase() {
            if previous_cased {
                return false;
            }
            previous_cased = true;
            cased = true;
        } else if c.is_lowercase() {
            if !previous_cased {
                return false;
            }
            previous_cased = true;
            cased = true;
        } else {
            previous_cased = false;
        }
    }
    cased
}

// ============================================================================
// Stage 4: Budgeted Concatenation
// ============================================================================

/// Stage 4: Join the sentence prefix that fits into `max_total_chars`
///
/// Lengths are counted in characters. A sentence is taken while the running
/// total including it stays within the budget; the first sentence that
/// overflows ends the document. Only sentence characters count toward the
/// budget, so the joined output of `n` sentences may exceed it by the `n - 1`
/// separating spaces.
pub fn concatenate_sentences(sentences: &[String], max_total_chars: usize) -> String {
    let mut total = 0;
    let mut taken: Vec<&str> = Vec::new();
    for sentence in sentences {
        total += sentence.chars().count();
        if total > max_total_chars {
            break;
        }
        taken.push(sentence);
    }
    taken.join(" ")
}

// ============================================================================
// Main Pipeline
// ============================================================================

/// Run the full cleanup pipeline on raw document text
///
/// # Example
///
/// ```
/// use aacorpus::annotate::RuleAnnotator;
/// use aacorpus::cleanup::{clean_text, CleanupOptions};
///
/// let raw = "TITEL\n\n\n\nKurzer Kopf.\n\n";
/// let clean = clean_text(raw, &CleanupOptions::default(), &RuleAnnotator::new())?;
/// assert!(clean.is_empty());
/// # Ok::<(), aacorpus::Error>(())
/// ```
pub fn clean_text(
    raw: &str,
    options: &CleanupOptions,
    annotator: &dyn Annotator,
) -> Result<String> {
    let text = if options.normalize_unicode {
        normalize_raw_text(raw)
    } else {
        raw.to_string()
    };

    let paragraphs = extract_paragraphs(&text, options);
    let sentences = extract_sentences(&paragraphs, annotator)?;
    let cleaned = preprocess_sentences(&sentences);

    tracing::debug!(
        paragraphs = paragraphs.len(),
        sentences = sentences.len(),
        kept = cleaned.len(),
        "cleaned text"
    );

    Ok(concatenate_sentences(&cleaned, options.max_total_chars))
}

/// Cleans a file and overwrites it with the result.
///
/// **Destructive**: the original text is replaced by a single line of
/// concatenated sentences and cannot be recovered.
pub fn construct_document(
    path: impl AsRef<Path>,
    options: &CleanupOptions,
    annotator: &dyn Annotator,
) -> Result<()> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)?;
    let text = clean_text(&raw, options, annotator)?;
    std::fs::write(path, text)?;
    Ok(())
}

/// Runs [`construct_document`] over many files.
///
/// **Destructive** for every file processed, see [`construct_document`].
pub fn construct_documents(
    paths: &[PathBuf],
    options: &CleanupOptions,
    batch: &BatchOptions,
    annotator: &dyn Annotator,
) -> Result<BatchReport> {
    run_batch(paths, batch, |path| construct_document(path, options, annotator))
}
