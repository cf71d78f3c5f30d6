//! Per-token keep/mask decisions.

use crate::model::{PosTag, SafePattern, Token};

/// Clitics that are always kept, compared against the lowercased surface.
const CONTRACTIONS: &[&str] = &["'m", "'d", "'s", "'t", "'ve", "'ll", "'re", "'ts", "'em", "'tis"];

/// One decision per token: `true` keeps the surface, `false` masks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmask(Vec<bool>);

impl Bitmask {
    /// Creates a bitmask of `len` entries, all masked.
    pub fn new(len: usize) -> Self {
        Self(vec![false; len])
    }

    /// Marks token `index` as kept.
    pub fn keep(&mut self, index: usize) {
        self.0[index] = true;
    }

    /// Returns whether token `index` is kept.
    pub fn is_kept(&self, index: usize) -> bool {
        self.0[index]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of kept tokens.
    pub fn kept_count(&self) -> usize {
        self.0.iter().filter(|&&k| k).count()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = bool> + ExactSizeIterator + '_ {
        self.0.iter().copied()
    }
}

/// Computes which tokens keep their surface text.
///
/// Each safe pattern is scanned left to right once. On a mismatch the
/// position cursor rewinds by the length of the partial match, so the scan
/// resumes one token after where the failed attempt started. This is not a
/// failure-function automaton and may miss overlapping matches; corpora built
/// with this rule depend on its exact match set.
///
/// Afterwards clitics and numbers written with non-digit characters are kept.
pub fn compute_bitmask(tokens: &[Token], patterns: &[SafePattern]) -> Bitmask {
    let lowered: Vec<String> = tokens.iter().map(Token::lowercase).collect();
    let mut bitmask = Bitmask::new(tokens.len());

    for pattern in patterns {
        let elements = pattern.tokens();
        let mut i = 0;
        let mut matched = 0;
        while i < lowered.len() {
            if lowered[i] == elements[matched] {
                matched += 1;
                if matched == elements.len() {
                    for j in (i + 1 - elements.len())..=i {
                        bitmask.keep(j);
                    }
                    matched = 0;
                }
            } else {
                i -= matched;
                matched = 0;
            }
            i += 1;
        }
    }

    for (i, token) in tokens.iter().enumerate() {
        if CONTRACTIONS.contains(&lowered[i].as_str()) {
            bitmask.keep(i);
        }
        if token.pos == PosTag::Num && token.text.chars().any(|c| !c.is_ascii_digit()) {
            bitmask.keep(i);
        }
    }

    bitmask
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[(&str, PosTag)]) -> Vec<Token> {
        let mut start = 0;
        words
            .iter()
            .map(|(w, pos)| {
                let token = Token::new(*w, start, *pos, 0);
                start += w.len() + 1;
                token
            })
            .collect()
    }

    fn nouns(words: &[&str]) -> Vec<Token> {
        let tagged: Vec<(&str, PosTag)> = words.iter().map(|w| (*w, PosTag::Noun)).collect();
        tokens(&tagged)
    }

    fn pattern(words: &[&str]) -> SafePattern {
        SafePattern::new(words).unwrap()
    }

    #[test]
    fn test_one_entry_per_token() {
        let toks = nouns(&["a", "b", "c", "d"]);
        assert_eq!(compute_bitmask(&toks, &[]).len(), 4);
        assert_eq!(compute_bitmask(&[], &[pattern(&["a"])]).len(), 0);
    }

    #[test]
    fn test_case_insensitive_contiguous_match() {
        let toks = nouns(&["Auf", "EINMAL", "kam", "auf", "den", "einmal"]);
        let mask = compute_bitmask(&toks, &[pattern(&["auf", "einmal"])]);
        assert_eq!(mask.as_slice(), &[true, true, false, false, false, false]);
    }

    #[test]
    fn test_repeated_matches() {
        let toks = nouns(&["nach", "und", "nach", "und", "nach"]);
        let mask = compute_bitmask(&toks, &[pattern(&["nach", "und", "nach"])]);
        // After a full match the cursor continues after it, so the second
        // overlapping occurrence starting at index 2 is not seen.
        assert_eq!(mask.as_slice(), &[true, true, true, false, false]);
    }

    #[test]
    fn test_rewind_restarts_after_failed_start() {
        // "a a b": the attempt at 0 fails at 1, rewinds, retries from 1.
        let toks = nouns(&["a", "a", "b"]);
        let mask = compute_bitmask(&toks, &[pattern(&["a", "b"])]);
        assert_eq!(mask.as_slice(), &[false, true, true]);
    }

    #[test]
    fn test_partial_match_at_end_is_ignored() {
        let toks = nouns(&["x", "so", "dass"]);
        let mask = compute_bitmask(&toks, &[pattern(&["so", "dass", "er"])]);
        assert_eq!(mask.kept_count(), 0);
    }

    #[test]
    fn test_contractions_kept() {
        let toks = tokens(&[("geht", PosTag::Verb), ("'s", PosTag::Pron), ("'Tis", PosTag::X)]);
        let mask = compute_bitmask(&toks, &[]);
        assert_eq!(mask.as_slice(), &[false, true, true]);
    }

    #[test]
    fn test_numbers_with_non_digits_kept() {
        let toks = tokens(&[
            ("1858", PosTag::Num),
            ("3ten", PosTag::Num),
            ("1.000", PosTag::Num),
            ("drei", PosTag::Num),
            ("3ten", PosTag::Adj),
        ]);
        let mask = compute_bitmask(&toks, &[]);
        assert_eq!(mask.as_slice(), &[false, true, true, true, false]);
    }

    #[test]
    fn test_marked_spans_match_pattern_exactly() {
        let words = ["es", "war", "einmal", "ein", "König", "es", "war", "kalt"];
        let toks = nouns(&words);
        let p = pattern(&["es", "war", "einmal"]);
        let mask = compute_bitmask(&toks, std::slice::from_ref(&p));
        let kept: Vec<&str> = words
            .iter()
            .zip(mask.iter())
            .filter(|(_, k)| *k)
            .map(|(w, _)| *w)
            .collect();
        assert_eq!(kept, vec!["es", "war", "einmal"]);
    }
}
