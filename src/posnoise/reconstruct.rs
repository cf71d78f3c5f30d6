//! Offset-safe text reconstruction.
//!
//! Masked tokens become [`Edit`]s ordered by strictly decreasing start
//! offset. Edits are applied right to left into a fresh buffer, so a
//! replacement never shifts the offsets of tokens still to be processed.

use super::Bitmask;
use crate::error::{Error, Result};
use crate::model::{PosTag, Token};

/// Coarse POS tag to glyph table. Tags not listed are never replaced.
pub const GLYPHS: &[(PosTag, &str)] = &[
    (PosTag::Noun, "#"),
    (PosTag::Propn, "§"),
    (PosTag::Verb, "Ø"),
    (PosTag::Adj, "@"),
    (PosTag::Adv, "©"),
    (PosTag::Num, "µ"),
    (PosTag::Sym, "$"),
    (PosTag::X, "¥"),
];

/// Returns the glyph that replaces tokens with this tag.
pub fn glyph(tag: PosTag) -> Option<&'static str> {
    GLYPHS.iter().find(|(t, _)| *t == tag).map(|(_, g)| *g)
}

/// Replacement of the byte span `start..end` by `replacement`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub replacement: &'static str,
}

/// Builds the edits for every masked token, last token first.
///
/// Fails if the bitmask does not have one entry per token or a token's span
/// does not address its surface text in `text`.
pub fn mask_edits(text: &str, tokens: &[Token], bitmask: &Bitmask) -> Result<Vec<Edit>> {
    if bitmask.len() != tokens.len() {
        return Err(Error::InvalidData(format!(
            "bitmask has {} entries for {} tokens",
            bitmask.len(),
            tokens.len()
        )));
    }

    let mut edits = Vec::new();
    for (token, keep) in tokens.iter().zip(bitmask.iter()).rev() {
        if keep {
            continue;
        }
        if text.get(token.start..token.end()) != Some(token.text.as_str()) {
            return Err(Error::InvalidSpan {
                start: token.start,
                end: token.end(),
                len: text.len(),
            });
        }
        if let Some(replacement) = glyph(token.pos) {
            edits.push(Edit {
                start: token.start,
                end: token.end(),
                replacement,
            });
        }
    }
    Ok(edits)
}

/// Applies edits ordered by strictly decreasing, non-overlapping spans.
pub fn apply_edits(text: &str, edits: &[Edit]) -> Result<String> {
    // Pieces are collected right to left and reversed once at the end.
    let mut pieces: Vec<&str> = Vec::with_capacity(edits.len() * 2 + 1);
    let mut tail_start = text.len();

    for edit in edits {
        if edit.start > edit.end
            || edit.end > text.len()
            || !text.is_char_boundary(edit.start)
            || !text.is_char_boundary(edit.end)
        {
            return Err(Error::InvalidSpan {
                start: edit.start,
                end: edit.end,
                len: text.len(),
            });
        }
        if edit.end > tail_start {
            return Err(Error::OverlappingEdit {
                start: edit.start,
                previous: tail_start,
            });
        }
        pieces.push(&text[edit.end..tail_start]);
        pieces.push(edit.replacement);
        tail_start = edit.start;
    }
    pieces.push(&text[..tail_start]);

    pieces.reverse();
    Ok(pieces.concat())
}

/// Replaces every masked token of `text` by its glyph.
pub fn reconstruct(text: &str, tokens: &[Token], bitmask: &Bitmask) -> Result<String> {
    let edits = mask_edits(text, tokens, bitmask)?;
    apply_edits(text, &edits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_table() {
        assert_eq!(glyph(PosTag::Noun), Some("#"));
        assert_eq!(glyph(PosTag::Propn), Some("§"));
        assert_eq!(glyph(PosTag::Verb), Some("Ø"));
        assert_eq!(glyph(PosTag::X), Some("¥"));
        assert_eq!(glyph(PosTag::Det), None);
        assert_eq!(glyph(PosTag::Punct), None);
    }

    #[test]
    fn test_edits_in_decreasing_order() {
        let text = "Hausboot fuhr schnell";
        let tokens = vec![
            Token::new("Hausboot", 0, PosTag::Noun, 0),
            Token::new("fuhr", 9, PosTag::Verb, 0),
            Token::new("schnell", 14, PosTag::Adv, 0),
        ];
        let edits = mask_edits(text, &tokens, &Bitmask::new(3)).unwrap();
        let starts: Vec<usize> = edits.iter().map(|e| e.start).collect();
        assert_eq!(starts, vec![14, 9, 0]);
        assert!(starts.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(apply_edits(text, &edits).unwrap(), "# Ø ©");
    }

    #[test]
    fn test_adjacent_tokens_do_not_shift() {
        // The first token is longer than its glyph; the second must still be
        // replaced at its original offset.
        let text = "Hausboot";
        let tokens = vec![
            Token::new("Haus", 0, PosTag::Noun, 0),
            Token::new("boot", 4, PosTag::Verb, 0),
        ];
        let out = reconstruct(text, &tokens, &Bitmask::new(2)).unwrap();
        assert_eq!(out, "#Ø");
    }

    #[test]
    fn test_kept_and_untagged_tokens_untouched() {
        let text = "Der Müller, 3ten Mai.";
        let tokens = vec![
            Token::new("Der", 0, PosTag::Det, 0),
            Token::new("Müller", 4, PosTag::Noun, 0),
            Token::new(",", 11, PosTag::Punct, 0),
            Token::new("3ten", 13, PosTag::Num, 0),
            Token::new("Mai", 18, PosTag::Propn, 0),
            Token::new(".", 21, PosTag::Punct, 0),
        ];
        let mut mask = Bitmask::new(tokens.len());
        mask.keep(3);
        let out = reconstruct(text, &tokens, &mask).unwrap();
        assert_eq!(out, "Der #, 3ten §.");
    }

    #[test]
    fn test_content_outside_masked_spans_identical() {
        let text = "  »Ärger«  kam  ";
        let tokens = vec![
            Token::new("Ärger", 4, PosTag::Noun, 0),
            Token::new("kam", 14, PosTag::Verb, 0),
        ];
        let out = reconstruct(text, &tokens, &Bitmask::new(2)).unwrap();
        assert_eq!(out, "  »#«  Ø  ");
    }

    #[test]
    fn test_out_of_order_edits_rejected() {
        let edits = [
            Edit { start: 0, end: 2, replacement: "#" },
            Edit { start: 3, end: 5, replacement: "#" },
        ];
        assert!(matches!(
            apply_edits("ab cd", &edits),
            Err(Error::OverlappingEdit { start: 3, previous: 0 })
        ));
    }

    #[test]
    fn test_invalid_span_rejected() {
        let tokens = vec![Token::new("Haus", 2, PosTag::Noun, 0)];
        let result = reconstruct("Haus", &tokens, &Bitmask::new(1));
        assert!(matches!(result, Err(Error::InvalidSpan { .. })));

        let edits = [Edit { start: 1, end: 2, replacement: "#" }];
        assert!(matches!(apply_edits("Ä", &edits), Err(Error::InvalidSpan { .. })));
    }

    #[test]
    fn test_bitmask_length_mismatch() {
        let tokens = vec![Token::new("Haus", 0, PosTag::Noun, 0)];
        let result = mask_edits("Haus", &tokens, &Bitmask::new(2));
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }
}
