//! Annotated tokens and coarse part-of-speech tags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A token produced by the annotation service.
///
/// `start` and `len` are byte offsets into the text the token was produced
/// from, so `&text[token.start..token.end()]` is always the surface form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Surface text
    pub text: String,
    /// Byte offset of the first byte in the owning text
    pub start: usize,
    /// Length in bytes
    pub len: usize,
    /// Coarse part-of-speech tag
    pub pos: PosTag,
    /// Index of the sentence the token belongs to
    pub sentence: usize,
}

impl Token {
    /// Creates a token whose length is taken from its surface text.
    pub fn new(text: impl Into<String>, start: usize, pos: PosTag, sentence: usize) -> Self {
        let text = text.into();
        Self {
            len: text.len(),
            text,
            start,
            pos,
            sentence,
        }
    }

    /// Byte offset one past the last byte.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Lowercased surface text, the form safe patterns are compared against.
    pub fn lowercase(&self) -> String {
        self.text.to_lowercase()
    }
}

/// Universal coarse part-of-speech tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PosTag {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Sym,
    Verb,
    X,
    Space,
}

impl PosTag {
    /// Returns the Universal Dependencies label of this tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            PosTag::Adj => "ADJ",
            PosTag::Adp => "ADP",
            PosTag::Adv => "ADV",
            PosTag::Aux => "AUX",
            PosTag::Cconj => "CCONJ",
            PosTag::Det => "DET",
            PosTag::Intj => "INTJ",
            PosTag::Noun => "NOUN",
            PosTag::Num => "NUM",
            PosTag::Part => "PART",
            PosTag::Pron => "PRON",
            PosTag::Propn => "PROPN",
            PosTag::Punct => "PUNCT",
            PosTag::Sconj => "SCONJ",
            PosTag::Sym => "SYM",
            PosTag::Verb => "VERB",
            PosTag::X => "X",
            PosTag::Space => "SPACE",
        }
    }

    /// Parses a tag label. Unknown labels fall back to [`PosTag::X`].
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "ADJ" => PosTag::Adj,
            "ADP" => PosTag::Adp,
            "ADV" => PosTag::Adv,
            "AUX" => PosTag::Aux,
            "CCONJ" | "CONJ" => PosTag::Cconj,
            "DET" => PosTag::Det,
            "INTJ" => PosTag::Intj,
            "NOUN" => PosTag::Noun,
            "NUM" => PosTag::Num,
            "PART" => PosTag::Part,
            "PRON" => PosTag::Pron,
            "PROPN" => PosTag::Propn,
            "PUNCT" => PosTag::Punct,
            "SCONJ" => PosTag::Sconj,
            "SYM" => PosTag::Sym,
            "VERB" => PosTag::Verb,
            "SPACE" => PosTag::Space,
            _ => PosTag::X,
        }
    }
}

impl FromStr for PosTag {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_label(s))
    }
}

impl fmt::Display for PosTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_span() {
        let token = Token::new("Müller", 4, PosTag::Noun, 0);
        assert_eq!(token.len, 7);
        assert_eq!(token.end(), 11);
        assert_eq!(token.lowercase(), "müller");
    }

    #[test]
    fn test_tag_labels() {
        assert_eq!(PosTag::from_label("propn"), PosTag::Propn);
        assert_eq!(PosTag::from_label("CONJ"), PosTag::Cconj);
        assert_eq!(PosTag::from_label("NNP"), PosTag::X);
        assert_eq!("VERB".parse::<PosTag>(), Ok(PosTag::Verb));
        assert_eq!(PosTag::Sconj.to_string(), "SCONJ");
    }

    #[test]
    fn test_tag_serde() {
        assert_eq!(serde_json::to_string(&PosTag::Noun).unwrap(), "\"NOUN\"");
        let tag: PosTag = serde_json::from_str("\"CCONJ\"").unwrap();
        assert_eq!(tag, PosTag::Cconj);
    }
}
