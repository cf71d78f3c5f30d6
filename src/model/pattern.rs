//! Safe patterns preserved verbatim by the masking engine.

use serde::Serialize;

/// A fixed sequence of lowercase token strings.
///
/// Never empty: [`SafePattern::new`] rejects empty sequences so the scanner
/// can always index the first element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SafePattern {
    tokens: Vec<String>,
}

impl SafePattern {
    /// Creates a pattern, lowercasing every element. Returns `None` for an
    /// empty sequence.
    pub fn new<I, S>(tokens: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens: Vec<String> = tokens
            .into_iter()
            .map(|t| t.as_ref().to_lowercase())
            .collect();
        if tokens.is_empty() {
            None
        } else {
            Some(Self { tokens })
        }
    }

    /// Pattern elements in order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Always false; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercased() {
        let pattern = SafePattern::new(["Nach", "UND", "nach"]).unwrap();
        assert_eq!(pattern.tokens(), ["nach", "und", "nach"]);
        assert_eq!(pattern.len(), 3);
    }

    #[test]
    fn test_empty_rejected() {
        assert!(SafePattern::new(Vec::<String>::new()).is_none());
    }
}
