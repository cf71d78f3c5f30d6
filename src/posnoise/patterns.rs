//! Safe-pattern resources.

use crate::annotate::Annotator;
use crate::error::Result;
use crate::model::{PosTag, SafePattern};
use std::path::Path;

/// The bundled German safe-pattern list, one pattern per line.
pub const BUNDLED_PATTERNS: &str = include_str!("../../resources/posnoise_patterns_de.txt");

/// Tokenizes each line of `content` with `annotator` into a lowercase pattern.
///
/// Blank lines are skipped. Lines are tokenized by the same annotator that
/// will tokenize the masked text, so multi-token entries such as `so dass`
/// line up with the token stream they are matched against.
pub fn parse_safe_patterns(content: &str, annotator: &dyn Annotator) -> Result<Vec<SafePattern>> {
    let mut patterns = Vec::new();
    for line in content.split('\n') {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let tokens = annotator.annotate(line)?;
        let surfaces = tokens
            .iter()
            .filter(|t| t.pos != PosTag::Space)
            .map(|t| t.text.as_str());
        if let Some(pattern) = SafePattern::new(surfaces) {
            patterns.push(pattern);
        }
    }
    tracing::debug!(model = annotator.model(), count = patterns.len(), "parsed safe patterns");
    Ok(patterns)
}

/// Reads and parses a pattern file.
pub fn load_safe_patterns(
    path: impl AsRef<Path>,
    annotator: &dyn Annotator,
) -> Result<Vec<SafePattern>> {
    let content = std::fs::read_to_string(path)?;
    parse_safe_patterns(&content, annotator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::RuleAnnotator;

    #[test]
    fn test_parse_lines() {
        let annotator = RuleAnnotator::new();
        let patterns = parse_safe_patterns("Es gibt\n\n  um zu \nder\r\n", &annotator).unwrap();
        let tokens: Vec<&[String]> = patterns.iter().map(SafePattern::tokens).collect();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0], ["es", "gibt"]);
        assert_eq!(tokens[1], ["um", "zu"]);
        assert_eq!(tokens[2], ["der"]);
    }

    #[test]
    fn test_bundled_patterns_parse() {
        let annotator = RuleAnnotator::new();
        let patterns = parse_safe_patterns(BUNDLED_PATTERNS, &annotator).unwrap();
        assert!(!patterns.is_empty());
        assert!(patterns.iter().all(|p| !p.is_empty()));
        assert!(patterns.iter().any(|p| p.tokens() == ["auf", "einmal"]));
    }

    #[test]
    fn test_load_missing_file() {
        let annotator = RuleAnnotator::new();
        let result = load_safe_patterns("/nonexistent/patterns.txt", &annotator);
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }
}
