//! Score Extractor — pulls the compatibility score out of a reply.

use std::sync::LazyLock;

use regex::Regex;

/// Returned when the reply carries no readable score.
pub const DEFAULT_SCORE: u8 = 50;

// Case-sensitive marker, flexible whitespace. First match wins.
static SCORE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"SCORE:\s*(\d+)").expect("score pattern is valid"));

/// Extracts the `SCORE: <integer>` value from a reply, clamped to [0, 100].
///
/// The clamp is deliberate: an out-of-range model value is capped rather than
/// propagated. Absent or malformed scores fall back to `DEFAULT_SCORE`.
/// Never fails.
pub fn extract_score(text: &str) -> u8 {
    SCORE_PATTERN
        .captures(text)
        .and_then(|caps| caps[1].parse::<u64>().ok())
        .map(|n| n.min(100) as u8)
        .unwrap_or(DEFAULT_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_score_from_report() {
        assert_eq!(extract_score("SCORE: 83\nHABILIDADES DURAS: Python"), 83);
    }

    #[test]
    fn test_flexible_whitespace_after_marker() {
        assert_eq!(extract_score("SCORE:91"), 91);
        assert_eq!(extract_score("SCORE:   7"), 7);
    }

    #[test]
    fn test_marker_is_case_sensitive() {
        assert_eq!(extract_score("score: 83"), DEFAULT_SCORE);
        assert_eq!(extract_score("Score: 83"), DEFAULT_SCORE);
    }

    #[test]
    fn test_missing_score_returns_default() {
        assert_eq!(extract_score("no score here"), DEFAULT_SCORE);
        assert_eq!(extract_score(""), DEFAULT_SCORE);
    }

    #[test]
    fn test_malformed_score_returns_default() {
        assert_eq!(extract_score("SCORE: high"), DEFAULT_SCORE);
        assert_eq!(extract_score("SCORE: -5"), DEFAULT_SCORE);
    }

    #[test]
    fn test_out_of_range_score_is_clamped() {
        assert_eq!(extract_score("SCORE: 130"), 100);
        assert_eq!(extract_score("SCORE: 99999999999999999999"), DEFAULT_SCORE); // overflow → default
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(extract_score("SCORE: 40 ... SCORE: 90"), 40);
    }
}
