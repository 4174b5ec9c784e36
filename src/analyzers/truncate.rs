//! Diff size bounding.
//!
//! Every backend caps the diff it transmits to avoid context-window and
//! latency blowups. The limit is a per-backend parameter, not a shared
//! constant: the hosted API takes a materially larger diff than a
//! self-hosted model.

use crate::constants::TRUNCATION_MARKER;

/// Bound `diff` to at most `limit` characters.
///
/// Returns the diff unchanged when it fits. Otherwise returns exactly
/// `limit` characters followed by the truncation marker. Counts `char`s,
/// not bytes, so a cut never lands inside a multi-byte code point.
pub fn truncate_diff(diff: &str, limit: usize) -> String {
    if diff.chars().count() <= limit {
        return diff.to_string();
    }
    let mut out: String = diff.chars().take(limit).collect();
    out.push_str(TRUNCATION_MARKER);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn short_diff_unchanged() {
        let diff = "+fn main() {}\n";
        assert_eq!(truncate_diff(diff, 100), diff);
    }

    #[test]
    fn exact_length_unchanged() {
        let diff = "abcde";
        assert_eq!(truncate_diff(diff, 5), diff);
    }

    #[test]
    fn long_diff_cut_with_marker() {
        let diff = "x".repeat(500);
        let out = truncate_diff(&diff, 100);
        assert_eq!(out.chars().count(), 100 + TRUNCATION_MARKER.chars().count());
        assert!(out.starts_with(&"x".repeat(100)));
        assert!(out.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn cut_respects_char_boundaries() {
        // Cyrillic commit content: 2 bytes per char.
        let diff = "привет мир, это большой дифф".repeat(10);
        let out = truncate_diff(&diff, 50);
        assert_eq!(out.chars().count(), 50 + TRUNCATION_MARKER.chars().count());
    }

    #[test]
    fn empty_diff_unchanged() {
        assert_eq!(truncate_diff("", 4000), "");
    }
}
