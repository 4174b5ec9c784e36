//! Parsing of free-text model replies into labeled sections.
//!
//! Models are asked to answer in a fixed five-section format (SUMMARY,
//! IMPACT, STRENGTHS, CONCERNS, REVIEW). Replies are free text, so the
//! parser is total: unrecognized input degrades to empty fields while the
//! raw reply is always preserved by the caller. The five section
//! identities are a closed set — no dynamic discovery.

use crate::models::{AnalysisResult, AnalysisSource};

/// The five recognized section markers, in reply order.
const MARKERS: [(&str, Field); 5] = [
    ("SUMMARY", Field::Summary),
    ("IMPACT", Field::Impact),
    ("STRENGTHS", Field::Strengths),
    ("CONCERNS", Field::Concerns),
    ("REVIEW", Field::Review),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Summary,
    Impact,
    Strengths,
    Concerns,
    Review,
}

/// Parsed section contents. Fields that never received a labeled line
/// stay empty — that is not an error.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Sections {
    pub summary: String,
    pub impact: String,
    pub strengths: String,
    pub concerns: String,
    pub recommendation: String,
}

impl Sections {
    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Summary => &mut self.summary,
            Field::Impact => &mut self.impact,
            Field::Strengths => &mut self.strengths,
            Field::Concerns => &mut self.concerns,
            Field::Review => &mut self.recommendation,
        }
    }

    /// Attach backend identity and the verbatim reply.
    pub fn into_result(
        self,
        source: AnalysisSource,
        model: impl Into<String>,
        raw_text: impl Into<String>,
    ) -> AnalysisResult {
        AnalysisResult {
            summary: self.summary,
            impact: self.impact,
            strengths: self.strengths,
            concerns: self.concerns,
            recommendation: self.recommendation,
            raw_text: raw_text.into(),
            source,
            model: model.into(),
        }
    }
}

/// Parse a model reply into the five fixed sections.
///
/// Line-by-line state machine: a line starting with a recognized marker
/// (after stripping any leading icon/emoji) opens that section; following
/// unlabeled non-blank lines are folded into the open section with a
/// single-space separator; lines before any marker are discarded.
pub fn parse_sections(text: &str) -> Sections {
    let mut sections = Sections::default();
    let mut current: Option<Field> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some((field, rest)) = match_marker(line) {
            *sections.field_mut(field) = rest.to_string();
            current = Some(field);
        } else if let Some(field) = current {
            let value = sections.field_mut(field);
            if value.is_empty() {
                value.push_str(line);
            } else {
                value.push(' ');
                value.push_str(line);
            }
        }
    }

    sections
}

/// Match a line against the marker set.
///
/// Tolerates a leading icon/emoji (anything before the first ASCII
/// alphanumeric is stripped), matches the marker token case-insensitively,
/// and accepts the marker with or without a trailing colon. Returns the
/// field and the remainder of the line, trimmed.
fn match_marker(line: &str) -> Option<(Field, &str)> {
    let start = line.find(|c: char| c.is_ascii_alphanumeric())?;
    let stripped = &line[start..];

    for (marker, field) in MARKERS {
        let Some(head) = stripped.get(..marker.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(marker) {
            continue;
        }
        let rest = &stripped[marker.len()..];
        // The token must end here: "IMPACTFUL" is not an IMPACT label.
        match rest.chars().next() {
            None => return Some((field, "")),
            Some(':') => return Some((field, rest[1..].trim())),
            Some(c) if c.is_whitespace() => return Some((field, rest.trim())),
            _ => continue,
        }
    }
    None
}

/// Scan a reply for a 1..=10 quality score.
///
/// Only lines carrying a score label are considered. Within such a line,
/// whitespace-separated tokens are checked in order; the first purely
/// numeric token that parses into 1..=10 wins. Out-of-range numbers are
/// skipped and scanning continues on subsequent lines. No valid hit means
/// `None` — a score is never inferred.
pub fn extract_score(text: &str) -> Option<u8> {
    for line in text.lines() {
        if !has_score_label(line) {
            continue;
        }
        for token in line.split_whitespace() {
            if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            if let Ok(score) = token.parse::<u8>() {
                if (1..=10).contains(&score) {
                    return Some(score);
                }
            }
        }
    }
    None
}

/// Case-insensitive check for the score label token.
fn has_score_label(line: &str) -> bool {
    line.to_ascii_uppercase().contains("SCORE")
}
