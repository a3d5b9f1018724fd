//! Feedback parser — extraction primitives for the model's free-text response.
//!
//! The completion model is asked (not forced) to follow a convention: seven
//! numbered sections, a `SCORE: X` line per scored section, bullet lines.
//! Real responses drift, so every extraction here is find-or-default: these
//! functions are total over arbitrary text and never error.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// First line matching the score marker, e.g. `SCORE: 7.5`.
static SCORE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^SCORE:\s*(\d+(?:\.\d+)?)").expect("score regex"));

/// A leaked numbered top-level section header, e.g. `3. Problem Proposition`.
/// Guards the feedback lists when section boundary matching was imperfect.
static HEADER_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\d+\.\s+(?:Overall Score|Opener Analysis|Problem Proposition|Objection Handling|Engagement & Flow|Closing & Next Steps|Actionable Takeaways)",
    )
    .expect("header line regex")
});

/// Leading bullet glyph plus trailing whitespace.
static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[•\-\*]\s*").expect("bullet regex"));

/// Extracts the body of one section from the full response text.
///
/// Matching is case-insensitive and tolerates any run of colons/whitespace
/// after the header label. The body runs from just after `header` up to the
/// first occurrence of `next_header` (or end of text when `None`). Returns
/// the trimmed body, or an empty string when `header` is not found. The
/// first occurrence of `header` wins when it appears more than once.
pub fn extract_section(text: &str, header: &str, next_header: Option<&str>) -> String {
    let header_re = match RegexBuilder::new(&format!(r"{}[:\s]*", regex::escape(header)))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re,
        Err(_) => return String::new(),
    };

    let Some(m) = header_re.find(text) else {
        return String::new();
    };
    let body = &text[m.end()..];

    let body = match next_header {
        Some(next) => {
            let next_re = match RegexBuilder::new(&regex::escape(next))
                .case_insensitive(true)
                .build()
            {
                Ok(re) => re,
                Err(_) => return String::new(),
            };
            match next_re.find(body) {
                Some(n) => &body[..n.start()],
                None => body,
            }
        }
        None => body,
    };

    body.trim().to_string()
}

/// Parses the section's numeric score from its `SCORE:` line.
///
/// Returns the first match as-is (not clamped or rounded), or `0.0` when no
/// score line exists anywhere in the section.
pub fn parse_score(text: &str) -> f64 {
    SCORE_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Cleans a section body into an ordered list of feedback lines.
///
/// Drops blank lines, score-marker lines, and leaked numbered section
/// headers; strips a leading bullet glyph from what remains. Source order
/// and duplicates are preserved.
pub fn parse_feedback_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.to_ascii_uppercase().starts_with("SCORE:"))
        .filter(|line| !HEADER_LINE_RE.is_match(line))
        .map(|line| BULLET_RE.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Extracts a labelled alternative suggestion from a section body.
///
/// `label` is a case-insensitive regex pattern; the prompt phrases the label
/// differently per section ("Suggest a stronger alternative opener:",
/// "Suggested closing:", ...), so the pattern is caller-supplied rather than
/// hardcoded. Returns the rest of the matching line, trimmed, or `None` when
/// the label is absent or the pattern is invalid.
pub fn extract_alternative(text: &str, label: &str) -> Option<String> {
    let re = RegexBuilder::new(&format!(r"{label}\s*(.+)"))
        .case_insensitive(true)
        .build()
        .ok()?;
    re.captures(text)
        .and_then(|c| c.get(c.len() - 1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}
