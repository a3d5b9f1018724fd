//! Section schema — the scorecard's seven sections as data.
//!
//! Each section is a header label plus a parsing kind, so prompt wording can
//! change (or sections can be added) by editing this table instead of the
//! assembler. The alternative-label patterns mirror the phrasing the coaching
//! prompt asks the model to use per section.

use crate::analysis::parser::{
    extract_alternative, extract_section, parse_feedback_lines, parse_score,
};

/// How one section's body is parsed into scorecard fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// Score plus the raw section body as a prose summary.
    ScoredSummary,
    /// Score, cleaned feedback lines, and an optional alternative suggestion
    /// found via the given label pattern (case-insensitive regex).
    ScoredWithAlternative { label: &'static str },
    /// Score plus cleaned lines split into feedback vs recommendations.
    ScoredWithRecommendations,
    /// No score; cleaned lines split into improvements vs one script example.
    UnscoredTakeaways,
}

/// Stable identity for routing a parsed section into the scorecard record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionId {
    OverallScore,
    OpenerAnalysis,
    ProblemProposition,
    ObjectionHandling,
    EngagementAndFlow,
    ClosingAndNextSteps,
    ActionableTakeaways,
}

/// One row of the section table.
#[derive(Debug, Clone, Copy)]
pub struct SectionSpec {
    pub id: SectionId,
    /// The numbered header label the prompt asks the model to emit.
    pub header: &'static str,
    pub kind: SectionKind,
}

/// The seven canonical sections, in prompt order.
pub const SECTIONS: [SectionSpec; 7] = [
    SectionSpec {
        id: SectionId::OverallScore,
        header: "1. Overall Score",
        kind: SectionKind::ScoredSummary,
    },
    SectionSpec {
        id: SectionId::OpenerAnalysis,
        header: "2. Opener Analysis",
        kind: SectionKind::ScoredWithAlternative {
            label: r"suggest(?:ed)?\s+(?:a\s+)?stronger\s+alternative\s+opener:?",
        },
    },
    SectionSpec {
        id: SectionId::ProblemProposition,
        header: "3. Problem Proposition",
        kind: SectionKind::ScoredWithAlternative {
            label: r"(?:provide|suggest)(?:ed)?\s+(?:a\s+)?more\s+effective\s+(?:problem\s+)?proposition:?",
        },
    },
    SectionSpec {
        id: SectionId::ObjectionHandling,
        header: "4. Objection Handling",
        kind: SectionKind::ScoredWithAlternative {
            label: r"suggest(?:ed)?\s+(?:a\s+)?better\s+response\s+framework:?",
        },
    },
    SectionSpec {
        id: SectionId::EngagementAndFlow,
        header: "5. Engagement & Flow",
        kind: SectionKind::ScoredWithRecommendations,
    },
    SectionSpec {
        id: SectionId::ClosingAndNextSteps,
        header: "6. Closing & Next Steps",
        kind: SectionKind::ScoredWithAlternative {
            label: r"suggest(?:ed)?\s+(?:a\s+)?stronger\s+closing:?",
        },
    },
    SectionSpec {
        id: SectionId::ActionableTakeaways,
        header: "7. Actionable Takeaways",
        kind: SectionKind::UnscoredTakeaways,
    },
];

/// Label used as a fallback when no takeaway line mentions a script inline.
const EXAMPLE_SCRIPT_LABEL: &str = r"example\s+script:?";

impl SectionSpec {
    /// The bare numeric marker (`"2."`) used as the right boundary when this
    /// section follows another. Matching on the short marker rather than the
    /// full header tolerates the model rewording a heading.
    pub fn marker(&self) -> &'static str {
        match self.header.split_once(' ') {
            Some((num, _)) => num,
            None => self.header,
        }
    }
}

/// Parsed fields of one section, tagged by its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedSection {
    Summary {
        score: f64,
        summary: String,
    },
    Scored {
        score: f64,
        feedback: Vec<String>,
        alternative: Option<String>,
    },
    ScoredSplit {
        score: f64,
        feedback: Vec<String>,
        recommendations: Vec<String>,
    },
    Takeaways {
        improvements: Vec<String>,
        script_example: String,
    },
}

/// Slices one section out of the full response text, using the next table
/// entry's numeric marker as the right boundary (none for the last section).
pub fn slice_section(text: &str, index: usize) -> String {
    let spec = &SECTIONS[index];
    let next_marker = SECTIONS.get(index + 1).map(|s| s.marker());
    extract_section(text, spec.header, next_marker)
}

/// Parses one section body according to its kind. Total: missing markers and
/// labels default rather than error.
pub fn parse_section(body: &str, kind: SectionKind) -> ParsedSection {
    match kind {
        SectionKind::ScoredSummary => ParsedSection::Summary {
            score: parse_score(body),
            summary: body.to_string(),
        },
        SectionKind::ScoredWithAlternative { label } => ParsedSection::Scored {
            score: parse_score(body),
            feedback: parse_feedback_lines(body),
            alternative: extract_alternative(body, label),
        },
        SectionKind::ScoredWithRecommendations => {
            let (recommendations, feedback) = split_recommendations(parse_feedback_lines(body));
            ParsedSection::ScoredSplit {
                score: parse_score(body),
                feedback,
                recommendations,
            }
        }
        SectionKind::UnscoredTakeaways => {
            let (improvements, script_example) =
                split_takeaways(parse_feedback_lines(body), body);
            ParsedSection::Takeaways {
                improvements,
                script_example,
            }
        }
    }
}

/// Splits cleaned lines into (recommendations, feedback). A line counts as a
/// recommendation when it starts with "Recommend"; the prefix (and optional
/// colon) is stripped. Deliberately the same loose heuristic the coaching
/// prompt's wording produces in practice.
fn split_recommendations(lines: Vec<String>) -> (Vec<String>, Vec<String>) {
    let mut recommendations = Vec::new();
    let mut feedback = Vec::new();
    for line in lines {
        if let Some(rest) = strip_recommend_prefix(&line) {
            recommendations.push(rest);
        } else {
            feedback.push(line);
        }
    }
    (recommendations, feedback)
}

fn strip_recommend_prefix(line: &str) -> Option<String> {
    let rest = line.strip_prefix("Recommend")?;
    let rest = rest.strip_prefix(':').unwrap_or(rest);
    Some(rest.trim_start().to_string())
}

/// Splits cleaned takeaway lines into (improvements, script example). The
/// script example is the first line mentioning "script"; when no line does,
/// an `Example Script:` label in the raw body is tried, else empty string.
fn split_takeaways(lines: Vec<String>, raw_body: &str) -> (Vec<String>, String) {
    let mut improvements = Vec::new();
    let mut script_example = String::new();
    for line in lines {
        if script_example.is_empty() && line.to_ascii_lowercase().contains("script") {
            script_example = line;
        } else if !line.to_ascii_lowercase().contains("script") {
            improvements.push(line);
        }
    }
    if script_example.is_empty() {
        if let Some(labelled) = extract_alternative(raw_body, EXAMPLE_SCRIPT_LABEL) {
            script_example = labelled;
        }
    }
    (improvements, script_example)
}
