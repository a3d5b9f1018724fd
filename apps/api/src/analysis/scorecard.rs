//! Scorecard — the fixed seven-field record returned to the UI, and the
//! state-free assembler that fills it from one raw model response.
//!
//! Wire field names are camelCase to match the web client's contract.

use serde::{Deserialize, Serialize};

use crate::analysis::sections::{parse_section, slice_section, ParsedSection, SectionId, SECTIONS};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallScore {
    pub score: f64,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenerAnalysis {
    pub score: f64,
    pub feedback: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_opener: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemProposition {
    pub score: f64,
    pub feedback: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_proposition: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectionHandling {
    pub score: f64,
    pub feedback: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_framework: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementAndFlow {
    pub score: f64,
    pub feedback: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosingAndNextSteps {
    pub score: f64,
    pub feedback: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_closing: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionableTakeaways {
    pub improvements: Vec<String>,
    pub script_example: String,
}

/// The full coaching scorecard. Always structurally complete: sections the
/// model skipped come back with zero scores, empty lists, and absent
/// alternatives rather than as an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scorecard {
    pub overall_score: OverallScore,
    pub opener_analysis: OpenerAnalysis,
    pub problem_proposition: ProblemProposition,
    pub objection_handling: ObjectionHandling,
    pub engagement_and_flow: EngagementAndFlow,
    pub closing_and_next_steps: ClosingAndNextSteps,
    pub actionable_takeaways: ActionableTakeaways,
}

/// Assembles a scorecard from the raw completion response.
///
/// Pure and total: walks the section table, slices each section out of the
/// text, parses it per its kind, and routes the result into the record. Any
/// input string (including empty) yields a complete default-filled scorecard.
pub fn assemble_scorecard(text: &str) -> Scorecard {
    let mut card = Scorecard::default();

    for (index, spec) in SECTIONS.iter().enumerate() {
        let body = slice_section(text, index);
        let parsed = parse_section(&body, spec.kind);

        match (spec.id, parsed) {
            (SectionId::OverallScore, ParsedSection::Summary { score, summary }) => {
                card.overall_score = OverallScore { score, summary };
            }
            (
                SectionId::OpenerAnalysis,
                ParsedSection::Scored {
                    score,
                    feedback,
                    alternative,
                },
            ) => {
                card.opener_analysis = OpenerAnalysis {
                    score,
                    feedback,
                    alternative_opener: alternative,
                };
            }
            (
                SectionId::ProblemProposition,
                ParsedSection::Scored {
                    score,
                    feedback,
                    alternative,
                },
            ) => {
                card.problem_proposition = ProblemProposition {
                    score,
                    feedback,
                    alternative_proposition: alternative,
                };
            }
            (
                SectionId::ObjectionHandling,
                ParsedSection::Scored {
                    score,
                    feedback,
                    alternative,
                },
            ) => {
                card.objection_handling = ObjectionHandling {
                    score,
                    feedback,
                    alternative_framework: alternative,
                };
            }
            (
                SectionId::EngagementAndFlow,
                ParsedSection::ScoredSplit {
                    score,
                    feedback,
                    recommendations,
                },
            ) => {
                card.engagement_and_flow = EngagementAndFlow {
                    score,
                    feedback,
                    recommendations,
                };
            }
            (
                SectionId::ClosingAndNextSteps,
                ParsedSection::Scored {
                    score,
                    feedback,
                    alternative,
                },
            ) => {
                card.closing_and_next_steps = ClosingAndNextSteps {
                    score,
                    feedback,
                    alternative_closing: alternative,
                };
            }
            (
                SectionId::ActionableTakeaways,
                ParsedSection::Takeaways {
                    improvements,
                    script_example,
                },
            ) => {
                card.actionable_takeaways = ActionableTakeaways {
                    improvements,
                    script_example,
                };
            }
            // A table row whose kind and id disagree. Unreachable with the
            // table as written; leave the default rather than panic.
            (id, parsed) => {
                tracing::warn!("section {id:?} produced mismatched variant {parsed:?}");
            }
        }
    }

    card
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A well-formed seven-section response following the prompt convention.
    const FULL_RESPONSE: &str = "\
1. Overall Score
SCORE: 8
• Solid call with a strong close but a weak opener.

2. Opener Analysis
SCORE: 5
• Jumped straight into the pitch without context.
• Suggest a stronger alternative opener: Hi, this is Karl from Opus Training, did I catch you at a bad time?

3. Problem Proposition
SCORE: 6
• The problem framing was generic.
• Provide a more effective proposition: Frontline turnover is eating your training budget.

4. Objection Handling
SCORE: 7
• Acknowledged the budget objection and reframed it well.

5. Engagement & Flow
SCORE: 8
• The prospect stayed engaged and asked questions.
• Recommend: pausing after each discovery question.

6. Closing & Next Steps
SCORE: 6
• Asked for a meeting but without a concrete time.
• Suggest a stronger closing: Can we grab 15 minutes Tuesday at 2?

7. Actionable Takeaways
• Open with context before pitching.
• Quantify the cost of turnover early.
• Always propose a specific meeting time.
• Use this script: \"Hi, this is Karl from Opus Training...\"";

    #[test]
    fn test_full_response_scores() {
        let card = assemble_scorecard(FULL_RESPONSE);
        assert_eq!(card.overall_score.score, 8.0);
        assert_eq!(card.opener_analysis.score, 5.0);
        assert_eq!(card.problem_proposition.score, 6.0);
        assert_eq!(card.objection_handling.score, 7.0);
        assert_eq!(card.engagement_and_flow.score, 8.0);
        assert_eq!(card.closing_and_next_steps.score, 6.0);
    }

    #[test]
    fn test_full_response_alternatives() {
        let card = assemble_scorecard(FULL_RESPONSE);
        assert!(card
            .opener_analysis
            .alternative_opener
            .as_deref()
            .unwrap()
            .starts_with("Hi, this is Karl"));
        assert!(card
            .problem_proposition
            .alternative_proposition
            .as_deref()
            .unwrap()
            .contains("turnover"));
        assert_eq!(card.objection_handling.alternative_framework, None);
        assert!(card
            .closing_and_next_steps
            .alternative_closing
            .as_deref()
            .unwrap()
            .contains("15 minutes"));
    }

    #[test]
    fn test_full_response_takeaways() {
        let card = assemble_scorecard(FULL_RESPONSE);
        assert_eq!(card.actionable_takeaways.improvements.len(), 3);
        assert!(card
            .actionable_takeaways
            .script_example
            .contains("Use this script"));
    }

    #[test]
    fn test_full_response_engagement_split() {
        let card = assemble_scorecard(FULL_RESPONSE);
        assert_eq!(
            card.engagement_and_flow.feedback,
            vec!["The prospect stayed engaged and asked questions."]
        );
        assert_eq!(
            card.engagement_and_flow.recommendations,
            vec!["pausing after each discovery question."]
        );
    }

    #[test]
    fn test_overall_summary_is_raw_section_body() {
        let card = assemble_scorecard(FULL_RESPONSE);
        // The summary keeps the score line and bullet glyph; it is the raw
        // slice, not the cleaned feedback list.
        assert!(card.overall_score.summary.contains("SCORE: 8"));
        assert!(card.overall_score.summary.contains("• Solid call"));
    }

    #[test]
    fn test_no_section_body_leaks_into_neighbor() {
        let card = assemble_scorecard(FULL_RESPONSE);
        assert!(!card.overall_score.summary.contains("Opener Analysis"));
        for line in &card.opener_analysis.feedback {
            assert!(!line.contains("Problem Proposition"));
        }
    }

    #[test]
    fn test_empty_input_yields_complete_default_scorecard() {
        let card = assemble_scorecard("");
        assert_eq!(card, Scorecard::default());
        assert_eq!(card.overall_score.score, 0.0);
        assert!(card.actionable_takeaways.improvements.is_empty());
    }

    #[test]
    fn test_garbage_input_never_errors() {
        for input in ["%%%###", "SCORE:", "1.", "7. Actionable Takeaways", "\n\n\n"] {
            let card = assemble_scorecard(input);
            assert!(card.overall_score.score >= 0.0);
        }
    }

    #[test]
    fn test_partial_response_defaults_missing_sections() {
        let text = "2. Opener Analysis\nSCORE: 4\n• Too abrupt.";
        let card = assemble_scorecard(text);
        assert_eq!(card.opener_analysis.score, 4.0);
        assert_eq!(card.opener_analysis.feedback, vec!["Too abrupt."]);
        assert_eq!(card.overall_score.score, 0.0);
        assert_eq!(card.closing_and_next_steps.score, 0.0);
        assert!(card.engagement_and_flow.recommendations.is_empty());
    }

    #[test]
    fn test_serializes_with_camel_case_wire_names() {
        let card = assemble_scorecard(FULL_RESPONSE);
        let json = serde_json::to_value(&card).unwrap();
        assert!(json.get("overallScore").is_some());
        assert!(json.get("openerAnalysis").is_some());
        assert!(json.get("engagementAndFlow").is_some());
        assert!(json["openerAnalysis"].get("alternativeOpener").is_some());
        assert!(json["actionableTakeaways"].get("scriptExample").is_some());
    }

    #[test]
    fn test_absent_alternatives_are_omitted_from_json() {
        let card = assemble_scorecard("");
        let json = serde_json::to_value(&card).unwrap();
        assert!(json["openerAnalysis"].get("alternativeOpener").is_none());
        assert!(json["closingAndNextSteps"]
            .get("alternativeClosing")
            .is_none());
    }

    #[test]
    fn test_fractional_scores_pass_through_unrounded() {
        let text = "1. Overall Score\nSCORE: 7.5\nDecent.";
        let card = assemble_scorecard(text);
        assert_eq!(card.overall_score.score, 7.5);
    }

    #[test]
    fn test_leaked_headers_never_reach_feedback_lists() {
        // Boundary matching misses are guarded at line-cleaning time too.
        let text =
            "2. Opener Analysis\nSCORE: 5\n• Fine start\n3. Problem Proposition leaked here";
        let card = assemble_scorecard(text);
        for line in &card.opener_analysis.feedback {
            assert!(!line.starts_with("3. Problem Proposition"));
        }
    }
}
