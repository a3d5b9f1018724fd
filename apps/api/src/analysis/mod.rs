//! Call analysis — the coaching prompt, the feedback-text parsing core, and
//! the analyze-audio endpoint that ties them to the AI client.

pub mod handlers;
pub mod parser;
pub mod prompts;
pub mod scorecard;
pub mod sections;
