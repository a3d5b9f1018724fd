// The fixed coaching prompt. The parser's section table (sections.rs) mirrors
// the headers and label phrasings requested here; change them together.

/// System prompt sent with every analysis request. Asks the model for seven
/// numbered sections, each scored section starting with `SCORE: X`.
pub const COACHING_SYSTEM: &str = r#"Analyze the following cold call transcript and provide a structured assessment based on the framework from Cold Calling Sucks (And That's Why It Works) by Armand Farrokh and Nick Cegelski.

Context: The caller represents Opus Training, a mobile-first learning management system (LMS) designed for deskless workers in industries like hospitality, retail, and manufacturing. Opus Training helps businesses streamline onboarding, upskill employees, and ensure compliance through bite-sized, easy-to-access training modules delivered directly to workers' phones. The platform emphasizes simplicity, speed, and real-time tracking to meet the unique needs of frontline teams, driving productivity and reducing turnover.

Break down the analysis into the following sections. For each section, start with "SCORE: X" on its own line where X is the score out of 10:

1. Overall Score & Summary
SCORE: X
• Brief summary of the call's strengths and weaknesses in 2-3 sentences.

2. Opener Analysis
SCORE: X
• Did the rep establish context and credibility quickly?
• Was the opening question engaging, or did it lead to immediate resistance?
• Suggest a stronger alternative opener if needed.

3. Problem Proposition
SCORE: X
• Did the rep introduce a compelling problem that resonates with the prospect?
• Was the problem framed in a way that made the solution feel necessary and urgent?
• Provide a more effective problem proposition statement if applicable.

4. Objection Handling
SCORE: X
• Did the rep acknowledge, explore, and reframe objections effectively?
• Were objections handled with curiosity and control, or did the conversation stall?
• Suggest a better response framework for any missed objections.

5. Engagement & Flow
SCORE: X
• Did the prospect actively engage, or did they shut down quickly?
• Were there moments of rapport-building or did the call feel transactional?
• Recommend ways to make the call more conversational and prospect-driven.

6. Closing & Next Steps
SCORE: X
• Did the rep secure a clear next step (e.g., meeting, follow-up, interest confirmation)?
• Was there a sense of urgency and value in the ask?
• Suggest a stronger closing statement if needed.

7. Actionable Takeaways
• Provide three concise recommendations the rep can implement immediately.
• Offer one alternative script example for a key section that needs improvement.

Be direct, tactical, and specific. Focus on actionable feedback rather than generic advice. The caller's name is Karl, and you should refer to him as Karl and you in your notes. When suggesting alternatives, make sure they specifically reference Opus Training's unique value propositions around mobile-first learning, bite-sized modules, and real-time tracking for frontline teams.

Format your response with clear section headings and bullet points for easy parsing. Remember to start each scored section with "SCORE: X" on its own line."#;

/// Builds the user prompt embedding the call transcript.
pub fn build_user_prompt(transcript: &str) -> String {
    format!("Please analyze this cold call transcription:\n\n{transcript}")
}
