// ATS evaluation prompt. The output format block is what the parser in
// suggestions.rs reads back, so the two must change together.

pub const ATS_EVALUATION_PROMPT: &str = r#"Analyze this resume section for ATS compatibility and provide detailed feedback:

Original Heading: {heading}
Content: {content}

Evaluate based on these criteria (provide scores for each):
1. Keyword Optimization (0-20 points)
   - Industry-specific keywords
   - Job title relevance
   - Technical skills alignment
2. Content Structure (0-20 points)
   - Clear organization
   - Proper formatting
   - Logical flow
3. Achievement Quantification (0-20 points)
   - Use of metrics and numbers
   - Impact statements
   - Results-oriented language
4. Action Verb Usage (0-20 points)
   - Strong action verbs
   - Present/past tense consistency
   - Active voice
5. Relevance & Impact (0-20 points)
   - Job description alignment
   - Career progression
   - Value proposition

Provide:
1. Overall ATS Score (sum of all criteria)
2. Detailed breakdown of scores for each criterion
3. Improved heading suggestion (if needed)
4. At least 3 specific, actionable recommendations for improvement

Format response as plain text (no special characters or markup, only "- " bullets):
ATS Score: [XX/100]
Score Breakdown:
- Keyword Optimization: [X/20]
- Content Structure: [X/20]
- Achievement Quantification: [X/20]
- Action Verb Usage: [X/20]
- Relevance & Impact: [X/20]
Suggested Heading: [Improved heading]
Recommendations:
- [Recommendation 1]
- [Recommendation 2]
- [Recommendation 3]"#;

/// Renders the evaluation prompt for one section.
pub fn build_evaluation_prompt(heading: &str, content: &str) -> String {
    // {heading} precedes {content} in the template, so filling content first
    // keeps placeholder-like text in either value from being substituted.
    ATS_EVALUATION_PROMPT
        .replacen("{content}", content, 1)
        .replacen("{heading}", heading, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::Criterion;

    #[test]
    fn test_prompt_includes_heading_and_content() {
        let prompt = build_evaluation_prompt("Skills", "Rust, Go");
        assert!(prompt.contains("Original Heading: Skills"));
        assert!(prompt.contains("Content: Rust, Go"));
        assert!(!prompt.contains("{heading}"));
        assert!(!prompt.contains("{content}"));
    }

    #[test]
    fn test_prompt_names_every_criterion() {
        let prompt = build_evaluation_prompt("Summary", "text");
        for criterion in Criterion::ALL {
            assert!(
                prompt.contains(&format!("- {}: [X/20]", criterion.label())),
                "missing {}",
                criterion.label()
            );
        }
    }

    #[test]
    fn test_content_placeholder_text_is_preserved() {
        let prompt = build_evaluation_prompt("{content}", "uses {heading} templates");
        assert!(prompt.contains("Content: uses {heading} templates"));
    }
}
