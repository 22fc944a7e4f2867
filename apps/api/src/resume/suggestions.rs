//! Suggestion Extractor — asks the completion service to grade one section and
//! reads the free-text reply back into a `SuggestionResult`.
//!
//! The reply is untrusted. Each field has its own extractor with a default, so
//! a reply missing one field still yields the others. A field that is present
//! but unreadable (a score that does not fit in a `u32`) discards the whole
//! reply and every field falls back to its default.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::PLAIN_TEXT_SYSTEM;
use crate::llm_client::CompletionClient;
use crate::models::resume::{Criterion, ScoreBreakdown, SuggestionResult};
use crate::resume::prompts::build_evaluation_prompt;

pub const PARSE_FAILURE_RECOMMENDATION: &str = "Failed to parse suggestions";
pub const MAX_ATS_SCORE: u32 = 100;
const PREVIEW_CHARS: usize = 100;

static OVERALL_SCORE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)ATS Score:\s*\[?\s*(\d+)").unwrap());

static CRITERION_RES: Lazy<Vec<(Criterion, Regex)>> = Lazy::new(|| {
    Criterion::ALL
        .iter()
        .map(|&c| {
            let pattern = format!(
                r"(?i){}:\s*\[?\s*(\d+)[ \t]*/[ \t]*20",
                regex::escape(c.label())
            );
            (c, Regex::new(&pattern).unwrap())
        })
        .collect()
});

static SUGGESTED_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Suggested Heading:[ \t]*([^\r\n]+)").unwrap());

static RECOMMENDATIONS_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[ \t]*Recommendations[ \t]*:").unwrap());

static LABEL_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*[A-Z][A-Za-z &/]{0,40}:").unwrap());

static BULLET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*(?:-|\d{1,2}[.)])[ \t]*(.+?)[ \t]*$").unwrap());

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("{field} value '{value}' is not a valid number")]
    InvalidNumber { field: &'static str, value: String },
}

/// Everything read from one reply, before defaults for the result are applied.
#[derive(Debug)]
struct ParsedReply {
    ats_score: u32,
    score_breakdown: ScoreBreakdown,
    suggested_heading: Option<String>,
    recommendations: Vec<String>,
}

/// Grades one section through the completion service.
///
/// Upstream failures are returned as `AppError::Llm`; parsing never fails.
pub async fn get_suggestions(
    heading: &str,
    section_text: &str,
    llm: &dyn CompletionClient,
) -> Result<SuggestionResult, AppError> {
    let prompt = build_evaluation_prompt(heading, section_text);
    debug!(heading, model = llm.model(), "Requesting ATS evaluation");

    let reply = llm
        .complete(&prompt, PLAIN_TEXT_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("ATS evaluation of '{heading}' failed: {e}")))?;

    Ok(parse_suggestions(heading, section_text, &reply))
}

/// Turns a model reply into a fully populated result. Pure: the same inputs
/// always give the same output.
pub fn parse_suggestions(heading: &str, section_text: &str, reply: &str) -> SuggestionResult {
    let normalized = normalize_reply(reply);

    let (ats_score, score_breakdown, suggested_heading, recommendations) =
        match parse_reply(&normalized) {
            Ok(parsed) => {
                let recommendations = if parsed.recommendations.is_empty() {
                    vec![PARSE_FAILURE_RECOMMENDATION.to_string()]
                } else {
                    parsed.recommendations
                };
                (
                    parsed.ats_score,
                    parsed.score_breakdown,
                    parsed.suggested_heading.unwrap_or_else(|| heading.to_string()),
                    recommendations,
                )
            }
            Err(e) => {
                warn!(heading, "Error parsing ATS evaluation reply: {e}");
                (
                    0,
                    ScoreBreakdown::default(),
                    heading.to_string(),
                    vec![PARSE_FAILURE_RECOMMENDATION.to_string()],
                )
            }
        };

    debug!(
        heading,
        ats_score,
        breakdown_total = score_breakdown.total(),
        recommendations = recommendations.len(),
        "Parsed ATS evaluation"
    );

    SuggestionResult {
        original_heading: heading.to_string(),
        suggested_heading,
        ats_score,
        score_breakdown,
        recommendations,
        section_preview: section_text.chars().take(PREVIEW_CHARS).collect(),
    }
}

fn parse_reply(reply: &str) -> Result<ParsedReply, ParseError> {
    Ok(ParsedReply {
        ats_score: extract_overall_score(reply)?,
        score_breakdown: extract_breakdown(reply)?,
        suggested_heading: extract_suggested_heading(reply),
        recommendations: extract_recommendations(reply),
    })
}

fn extract_overall_score(reply: &str) -> Result<u32, ParseError> {
    match OVERALL_SCORE_RE.captures(reply) {
        Some(caps) => Ok(parse_number("ATS Score", &caps[1])?.min(MAX_ATS_SCORE)),
        None => Ok(0),
    }
}

fn extract_breakdown(reply: &str) -> Result<ScoreBreakdown, ParseError> {
    let mut breakdown = ScoreBreakdown::default();
    for (criterion, re) in CRITERION_RES.iter() {
        if let Some(caps) = re.captures(reply) {
            breakdown.set(*criterion, parse_number(criterion.label(), &caps[1])?);
        }
    }
    Ok(breakdown)
}

fn extract_suggested_heading(reply: &str) -> Option<String> {
    SUGGESTED_HEADING_RE
        .captures(reply)
        .map(|caps| clean_value(&caps[1]))
        .filter(|h| !h.is_empty())
}

/// Bullets under `Recommendations:`; without that header, every bullet.
/// Bullets that are themselves labeled fields or bare punctuation (`---`)
/// are skipped. Wrapped continuation lines are joined to their bullet; a
/// blank line or a `Label:` line ends a bullet.
fn extract_recommendations(reply: &str) -> Vec<String> {
    let lines: Vec<&str> = reply.lines().collect();
    let header = lines.iter().position(|l| RECOMMENDATIONS_HEADER_RE.is_match(l));
    let block = match header {
        Some(index) => &lines[index + 1..],
        None => &lines[..],
    };

    let mut recommendations: Vec<String> = Vec::new();
    let mut open = false;

    for line in block {
        if let Some(caps) = BULLET_RE.captures(line) {
            let item = clean_value(&caps[1]);
            open = item.chars().any(char::is_alphanumeric) && !is_field_line(&item);
            if open {
                recommendations.push(item);
            }
        } else if line.trim().is_empty()
            || is_field_line(line)
            || LABEL_LINE_RE.is_match(line)
        {
            open = false;
        } else if open {
            if let Some(last) = recommendations.last_mut() {
                last.push(' ');
                last.push_str(line.trim());
            }
        }
    }

    recommendations
}

fn is_field_line(text: &str) -> bool {
    OVERALL_SCORE_RE.is_match(text)
        || SUGGESTED_HEADING_RE.is_match(text)
        || CRITERION_RES.iter().any(|(_, re)| re.is_match(text))
}

fn parse_number(field: &'static str, digits: &str) -> Result<u32, ParseError> {
    digits.parse::<u32>().map_err(|_| ParseError::InvalidNumber {
        field,
        value: digits.to_string(),
    })
}

/// Trims a captured value and unwraps template brackets: `[Skills]` → `Skills`.
fn clean_value(raw: &str) -> String {
    let value = raw.trim();
    let value = match value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
        Some(inner) => inner.trim(),
        None => value,
    };
    value.to_string()
}

/// Removes markdown the model adds despite instructions: emphasis markers,
/// leading `#`s, and `*`/`•` bullets (rewritten as `- `).
fn normalize_reply(reply: &str) -> String {
    reply
        .lines()
        .map(|line| {
            let line = line.replace("**", "").replace("__", "");
            let trimmed = line.trim_start().trim_start_matches('#').trim_start();
            let bullet = trimmed
                .strip_prefix("* ")
                .or_else(|| trimmed.strip_prefix('•'));
            match bullet {
                Some(rest) => format!("- {}", rest.trim_start()),
                None => trimmed.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
