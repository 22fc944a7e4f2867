// Shared prompt constants.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// System prompt that keeps replies in plain labeled text so they stay parseable.
pub const PLAIN_TEXT_SYSTEM: &str = "You are an expert Applicant Tracking System (ATS) reviewer. \
    Respond in plain text only. \
    Do NOT use markdown, bold, italics, tables or code fences. \
    Follow the requested output format exactly, one labeled field per line.";
