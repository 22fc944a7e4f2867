// Résumé analysis: text extraction, section segmentation, ATS evaluation.
// All LLM calls go through llm_client; nothing here talks to a provider directly.

pub mod analyzer;
pub mod extract;
pub mod handlers;
pub mod prompts;
pub mod segmenter;
pub mod suggestions;
pub mod taxonomy;
