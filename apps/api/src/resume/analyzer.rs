//! Runs the Suggestion Extractor over every section of a segmented résumé.

use futures::stream::{self, StreamExt, TryStreamExt};
use futures::FutureExt;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::CompletionClient;
use crate::models::resume::{SectionMap, SuggestionResult};
use crate::resume::segmenter::split_sections;
use crate::resume::suggestions::get_suggestions;

/// Evaluates each section with one completion call, returning results in
/// section order.
///
/// `concurrency` bounds how many calls are in flight; 1 evaluates sections
/// strictly one after another. The first upstream failure fails the whole batch.
pub async fn analyze_sections(
    sections: &SectionMap,
    llm: &dyn CompletionClient,
    concurrency: usize,
) -> Result<Vec<(String, SuggestionResult)>, AppError> {
    if sections.is_empty() {
        info!("No résumé sections detected; skipping evaluation");
        return Ok(Vec::new());
    }

    info!(
        sections = sections.len(),
        concurrency, "Evaluating résumé sections"
    );

    let owned: Vec<(String, String)> = sections
        .iter()
        .map(|(heading, content)| (heading.to_string(), content.to_string()))
        .collect();

    // Boxed so the handler future stays `Send` across the borrowed client.
    stream::iter(owned)
        .map(|(heading, content)| {
            async move {
                let result = get_suggestions(&heading, &content, llm).await?;
                Ok::<_, AppError>((heading, result))
            }
            .boxed()
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}

/// Segments raw document text and evaluates every section.
pub async fn analyze_text(
    text: &str,
    llm: &dyn CompletionClient,
    concurrency: usize,
) -> Result<Vec<(String, SuggestionResult)>, AppError> {
    let sections = split_sections(text);
    analyze_sections(&sections, llm, concurrency).await
}
