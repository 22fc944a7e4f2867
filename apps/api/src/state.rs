use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionClient;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Text-completion service. `AnthropicClient` in production, a stub in tests.
    pub llm: Arc<dyn CompletionClient>,
    pub config: Config,
}
