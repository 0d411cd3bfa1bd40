use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::ResumeReviewer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Upstream AI review service. Default: `LlmClient`.
    pub reviewer: Arc<dyn ResumeReviewer>,
    pub config: Config,
}
