use std::sync::Arc;

use crate::llm_client::CompletionService;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Plain client or the retrying wrapper, chosen at startup via COMPLETION_RETRY.
    pub completion: Arc<dyn CompletionService>,
    /// Redis when REDIS_URL is set, otherwise process memory.
    pub sessions: Arc<dyn SessionStore>,
}
