use std::sync::Arc;

use crate::interview::store::SessionStore;
use crate::llm_client::CompletionModel;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    /// The hosted model in production; a scripted fake in tests.
    pub model: Arc<dyn CompletionModel>,
}
