use std::sync::Arc;

use crate::ai_client::AiBackend;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Transcription + completion backend. Trait object so handler tests can
    /// stub the external services.
    pub ai: Arc<dyn AiBackend>,
    /// Kept for handlers that need runtime settings; only main reads it today.
    #[allow(dead_code)]
    pub config: Config,
}
