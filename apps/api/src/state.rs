use std::sync::Arc;

use crate::config::Config;
use crate::interview::service::AssessmentService;
use crate::interview::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    /// Pluggable question/evaluation backend. Default: `LlmAssessmentService`.
    pub assessment: Arc<dyn AssessmentService>,
    pub config: Config,
}
