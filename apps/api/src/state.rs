use crate::config::Config;
use crate::reconcile::Reconciler;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Upstream client plus snapshot store behind the fallback chain.
    pub reconciler: Reconciler,
    pub config: Config,
}
