use super::{errors, health};
use axum::Router;
use axum::routing::get;

/// System routes mounted on every assembled server, so the process answers
/// even when resolution ends with no nodes.
pub fn system_router<S>() -> Router<S>
where
    S: Send + Sync + Clone + 'static,
{
    Router::<S>::new().route("/health", get(health::health_handler)).fallback(errors::not_found)
}
