//! Application addons. Cross-origin handling only for now; the core never
//! enforces security policy itself.

use axum::http::HeaderValue;
use std::collections::BTreeSet;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

/// Builds a CORS layer from a node's declared origin set.
///
/// An empty set allows any origin (the permissive default); origins that do
/// not parse as header values are skipped with a warning.
#[must_use]
pub fn cross_origin_layer(origins: &BTreeSet<String>, max_age: Duration) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive().max_age(max_age);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = origin.as_str(), "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new().allow_origin(AllowOrigin::list(parsed)).max_age(max_age)
}
