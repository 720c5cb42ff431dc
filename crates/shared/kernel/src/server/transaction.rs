//! Per-request transaction tracking (the "keep" profile).
//!
//! A fresh identifier is generated per inbound request and travels with the
//! request as an extension; the response carries it in the
//! `X-Transaction-ID` header. Concurrent requests never share transaction
//! state — only a diagnostics snapshot of the most recent transaction is
//! mirrored into the shared context.

use crate::context::SharedContext;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use dynast_domain::constants::TRANSACTION_HEADER;
use dynast_domain::node::TransactionContext;
use std::net::SocketAddr;
use tracing::{error, info};
use uuid::Uuid;

/// Middleware wiring the transaction hook pair around one request. Install
/// with `axum::middleware::from_fn_with_state`.
pub async fn track(
    State(context): State<SharedContext>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let client_address = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(|| "unknown".to_owned(), |info| info.0.ip().to_string());

    let transaction = TransactionContext {
        id: Uuid::new_v4().to_string(),
        method: request.method().to_string(),
        client_address,
    };
    info!(path = path.as_str(), id = transaction.id.as_str(), "Transaction started for the request");

    context.set_last_transaction(transaction.clone());
    request.extensions_mut().insert(transaction.clone());

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&transaction.id) {
        response.headers_mut().insert(HeaderName::from_static(TRANSACTION_HEADER), value);
    }

    // Teardown bookkeeping: failures are logged in full, never swallowed, and
    // never alter the response already produced.
    if response.status().is_server_error() {
        error!(
            path = path.as_str(),
            id = transaction.id.as_str(),
            method = transaction.method.as_str(),
            client = transaction.client_address.as_str(),
            status = %response.status(),
            "Error during request teardown"
        );
    } else {
        info!(path = path.as_str(), id = transaction.id.as_str(), "Transaction ended for the request");
    }

    response
}
