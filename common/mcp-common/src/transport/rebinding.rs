//! DNS rebinding protection for the HTTP transport
//!
//! Enabled only when at least one allowed Host or Origin is configured.
//! A request whose `Host` is not allowed is answered with
//! `421 Misdirected Request`; a request carrying a disallowed `Origin` with
//! `403 Forbidden`. Requests without an `Origin` header (non-browser clients)
//! pass the origin check. An empty list for one header leaves that header
//! unchecked.
//!
//! Entries ending in `:*` accept any port, e.g. `localhost:*` or
//! `http://127.0.0.1:*`.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Allow-lists for `Host` and `Origin` headers
#[derive(Debug, Clone)]
pub struct RebindingGuard {
    allowed_hosts: Vec<String>,
    allowed_origins: Vec<String>,
}

impl RebindingGuard {
    /// Build a guard, or `None` when both lists are empty
    pub fn new(allowed_hosts: &[String], allowed_origins: &[String]) -> Option<Self> {
        if allowed_hosts.is_empty() && allowed_origins.is_empty() {
            return None;
        }
        Some(Self {
            allowed_hosts: allowed_hosts.to_vec(),
            allowed_origins: allowed_origins.to_vec(),
        })
    }

    /// Check the request headers against the allow-lists
    pub fn check(&self, headers: &HeaderMap) -> Result<(), (StatusCode, &'static str)> {
        if !self.allowed_hosts.is_empty() {
            let host = headers.get(header::HOST).and_then(|v| v.to_str().ok());
            if !host.is_some_and(|h| is_allowed(&self.allowed_hosts, h)) {
                return Err((StatusCode::MISDIRECTED_REQUEST, "Invalid Host header"));
            }
        }

        if !self.allowed_origins.is_empty() {
            if let Some(origin) = headers.get(header::ORIGIN) {
                let origin = origin.to_str().unwrap_or_default();
                if !is_allowed(&self.allowed_origins, origin) {
                    return Err((StatusCode::FORBIDDEN, "Invalid Origin header"));
                }
            }
        }

        Ok(())
    }
}

/// Match a header value against allow-list entries, honoring `:*` port wildcards
fn is_allowed(allowed: &[String], value: &str) -> bool {
    allowed.iter().any(|entry| match entry.strip_suffix(":*") {
        Some(base) => value
            .strip_prefix(base)
            .is_some_and(|rest| rest.starts_with(':')),
        None => entry == value,
    })
}

/// Axum middleware applying a [`RebindingGuard`]
pub async fn check_request(
    State(guard): State<Arc<RebindingGuard>>,
    request: Request,
    next: Next,
) -> Response {
    if let Err((status, message)) = guard.check(request.headers()) {
        tracing::warn!(
            status = %status,
            host = ?request.headers().get(header::HOST),
            origin = ?request.headers().get(header::ORIGIN),
            "Rejected request: {}", message
        );
        return (status, message).into_response();
    }
    next.run(request).await
}
