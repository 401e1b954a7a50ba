// ── HTTP surface ──
//
// Two routes: the paginated listing (POST -- the request carries a body
// and must never be cached) and the bootstrap payload a client reads
// before its first fetch. Handlers are stateless; everything shared
// lives in `AppState` behind `Arc`s.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use netmenu_core::protocol::{BOOTSTRAP_ROUTE, NONCE_HEADER, SITES_ROUTE};
use netmenu_core::{BootstrapPayload, ListingResponse, MenuOptions};

use crate::auth::{bearer_token, mint_nonce, AccessPolicy};
use crate::cache::StampCache;
use crate::enumerate::SiteEnumerator;

// ── State ───────────────────────────────────────────────────────────

pub struct AppState {
    pub enumerator: SiteEnumerator,
    pub stamps: Arc<StampCache>,
    pub policy: Arc<dyn AccessPolicy>,
    pub options: MenuOptions,
    /// Per-process nonce; issued by bootstrap, required on listing calls.
    pub nonce: String,
    /// Absolute listing URL advertised in the bootstrap payload.
    pub listing_url: String,
}

impl AppState {
    pub fn new(
        enumerator: SiteEnumerator,
        stamps: Arc<StampCache>,
        policy: Arc<dyn AccessPolicy>,
        options: MenuOptions,
        listing_url: String,
    ) -> Self {
        Self {
            enumerator,
            stamps,
            policy,
            options,
            nonce: mint_nonce(),
            listing_url,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(SITES_ROUTE, post(list_sites))
        .route(BOOTSTRAP_ROUTE, get(bootstrap))
        .with_state(state)
}

// ── Error body ──────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ErrorBody {
    status: &'static str,
    message: String,
}

fn denied(message: &str) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(ErrorBody {
            status: "error",
            message: message.to_owned(),
        }),
    )
        .into_response()
}

fn unavailable(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            status: "error",
            message: message.to_owned(),
        }),
    )
        .into_response()
}

// ── Handlers ────────────────────────────────────────────────────────

/// `POST /netmenu/v1/sites` -- one page of the listing.
///
/// The privilege check runs before anything else; unauthorized callers
/// never reach the registry. Offset parsing is permissive: absent,
/// malformed, or negative input is coerced to 0, never rejected.
async fn list_sites(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !state.policy.can_manage_network(bearer_token(&headers)) {
        return denied("network management privilege required");
    }
    if !nonce_matches(&headers, &state.nonce) {
        return denied("missing or invalid menu nonce");
    }

    let params: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let offset = coerce_offset(params.get("offset"));
    debug!(offset, "listing request");

    match state
        .enumerator
        .list_sites(offset, state.options.load_increments)
        .await
    {
        Ok(records) => {
            let stamp = state.stamps.stamp();
            Json(ListingResponse::from_records(&records, &stamp)).into_response()
        }
        Err(e) => {
            warn!(error = %e, "site enumeration failed");
            unavailable("site registry unavailable")
        }
    }
}

/// `GET /netmenu/v1/bootstrap` -- everything a client needs before its
/// first paginated fetch.
async fn bootstrap(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if !state.policy.can_manage_network(bearer_token(&headers)) {
        return denied("network management privilege required");
    }

    let total = match state.enumerator.count_sites().await {
        Ok(n) => n,
        Err(e) => {
            warn!(error = %e, "site count failed");
            return unavailable("site registry unavailable");
        }
    };

    let payload = BootstrapPayload {
        nonce: state.nonce.clone(),
        rest_url: state.listing_url.clone(),
        load_increments: state.options.load_increments,
        order_by: state.options.order_by,
        display_search: total > state.options.search_threshold as u64,
        timestamp: state.stamps.stamp(),
    };
    Json(payload).into_response()
}

fn nonce_matches(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(NONCE_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|presented| presented == expected)
}

/// Coerce the `offset` parameter to a usable index.
///
/// Accepts a JSON number or a numeric string; anything else -- absent,
/// fractional, garbage, negative -- becomes 0.
fn coerce_offset(raw: Option<&Value>) -> usize {
    let Some(value) = raw else {
        return 0;
    };
    let parsed = if let Some(n) = value.as_i64() {
        Some(n)
    } else {
        value.as_str().and_then(|s| s.trim().parse::<i64>().ok())
    };
    parsed
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn offset_coercion_table() {
        assert_eq!(coerce_offset(None), 0);
        assert_eq!(coerce_offset(Some(&json!(25))), 25);
        assert_eq!(coerce_offset(Some(&json!("25"))), 25);
        assert_eq!(coerce_offset(Some(&json!(" 7 "))), 7);
        assert_eq!(coerce_offset(Some(&json!(-3))), 0);
        assert_eq!(coerce_offset(Some(&json!("-3"))), 0);
        assert_eq!(coerce_offset(Some(&json!("banana"))), 0);
        assert_eq!(coerce_offset(Some(&json!(3.7))), 0);
        assert_eq!(coerce_offset(Some(&json!(null))), 0);
        assert_eq!(coerce_offset(Some(&json!({"nested": 1}))), 0);
    }

    #[test]
    fn nonce_comparison_requires_exact_match() {
        let mut headers = HeaderMap::new();
        assert!(!nonce_matches(&headers, "abc"));

        headers.insert(NONCE_HEADER, "abc".parse().unwrap());
        assert!(nonce_matches(&headers, "abc"));
        assert!(!nonce_matches(&headers, "abd"));
    }
}
