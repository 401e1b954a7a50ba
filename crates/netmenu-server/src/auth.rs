// ── Authorization seam ──
//
// Who counts as a network administrator is the host platform's business;
// the endpoint only asks an injected policy. The bundled implementation
// checks a static bearer-token list, which is all the binary and tests
// need.

use axum::http::HeaderMap;
use rand::distr::Alphanumeric;
use rand::Rng;

/// Decides whether a presented bearer token carries network-management
/// privilege.
pub trait AccessPolicy: Send + Sync {
    fn can_manage_network(&self, token: Option<&str>) -> bool;
}

/// Allow-list policy over static bearer tokens.
pub struct StaticTokenPolicy {
    tokens: Vec<String>,
}

impl StaticTokenPolicy {
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }
}

impl AccessPolicy for StaticTokenPolicy {
    fn can_manage_network(&self, token: Option<&str>) -> bool {
        token.is_some_and(|t| self.tokens.iter().any(|known| known == t))
    }
}

/// Pull the bearer token out of an `Authorization` header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Mint the per-process nonce handed out by the bootstrap endpoint.
pub fn mint_nonce() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn static_policy_matches_known_tokens() {
        let policy = StaticTokenPolicy::new(vec!["alpha".into(), "beta".into()]);
        assert!(policy.can_manage_network(Some("alpha")));
        assert!(!policy.can_manage_network(Some("gamma")));
        assert!(!policy.can_manage_network(None));
    }

    #[test]
    fn bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_static("Bearer secret"),
        );
        assert_eq!(bearer_token(&headers), Some("secret"));

        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_static("Basic secret"),
        );
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn nonce_is_long_and_unique_enough() {
        let a = mint_nonce();
        let b = mint_nonce();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }
}
