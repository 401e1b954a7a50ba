// ── Listing endpoint client ──
//
// Hand-crafted reqwest client for the two menu routes. The bootstrap
// nonce is captured once and replayed on every listing call, the same
// way a browser session carries its request token.

use std::sync::RwLock;

use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use url::Url;

use netmenu_core::protocol::{BOOTSTRAP_ROUTE, NONCE_HEADER, SITES_ROUTE};
use netmenu_core::{BootstrapPayload, ListingResponse};

use crate::error::ClientError;

/// Async client for the netmenu endpoints.
pub struct MenuApi {
    http: reqwest::Client,
    base_url: Url,
    token: String,
    /// Nonce issued by bootstrap; replayed on listing calls.
    nonce: RwLock<Option<String>>,
}

impl MenuApi {
    /// Build a client for a server root (e.g. `http://127.0.0.1:8787`).
    pub fn new(base_url: Url, token: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url,
            token: token.into(),
            nonce: RwLock::new(None),
        })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url,
            token: token.into(),
            nonce: RwLock::new(None),
        }
    }

    /// Join a route onto the server root.
    fn route(&self, path: &str) -> Url {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{path}")).expect("route should be a valid URL")
    }

    /// Fetch the bootstrap payload and capture its nonce for later calls.
    pub async fn bootstrap(&self) -> Result<BootstrapPayload, ClientError> {
        let url = self.route(BOOTSTRAP_ROUTE);
        debug!("GET {url}");

        let resp = self.http.get(url).bearer_auth(&self.token).send().await?;
        let payload: BootstrapPayload = handle_response(resp).await?;

        *self.nonce.write().expect("nonce lock poisoned") = Some(payload.nonce.clone());
        Ok(payload)
    }

    /// Fetch one page of the listing starting at `offset`.
    pub async fn fetch_page(&self, offset: usize) -> Result<ListingResponse, ClientError> {
        let url = self.route(SITES_ROUTE);
        debug!(offset, "POST {url}");

        let mut request = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(&json!({ "offset": offset }));
        let nonce = self.nonce.read().expect("nonce lock poisoned").clone();
        if let Some(nonce) = nonce {
            request = request.header(NONCE_HEADER, nonce);
        }

        let resp = request.send().await?;
        handle_response(resp).await
    }
}

async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let status = resp.status();

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(ClientError::Authorization);
    }

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api {
            status: status.as_u16(),
            message: body[..body.len().min(200)].to_owned(),
        });
    }

    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        let preview = &body[..body.len().min(200)];
        ClientError::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
        }
    })
}
