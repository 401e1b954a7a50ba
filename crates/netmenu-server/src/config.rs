// ── Server configuration ──
//
// Defaults < TOML file < `NETMENU_*` environment, merged with figment.
// Menu options go through the permissive normalization pass after
// extraction so a bad override degrades to defaults instead of refusing
// to start.

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use netmenu_core::protocol::SITES_ROUTE;
use netmenu_core::MenuOptions;

use crate::error::ServerError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ServerSection,
    pub menu: MenuOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Socket address to listen on.
    pub bind: String,
    /// Externally reachable base URL; defaults to `http://{bind}`.
    pub public_base: Option<String>,
    /// Bearer tokens holding network-management privilege.
    pub admin_tokens: Vec<String>,
    /// JSON seed for the in-memory registry.
    pub seed_file: Option<PathBuf>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8787".to_owned(),
            public_base: None,
            admin_tokens: Vec::new(),
            seed_file: None,
        }
    }
}

impl ServerConfig {
    /// Merge defaults, an optional TOML file, and `NETMENU_*` env vars
    /// (double-underscore nesting, e.g. `NETMENU_MENU__LOAD_INCREMENTS`).
    pub fn load(path: Option<&Path>) -> Result<Self, ServerError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed("NETMENU_").split("__"));

        let mut config: Self = figment.extract().map_err(|e| ServerError::Config {
            message: e.to_string(),
        })?;
        config.menu = config.menu.normalized();
        Ok(config)
    }

    /// Absolute listing URL advertised to clients.
    pub fn listing_url(&self) -> String {
        let base = self
            .server
            .public_base
            .clone()
            .unwrap_or_else(|| format!("http://{}", self.server.bind));
        format!("{}{SITES_ROUTE}", base.trim_end_matches('/'))
    }
}
