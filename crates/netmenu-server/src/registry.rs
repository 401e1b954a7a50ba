// ── Tenant registry seam ──
//
// The platform's site registry is external; this module owns only the
// trait the enumerator needs (ordered, offset-paginated, filtered
// enumeration) plus an in-process implementation backing the binary and
// the test suite. Enumeration order is the stable `(path, id)` key --
// display order is a client concern and must not leak in here.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use netmenu_core::SiteId;

use crate::error::ServerError;
use crate::hooks::{HookDispatcher, NetworkEvent};

// ── Registry row ────────────────────────────────────────────────────

/// One site as the tenant registry stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrySite {
    pub id: SiteId,
    /// Configured label; may be empty, in which case the display name is
    /// derived from the public URL.
    #[serde(default)]
    pub label: String,
    pub public_url: String,
    /// Path component; the stable enumeration key.
    pub path: String,
    /// Per-site visibility attribute. 2 marks restricted access.
    #[serde(default)]
    pub visibility: i64,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub spam: bool,
    #[serde(default)]
    pub mature: bool,
}

impl RegistrySite {
    /// Whether the standard listing filter excludes this site.
    pub fn excluded(&self) -> bool {
        self.deleted || self.archived || self.spam || self.mature
    }

    /// Admin console URL for this site.
    pub fn admin_url(&self) -> String {
        format!("{}/admin", self.public_url.trim_end_matches('/'))
    }
}

/// One page worth of enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteQuery {
    pub offset: usize,
    pub limit: usize,
}

// ── Trait ───────────────────────────────────────────────────────────

/// Ordered, offset-paginated, filtered enumeration of tenant sites.
///
/// Implementations must be deterministic given an unchanged registry:
/// repeated identical queries return the same rows in the same order.
/// Soft-deleted, archived, spam, and mature sites are never returned.
#[async_trait]
pub trait SiteRegistry: Send + Sync {
    async fn list(&self, query: SiteQuery) -> Result<Vec<RegistrySite>, ServerError>;

    /// Total non-excluded site count for the network.
    async fn count(&self) -> Result<u64, ServerError>;
}

// ── In-memory implementation ────────────────────────────────────────

/// In-process registry used by the binary (seeded from JSON) and tests.
///
/// Mutations forward lifecycle events to an attached [`HookDispatcher`],
/// standing in for the platform's own event wiring.
#[derive(Default)]
pub struct MemoryRegistry {
    sites: RwLock<BTreeMap<SiteId, RegistrySite>>,
    dispatcher: RwLock<Option<Arc<HookDispatcher>>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sites(sites: impl IntoIterator<Item = RegistrySite>) -> Self {
        let registry = Self::new();
        {
            let mut map = registry.sites.write().expect("sites lock poisoned");
            for site in sites {
                map.insert(site.id, site);
            }
        }
        registry
    }

    /// Load a registry from a JSON seed file (an array of sites).
    pub fn from_seed_file(path: &Path) -> Result<Self, ServerError> {
        let raw = std::fs::read_to_string(path)?;
        let sites: Vec<RegistrySite> = serde_json::from_str(&raw)?;
        debug!(count = sites.len(), path = %path.display(), "loaded registry seed");
        Ok(Self::with_sites(sites))
    }

    /// Attach the dispatcher that receives mutation events.
    pub fn attach_dispatcher(&self, dispatcher: Arc<HookDispatcher>) {
        *self.dispatcher.write().expect("dispatcher lock poisoned") = Some(dispatcher);
    }

    fn dispatch(&self, event: NetworkEvent) {
        let guard = self.dispatcher.read().expect("dispatcher lock poisoned");
        if let Some(dispatcher) = guard.as_ref() {
            dispatcher.dispatch(&event);
        }
    }

    // ── Mutations ────────────────────────────────────────────────────

    pub fn insert_site(&self, site: RegistrySite) {
        let id = site.id;
        self.sites
            .write()
            .expect("sites lock poisoned")
            .insert(id, site);
        self.dispatch(NetworkEvent::SiteCreated { id });
    }

    /// Replace a site wholesale. Returns false when the id is unknown.
    pub fn update_site(&self, site: RegistrySite) -> bool {
        let id = site.id;
        let existed = {
            let mut map = self.sites.write().expect("sites lock poisoned");
            map.insert(id, site).is_some()
        };
        if existed {
            self.dispatch(NetworkEvent::SiteUpdated { id });
        }
        existed
    }

    pub fn remove_site(&self, id: SiteId) -> Option<RegistrySite> {
        let removed = self.sites.write().expect("sites lock poisoned").remove(&id);
        if removed.is_some() {
            self.dispatch(NetworkEvent::SiteDeleted { id });
        }
        removed
    }

    /// Change a site's label, firing the rename event with both values.
    /// The dispatcher decides whether a no-op rename matters.
    pub fn rename_site(&self, id: SiteId, new_label: &str) -> bool {
        let old = {
            let mut map = self.sites.write().expect("sites lock poisoned");
            let Some(site) = map.get_mut(&id) else {
                return false;
            };
            let old = site.label.clone();
            site.label = new_label.to_owned();
            old
        };
        self.dispatch(NetworkEvent::SiteRenamed {
            old,
            new: new_label.to_owned(),
        });
        true
    }
}

#[async_trait]
impl SiteRegistry for MemoryRegistry {
    async fn list(&self, query: SiteQuery) -> Result<Vec<RegistrySite>, ServerError> {
        let map = self.sites.read().expect("sites lock poisoned");
        let mut rows: Vec<RegistrySite> = map.values().filter(|s| !s.excluded()).cloned().collect();
        rows.sort_by(|a, b| a.path.cmp(&b.path).then(a.id.cmp(&b.id)));
        Ok(rows
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect())
    }

    async fn count(&self) -> Result<u64, ServerError> {
        let map = self.sites.read().expect("sites lock poisoned");
        Ok(map.values().filter(|s| !s.excluded()).count() as u64)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn site(id: u64, path: &str) -> RegistrySite {
        RegistrySite {
            id: SiteId(id),
            label: format!("Site {id}"),
            public_url: format!("https://example.com{path}"),
            path: path.to_owned(),
            visibility: 1,
            deleted: false,
            archived: false,
            spam: false,
            mature: false,
        }
    }

    #[tokio::test]
    async fn list_orders_by_path_then_id() {
        let registry = MemoryRegistry::with_sites([site(2, "/b"), site(3, "/a"), site(1, "/c")]);
        let rows = registry
            .list(SiteQuery { offset: 0, limit: 10 })
            .await
            .unwrap();
        let paths: Vec<&str> = rows.iter().map(|s| s.path.as_str()).collect();
        assert_eq!(paths, ["/a", "/b", "/c"]);
    }

    #[tokio::test]
    async fn excluded_flags_hide_sites() {
        let mut flagged = site(2, "/b");
        flagged.spam = true;
        let registry = MemoryRegistry::with_sites([site(1, "/a"), flagged]);

        assert_eq!(registry.count().await.unwrap(), 1);
        let rows = registry
            .list(SiteQuery { offset: 0, limit: 10 })
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, SiteId(1));
    }

    #[tokio::test]
    async fn offset_and_limit_window_the_listing() {
        let registry =
            MemoryRegistry::with_sites((1..=5).map(|i| site(i, &format!("/s{i:02}"))));
        let rows = registry
            .list(SiteQuery { offset: 2, limit: 2 })
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, SiteId(3));
        assert_eq!(rows[1].id, SiteId(4));
    }

    #[test]
    fn seed_file_round_trip() {
        let sites = vec![site(1, "/a"), site(2, "/b")];
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), serde_json::to_string(&sites).unwrap()).unwrap();

        let registry = MemoryRegistry::from_seed_file(file.path()).unwrap();
        let map = registry.sites.read().unwrap();
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn admin_url_appends_admin_segment() {
        assert_eq!(site(1, "/a").admin_url(), "https://example.com/a/admin");
        let mut trailing = site(1, "/a");
        trailing.public_url = "https://example.com/a/".into();
        assert_eq!(trailing.admin_url(), "https://example.com/a/admin");
    }
}
