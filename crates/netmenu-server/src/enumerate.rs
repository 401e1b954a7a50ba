// ── Site enumeration ──

use std::sync::Arc;

use tracing::debug;

use netmenu_core::SiteRecord;

use crate::error::ServerError;
use crate::registry::{SiteQuery, SiteRegistry};

/// Translates an offset + page size into a batch of [`SiteRecord`]s.
///
/// Ordering and exclusion live behind [`SiteRegistry`]; this layer owns
/// only the registry-row-to-record shaping (display-name derivation,
/// restricted flag).
#[derive(Clone)]
pub struct SiteEnumerator {
    registry: Arc<dyn SiteRegistry>,
}

impl SiteEnumerator {
    pub fn new(registry: Arc<dyn SiteRegistry>) -> Self {
        Self { registry }
    }

    /// One page of sites, in stable registry order.
    pub async fn list_sites(
        &self,
        offset: usize,
        page_size: usize,
    ) -> Result<Vec<SiteRecord>, ServerError> {
        debug!(offset, page_size, "listing sites");
        let rows = self
            .registry
            .list(SiteQuery {
                offset,
                limit: page_size,
            })
            .await?;
        Ok(rows
            .iter()
            .map(|row| {
                SiteRecord::derive(
                    row.id,
                    &row.label,
                    &row.public_url,
                    &row.admin_url(),
                    row.visibility,
                )
            })
            .collect())
    }

    /// Total non-excluded site count; drives the search affordance.
    pub async fn count_sites(&self) -> Result<u64, ServerError> {
        self.registry.count().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::registry::{MemoryRegistry, RegistrySite};
    use netmenu_core::SiteId;

    fn site(id: u64, label: &str, path: &str, visibility: i64) -> RegistrySite {
        RegistrySite {
            id: SiteId(id),
            label: label.to_owned(),
            public_url: format!("https://example.com{path}"),
            path: path.to_owned(),
            visibility,
            deleted: false,
            archived: false,
            spam: false,
            mature: false,
        }
    }

    fn enumerator(sites: Vec<RegistrySite>) -> SiteEnumerator {
        SiteEnumerator::new(Arc::new(MemoryRegistry::with_sites(sites)))
    }

    #[tokio::test]
    async fn repeated_calls_return_identical_pages() {
        let e = enumerator((1..=30).map(|i| site(i, "", &format!("/s{i:02}"), 1)).collect());

        let first = e.list_sites(10, 10).await.unwrap();
        let second = e.list_sites(10, 10).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 10);
    }

    #[tokio::test]
    async fn ordering_follows_path_not_display_name() {
        // "Zeta" sits on the earliest path and must come first.
        let e = enumerator(vec![
            site(1, "Zeta", "/a", 1),
            site(2, "Alpha", "/b", 1),
        ]);
        let records = e.list_sites(0, 10).await.unwrap();
        assert_eq!(records[0].display_name, "Zeta");
        assert_eq!(records[1].display_name, "Alpha");
    }

    #[tokio::test]
    async fn records_carry_derived_names_and_restricted_flag() {
        let e = enumerator(vec![
            site(1, "", "/www", 2),
            site(2, "Beta", "/beta", 0),
        ]);
        let mut records = e.list_sites(0, 10).await.unwrap();
        records.sort_by_key(|r| r.id);

        assert_eq!(records[0].display_name, "example.com/www");
        assert_eq!(records[0].canonical_name, "EXAMPLE.COM/WWW");
        assert!(records[0].restricted);
        assert_eq!(records[0].admin_url, "https://example.com/www/admin");

        assert_eq!(records[1].display_name, "Beta");
        assert!(!records[1].restricted);
    }

    #[tokio::test]
    async fn count_reflects_non_excluded_sites() {
        let mut hidden = site(3, "", "/c", 1);
        hidden.archived = true;
        let e = enumerator(vec![site(1, "", "/a", 1), site(2, "", "/b", 1), hidden]);
        assert_eq!(e.count_sites().await.unwrap(), 2);
    }
}
