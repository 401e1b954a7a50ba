// ── Persistent client-side index ──
//
// Entries are keyed by canonical (uppercase) site name, deduplicating
// across fetches. There is no per-record versioning: when the server's
// stamp moves, the whole index is discarded and rebuilt from offset 0.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use netmenu_core::{MenuItem, OrderBy};

use crate::error::ClientError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuIndex {
    stamp: String,
    entries: BTreeMap<String, MenuItem>,
}

impl MenuIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stamp(&self) -> &str {
        &self.stamp
    }

    /// Adopt a freshly fetched stamp.
    ///
    /// Returns true when the index held a different stamp and had to be
    /// discarded -- the caller should drop the in-hand batch too, since
    /// its offsets were computed against the dead index.
    pub fn reconcile_stamp(&mut self, stamp: &str) -> bool {
        if self.stamp == stamp {
            return false;
        }
        let discarded = !self.stamp.is_empty();
        if discarded {
            debug!(
                held = %self.stamp,
                fetched = %stamp,
                dropped = self.entries.len(),
                "stamp moved; discarding local index"
            );
            self.entries.clear();
        }
        self.stamp = stamp.to_owned();
        discarded
    }

    /// Merge a batch keyed by canonical name. Returns how many entries
    /// were new (existing names are overwritten in place).
    pub fn merge(&mut self, items: Vec<MenuItem>) -> usize {
        let mut added = 0;
        for item in items {
            if self.entries.insert(item.name.clone(), item).is_none() {
                added += 1;
            }
        }
        added
    }

    /// Entries matching an optional case-insensitive substring filter,
    /// in the requested display order. A view-layer operation only --
    /// it never fetches.
    pub fn visible(&self, filter: Option<&str>, order_by: OrderBy) -> Vec<&MenuItem> {
        let needle = filter.map(str::to_uppercase).unwrap_or_default();
        let mut items: Vec<&MenuItem> = self
            .entries
            .values()
            .filter(|item| needle.is_empty() || item.name.contains(&needle))
            .collect();
        match order_by {
            // BTreeMap iteration is already canonical-name order.
            OrderBy::Name => {}
            OrderBy::Url => items.sort_by(|a, b| a.url.cmp(&b.url)),
            OrderBy::Id => items.sort_by_key(|item| site_ordinal(&item.id)),
        }
        items
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Read a persisted index; a missing file yields an empty index.
    pub fn load(path: &Path) -> Result<Self, ClientError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| ClientError::Deserialization {
                message: format!("persisted index: {e}"),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ClientError> {
        let raw = serde_json::to_string(self).map_err(|e| ClientError::Deserialization {
            message: format!("serializing index: {e}"),
        })?;
        std::fs::write(path, raw)?;
        Ok(())
    }
}

/// Numeric suffix of a `site-{n}` menu id, for id-ordered display.
fn site_ordinal(menu_id: &str) -> u64 {
    menu_id
        .rsplit('-')
        .next()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: u64, name: &str, url: &str) -> MenuItem {
        MenuItem {
            parent: "my-sites-list".into(),
            id: format!("site-{id}"),
            name: name.to_uppercase(),
            title: format!(r#"<div class="blavatar"></div>{name}"#),
            admin: format!("{url}/admin"),
            url: url.to_owned(),
            timestamp: "1".into(),
        }
    }

    #[test]
    fn merge_dedupes_by_canonical_name() {
        let mut index = MenuIndex::new();
        assert_eq!(index.merge(vec![item(1, "Alpha", "https://a"), item(2, "Beta", "https://b")]), 2);
        assert_eq!(index.merge(vec![item(1, "Alpha", "https://a2")]), 0);
        assert_eq!(index.len(), 2);
        // The newer record replaced the older one in place.
        assert_eq!(index.visible(Some("alpha"), OrderBy::Name)[0].url, "https://a2");
    }

    #[test]
    fn first_stamp_is_adopted_without_discarding() {
        let mut index = MenuIndex::new();
        assert!(!index.reconcile_stamp("100"));
        assert_eq!(index.stamp(), "100");
    }

    #[test]
    fn changed_stamp_discards_everything() {
        let mut index = MenuIndex::new();
        index.reconcile_stamp("100");
        index.merge(vec![item(1, "Alpha", "https://a")]);

        assert!(index.reconcile_stamp("200"));
        assert!(index.is_empty());
        assert_eq!(index.stamp(), "200");

        assert!(!index.reconcile_stamp("200"));
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let mut index = MenuIndex::new();
        index.merge(vec![
            item(1, "Alpha", "https://a"),
            item(2, "Beta", "https://b"),
            item(3, "Alphabet", "https://c"),
        ]);

        let hits = index.visible(Some("alpha"), OrderBy::Name);
        let names: Vec<&str> = hits.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["ALPHA", "ALPHABET"]);

        assert_eq!(index.visible(Some("zzz"), OrderBy::Name).len(), 0);
        assert_eq!(index.visible(None, OrderBy::Name).len(), 3);
    }

    #[test]
    fn ordering_keys() {
        let mut index = MenuIndex::new();
        index.merge(vec![
            item(3, "Cherry", "https://a"),
            item(1, "Banana", "https://c"),
            item(12, "Apple", "https://b"),
        ]);

        let by_name: Vec<&str> = index
            .visible(None, OrderBy::Name)
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(by_name, ["APPLE", "BANANA", "CHERRY"]);

        let by_url: Vec<&str> = index
            .visible(None, OrderBy::Url)
            .iter()
            .map(|i| i.url.as_str())
            .collect();
        assert_eq!(by_url, ["https://a", "https://b", "https://c"]);

        let by_id: Vec<&str> = index
            .visible(None, OrderBy::Id)
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(by_id, ["site-1", "site-3", "site-12"]);
    }

    #[test]
    fn persistence_round_trip_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");

        assert!(MenuIndex::load(&path).unwrap().is_empty());

        let mut index = MenuIndex::new();
        index.reconcile_stamp("42");
        index.merge(vec![item(1, "Alpha", "https://a")]);
        index.save(&path).unwrap();

        let restored = MenuIndex::load(&path).unwrap();
        assert_eq!(restored, index);
    }
}
