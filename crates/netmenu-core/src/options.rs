// ── Menu options ──
//
// Tunables the host platform may override. Normalization is permissive:
// an out-of-range or unrecognized override falls back to the default
// rather than erroring.

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

pub const DEFAULT_LOAD_INCREMENTS: usize = 100;
pub const DEFAULT_SEARCH_THRESHOLD: usize = 20;
pub const DEFAULT_STAMP_TTL_SECS: u64 = 86_400;
pub const DEFAULT_WATCHED_PLUGIN: &str = "restricted-site-access/restricted_site_access.php";

// ── OrderBy ─────────────────────────────────────────────────────────

/// Client-side display ordering key.
///
/// Display order is a client concern; the server always enumerates by
/// the stable registry key regardless of this setting.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OrderBy {
    #[default]
    Name,
    Url,
    Id,
}

// ── MenuOptions ─────────────────────────────────────────────────────

/// Tunable knobs for the all-sites menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuOptions {
    /// Page size for each paginated listing call.
    pub load_increments: usize,
    /// Show the search affordance only above this many sites.
    pub search_threshold: usize,
    /// Lifetime of the invalidation stamp; 0 means every read mints afresh.
    pub stamp_ttl_secs: u64,
    #[serde(deserialize_with = "order_by_or_default")]
    pub order_by: OrderBy,
    /// Companion plugins whose activation state invalidates the menu.
    pub watched_plugins: Vec<String>,
}

impl Default for MenuOptions {
    fn default() -> Self {
        Self {
            load_increments: DEFAULT_LOAD_INCREMENTS,
            search_threshold: DEFAULT_SEARCH_THRESHOLD,
            stamp_ttl_secs: DEFAULT_STAMP_TTL_SECS,
            order_by: OrderBy::default(),
            watched_plugins: vec![DEFAULT_WATCHED_PLUGIN.to_owned()],
        }
    }
}

impl MenuOptions {
    /// Clamp overrides back to defaults where they are out of range.
    pub fn normalized(mut self) -> Self {
        if self.load_increments < 1 {
            self.load_increments = DEFAULT_LOAD_INCREMENTS;
        }
        if self.search_threshold < 1 {
            self.search_threshold = DEFAULT_SEARCH_THRESHOLD;
        }
        self
    }
}

/// Accept any string for `order_by`, falling back to the default ordering
/// on values outside `name|url|id`.
fn order_by_or_default<'de, D>(deserializer: D) -> Result<OrderBy, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.parse().unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let opts = MenuOptions::default();
        assert_eq!(opts.load_increments, 100);
        assert_eq!(opts.search_threshold, 20);
        assert_eq!(opts.stamp_ttl_secs, 86_400);
        assert_eq!(opts.order_by, OrderBy::Name);
        assert_eq!(opts.watched_plugins, vec![DEFAULT_WATCHED_PLUGIN.to_owned()]);
    }

    #[test]
    fn zero_increments_fall_back_to_default() {
        let opts = MenuOptions {
            load_increments: 0,
            search_threshold: 0,
            ..MenuOptions::default()
        }
        .normalized();
        assert_eq!(opts.load_increments, DEFAULT_LOAD_INCREMENTS);
        assert_eq!(opts.search_threshold, DEFAULT_SEARCH_THRESHOLD);
    }

    #[test]
    fn unknown_order_by_falls_back_to_name() {
        let opts: MenuOptions =
            serde_json::from_str(r#"{"order_by":"sideways"}"#).unwrap();
        assert_eq!(opts.order_by, OrderBy::Name);
    }

    #[test]
    fn order_by_parses_known_values() {
        let opts: MenuOptions = serde_json::from_str(r#"{"order_by":"url"}"#).unwrap();
        assert_eq!(opts.order_by, OrderBy::Url);
        assert_eq!(OrderBy::Id.to_string(), "id");
        assert_eq!("NAME".parse::<OrderBy>().unwrap(), OrderBy::Name);
    }
}
