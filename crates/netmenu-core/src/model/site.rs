// ── Site domain types ──
//
// SiteRecord is constructed fresh for every enumeration call and never
// persisted server-side; the canonical name doubles as the client-side
// index key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Visibility attribute value that marks a site as restricted.
///
/// The value is written by a companion access-control extension; without
/// that extension installed no site ever carries it.
pub const RESTRICTED_VISIBILITY: i64 = 2;

// ── SiteId ──────────────────────────────────────────────────────────

/// Registry row identifier for a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(pub u64);

impl SiteId {
    /// The identifier used for this site's rendered menu node.
    pub fn menu_id(&self) -> String {
        format!("site-{}", self.0)
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SiteId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl FromStr for SiteId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

// ── SiteRecord ──────────────────────────────────────────────────────

/// One site, shaped for the menu listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub id: SiteId,
    /// Human-friendly name: the configured label, or the public URL with
    /// scheme and a leading `www.` stripped when no label is set.
    pub display_name: String,
    /// Uppercase form of `display_name`; the client-side index key.
    pub canonical_name: String,
    pub admin_url: String,
    pub public_url: String,
    /// True when the site's visibility attribute equals
    /// [`RESTRICTED_VISIBILITY`].
    pub restricted: bool,
}

impl SiteRecord {
    /// Build a record from raw registry attributes, applying the
    /// display-name derivation and restricted-status rules.
    pub fn derive(id: SiteId, label: &str, public_url: &str, admin_url: &str, visibility: i64) -> Self {
        let display_name = if label.trim().is_empty() {
            display_name_from_url(public_url)
        } else {
            label.to_owned()
        };
        let canonical_name = display_name.to_uppercase();

        Self {
            id,
            display_name,
            canonical_name,
            admin_url: admin_url.to_owned(),
            public_url: public_url.to_owned(),
            restricted: visibility == RESTRICTED_VISIBILITY,
        }
    }
}

/// Strip `http://` / `https://` and a leading `www.` from a site URL.
///
/// `https://www.example.com` becomes `example.com`. Anything else is
/// passed through untouched -- the fallback is cosmetic, not a parser.
pub fn display_name_from_url(url: &str) -> String {
    let stripped = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    stripped.strip_prefix("www.").unwrap_or(stripped).to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn display_name_strips_scheme_and_www() {
        assert_eq!(display_name_from_url("https://www.example.com"), "example.com");
        assert_eq!(display_name_from_url("http://example.com"), "example.com");
        assert_eq!(display_name_from_url("https://blog.example.com"), "blog.example.com");
    }

    #[test]
    fn display_name_passes_through_bare_hosts() {
        assert_eq!(display_name_from_url("example.com/path"), "example.com/path");
    }

    #[test]
    fn derive_prefers_configured_label() {
        let rec = SiteRecord::derive(SiteId(3), "Alpha", "https://alpha.example", "https://alpha.example/admin", 1);
        assert_eq!(rec.display_name, "Alpha");
        assert_eq!(rec.canonical_name, "ALPHA");
        assert!(!rec.restricted);
    }

    #[test]
    fn derive_falls_back_to_url_when_label_empty() {
        let rec = SiteRecord::derive(SiteId(7), "  ", "https://www.example.com", "https://www.example.com/admin", 0);
        assert_eq!(rec.display_name, "example.com");
        assert_eq!(rec.canonical_name, "EXAMPLE.COM");
    }

    #[test]
    fn visibility_two_marks_restricted() {
        for (visibility, expected) in [(0, false), (1, false), (2, true)] {
            let rec = SiteRecord::derive(SiteId(1), "x", "https://x.example", "https://x.example/admin", visibility);
            assert_eq!(rec.restricted, expected, "visibility={visibility}");
        }
    }

    #[test]
    fn menu_id_prefixes_site() {
        assert_eq!(SiteId(42).menu_id(), "site-42");
    }

    #[test]
    fn site_id_parses_from_str() {
        let id: SiteId = "17".parse().unwrap();
        assert_eq!(id, SiteId(17));
    }
}
