// ── Wire protocol ──
//
// JSON shapes exchanged between the menu client and the listing
// endpoint. The two-valued `status` field is the only end-of-pagination
// signal: `unobserve` tells the client to stop fetching and drop its
// viewport sentinel.

use serde::{Deserialize, Serialize};

use crate::model::SiteRecord;

/// Parent node id every site entry hangs under in the rendered menu.
pub const MENU_PARENT: &str = "my-sites-list";

/// Header carrying the per-session nonce issued by the bootstrap endpoint.
pub const NONCE_HEADER: &str = "x-menu-nonce";

/// Route of the paginated listing endpoint.
pub const SITES_ROUTE: &str = "/netmenu/v1/sites";

/// Route of the bootstrap endpoint.
pub const BOOTSTRAP_ROUTE: &str = "/netmenu/v1/bootstrap";

// ── MenuItem ────────────────────────────────────────────────────────

/// One rendered menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub parent: String,
    pub id: String,
    /// Canonical (uppercase) name; the client indexes entries by it.
    pub name: String,
    /// HTML fragment: status marker followed by the display name.
    pub title: String,
    pub admin: String,
    pub url: String,
    /// Invalidation stamp current when this item was produced.
    pub timestamp: String,
}

impl MenuItem {
    /// Shape a [`SiteRecord`] for the wire, stamping it with the current
    /// invalidation token.
    pub fn from_record(record: &SiteRecord, timestamp: &str) -> Self {
        Self {
            parent: MENU_PARENT.to_owned(),
            id: record.id.menu_id(),
            name: record.canonical_name.clone(),
            title: format!("{}{}", status_marker(record.restricted), record.display_name),
            admin: record.admin_url.clone(),
            url: record.public_url.clone(),
            timestamp: timestamp.to_owned(),
        }
    }
}

/// Status marker div; restricted sites get the red variant.
fn status_marker(restricted: bool) -> &'static str {
    if restricted {
        r#"<div class="blavatar" style="color:#f00;"></div>"#
    } else {
        r#"<div class="blavatar"></div>"#
    }
}

// ── ListingResponse ─────────────────────────────────────────────────

/// Response envelope for one paginated listing call.
///
/// `{"status":"success","data":[...]}` carries a batch;
/// `{"status":"unobserve","data":""}` means the end of the listing was
/// reached and no further requests should be issued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "lowercase")]
pub enum ListingResponse {
    Success(Vec<MenuItem>),
    Unobserve(String),
}

impl ListingResponse {
    /// Build the envelope for a batch of records: non-empty batches become
    /// `success`, an empty batch becomes the `unobserve` sentinel.
    pub fn from_records(records: &[SiteRecord], timestamp: &str) -> Self {
        if records.is_empty() {
            Self::Unobserve(String::new())
        } else {
            Self::Success(
                records
                    .iter()
                    .map(|r| MenuItem::from_record(r, timestamp))
                    .collect(),
            )
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Unobserve(_))
    }
}

// ── BootstrapPayload ────────────────────────────────────────────────

/// Everything a client needs before its first paginated fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapPayload {
    /// Nonce the client must echo in [`NONCE_HEADER`] on listing calls.
    pub nonce: String,
    /// Absolute URL of the listing endpoint.
    pub rest_url: String,
    pub load_increments: usize,
    pub order_by: crate::options::OrderBy,
    /// Whether the client should render the search affordance.
    pub display_search: bool,
    pub timestamp: String,
}
