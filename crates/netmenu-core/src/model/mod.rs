// ── Domain model ──

mod site;

pub use site::{SiteId, SiteRecord, RESTRICTED_VISIBILITY};
