//! Shared domain model and wire protocol for the netmenu workspace.
//!
//! This crate owns everything both halves of the system agree on:
//!
//! - **Domain model** ([`model`]) -- [`SiteId`] and [`SiteRecord`], including
//!   the display-name derivation rules applied when a site carries no
//!   configured label.
//!
//! - **Wire protocol** ([`protocol`]) -- [`MenuItem`], the two-valued
//!   [`ListingResponse`] envelope (`success` / `unobserve`), and the
//!   [`BootstrapPayload`] handed to a client before its first paginated
//!   fetch.
//!
//! - **Menu options** ([`options`]) -- [`MenuOptions`] with the permissive
//!   normalization rules: out-of-range overrides fall back to defaults
//!   instead of erroring.

pub mod model;
pub mod options;
pub mod protocol;

pub use model::{SiteId, SiteRecord};
pub use options::{MenuOptions, OrderBy};
pub use protocol::{BootstrapPayload, ListingResponse, MenuItem, MENU_PARENT};
