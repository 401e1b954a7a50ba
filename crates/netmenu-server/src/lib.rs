//! Server half of the netmenu workspace.
//!
//! Everything behind the listing endpoint lives here:
//!
//! - **[`SiteRegistry`]** -- the seam to the platform's tenant registry:
//!   ordered, offset-paginated, filtered enumeration. [`MemoryRegistry`]
//!   is the in-process implementation used by the binary and tests.
//!
//! - **[`SiteEnumerator`]** -- translates an offset + page size into a
//!   batch of [`netmenu_core::SiteRecord`]s, applying display-name
//!   derivation and the restricted-access flag.
//!
//! - **[`StampCache`]** -- the single network-scoped invalidation token,
//!   held in a [`TransientStore`] with a TTL. Fails open: storage trouble
//!   degrades to minting a fresh stamp per read, never to an error.
//!
//! - **[`HookDispatcher`]** -- explicit `(event kind, predicate, action)`
//!   registrations funneling platform lifecycle events into
//!   [`StampCache::invalidate`].
//!
//! - **[`http`]** -- the axum surface: `POST /netmenu/v1/sites` and
//!   `GET /netmenu/v1/bootstrap`, guarded by an [`AccessPolicy`] and the
//!   bootstrap nonce.

pub mod auth;
pub mod cache;
pub mod config;
pub mod enumerate;
pub mod error;
pub mod hooks;
pub mod http;
pub mod registry;

pub use auth::{AccessPolicy, StaticTokenPolicy};
pub use cache::{MemoryStore, StampCache, TransientStore, STAMP_KEY};
pub use config::ServerConfig;
pub use enumerate::SiteEnumerator;
pub use error::ServerError;
pub use hooks::{register_invalidation_hooks, EventKind, HookDispatcher, NetworkEvent};
pub use http::{router, AppState};
pub use registry::{MemoryRegistry, RegistrySite, SiteQuery, SiteRegistry};
