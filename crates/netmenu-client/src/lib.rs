//! Client half of the netmenu workspace.
//!
//! Mirrors what the browser module does for the admin toolbar, minus the
//! DOM: fetch pages, keep a persistent local index, and stop fetching
//! when the server says the listing is exhausted.
//!
//! - **[`MenuApi`]** -- hand-built reqwest client for the listing and
//!   bootstrap endpoints; holds the bootstrap nonce the way a browser
//!   session holds its request token.
//!
//! - **[`MenuIndex`]** -- the persistent client-side index, keyed by
//!   canonical site name. The server's invalidation stamp is the sole
//!   staleness signal: a stamp change discards the whole index.
//!
//! - **[`MenuController`]** -- the menu-open state machine
//!   (`Idle -> Loading -> (Appending | Exhausted)`), driven by a single
//!   "more content visible" signal and limited to one in-flight fetch.

pub mod controller;
pub mod error;
pub mod fetch;
pub mod index;

pub use controller::{MenuController, MenuState};
pub use error::ClientError;
pub use fetch::MenuApi;
pub use index::MenuIndex;
