// ── Menu controller state machine ──
//
// Drives the infinite-scroll lifecycle from a single "more content
// visible" signal, decoupled from whatever viewport primitive the host
// environment offers. One fetch in flight at most; signals arriving
// while Loading are ignored, not queued. A fetch completing after the
// menu closed is discarded via the epoch counter and never mutates a
// since-reset index.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use netmenu_core::{ListingResponse, MenuItem, OrderBy};

use crate::error::ClientError;
use crate::fetch::MenuApi;
use crate::index::MenuIndex;

/// Observable controller state for one menu-open lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Idle,
    Loading,
    /// A page was appended; immediately eligible for the next load.
    Appending,
    /// The server sent the end-of-listing sentinel; no further fetches.
    Exhausted,
}

pub struct MenuController {
    api: MenuApi,
    order_by: OrderBy,
    persist_path: Option<PathBuf>,
    index: Mutex<MenuIndex>,
    state: watch::Sender<MenuState>,
    open: AtomicBool,
    /// Whether the viewport sentinel is still attached. Detached for
    /// good once the listing is exhausted.
    sentinel: AtomicBool,
    in_flight: AtomicBool,
    /// Bumped on close; fetches completing under a stale epoch are dropped.
    epoch: AtomicU64,
}

impl MenuController {
    /// Build a controller, optimistically loading any persisted index.
    /// Reconciliation with the server happens after the first fetch.
    pub fn new(api: MenuApi, order_by: OrderBy, persist_path: Option<PathBuf>) -> Self {
        let index = match persist_path.as_deref() {
            Some(path) => match MenuIndex::load(path) {
                Ok(index) => {
                    debug!(entries = index.len(), "loaded persisted index");
                    index
                }
                Err(e) => {
                    warn!(error = %e, "persisted index unreadable; starting empty");
                    MenuIndex::new()
                }
            },
            None => MenuIndex::new(),
        };
        let (state, _) = watch::channel(MenuState::Idle);

        Self {
            api,
            order_by,
            persist_path,
            index: Mutex::new(index),
            state,
            open: AtomicBool::new(false),
            sentinel: AtomicBool::new(true),
            in_flight: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Mark the menu open. The next visibility signal starts loading.
    pub fn open(&self) {
        self.open.store(true, Ordering::SeqCst);
        debug!("menu opened");
    }

    /// Mark the menu closed. An in-flight fetch keeps running but its
    /// response is discarded on completion.
    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
        self.epoch.fetch_add(1, Ordering::SeqCst);
        if *self.state.borrow() != MenuState::Exhausted {
            let _ = self.state.send(MenuState::Idle);
        }
        debug!("menu closed");
    }

    /// The single "more content visible" signal.
    ///
    /// Returns `Ok(true)` when a fetch ran to completion and was
    /// applied, `Ok(false)` when the signal was ignored (menu closed,
    /// sentinel detached, already Loading, or the response went stale).
    /// A fetch error leaves the state at Appending; the next visibility
    /// signal is the only retry.
    pub async fn notify_visible(&self) -> Result<bool, ClientError> {
        if !self.open.load(Ordering::SeqCst) || !self.sentinel.load(Ordering::SeqCst) {
            return Ok(false);
        }
        if *self.state.borrow() == MenuState::Exhausted {
            return Ok(false);
        }
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("fetch already in flight; ignoring visibility signal");
            return Ok(false);
        }

        let _ = self.state.send(MenuState::Loading);
        let epoch = self.epoch.load(Ordering::SeqCst);
        let offset = self.index.lock().expect("index lock poisoned").len();

        let result = self.api.fetch_page(offset).await;
        self.in_flight.store(false, Ordering::SeqCst);

        if self.epoch.load(Ordering::SeqCst) != epoch || !self.open.load(Ordering::SeqCst) {
            debug!("menu closed during fetch; discarding response");
            return Ok(false);
        }

        match result {
            Ok(ListingResponse::Success(items)) if items.is_empty() => {
                // Not a protocol shape the server produces; treat as a
                // page that added nothing.
                let _ = self.state.send(MenuState::Appending);
                Ok(true)
            }
            Ok(ListingResponse::Success(items)) => {
                {
                    let mut index = self.index.lock().expect("index lock poisoned");
                    let stamp = items
                        .first()
                        .map(|item| item.timestamp.clone())
                        .unwrap_or_default();
                    if index.reconcile_stamp(&stamp) {
                        // The batch was paged against the discarded index;
                        // the next signal refills from offset 0.
                        info!("server stamp moved; index rebuilt from scratch");
                    } else {
                        let added = index.merge(items);
                        debug!(added, total = index.len(), "merged listing page");
                    }
                    self.persist(&index);
                }
                let _ = self.state.send(MenuState::Appending);
                Ok(true)
            }
            Ok(ListingResponse::Unobserve(_)) => {
                self.sentinel.store(false, Ordering::SeqCst);
                let _ = self.state.send(MenuState::Exhausted);
                info!("listing exhausted; sentinel detached");
                Ok(true)
            }
            Err(e) => {
                let _ = self.state.send(MenuState::Appending);
                Err(e)
            }
        }
    }

    fn persist(&self, index: &MenuIndex) {
        if let Some(path) = self.persist_path.as_deref() {
            if let Err(e) = index.save(path) {
                warn!(error = %e, "persisting index failed; continuing in memory");
            }
        }
    }

    // ── Observation ──────────────────────────────────────────────────

    pub fn state(&self) -> watch::Receiver<MenuState> {
        self.state.subscribe()
    }

    pub fn current_state(&self) -> MenuState {
        *self.state.borrow()
    }

    pub fn sentinel_attached(&self) -> bool {
        self.sentinel.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.index.lock().expect("index lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stamp(&self) -> String {
        self.index
            .lock()
            .expect("index lock poisoned")
            .stamp()
            .to_owned()
    }

    /// Entries for rendering: filtered (case-insensitive substring over
    /// canonical names) and display-ordered. Pure view over fetched
    /// entries -- never triggers a fetch.
    pub fn visible_items(&self, filter: Option<&str>) -> Vec<MenuItem> {
        self.index
            .lock()
            .expect("index lock poisoned")
            .visible(filter, self.order_by)
            .into_iter()
            .cloned()
            .collect()
    }
}
