// ── Lifecycle event dispatch ──
//
// Platform lifecycle events funnel into one coarse action: retiring the
// invalidation stamp. Registrations are an explicit (kind, predicate,
// action) list evaluated synchronously, so the full invalidation surface
// is readable in one place. Invalidation is always whole-network; there
// is no per-site dirtiness tracking.

use std::sync::{Arc, RwLock};

use strum::Display;
use tracing::debug;

use netmenu_core::SiteId;

use crate::cache::StampCache;

// ── Events ──────────────────────────────────────────────────────────

/// Lifecycle events the menu subsystem observes.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkEvent {
    SiteCreated { id: SiteId },
    SiteUpdated { id: SiteId },
    SiteDeleted { id: SiteId },
    /// Tenant display-name change, carrying both values so a no-op
    /// rename can be told apart from a real one.
    SiteRenamed { old: String, new: String },
    PluginActivated { plugin: String },
    PluginDeactivated { plugin: String },
    /// The hosting extension itself is shutting down.
    Deactivating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    SiteCreated,
    SiteUpdated,
    SiteDeleted,
    SiteRenamed,
    PluginActivated,
    PluginDeactivated,
    Deactivating,
}

impl NetworkEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::SiteCreated { .. } => EventKind::SiteCreated,
            Self::SiteUpdated { .. } => EventKind::SiteUpdated,
            Self::SiteDeleted { .. } => EventKind::SiteDeleted,
            Self::SiteRenamed { .. } => EventKind::SiteRenamed,
            Self::PluginActivated { .. } => EventKind::PluginActivated,
            Self::PluginDeactivated { .. } => EventKind::PluginDeactivated,
            Self::Deactivating => EventKind::Deactivating,
        }
    }
}

// ── Dispatcher ──────────────────────────────────────────────────────

type Predicate = Box<dyn Fn(&NetworkEvent) -> bool + Send + Sync>;
type Action = Box<dyn Fn(&NetworkEvent) + Send + Sync>;

struct Registration {
    kind: EventKind,
    predicate: Predicate,
    action: Action,
}

/// Evaluates registered `(kind, predicate, action)` triples per event.
#[derive(Default)]
pub struct HookDispatcher {
    registrations: RwLock<Vec<Registration>>,
}

impl HookDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &self,
        kind: EventKind,
        predicate: impl Fn(&NetworkEvent) -> bool + Send + Sync + 'static,
        action: impl Fn(&NetworkEvent) + Send + Sync + 'static,
    ) {
        self.registrations
            .write()
            .expect("registrations lock poisoned")
            .push(Registration {
                kind,
                predicate: Box::new(predicate),
                action: Box::new(action),
            });
    }

    /// Run every matching registration synchronously; returns how many fired.
    pub fn dispatch(&self, event: &NetworkEvent) -> usize {
        let registrations = self
            .registrations
            .read()
            .expect("registrations lock poisoned");
        let mut fired = 0;
        for registration in registrations.iter() {
            if registration.kind == event.kind() && (registration.predicate)(event) {
                (registration.action)(event);
                fired += 1;
            }
        }
        debug!(kind = %event.kind(), fired, "dispatched network event");
        fired
    }
}

// ── Invalidation wiring ─────────────────────────────────────────────

/// Install the standard invalidation registrations.
///
/// Site create/update/delete always retire the stamp. A rename retires
/// it only when the name actually changed. Plugin toggles retire it only
/// for plugins on the watched allow-list. Deactivation of the hosting
/// extension retires it unconditionally as cleanup.
pub fn register_invalidation_hooks(
    dispatcher: &HookDispatcher,
    cache: Arc<StampCache>,
    watched_plugins: &[String],
) {
    for kind in [
        EventKind::SiteCreated,
        EventKind::SiteUpdated,
        EventKind::SiteDeleted,
    ] {
        let cache = Arc::clone(&cache);
        dispatcher.register(kind, |_| true, move |_| cache.invalidate());
    }

    {
        let cache = Arc::clone(&cache);
        dispatcher.register(
            EventKind::SiteRenamed,
            |event| match event {
                NetworkEvent::SiteRenamed { old, new } => old != new,
                _ => false,
            },
            move |_| cache.invalidate(),
        );
    }

    for kind in [EventKind::PluginActivated, EventKind::PluginDeactivated] {
        let cache = Arc::clone(&cache);
        let watched = watched_plugins.to_vec();
        dispatcher.register(
            kind,
            move |event| match event {
                NetworkEvent::PluginActivated { plugin }
                | NetworkEvent::PluginDeactivated { plugin } => {
                    watched.iter().any(|w| w == plugin)
                }
                _ => false,
            },
            move |_| cache.invalidate(),
        );
    }

    dispatcher.register(EventKind::Deactivating, |_| true, move |_| {
        cache.invalidate();
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cache::{MemoryStore, StampCache};
    use std::time::Duration;

    fn wired(watched: &[&str]) -> (HookDispatcher, Arc<StampCache>) {
        let cache = Arc::new(StampCache::new(
            Arc::new(MemoryStore::new()),
            Duration::from_secs(600),
        ));
        let dispatcher = HookDispatcher::new();
        let watched: Vec<String> = watched.iter().map(|s| (*s).to_owned()).collect();
        register_invalidation_hooks(&dispatcher, Arc::clone(&cache), &watched);
        (dispatcher, cache)
    }

    fn next_tick() {
        std::thread::sleep(Duration::from_millis(5));
    }

    #[test]
    fn site_mutations_retire_the_stamp() {
        let (dispatcher, cache) = wired(&[]);
        for event in [
            NetworkEvent::SiteCreated { id: SiteId(1) },
            NetworkEvent::SiteUpdated { id: SiteId(1) },
            NetworkEvent::SiteDeleted { id: SiteId(1) },
        ] {
            let before = cache.stamp();
            next_tick();
            assert_eq!(dispatcher.dispatch(&event), 1);
            assert_ne!(cache.stamp(), before, "{event:?} should retire the stamp");
        }
    }

    #[test]
    fn noop_rename_keeps_the_stamp() {
        let (dispatcher, cache) = wired(&[]);
        let before = cache.stamp();
        next_tick();
        let fired = dispatcher.dispatch(&NetworkEvent::SiteRenamed {
            old: "Alpha".into(),
            new: "Alpha".into(),
        });
        assert_eq!(fired, 0);
        assert_eq!(cache.stamp(), before);
    }

    #[test]
    fn real_rename_retires_the_stamp() {
        let (dispatcher, cache) = wired(&[]);
        let before = cache.stamp();
        next_tick();
        dispatcher.dispatch(&NetworkEvent::SiteRenamed {
            old: "Alpha".into(),
            new: "Beta".into(),
        });
        assert_ne!(cache.stamp(), before);
    }

    #[test]
    fn only_watched_plugin_toggles_invalidate() {
        let (dispatcher, cache) = wired(&["restricted-access/restricted_access.php"]);

        let before = cache.stamp();
        next_tick();
        dispatcher.dispatch(&NetworkEvent::PluginActivated {
            plugin: "unrelated/unrelated.php".into(),
        });
        assert_eq!(cache.stamp(), before);

        dispatcher.dispatch(&NetworkEvent::PluginDeactivated {
            plugin: "restricted-access/restricted_access.php".into(),
        });
        assert_ne!(cache.stamp(), before);
    }

    #[test]
    fn deactivation_always_retires_the_stamp() {
        let (dispatcher, cache) = wired(&[]);
        let before = cache.stamp();
        next_tick();
        assert_eq!(dispatcher.dispatch(&NetworkEvent::Deactivating), 1);
        assert_ne!(cache.stamp(), before);
    }
}
