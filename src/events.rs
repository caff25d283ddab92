//! Event emission facade for the window registry
//!
//! A minimal publish/subscribe mechanism scoped to a registry instance.
//! Subscribers attach per event kind; the registry emits after each
//! mutation so UI bindings can re-read a snapshot and re-render.
//!
//! Handlers for the same kind fire in subscription order. The handler list
//! is snapshotted before iteration and every entry is re-checked against
//! the live table just before invocation, so a handler may unsubscribe
//! itself (or any other handler) mid-emission without a panic and without
//! the removed handler firing again during that emission.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The kinds of notifications a registry produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Registered,
    Unregistered,
    Updated,
    BroughtToFront,
    SentToBack,
    Minimized,
    Maximized,
    Restored,
    LayoutSaved,
    LayoutLoaded,
}

/// A single registry notification with its payload
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryEvent {
    Registered { id: String },
    Unregistered { id: String },
    Updated { id: String },
    BroughtToFront { id: String },
    SentToBack { id: String },
    Minimized { id: String },
    Maximized { id: String },
    Restored { id: String },
    LayoutSaved { name: String },
    LayoutLoaded { name: String },
}

impl RegistryEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            RegistryEvent::Registered { .. } => EventKind::Registered,
            RegistryEvent::Unregistered { .. } => EventKind::Unregistered,
            RegistryEvent::Updated { .. } => EventKind::Updated,
            RegistryEvent::BroughtToFront { .. } => EventKind::BroughtToFront,
            RegistryEvent::SentToBack { .. } => EventKind::SentToBack,
            RegistryEvent::Minimized { .. } => EventKind::Minimized,
            RegistryEvent::Maximized { .. } => EventKind::Maximized,
            RegistryEvent::Restored { .. } => EventKind::Restored,
            RegistryEvent::LayoutSaved { .. } => EventKind::LayoutSaved,
            RegistryEvent::LayoutLoaded { .. } => EventKind::LayoutLoaded,
        }
    }
}

/// Token returned by [`EventBus::on`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Arc<dyn Fn(&RegistryEvent) + Send + Sync>;

#[derive(Default)]
struct BusInner {
    next_id: u64,
    handlers: HashMap<EventKind, Vec<(SubscriptionId, Handler)>>,
}

/// Cloneable handle to a registry's event subscriptions
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<Mutex<BusInner>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        let count: usize = inner.handlers.values().map(Vec::len).sum();
        f.debug_struct("EventBus").field("handlers", &count).finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a handler to one event kind
    pub fn on<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: Fn(&RegistryEvent) + Send + Sync + 'static,
    {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let id = SubscriptionId(inner.next_id);
        inner
            .handlers
            .entry(kind)
            .or_default()
            .push((id, Arc::new(handler)));
        id
    }

    /// Remove a subscription. Returns whether a handler was removed.
    pub fn off(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.lock();
        for list in inner.handlers.values_mut() {
            let before = list.len();
            list.retain(|(hid, _)| *hid != id);
            if list.len() != before {
                return true;
            }
        }
        false
    }

    /// Deliver an event to all live subscribers of its kind
    pub fn emit(&self, event: &RegistryEvent) {
        let kind = event.kind();
        let snapshot: Vec<(SubscriptionId, Handler)> = {
            let inner = self.inner.lock();
            inner
                .handlers
                .get(&kind)
                .map(|list| list.to_vec())
                .unwrap_or_default()
        };

        for (id, handler) in snapshot {
            // A handler earlier in this emission may have unsubscribed this one
            let alive = {
                let inner = self.inner.lock();
                inner
                    .handlers
                    .get(&kind)
                    .map(|list| list.iter().any(|(hid, _)| *hid == id))
                    .unwrap_or(false)
            };
            if alive {
                handler(event);
            }
        }
    }

    /// Number of live subscriptions across all kinds
    pub fn subscription_count(&self) -> usize {
        self.inner.lock().handlers.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn registered(id: &str) -> RegistryEvent {
        RegistryEvent::Registered { id: id.to_string() }
    }

    #[test]
    fn test_handlers_fire_in_subscription_order() {
        let bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in 1..=3u32 {
            let order = order.clone();
            bus.on(EventKind::Registered, move |_| order.lock().push(tag));
        }

        bus.emit(&registered("w1"));
        assert_eq!(*order.lock(), vec![1, 2, 3]);
    }

    #[test]
    fn test_off_removes_handler() {
        let bus = EventBus::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_clone = calls.clone();
        let sub = bus.on(EventKind::Registered, move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit(&registered("w1"));
        assert!(bus.off(sub));
        assert!(!bus.off(sub)); // already gone
        bus.emit(&registered("w1"));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe_self_during_emission() {
        let bus = EventBus::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let slot: Arc<Mutex<Option<SubscriptionId>>> = Arc::new(Mutex::new(None));

        let bus_clone = bus.clone();
        let calls_clone = calls.clone();
        let slot_clone = slot.clone();
        let sub = bus.on(EventKind::Updated, move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            if let Some(id) = slot_clone.lock().take() {
                bus_clone.off(id);
            }
        });
        *slot.lock() = Some(sub);

        let event = RegistryEvent::Updated {
            id: "w1".to_string(),
        };
        bus.emit(&event);
        bus.emit(&event);

        // Fired exactly once; the self-removal neither panicked nor re-fired
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(bus.subscription_count(), 0);
    }

    #[test]
    fn test_unsubscribe_later_handler_during_emission() {
        let bus = EventBus::new();
        let second_calls = Arc::new(AtomicUsize::new(0));
        let victim: Arc<Mutex<Option<SubscriptionId>>> = Arc::new(Mutex::new(None));

        let bus_clone = bus.clone();
        let victim_clone = victim.clone();
        bus.on(EventKind::Minimized, move |_| {
            if let Some(id) = victim_clone.lock().take() {
                bus_clone.off(id);
            }
        });

        let second_calls_clone = second_calls.clone();
        let sub = bus.on(EventKind::Minimized, move |_| {
            second_calls_clone.fetch_add(1, Ordering::SeqCst);
        });
        *victim.lock() = Some(sub);

        bus.emit(&RegistryEvent::Minimized {
            id: "w1".to_string(),
        });

        // Removed before its turn in the same emission
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_emit_with_no_subscribers_is_harmless() {
        let bus = EventBus::new();
        bus.emit(&registered("w1"));
        assert_eq!(bus.subscription_count(), 0);
    }
}
