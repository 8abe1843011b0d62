//! Registry change notifications.
//!
//! The host UI wires itself to these instead of the registry calling into
//! the view layer directly: the store emits an event after each mutation
//! and interested adapters subscribe with a callback.

use crate::registry::sensor::{ReadingKind, SensorId};

/// A mutation that happened to the registry.
///
/// Sensors constructed during the initial settings load do not emit
/// `Inserted`; only mutations after load are observable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    Inserted(SensorId),
    Removed(SensorId),
    NameChanged(SensorId),
    VisibilityChanged(SensorId),
    ReadingUpdated(SensorId, ReadingKind),
}

/// Callback invoked with every registry event.
pub type RegistryListener = Box<dyn Fn(&RegistryEvent) + Send + Sync>;

/// Handle returned by `subscribe`, used to unsubscribe again.
pub type SubscriptionId = u64;

/// Keeps the subscriber list and fans events out to it.
#[derive(Default)]
pub struct ChangeNotifier {
    listeners: Vec<(SubscriptionId, RegistryListener)>,
    next_id: SubscriptionId,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: RegistryListener) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
    }

    pub fn emit(&self, event: &RegistryEvent) {
        for (_, listener) in &self.listeners {
            listener(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn sample_id() -> SensorId {
        SensorId::new("proto1", "modelA", "id1")
    }

    #[test]
    fn test_subscribers_receive_events() {
        let mut notifier = ChangeNotifier::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        notifier.subscribe(Box::new(move |event| sink.lock().push(event.clone())));

        notifier.emit(&RegistryEvent::Inserted(sample_id()));
        notifier.emit(&RegistryEvent::Removed(sample_id()));

        assert_eq!(
            *seen.lock(),
            vec![
                RegistryEvent::Inserted(sample_id()),
                RegistryEvent::Removed(sample_id()),
            ]
        );
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut notifier = ChangeNotifier::new();
        let seen = Arc::new(Mutex::new(0usize));

        let sink = seen.clone();
        let id = notifier.subscribe(Box::new(move |_| *sink.lock() += 1));

        notifier.emit(&RegistryEvent::Inserted(sample_id()));
        notifier.unsubscribe(id);
        notifier.emit(&RegistryEvent::Inserted(sample_id()));

        assert_eq!(*seen.lock(), 1);
    }

    #[test]
    fn test_subscription_ids_are_unique() {
        let mut notifier = ChangeNotifier::new();
        let first = notifier.subscribe(Box::new(|_| {}));
        notifier.unsubscribe(first);
        let second = notifier.subscribe(Box::new(|_| {}));
        assert_ne!(first, second);
    }
}
