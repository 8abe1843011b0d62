//! In-memory sensor registry and its settings-backed store.
//!
//! `Registry` is the plain ordered list with identity lookups; `SensorStore`
//! wraps it with the persistence policy (every mutation re-serializes the
//! whole registry to the settings store, never batched or debounced) and
//! change notifications.

use crate::registry::events::{ChangeNotifier, RegistryEvent, RegistryListener, SubscriptionId};
use crate::registry::persist;
use crate::registry::sensor::{ReadingKind, Sensor, SensorId};
use crate::settings::SettingsStore;
use log::{error, info, warn};
use std::sync::Arc;

/// Settings key the registry is persisted under.
pub const SETTINGS_KEY: &str = "sensors";

/// Ordered collection of known sensors.
///
/// Insertion order is discovery/load order. Holds at most one sensor per
/// identity triple; append-only except for explicit removal.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    sensors: Vec<Sensor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sensor> {
        self.sensors.iter()
    }

    /// First sensor matching the identity triple.
    pub fn find(&self, id: &SensorId) -> Option<&Sensor> {
        self.sensors.iter().find(|sensor| sensor.id() == id)
    }

    pub fn find_mut(&mut self, id: &SensorId) -> Option<&mut Sensor> {
        self.sensors.iter_mut().find(|sensor| sensor.id() == id)
    }

    /// Index of the first sensor matching the identity triple.
    pub fn position(&self, id: &SensorId) -> Option<usize> {
        self.sensors.iter().position(|sensor| sensor.id() == id)
    }

    /// Append a sensor. Returns false (and drops the sensor) when the
    /// identity is already present.
    pub fn insert(&mut self, sensor: Sensor) -> bool {
        if self.find(sensor.id()).is_some() {
            return false;
        }
        self.sensors.push(sensor);
        true
    }

    /// Remove the first sensor matching the identity, if any.
    pub fn remove(&mut self, id: &SensorId) -> Option<Sensor> {
        let position = self.position(id)?;
        Some(self.sensors.remove(position))
    }
}

/// Settings-backed sensor store.
///
/// Owns the registry, re-serializes it after every mutation and notifies
/// subscribers of changes. All operations are synchronous; within one
/// mutation call, persistence happens strictly after the mutation it
/// reflects.
pub struct SensorStore {
    registry: Registry,
    settings: Arc<dyn SettingsStore>,
    notifier: ChangeNotifier,
}

impl SensorStore {
    /// Load the registry persisted under [`SETTINGS_KEY`].
    ///
    /// Absent or malformed settings data yields an empty registry, never an
    /// error.
    pub fn load(settings: Arc<dyn SettingsStore>) -> Self {
        let registry = match settings.get(SETTINGS_KEY) {
            Some(value) => match persist::decode(&value) {
                Ok(registry) => {
                    info!("Loaded {} sensor(s) from settings", registry.len());
                    registry
                }
                Err(e) => {
                    warn!("Ignoring malformed sensor settings: {}", e);
                    Registry::new()
                }
            },
            None => {
                info!("No persisted sensors found (first run)");
                Registry::new()
            }
        };

        Self {
            registry,
            settings,
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn find(&self, id: &SensorId) -> Option<&Sensor> {
        self.registry.find(id)
    }

    /// Serialize the whole registry back to the settings store, overwriting
    /// prior content. Write failures are logged, not surfaced.
    pub fn save(&self) {
        let result = persist::encode(&self.registry)
            .and_then(|value| self.settings.set(SETTINGS_KEY, value));
        if let Err(e) = result {
            error!("Failed to persist sensor registry: {}", e);
        }
    }

    /// Subscribe to registry change events.
    pub fn subscribe(&mut self, listener: RegistryListener) -> SubscriptionId {
        self.notifier.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.notifier.unsubscribe(id)
    }

    /// Insert a new sensor with the given label and visibility.
    ///
    /// Returns false when a sensor with the same identity already exists.
    pub fn create(&mut self, id: SensorId, name: impl Into<String>, show_in_list: bool) -> bool {
        if !self.registry.insert(Sensor::new(id.clone(), name, show_in_list)) {
            return false;
        }
        self.notifier.emit(&RegistryEvent::Inserted(id));
        self.save();
        true
    }

    /// Apply a reading to the sensor with the given identity, lazily
    /// creating an unnamed hidden sensor when the identity is unknown.
    ///
    /// This is the handler for the live hardware event stream. The startup
    /// hardware sync passes `suppress_save = true` and is followed by one
    /// unconditional [`save`](Self::save); a mutation call with saving
    /// enabled persists exactly once.
    pub fn upsert_reading(
        &mut self,
        id: &SensorId,
        kind: ReadingKind,
        value: f64,
        timestamp: i64,
        suppress_save: bool,
    ) {
        if self.registry.find(id).is_none() {
            self.registry.insert(Sensor::new(id.clone(), "", false));
            self.notifier.emit(&RegistryEvent::Inserted(id.clone()));
        }
        if let Some(sensor) = self.registry.find_mut(id) {
            sensor.set_reading(kind, value, timestamp);
        }
        self.notifier
            .emit(&RegistryEvent::ReadingUpdated(id.clone(), kind));

        if !suppress_save {
            self.save();
        }
    }

    /// Rename a sensor. Unknown identities and unchanged names are no-ops.
    pub fn set_name(&mut self, id: &SensorId, name: impl Into<String>) {
        let name = name.into();
        let Some(sensor) = self.registry.find_mut(id) else {
            return;
        };
        if sensor.name() == name {
            return;
        }
        sensor.set_name(name);
        self.notifier.emit(&RegistryEvent::NameChanged(id.clone()));
        self.save();
    }

    /// Change a sensor's list visibility. Unknown identities and unchanged
    /// values are no-ops.
    pub fn set_show_in_list(&mut self, id: &SensorId, show: bool) {
        let Some(sensor) = self.registry.find_mut(id) else {
            return;
        };
        if sensor.show_in_list() == show {
            return;
        }
        sensor.set_show_in_list(show);
        self.notifier
            .emit(&RegistryEvent::VisibilityChanged(id.clone()));
        self.save();
    }

    /// Delete the sensor with the given identity.
    ///
    /// Unknown identities are a no-op and do not touch the settings store.
    pub fn delete(&mut self, id: &SensorId) -> bool {
        if self.registry.remove(id).is_none() {
            return false;
        }
        self.notifier.emit(&RegistryEvent::Removed(id.clone()));
        self.save();
        true
    }
}
