//! Sensor registry: domain types, change events, wire format and the
//! settings-backed store.

pub mod events;
pub mod persist;
pub mod sensor;
pub mod store;

pub use events::{ChangeNotifier, RegistryEvent, RegistryListener, SubscriptionId};
pub use sensor::{DataTypes, Reading, ReadingKind, Sensor, SensorId};
pub use store::{Registry, SETTINGS_KEY, SensorStore};
