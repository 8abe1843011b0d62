//! View-model adapter for the host UI.
//!
//! The host renders its own widgets; this module only prepares what it
//! binds: the sensor rows, the initial view mode and the mutation callbacks
//! (delete, rename, visibility).

use crate::bridge::SharedStore;
use crate::registry::{ReadingKind, Registry, Sensor, SensorId};
use chrono::DateTime;
use strum::Display;

/// Mode the sensor list UI opens in.
///
/// A configuration with no named or visible sensor means nothing has been
/// set up yet, so the UI starts editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ViewMode {
    #[strum(serialize = "VIEW")]
    View,
    #[strum(serialize = "EDIT")]
    Edit,
}

/// Initial mode for a freshly loaded registry.
pub fn initial_view_mode(registry: &Registry) -> ViewMode {
    let configured = registry
        .iter()
        .any(|sensor| sensor.show_in_list() || !sensor.name().is_empty());
    if configured { ViewMode::View } else { ViewMode::Edit }
}

/// One display row of the sensor list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorRow {
    pub id: SensorId,
    pub name: String,
    pub show_in_list: bool,
    pub temperature: Option<String>,
    pub humidity: Option<String>,
    /// Most recent update across both kinds, formatted for display.
    pub last_updated: Option<String>,
}

impl SensorRow {
    fn from_sensor(sensor: &Sensor) -> Self {
        let temperature = sensor
            .reading(ReadingKind::Temperature)
            .map(|reading| format!("{:.1}°C", reading.value));
        let humidity = sensor
            .reading(ReadingKind::Humidity)
            .map(|reading| format!("{:.0}%", reading.value));
        let last_updated = sensor
            .readings()
            .map(|(_, reading)| reading.last_updated)
            .max()
            .and_then(|timestamp| DateTime::from_timestamp(timestamp, 0))
            .map(|updated| updated.format("%Y-%m-%d %H:%M:%S").to_string());

        Self {
            id: sensor.id().clone(),
            name: sensor.name().to_string(),
            show_in_list: sensor.show_in_list(),
            temperature,
            humidity,
            last_updated,
        }
    }
}

/// Callback surface the host binds to the rendered sensor list.
pub struct SensorPanel {
    store: SharedStore,
}

impl SensorPanel {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Rows for every known sensor, in registry order.
    pub fn rows(&self) -> Vec<SensorRow> {
        self.store
            .read()
            .registry()
            .iter()
            .map(SensorRow::from_sensor)
            .collect()
    }

    /// Mode the list should open in, given the current registry state.
    pub fn initial_view_mode(&self) -> ViewMode {
        initial_view_mode(self.store.read().registry())
    }

    /// `deleteSensor` callback. Unknown identities are ignored.
    pub fn delete_sensor(&self, protocol: &str, model: &str, id: &str) {
        self.store
            .write()
            .delete(&SensorId::new(protocol, model, id));
    }

    /// Rename callback.
    pub fn rename_sensor(&self, protocol: &str, model: &str, id: &str, name: &str) {
        self.store
            .write()
            .set_name(&SensorId::new(protocol, model, id), name);
    }

    /// Visibility-toggle callback.
    pub fn set_sensor_visibility(&self, protocol: &str, model: &str, id: &str, show: bool) {
        self.store
            .write()
            .set_show_in_list(&SensorId::new(protocol, model, id), show);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SensorStore;
    use crate::settings::MemorySettings;
    use parking_lot::RwLock;
    use std::sync::Arc;

    fn id(n: &str) -> SensorId {
        SensorId::new("proto1", "modelA", n)
    }

    fn shared_store() -> (SharedStore, Arc<MemorySettings>) {
        let settings = Arc::new(MemorySettings::new());
        let store = Arc::new(RwLock::new(SensorStore::load(settings.clone())));
        (store, settings)
    }

    #[test]
    fn test_initial_view_mode_edit_when_nothing_configured() {
        let mut registry = Registry::new();
        registry.insert(Sensor::new(id("id1"), "", false));
        registry.insert(Sensor::new(id("id2"), "", false));

        assert_eq!(initial_view_mode(&registry), ViewMode::Edit);
        assert_eq!(initial_view_mode(&Registry::new()), ViewMode::Edit);
    }

    #[test]
    fn test_initial_view_mode_view_when_named_or_visible() {
        let mut registry = Registry::new();
        registry.insert(Sensor::new(id("id1"), "Kitchen", false));
        assert_eq!(initial_view_mode(&registry), ViewMode::View);

        let mut registry = Registry::new();
        registry.insert(Sensor::new(id("id1"), "", true));
        assert_eq!(initial_view_mode(&registry), ViewMode::View);
    }

    #[test]
    fn test_view_mode_display_matches_ui_tokens() {
        assert_eq!(ViewMode::View.to_string(), "VIEW");
        assert_eq!(ViewMode::Edit.to_string(), "EDIT");
    }

    #[test]
    fn test_rows_project_readings() {
        let (store, _) = shared_store();
        {
            let mut guard = store.write();
            guard.create(id("id1"), "Greenhouse", true);
            guard.upsert_reading(&id("id1"), ReadingKind::Temperature, 21.46, 1000, true);
            guard.upsert_reading(&id("id1"), ReadingKind::Humidity, 48.2, 1060, true);
            guard.upsert_reading(&id("id2"), ReadingKind::Temperature, -3.0, 2000, true);
        }

        let panel = SensorPanel::new(store);
        let rows = panel.rows();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].name, "Greenhouse");
        assert!(rows[0].show_in_list);
        assert_eq!(rows[0].temperature.as_deref(), Some("21.5°C"));
        assert_eq!(rows[0].humidity.as_deref(), Some("48%"));
        assert_eq!(rows[0].last_updated.as_deref(), Some("1970-01-01 00:17:40"));

        assert_eq!(rows[1].temperature.as_deref(), Some("-3.0°C"));
        assert_eq!(rows[1].humidity, None);
    }

    #[test]
    fn test_panel_view_mode_tracks_configuration() {
        let (store, _) = shared_store();
        let panel = SensorPanel::new(store.clone());
        assert_eq!(panel.initial_view_mode(), ViewMode::Edit);

        store.write().create(id("id1"), "Kitchen", false);
        assert_eq!(panel.initial_view_mode(), ViewMode::View);
    }

    #[test]
    fn test_panel_callbacks_mutate_and_persist() {
        let (store, settings) = shared_store();
        store.write().create(id("id1"), "", false);
        let writes_before = settings.write_count();

        let panel = SensorPanel::new(store.clone());
        panel.rename_sensor("proto1", "modelA", "id1", "Attic");
        panel.set_sensor_visibility("proto1", "modelA", "id1", true);
        panel.delete_sensor("proto1", "modelA", "id1");

        assert_eq!(settings.write_count(), writes_before + 3);
        assert!(store.read().registry().is_empty());

        // deleting again is a no-op
        panel.delete_sensor("proto1", "modelA", "id1");
        assert_eq!(settings.write_count(), writes_before + 3);
    }
}
