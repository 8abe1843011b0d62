//! Startup synchronization and the live event pump.
//!
//! The bridge owns the fixed startup sequence: drain the hardware snapshot
//! once without persisting, hook up the live event stream, derive the
//! initial view mode and write one normalizing save.

use crate::hardware::{SensorEvent, SensorHardware};
use crate::registry::{ReadingKind, SensorStore};
use crate::view::{self, ViewMode};
use log::{debug, info};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Sensor store shared between the event pump and the UI adapter.
pub type SharedStore = Arc<RwLock<SensorStore>>;

/// Running bridge: the initial view mode plus the live event pump task.
pub struct SensorBridge {
    store: SharedStore,
    view_mode: ViewMode,
    pump: JoinHandle<()>,
}

impl SensorBridge {
    /// Bring the loaded registry in sync with the hardware and start
    /// listening for live events.
    ///
    /// The snapshot drain re-applies values the settings may already hold,
    /// so it runs with persistence suppressed; one unconditional save
    /// follows once the initial view mode is known.
    pub fn start(
        store: SharedStore,
        hardware: &dyn SensorHardware,
        events: mpsc::Receiver<SensorEvent>,
    ) -> Self {
        sync_from_hardware(&store, hardware);
        let pump = spawn_event_pump(store.clone(), events);

        let view_mode = view::initial_view_mode(store.read().registry());
        store.read().save();
        info!(
            "Sensor bridge started in {} mode with {} sensor(s)",
            view_mode,
            store.read().registry().len()
        );

        Self {
            store,
            view_mode,
            pump,
        }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Mode the UI should open in.
    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Stop the live event pump.
    pub fn shutdown(&self) {
        self.pump.abort();
    }

    /// Wait for the event stream to end.
    pub async fn join(self) {
        let _ = self.pump.await;
    }
}

/// Drain the hardware snapshot once, feeding current values through the
/// regular reading path without persisting each record.
fn sync_from_hardware(store: &SharedStore, hardware: &dyn SensorHardware) {
    let discovered = hardware.discover();
    info!("Hardware reports {} sensor(s)", discovered.len());

    let mut store = store.write();
    for sensor in discovered {
        for kind in ReadingKind::ALL {
            if !sensor.data_types.supports(kind) {
                continue;
            }
            if let Some(current) = hardware.sensor_value(&sensor.id, kind) {
                store.upsert_reading(&sensor.id, kind, current.value, current.timestamp, true);
            }
        }
    }
}

/// Forward live hardware events into the store, persistence enabled.
fn spawn_event_pump(store: SharedStore, mut events: mpsc::Receiver<SensorEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            debug!(
                "Reading event: {} {} = {} @ {}",
                event.id, event.kind, event.value, event.timestamp
            );
            store
                .write()
                .upsert_reading(&event.id, event.kind, event.value, event.timestamp, false);
        }
        info!("Hardware event stream closed");
    })
}
