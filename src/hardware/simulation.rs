//! Simulated hardware backend for development and testing.
//!
//! Provides a fixed set of virtual climate sensors with slowly drifting
//! values, published both through the snapshot interface and as periodic
//! live events.

use super::{DiscoveredSensor, SensorEvent, SensorHardware, SensorValue};
use crate::registry::{DataTypes, ReadingKind, SensorId};
use chrono::Utc;
use log::{debug, info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Duration, interval};

#[derive(Debug, Clone)]
struct SimulatedSensor {
    id: SensorId,
    data_types: DataTypes,
    base_temperature: f64,
    base_humidity: f64,
}

impl SimulatedSensor {
    /// Triangle wave around the base value, one full cycle per 24 rounds.
    fn value_at(&self, kind: ReadingKind, round: u64) -> f64 {
        let phase = (round % 24) as f64;
        let drift = if phase < 12.0 { phase } else { 24.0 - phase } / 12.0;
        match kind {
            ReadingKind::Temperature => self.base_temperature + drift * 1.5,
            ReadingKind::Humidity => self.base_humidity + drift * 5.0,
        }
    }
}

/// Simulated hardware with deterministic value drift.
///
/// The drift round advances once per published event batch, so snapshot
/// reads between batches stay stable.
pub struct SimulatedHardware {
    sensors: Vec<SimulatedSensor>,
    round: Arc<AtomicU64>,
}

impl SimulatedHardware {
    /// Two indoor climate sensors and one outdoor temperature-only sensor.
    pub fn new() -> Self {
        let both = DataTypes::from_kinds(ReadingKind::ALL);
        let temperature_only = DataTypes::from_kinds([ReadingKind::Temperature]);

        Self {
            sensors: vec![
                SimulatedSensor {
                    id: SensorId::new("fineoffset", "temperaturehumidity", "151"),
                    data_types: both,
                    base_temperature: 21.5,
                    base_humidity: 48.0,
                },
                SimulatedSensor {
                    id: SensorId::new("mandolyn", "temperaturehumidity", "11"),
                    data_types: both,
                    base_temperature: 19.0,
                    base_humidity: 55.0,
                },
                SimulatedSensor {
                    id: SensorId::new("fineoffset", "temperature", "135"),
                    data_types: temperature_only,
                    base_temperature: 8.5,
                    base_humidity: 0.0,
                },
            ],
            round: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Spawn a task that publishes one event per supported reading every
    /// `period`, advancing the simulated drift each round.
    pub fn spawn_event_task(
        &self,
        tx: mpsc::Sender<SensorEvent>,
        period: Duration,
    ) -> JoinHandle<()> {
        let sensors = self.sensors.clone();
        let round = self.round.clone();

        info!(
            "[Sim] Publishing readings for {} sensor(s) every {:?}",
            sensors.len(),
            period
        );

        tokio::spawn(async move {
            let mut timer = interval(period);
            loop {
                timer.tick().await;
                let current = round.fetch_add(1, Ordering::SeqCst) + 1;
                let timestamp = Utc::now().timestamp();

                for sensor in &sensors {
                    for kind in ReadingKind::ALL {
                        if !sensor.data_types.supports(kind) {
                            continue;
                        }
                        let event = SensorEvent {
                            id: sensor.id.clone(),
                            kind,
                            value: sensor.value_at(kind, current),
                            timestamp,
                        };
                        debug!("[Sim] {} {} = {:.1}", event.id, event.kind, event.value);
                        if tx.send(event).await.is_err() {
                            warn!("[Sim] Event channel closed, stopping simulation");
                            return;
                        }
                    }
                }
            }
        })
    }
}

impl Default for SimulatedHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorHardware for SimulatedHardware {
    fn discover(&self) -> Vec<DiscoveredSensor> {
        self.sensors
            .iter()
            .map(|sensor| DiscoveredSensor {
                id: sensor.id.clone(),
                data_types: sensor.data_types,
            })
            .collect()
    }

    fn sensor_value(&self, id: &SensorId, kind: ReadingKind) -> Option<SensorValue> {
        let sensor = self.sensors.iter().find(|sensor| &sensor.id == id)?;
        if !sensor.data_types.supports(kind) {
            return None;
        }
        Some(SensorValue {
            value: sensor.value_at(kind, self.round.load(Ordering::SeqCst)),
            timestamp: Utc::now().timestamp(),
        })
    }
}
