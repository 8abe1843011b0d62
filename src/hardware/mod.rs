//! Hardware abstraction layer.
//!
//! The real driver stack lives in the host process; the bridge consumes it
//! through two seams: a snapshot of currently-known sensors with their
//! capability bitmasks, and a live stream of reading events delivered over
//! a channel.

pub mod simulation;

pub use simulation::SimulatedHardware;

use crate::registry::{DataTypes, ReadingKind, SensorId};

/// One sensor reported by the hardware snapshot.
#[derive(Debug, Clone)]
pub struct DiscoveredSensor {
    pub id: SensorId,
    /// Bitmask of reading kinds this sensor reports.
    pub data_types: DataTypes,
}

/// Current value of one reading, as reported by the hardware.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorValue {
    pub value: f64,
    /// Unix timestamp (seconds) of the measurement.
    pub timestamp: i64,
}

/// A live reading event from the hardware stream.
#[derive(Debug, Clone)]
pub struct SensorEvent {
    pub id: SensorId,
    pub kind: ReadingKind,
    pub value: f64,
    pub timestamp: i64,
}

/// Snapshot access to the hardware layer.
pub trait SensorHardware: Send + Sync {
    /// Every sensor the hardware currently knows about.
    fn discover(&self) -> Vec<DiscoveredSensor>;

    /// Current value for one reading kind of one sensor, if the hardware
    /// has one.
    fn sensor_value(&self, id: &SensorId, kind: ReadingKind) -> Option<SensorValue>;
}
