//! Sensor identity and reading types.
//!
//! A sensor is named by the (protocol, model, id) triple reported by the
//! hardware layer. Readings are last-write-wins: only the latest value per
//! kind is kept, kinds never observed are simply absent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use strum::{Display, FromRepr};

/// Identity triple naming a physical sensor.
///
/// All three parts are opaque strings supplied by the hardware layer.
/// Identity never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SensorId {
    pub protocol: String,
    pub model: String,
    pub id: String,
}

impl SensorId {
    pub fn new(
        protocol: impl Into<String>,
        model: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            protocol: protocol.into(),
            model: model.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.protocol, self.model, self.id)
    }
}

/// Measurement kinds the bridge tracks.
///
/// The discriminants are the hardware data-type codes. The same codes double
/// as bits in the capability bitmask and as the `type` field of the
/// persisted format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, FromRepr)]
#[strum(serialize_all = "lowercase")]
#[repr(u32)]
pub enum ReadingKind {
    Temperature = 1,
    Humidity = 2,
}

impl ReadingKind {
    /// Every kind, in capability-scan order.
    pub const ALL: [ReadingKind; 2] = [ReadingKind::Temperature, ReadingKind::Humidity];

    /// Numeric code used on the wire and in the capability bitmask.
    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::from_repr(code)
    }
}

/// Bitmask of the reading kinds a sensor reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DataTypes(pub u32);

impl DataTypes {
    pub fn from_kinds(kinds: impl IntoIterator<Item = ReadingKind>) -> Self {
        Self(kinds.into_iter().fold(0, |bits, kind| bits | kind.code()))
    }

    pub fn supports(self, kind: ReadingKind) -> bool {
        self.0 & kind.code() != 0
    }
}

impl From<u32> for DataTypes {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

/// Latest reading for one kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub value: f64,
    /// Unix timestamp (seconds) of the last update.
    pub last_updated: i64,
}

impl Reading {
    pub fn last_updated_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.last_updated, 0)
    }
}

/// One known sensor: identity plus user-editable presentation state and the
/// latest reading per kind.
///
/// Mutations that need to reach the settings store go through
/// [`SensorStore`](crate::registry::SensorStore); the setters here only
/// touch the in-memory state.
#[derive(Debug, Clone, PartialEq)]
pub struct Sensor {
    id: SensorId,
    name: String,
    show_in_list: bool,
    values: BTreeMap<ReadingKind, Reading>,
}

impl Sensor {
    pub fn new(id: SensorId, name: impl Into<String>, show_in_list: bool) -> Self {
        Self {
            id,
            name: name.into(),
            show_in_list,
            values: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &SensorId {
        &self.id
    }

    /// User-assigned label, empty until someone names the sensor.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Whether the sensor starts out visible in the UI list.
    pub fn show_in_list(&self) -> bool {
        self.show_in_list
    }

    pub fn set_show_in_list(&mut self, show: bool) {
        self.show_in_list = show;
    }

    /// Latest reading for `kind`, if one was ever observed.
    pub fn reading(&self, kind: ReadingKind) -> Option<Reading> {
        self.values.get(&kind).copied()
    }

    /// Replace the stored reading for `kind`. Last write wins.
    pub fn set_reading(&mut self, kind: ReadingKind, value: f64, timestamp: i64) {
        self.values.insert(
            kind,
            Reading {
                value,
                last_updated: timestamp,
            },
        );
    }

    /// All observed readings, in kind order.
    pub fn readings(&self) -> impl Iterator<Item = (ReadingKind, Reading)> + '_ {
        self.values.iter().map(|(kind, reading)| (*kind, *reading))
    }
}
