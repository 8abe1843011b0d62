//! Persisted wire format for the sensor registry.
//!
//! The settings store keeps the registry under one key as an array of
//! records. `showInList` is a string-typed boolean on the wire (the host
//! settings layer stringifies it); it is parsed into a real boolean
//! immediately on load and written back as `"true"`/`"false"` on save.

use crate::registry::sensor::{ReadingKind, Sensor, SensorId};
use crate::registry::store::Registry;
use log::warn;
use serde::{Deserialize, Serialize};

/// One persisted sensor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorRecord {
    pub protocol: String,
    pub model: String,
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "showInList", default, with = "string_bool")]
    pub show_in_list: bool,
    #[serde(default)]
    pub values: Vec<ValueRecord>,
}

/// Latest reading for one kind, as persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueRecord {
    /// Numeric reading-kind code.
    #[serde(rename = "type")]
    pub kind: u32,
    pub value: f64,
    #[serde(rename = "lastUpdated")]
    pub last_updated: i64,
}

/// Serialize the registry to the settings value format.
///
/// Only the latest reading per kind is written; history never reaches the
/// settings store.
pub fn encode(registry: &Registry) -> crate::Result<serde_json::Value> {
    let records: Vec<SensorRecord> = registry.iter().map(sensor_record).collect();
    Ok(serde_json::to_value(records)?)
}

/// Rebuild a registry from the persisted settings value.
///
/// Records with unknown reading-kind codes keep the sensor but skip that
/// value; duplicate identities keep the first occurrence.
pub fn decode(value: &serde_json::Value) -> crate::Result<Registry> {
    let records: Vec<SensorRecord> = serde_json::from_value(value.clone())?;

    let mut registry = Registry::new();
    for record in records {
        let sensor_id = SensorId::new(record.protocol, record.model, record.id);
        let mut sensor = Sensor::new(sensor_id.clone(), record.name, record.show_in_list);
        for value in record.values {
            match ReadingKind::from_code(value.kind) {
                Some(kind) => sensor.set_reading(kind, value.value, value.last_updated),
                None => warn!(
                    "Skipping unknown reading kind {} for sensor {}",
                    value.kind, sensor_id
                ),
            }
        }
        if !registry.insert(sensor) {
            warn!("Skipping duplicate persisted sensor {}", sensor_id);
        }
    }
    Ok(registry)
}

fn sensor_record(sensor: &Sensor) -> SensorRecord {
    let values = sensor
        .readings()
        .map(|(kind, reading)| ValueRecord {
            kind: kind.code(),
            value: reading.value,
            last_updated: reading.last_updated,
        })
        .collect();

    SensorRecord {
        protocol: sensor.id().protocol.clone(),
        model: sensor.id().model.clone(),
        id: sensor.id().id.clone(),
        name: sensor.name().to_string(),
        show_in_list: sensor.show_in_list(),
        values,
    }
}

mod string_bool {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "true" } else { "false" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bool(bool),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Bool(value) => value,
            Raw::Text(text) => text == "true",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry_with_one_sensor() -> Registry {
        let mut registry = Registry::new();
        let mut sensor = Sensor::new(SensorId::new("proto1", "modelA", "id1"), "Greenhouse", true);
        sensor.set_reading(ReadingKind::Temperature, 21.5, 1000);
        sensor.set_reading(ReadingKind::Humidity, 48.0, 1010);
        registry.insert(sensor);
        registry
    }

    #[test]
    fn test_encode_writes_wire_field_names() {
        let encoded = encode(&registry_with_one_sensor()).unwrap();

        let record = &encoded[0];
        assert_eq!(record["protocol"], "proto1");
        assert_eq!(record["model"], "modelA");
        assert_eq!(record["id"], "id1");
        assert_eq!(record["name"], "Greenhouse");
        assert_eq!(record["showInList"], "true");
        assert_eq!(record["values"][0]["type"], 1);
        assert_eq!(record["values"][0]["value"], 21.5);
        assert_eq!(record["values"][0]["lastUpdated"], 1000);
        assert_eq!(record["values"][1]["type"], 2);
    }

    #[test]
    fn test_show_in_list_is_a_string_on_the_wire() {
        let encoded = encode(&registry_with_one_sensor()).unwrap();
        assert_eq!(encoded[0]["showInList"], json!("true"));

        let mut registry = Registry::new();
        registry.insert(Sensor::new(SensorId::new("p", "m", "1"), "", false));
        let encoded = encode(&registry).unwrap();
        assert_eq!(encoded[0]["showInList"], json!("false"));
    }

    #[test]
    fn test_decode_accepts_string_and_native_booleans() {
        let value = json!([
            { "protocol": "p", "model": "m", "id": "1", "name": "a", "showInList": "true", "values": [] },
            { "protocol": "p", "model": "m", "id": "2", "name": "b", "showInList": "false", "values": [] },
            { "protocol": "p", "model": "m", "id": "3", "name": "c", "showInList": true, "values": [] },
        ]);

        let registry = decode(&value).unwrap();
        assert!(registry.find(&SensorId::new("p", "m", "1")).unwrap().show_in_list());
        assert!(!registry.find(&SensorId::new("p", "m", "2")).unwrap().show_in_list());
        assert!(registry.find(&SensorId::new("p", "m", "3")).unwrap().show_in_list());
    }

    #[test]
    fn test_decode_defaults_missing_fields() {
        let value = json!([{ "protocol": "p", "model": "m", "id": "1" }]);

        let registry = decode(&value).unwrap();
        let sensor = registry.find(&SensorId::new("p", "m", "1")).unwrap();
        assert_eq!(sensor.name(), "");
        assert!(!sensor.show_in_list());
        assert_eq!(sensor.readings().count(), 0);
    }

    #[test]
    fn test_decode_skips_unknown_kind_codes() {
        let value = json!([{
            "protocol": "p", "model": "m", "id": "1", "name": "", "showInList": "false",
            "values": [
                { "type": 99, "value": 1.0, "lastUpdated": 10 },
                { "type": 2, "value": 55.0, "lastUpdated": 20 },
            ],
        }]);

        let registry = decode(&value).unwrap();
        let sensor = registry.find(&SensorId::new("p", "m", "1")).unwrap();
        assert_eq!(sensor.reading(ReadingKind::Temperature), None);
        assert_eq!(sensor.reading(ReadingKind::Humidity).unwrap().value, 55.0);
    }

    #[test]
    fn test_decode_keeps_first_of_duplicate_identities() {
        let value = json!([
            { "protocol": "p", "model": "m", "id": "1", "name": "first" },
            { "protocol": "p", "model": "m", "id": "1", "name": "second" },
        ]);

        let registry = decode(&value).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.find(&SensorId::new("p", "m", "1")).unwrap().name(), "first");
    }

    #[test]
    fn test_decode_rejects_non_array_blob() {
        assert!(decode(&json!({ "not": "an array" })).is_err());
        assert!(decode(&json!("sensors")).is_err());
    }

    #[test]
    fn test_round_trip_preserves_latest_readings() {
        let encoded = encode(&registry_with_one_sensor()).unwrap();
        let decoded = decode(&encoded).unwrap();

        let sensor = decoded.find(&SensorId::new("proto1", "modelA", "id1")).unwrap();
        assert_eq!(sensor.name(), "Greenhouse");
        assert!(sensor.show_in_list());
        assert_eq!(sensor.reading(ReadingKind::Temperature).unwrap().value, 21.5);
        assert_eq!(sensor.reading(ReadingKind::Humidity).unwrap().last_updated, 1010);
    }
}
