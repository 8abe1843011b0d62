//! JSON-file settings store.

use super::SettingsStore;
use crate::Result;
use log::warn;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings stored as a single JSON object in one file.
///
/// Reads tolerate a missing or malformed file (treated as empty); writes
/// create the parent directory on demand and rewrite the whole file.
pub struct JsonFileSettings {
    path: PathBuf,
}

impl JsonFileSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Map<String, Value> {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<Map<String, Value>>(&bytes) {
                Ok(map) => map,
                Err(e) => {
                    warn!("Failed to parse settings file {:?}: {}", self.path, e);
                    Map::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => {
                warn!("Failed to read settings file {:?}: {}", self.path, e);
                Map::new()
            }
        }
    }
}

impl SettingsStore for JsonFileSettings {
    fn get(&self, key: &str) -> Option<Value> {
        self.read_all().remove(key)
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut map = self.read_all();
        map.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(&Value::Object(map))?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let settings = JsonFileSettings::new(dir.path().join("settings.json"));
        assert_eq!(settings.get("sensors"), None);
    }

    #[test]
    fn test_set_then_get_round_trips() {
        let dir = tempdir().unwrap();
        let settings = JsonFileSettings::new(dir.path().join("settings.json"));

        settings.set("sensors", json!([{ "id": "1" }])).unwrap();
        assert_eq!(settings.get("sensors"), Some(json!([{ "id": "1" }])));
    }

    #[test]
    fn test_set_creates_missing_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("settings.json");
        let settings = JsonFileSettings::new(&path);

        settings.set("sensors", json!([])).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_set_preserves_other_keys() {
        let dir = tempdir().unwrap();
        let settings = JsonFileSettings::new(dir.path().join("settings.json"));

        settings.set("sensors", json!([1])).unwrap();
        settings.set("theme", json!("dark")).unwrap();

        assert_eq!(settings.get("sensors"), Some(json!([1])));
        assert_eq!(settings.get("theme"), Some(json!("dark")));
    }

    #[test]
    fn test_malformed_file_is_treated_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, b"not json at all").unwrap();

        let settings = JsonFileSettings::new(&path);
        assert_eq!(settings.get("sensors"), None);

        settings.set("sensors", json!([])).unwrap();
        assert_eq!(settings.get("sensors"), Some(json!([])));
    }
}
