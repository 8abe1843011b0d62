//! In-memory settings store.

use super::SettingsStore;
use crate::Result;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// HashMap-backed settings store.
///
/// Counts writes, which lets tests assert exactly how often the registry
/// persisted itself.
#[derive(Default)]
pub struct MemorySettings {
    map: RwLock<HashMap<String, Value>>,
    writes: AtomicUsize,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set` calls since creation.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<Value> {
        self.map.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        self.map.write().insert(key.to_string(), value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_set_and_write_count() {
        let settings = MemorySettings::new();
        assert_eq!(settings.get("sensors"), None);
        assert_eq!(settings.write_count(), 0);

        settings.set("sensors", json!([1, 2])).unwrap();
        settings.set("sensors", json!([3])).unwrap();

        assert_eq!(settings.get("sensors"), Some(json!([3])));
        assert_eq!(settings.write_count(), 2);
    }
}
