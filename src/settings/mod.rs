//! Key-value settings storage.
//!
//! The host application owns real settings persistence; the registry only
//! needs synchronous `get`/`set` with JSON values. [`JsonFileSettings`] is
//! the on-disk implementation the daemon uses, [`MemorySettings`] backs
//! tests and hosts that persist elsewhere.

mod file;
mod memory;

pub use file::JsonFileSettings;
pub use memory::MemorySettings;

use crate::Result;

/// Synchronous key-value store for arbitrary JSON values.
pub trait SettingsStore: Send + Sync {
    /// Value stored under `key`, or `None` when absent.
    fn get(&self, key: &str) -> Option<serde_json::Value>;

    /// Store `value` under `key`, overwriting prior content.
    fn set(&self, key: &str, value: serde_json::Value) -> Result<()>;
}
