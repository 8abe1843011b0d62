//! Diagnostic tool for inspecting the persisted sensor registry.
//!
//! Usage:
//!   cargo run --bin sensors-dump
//!   cargo run --bin sensors-dump -- --settings /path/to/settings.json

use clap::Parser;
use sensor_bridge::config;
use sensor_bridge::registry::{ReadingKind, SensorStore};
use sensor_bridge::settings::JsonFileSettings;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "sensors-dump")]
#[command(about = "Print the sensor registry persisted in a settings file")]
struct Cli {
    /// Settings file to read
    #[arg(long, env = "SENSOR_SETTINGS_PATH")]
    settings: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let path = cli.settings.unwrap_or_else(config::default_settings_path);
    println!("Settings file: {}", path.display());

    let store = SensorStore::load(Arc::new(JsonFileSettings::new(path)));
    if store.registry().is_empty() {
        println!("No sensors persisted.");
        return;
    }

    for sensor in store.registry().iter() {
        println!(
            "{} name={:?} show_in_list={}",
            sensor.id(),
            sensor.name(),
            sensor.show_in_list()
        );
        for kind in ReadingKind::ALL {
            if let Some(reading) = sensor.reading(kind) {
                let updated = reading
                    .last_updated_utc()
                    .map(|at| at.to_rfc3339())
                    .unwrap_or_else(|| reading.last_updated.to_string());
                println!("  {}: {} (updated {})", kind, reading.value, updated);
            }
        }
    }
}
