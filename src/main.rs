use log::info;
use parking_lot::RwLock;
use sensor_bridge::bridge::SensorBridge;
use sensor_bridge::config::Config;
use sensor_bridge::hardware::SimulatedHardware;
use sensor_bridge::registry::SensorStore;
use sensor_bridge::settings::JsonFileSettings;
use sensor_bridge::view::SensorPanel;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::mpsc;
use tokio::time::Duration;

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

#[tokio::main]
async fn main() {
    init_logger();
    info!("Starting sensor bridge");

    let config = Config::from_env();
    info!("Configuration loaded:");
    info!("  Settings file: {:?}", config.settings.path);
    info!("  Simulation interval: {}s", config.simulation.interval_secs);

    let settings = Arc::new(JsonFileSettings::new(config.settings.path.clone()));
    let store = Arc::new(RwLock::new(SensorStore::load(settings)));

    let hardware = SimulatedHardware::new();
    let (event_tx, event_rx) = mpsc::channel(64);
    let simulation = hardware.spawn_event_task(
        event_tx,
        Duration::from_secs(config.simulation.interval_secs),
    );

    let bridge = SensorBridge::start(store.clone(), &hardware, event_rx);
    let panel = SensorPanel::new(store);

    info!("Sensor bridge is running");
    info!("  - Initial view mode: {}", bridge.view_mode());
    for row in panel.rows() {
        info!(
            "  - {} name={:?} temperature={:?} humidity={:?}",
            row.id, row.name, row.temperature, row.humidity
        );
    }
    info!("  - Press Ctrl+C to exit");

    match signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal"),
        Err(e) => log::error!("Failed to listen for shutdown signal: {}", e),
    }

    simulation.abort();
    bridge.shutdown();
    info!("Sensor bridge stopped");
}
