//! Coolantctl demo binary.
//!
//! Drives the controller against a simulated rig through the same scenario a
//! bench test would run: ignition on, warm-up, steady state, a low-coolant
//! excursion inside the grace period, an over-critical spike, recovery, and
//! ignition off. Pass a JSON config file path as the first argument to
//! override the defaults.

use anyhow::{Context, Result};
use log::info;

use coolantctl::adapters::config_file::FileConfigStore;
use coolantctl::adapters::log_sink::LogEventSink;
use coolantctl::adapters::sim::SimulatedRig;
use coolantctl::app::events::ControlEvent;
use coolantctl::app::ports::{ConfigPort, EventSink};
use coolantctl::app::service::CoolantService;
use coolantctl::config::SystemConfig;
use coolantctl::runner::ControlLoop;

fn load_config() -> Result<SystemConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let store = FileConfigStore::new(&path);
            let config = store
                .load()
                .map_err(|e| anyhow::anyhow!("{e}"))
                .with_context(|| format!("loading config from {path}"))?;
            info!("config loaded from {path}");
            Ok(config)
        }
        None => Ok(SystemConfig::default()),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::INFO)
        .init();

    info!("coolantctl v{} — simulated demo", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let ticks_per_sec = 1000 / u64::from(config.control_loop_interval_ms).max(1);
    let mut service = CoolantService::new(config.clone());
    let mut rig = SimulatedRig::new();
    let mut sink = LogEventSink;
    let mut runner = ControlLoop::new(&config);

    service.start(&mut sink);

    // Scenario segments: (description, temperature, level ok, ignition, seconds)
    let scenario: &[(&str, f64, bool, bool, u64)] = &[
        ("ignition ON, cold coolant", 25.0, true, true, 3),
        ("warming through fan start", 62.0, true, true, 2),
        ("approaching target", 68.0, true, true, 3),
        ("low coolant level (within grace)", 68.0, false, true, 2),
        ("coolant level restored", 65.0, true, true, 2),
        ("critical over-temperature", 88.0, true, true, 2),
        ("cooling down", 70.0, true, true, 2),
        ("recovered, steady", 65.0, true, true, 3),
        ("ignition OFF", 65.0, true, false, 2),
    ];

    for &(label, temp, level, ignition, secs) in scenario {
        info!("--- {label} ---");
        rig.set_sensors(temp, level, ignition);
        runner.run(&mut service, &mut rig, &mut sink, secs * ticks_per_sec);
        sink.emit(&ControlEvent::Telemetry(service.build_telemetry()));
    }

    service.shutdown(&mut rig, &mut sink);
    info!(
        "demo complete: {} ticks, {} commands applied",
        service.tick_count(),
        rig.applied.len()
    );
    Ok(())
}
