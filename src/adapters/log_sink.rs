//! Event sink that forwards every control event to the `log` facade.

use log::{info, warn};

use crate::app::events::ControlEvent;
use crate::app::ports::EventSink;

/// Logs each event at a severity matching its weight.
pub struct LogEventSink;

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &ControlEvent) {
        match event {
            ControlEvent::Started(mode) => info!("event: started in {mode:?}"),
            ControlEvent::ModeChanged { from, to } => {
                info!("event: mode {from:?} -> {to:?}");
            }
            ControlEvent::FaultEscalated(fault) => warn!("event: fault escalated: {fault}"),
            ControlEvent::Telemetry(t) => info!(
                "telemetry: mode={:?} temp={:.1}°C pump={} fan={} speed={}%",
                t.mode, t.temperature_c, t.pump_on, t.fan_on, t.fan_speed_percent
            ),
        }
    }
}
