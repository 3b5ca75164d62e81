//! Outbound application events.
//!
//! The [`CoolantService`](super::service::CoolantService) emits these through
//! the [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them — log to console, feed a telemetry
//! collector, record in a test.

use crate::error::SafetyFault;
use crate::fsm::Mode;

/// Structured events emitted by the control core.
#[derive(Debug, Clone)]
pub enum ControlEvent {
    /// The service has started (carries initial mode).
    Started(Mode),

    /// The state machine transitioned between modes.
    ModeChanged { from: Mode, to: Mode },

    /// A safety condition escalated the state machine out of normal
    /// operation.
    FaultEscalated(SafetyFault),

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone)]
pub struct TelemetryData {
    pub mode: Mode,
    pub temperature_c: f64,
    pub coolant_level_ok: bool,
    pub ignition_on: bool,
    pub pump_on: bool,
    pub fan_on: bool,
    pub fan_speed_percent: u8,
}
