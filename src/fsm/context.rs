//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the single struct that state handlers read from and
//! write to. It contains the latest sensor snapshot, the actuator command
//! being assembled for this tick, the monotonic timestamp supplied by the
//! caller, configuration, the fan regulator, and the grace-period anchors.
//! Think of it as the "blackboard" in a blackboard architecture.

use crate::config::SystemConfig;
use crate::control::pid::FanRegulator;
use crate::error::SafetyFault;

// ---------------------------------------------------------------------------
// Sensor snapshot (read-only to state handlers; written by the service)
// ---------------------------------------------------------------------------

/// A point-in-time snapshot of every sensor in the coolant circuit.
///
/// Captured atomically by the caller before each tick; the core assumes all
/// three fields are consistent as of one observation instant and performs no
/// filtering or freshness checks of its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSnapshot {
    /// Coolant temperature (°C).
    pub temperature_c: f64,
    /// Level switch: true = sufficient coolant.
    pub coolant_level_ok: bool,
    /// Vehicle ignition signal.
    pub ignition_on: bool,
}

impl Default for SensorSnapshot {
    /// Benign synthetic snapshot assumed until the first real one arrives:
    /// moderate temperature, coolant OK, ignition off.
    fn default() -> Self {
        Self {
            temperature_c: 25.0,
            coolant_level_ok: true,
            ignition_on: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Actuator command (written by state handlers; consumed by the adapter)
// ---------------------------------------------------------------------------

/// The command set emitted by one control tick.
///
/// Invariant: `fan_speed_percent == 0` whenever `fan_on == false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActuatorCommand {
    /// Coolant pump relay.
    pub pump_on: bool,
    /// Fan relay.
    pub fan_on: bool,
    /// Fan PWM duty (0–100).
    pub fan_speed_percent: u8,
}

impl ActuatorCommand {
    /// All actuators off — safe default.
    pub fn all_off() -> Self {
        Self::default()
    }

    /// True if the fan-off/zero-speed invariant holds.
    pub fn is_consistent(&self) -> bool {
        self.fan_on || self.fan_speed_percent == 0
    }
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct FsmContext {
    // -- Timing --
    /// Monotonic timestamp (seconds) supplied by the caller for this tick.
    pub now: f64,

    // -- Sensor data --
    /// Latest sensor readings. Updated before each FSM tick.
    pub sensors: SensorSnapshot,

    // -- Actuator outputs --
    /// Command to be applied to actuators after the FSM tick.
    pub command: ActuatorCommand,

    // -- Configuration --
    /// System configuration (tunable parameters).
    pub config: SystemConfig,

    // -- Fan regulation --
    /// PID regulator consulted by the RUNNING handler. Handlers only call
    /// `update`/`reset`; its internals stay private to the regulator.
    pub fan_pid: FanRegulator,

    // -- Grace-period anchors --
    /// When the pump was last commanded on for priming (INITIALIZING entry).
    pub pump_started_at: Option<f64>,
    /// When the level switch first read low while RUNNING.
    pub low_level_since: Option<f64>,
    /// When temperature first exceeded `temp_max_c` while RUNNING.
    pub over_temp_since: Option<f64>,

    /// The safety condition behind the most recent escalation, for event
    /// reporting. Taken (and cleared) by the service after the tick.
    pub last_fault: Option<SafetyFault>,
}

impl FsmContext {
    /// Create a new context with the given configuration.
    pub fn new(config: SystemConfig) -> Self {
        let fan_pid = FanRegulator::from_config(&config);
        Self {
            now: 0.0,
            sensors: SensorSnapshot::default(),
            command: ActuatorCommand::all_off(),
            config,
            fan_pid,
            pump_started_at: None,
            low_level_since: None,
            over_temp_since: None,
            last_fault: None,
        }
    }

    /// Clear every grace-period anchor. Invoked by the engine on each mode
    /// transition so a stale anchor can never leak into a later RUNNING
    /// period.
    pub fn clear_grace_anchors(&mut self) {
        self.pump_started_at = None;
        self.low_level_since = None;
        self.over_temp_since = None;
    }
}
