//! Simulated hardware rig.
//!
//! Implements [`SensorPort`] and [`ActuatorPort`] against plain fields so
//! the demo binary and the integration tests can script sensor values and
//! inspect every command the controller applied. No timing lives here —
//! the rig is as pure as the core it feeds.

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::fsm::context::{ActuatorCommand, SensorSnapshot};

/// Scriptable sensor source + recording actuator sink.
pub struct SimulatedRig {
    temperature_c: f64,
    coolant_level_ok: bool,
    ignition_on: bool,
    /// Every command applied, in order.
    pub applied: Vec<ActuatorCommand>,
}

impl SimulatedRig {
    pub fn new() -> Self {
        let benign = SensorSnapshot::default();
        Self {
            temperature_c: benign.temperature_c,
            coolant_level_ok: benign.coolant_level_ok,
            ignition_on: benign.ignition_on,
            applied: Vec::new(),
        }
    }

    /// Set all three sensor values at once (one observation instant).
    pub fn set_sensors(&mut self, temperature_c: f64, coolant_level_ok: bool, ignition_on: bool) {
        self.temperature_c = temperature_c;
        self.coolant_level_ok = coolant_level_ok;
        self.ignition_on = ignition_on;
    }

    pub fn set_temperature(&mut self, temperature_c: f64) {
        self.temperature_c = temperature_c;
    }

    pub fn set_coolant_level(&mut self, ok: bool) {
        self.coolant_level_ok = ok;
    }

    pub fn set_ignition(&mut self, on: bool) {
        self.ignition_on = on;
    }

    /// The most recently applied command, if any tick has run.
    pub fn last_applied(&self) -> Option<&ActuatorCommand> {
        self.applied.last()
    }
}

impl Default for SimulatedRig {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for SimulatedRig {
    fn read(&mut self) -> SensorSnapshot {
        SensorSnapshot {
            temperature_c: self.temperature_c,
            coolant_level_ok: self.coolant_level_ok,
            ignition_on: self.ignition_on,
        }
    }
}

impl ActuatorPort for SimulatedRig {
    fn apply(&mut self, cmd: &ActuatorCommand) {
        self.applied.push(*cmd);
    }
}
