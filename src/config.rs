//! System configuration parameters
//!
//! All tunable parameters for the coolant loop controller.
//! Values can be overridden via a JSON config file handed to the binary.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Temperature thresholds (Celsius) ---
    /// PID setpoint: the coolant temperature the fan loop regulates towards
    pub temp_target_c: f64,
    /// Over-temperature threshold; sustained exceedance escalates to ERROR
    pub temp_max_c: f64,
    /// Critical threshold; exceedance triggers immediate EMERGENCY_STOP
    pub temp_critical_c: f64,

    // --- Fan control ---
    /// Fan turns on above this temperature
    pub fan_start_temp_c: f64,
    /// Fan turns off only below `fan_start_temp_c - fan_hysteresis_c`
    pub fan_hysteresis_c: f64,

    // --- Grace periods (seconds) ---
    /// How long a low coolant level is tolerated while RUNNING
    pub low_coolant_grace_secs: f64,
    /// How long temperature above `temp_max_c` is tolerated while RUNNING
    pub over_temp_grace_secs: f64,
    /// Pump priming time before INITIALIZING completes
    pub pump_prime_secs: f64,

    // --- Fan PID gains ---
    pub pid_kp: f64,
    pub pid_ki: f64,
    pub pid_kd: f64,
    /// Anti-windup clamp applied to the integral accumulator (±limit).
    /// Fixed configuration constant, not derived from the gains.
    pub pid_integral_limit: f64,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Temperature thresholds
            temp_target_c: 65.0,
            temp_max_c: 75.0,
            temp_critical_c: 85.0,

            // Fan control
            fan_start_temp_c: 60.0,
            fan_hysteresis_c: 5.0,

            // Grace periods
            low_coolant_grace_secs: 3.0,
            over_temp_grace_secs: 10.0,
            pump_prime_secs: 2.0,

            // Fan PID
            pid_kp: 2.5,
            pid_ki: 0.5,
            pid_kd: 0.1,
            pid_integral_limit: 50.0,

            // Timing
            control_loop_interval_ms: 100, // 10 Hz
        }
    }
}

impl SystemConfig {
    /// Range-check every field. Invalid values are rejected, never clamped,
    /// so a bad config file cannot silently weaken a safety envelope
    /// (e.g. pushing `temp_critical_c` below `temp_max_c`).
    pub fn validate(&self) -> Result<(), &'static str> {
        if !(self.temp_target_c < self.temp_max_c && self.temp_max_c < self.temp_critical_c) {
            return Err("temperature thresholds must satisfy target < max < critical");
        }
        if self.fan_start_temp_c >= self.temp_max_c {
            return Err("fan_start_temp_c must be below temp_max_c");
        }
        if self.fan_hysteresis_c <= 0.0 || self.fan_hysteresis_c >= self.fan_start_temp_c {
            return Err("fan_hysteresis_c must be positive and below fan_start_temp_c");
        }
        if self.low_coolant_grace_secs <= 0.0 || self.over_temp_grace_secs <= 0.0 {
            return Err("grace periods must be positive");
        }
        if self.pump_prime_secs <= 0.0 {
            return Err("pump_prime_secs must be positive");
        }
        if self.pid_integral_limit <= 0.0 {
            return Err("pid_integral_limit must be positive");
        }
        if self.control_loop_interval_ms == 0 {
            return Err("control_loop_interval_ms must be positive");
        }
        Ok(())
    }
}
