//! PID fan-speed regulator
//!
//! Proportional-integral-derivative controller that converts a coolant
//! temperature error into a fan speed command (0–100 %). Timing is driven
//! entirely by the monotonic `now` timestamp passed into [`update`], so the
//! regulator is a pure function of its inputs and needs no real clock.
//!
//! [`update`]: FanRegulator::update

use crate::config::SystemConfig;

/// PID regulator for fan speed.
///
/// The integral accumulator is clamped to `±integral_limit` after every
/// accumulation — anti-windup on the accumulator itself, not the output.
/// A long excursion below the setpoint therefore cannot bank up residual
/// windup that would delay the response when temperature later rises.
pub struct FanRegulator {
    kp: f64,
    ki: f64,
    kd: f64,
    setpoint: f64,
    integral_limit: f64,
    integral: f64,
    prev_error: f64,
    prev_sample: Option<f64>,
}

impl FanRegulator {
    pub fn new(kp: f64, ki: f64, kd: f64, setpoint: f64, integral_limit: f64) -> Self {
        Self {
            kp,
            ki,
            kd,
            setpoint,
            integral_limit,
            integral: 0.0,
            prev_error: 0.0,
            prev_sample: None,
        }
    }

    /// Build a regulator with the gains and setpoint from `config`.
    pub fn from_config(config: &SystemConfig) -> Self {
        Self::new(
            config.pid_kp,
            config.pid_ki,
            config.pid_kd,
            config.temp_target_c,
            config.pid_integral_limit,
        )
    }

    /// Compute the fan speed for the given temperature at time `now`
    /// (monotonic seconds).
    ///
    /// `prev_error` and the sample time update unconditionally on every
    /// call, even if the caller later suppresses the fan output.
    pub fn update(&mut self, temperature_c: f64, now: f64) -> u8 {
        // First call after construction or reset has no sample history.
        let dt = self.prev_sample.map_or(0.0, |t| now - t);
        let error = temperature_c - self.setpoint;

        // Proportional
        let p = self.kp * error;

        // Integral with anti-windup clamp on the accumulator
        self.integral =
            (self.integral + error * dt).clamp(-self.integral_limit, self.integral_limit);
        let i = self.ki * self.integral;

        // Derivative; dt <= 0 covers the first call and clock non-monotonicity
        let d = if dt > 0.0 {
            self.kd * (error - self.prev_error) / dt
        } else {
            0.0
        };

        self.prev_error = error;
        self.prev_sample = Some(now);

        // Truncate toward zero, then clamp to the duty range
        ((p + i + d) as i64).clamp(0, 100) as u8
    }

    /// Clear accumulator, error history, and sample time.
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.prev_error = 0.0;
        self.prev_sample = None;
    }
}
