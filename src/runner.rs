//! Fixed-cadence control loop driver.
//!
//! The only place in the crate that sleeps or reads a real clock. The core
//! itself is a pure step function; this runner owns the cadence (nominally
//! 10 Hz), derives the monotonic `now` timestamp from a single origin
//! `Instant`, and schedules the next wake by absolute deadline so the period
//! stays consistent regardless of per-tick processing time.

use std::thread;
use std::time::{Duration, Instant};

use log::debug;

use crate::app::ports::{ActuatorPort, EventSink, SensorPort};
use crate::app::service::CoolantService;
use crate::config::SystemConfig;

/// Drives a [`CoolantService`] at a fixed period.
pub struct ControlLoop {
    period: Duration,
    origin: Instant,
}

impl ControlLoop {
    /// Period taken from `config.control_loop_interval_ms`.
    pub fn new(config: &SystemConfig) -> Self {
        Self::with_period(Duration::from_millis(u64::from(
            config.control_loop_interval_ms,
        )))
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            origin: Instant::now(),
        }
    }

    /// Seconds elapsed since this runner was created. Monotonic; suitable as
    /// the `now` argument of [`CoolantService::step`].
    pub fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    /// Run `ticks` control cycles, sleeping between them.
    pub fn run(
        &mut self,
        service: &mut CoolantService,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
        ticks: u64,
    ) {
        let mut deadline = Instant::now();
        for _ in 0..ticks {
            service.tick(hw, sink, self.now());

            deadline += self.period;
            let now = Instant::now();
            if deadline > now {
                thread::sleep(deadline - now);
            } else {
                // Overran the period; skip sleeping and realign
                debug!("control tick overran its period");
                deadline = now;
            }
        }
    }
}
