//! Application service — the hexagonal core.
//!
//! [`CoolantService`] owns the state machine and its context, and exposes a
//! clean, hardware-agnostic API. All I/O flows through port traits injected
//! at call sites, making the entire service testable with mock adapters and
//! synthetic timestamps — no real delays anywhere.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                 │     CoolantService      │
//! ActuatorPort ◀──│   FSM · Safety · PID    │
//!                 └────────────────────────┘
//! ```

use log::info;

use crate::config::SystemConfig;
use crate::fsm::context::{ActuatorCommand, FsmContext, SensorSnapshot};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, Mode};

use super::events::{ControlEvent, TelemetryData};
use super::ports::{ActuatorPort, EventSink, SensorPort};

// ───────────────────────────────────────────────────────────────
// CoolantService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct CoolantService {
    fsm: Fsm,
    ctx: FsmContext,
}

impl CoolantService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM — call [`start`](Self::start) next.
    pub fn new(config: SystemConfig) -> Self {
        let ctx = FsmContext::new(config);
        let fsm = Fsm::new(build_state_table(), Mode::Off);
        Self { fsm, ctx }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the FSM in its initial mode (Off).
    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        sink.emit(&ControlEvent::Started(self.fsm.current_mode()));
        info!("CoolantService started in {:?}", self.fsm.current_mode());
    }

    /// Forced shutdown: one unconditional transition to Off with outputs
    /// zeroed, applied to the hardware. Mirrors the ERROR/EMERGENCY recovery
    /// paths but does not wait for any condition. Call after stopping the
    /// control loop.
    pub fn shutdown(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        let prev = self.fsm.current_mode();
        self.fsm.force_transition(Mode::Off, &mut self.ctx);
        self.ctx.command = ActuatorCommand::all_off();
        hw.apply(&self.ctx.command);
        if prev != Mode::Off {
            sink.emit(&ControlEvent::ModeChanged {
                from: prev,
                to: Mode::Off,
            });
        }
        info!("CoolantService shut down");
    }

    // ── The control step (public contract of the core) ────────

    /// Advance the controller by one tick.
    ///
    /// `snapshot` is the latest sensor capture, `now` a monotonic timestamp
    /// in seconds, strictly non-decreasing across calls. Pure: no blocking,
    /// no I/O, no clock reads — all timing decisions derive from `now`.
    pub fn step(&mut self, snapshot: SensorSnapshot, now: f64) -> ActuatorCommand {
        self.ctx.now = now;
        self.ctx.sensors = snapshot;
        self.fsm.tick(&mut self.ctx);
        debug_assert!(
            self.ctx.command.is_consistent(),
            "fan speed nonzero while fan off"
        );
        self.ctx.command
    }

    /// Run one full port-driven cycle: read sensors → step → apply
    /// actuators → emit events.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`] — this avoids a double mutable borrow while keeping
    /// the port boundary explicit.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
        now: f64,
    ) {
        let prev = self.fsm.current_mode();
        let snapshot = hw.read();
        let cmd = self.step(snapshot, now);
        hw.apply(&cmd);

        let mode = self.fsm.current_mode();
        if mode != prev {
            if matches!(mode, Mode::Error | Mode::EmergencyStop) {
                if let Some(fault) = self.ctx.last_fault.take() {
                    sink.emit(&ControlEvent::FaultEscalated(fault));
                }
            }
            sink.emit(&ControlEvent::ModeChanged {
                from: prev,
                to: mode,
            });
        }
    }

    // ── Queries (read-only observability surface) ─────────────

    /// Current operating mode.
    pub fn mode(&self) -> Mode {
        self.fsm.current_mode()
    }

    /// The command emitted by the most recent tick.
    pub fn last_command(&self) -> ActuatorCommand {
        self.ctx.command
    }

    /// The snapshot supplied to the most recent tick.
    pub fn last_snapshot(&self) -> SensorSnapshot {
        self.ctx.sensors
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.fsm.tick_count()
    }

    /// Build a telemetry snapshot from the current context.
    pub fn build_telemetry(&self) -> TelemetryData {
        TelemetryData {
            mode: self.fsm.current_mode(),
            temperature_c: self.ctx.sensors.temperature_c,
            coolant_level_ok: self.ctx.sensors.coolant_level_ok,
            ignition_on: self.ctx.sensors.ignition_on,
            pump_on: self.ctx.command.pump_on,
            fan_on: self.ctx.command.fan_on,
            fan_speed_percent: self.ctx.command.fan_speed_percent,
        }
    }

    /// Clone of the live configuration.
    pub fn current_config(&self) -> SystemConfig {
        self.ctx.config.clone()
    }
}
