//! Concrete state handler functions and table builder.
//!
//! Each mode is defined by three plain `fn` pointers — no closures, no
//! dynamic dispatch, no heap. This is the classic embedded C FSM pattern
//! expressed in safe Rust.
//!
//! ```text
//!  OFF ──[ignition on]──▶ INITIALIZING ──[primed ≥2s]──▶ RUNNING
//!   ▲                          │                            │
//!   │                    [level low]          [level low ≥3s | temp>max ≥10s]
//!   │                          ▼                            ▼
//!   ├──[no ignition]──────── ERROR ◀──[temp < max]── EMERGENCY_STOP
//!   │                          │                            ▲
//!   └─[cleared, ignition off]──┘        RUNNING ──[temp > critical]┘
//! ```
//!
//! Safety checks run at the top of every RUNNING tick, in a fixed order:
//! low-coolant grace, critical temperature, over-temperature grace. A check
//! that trips a transition returns immediately — temperature control is
//! skipped for that tick.

use super::context::{ActuatorCommand, FsmContext};
use super::{Mode, StateDescriptor};
use crate::error::SafetyFault;
use log::{error, info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table. Called once at startup.
pub fn build_state_table() -> [StateDescriptor; Mode::COUNT] {
    [
        // Index 0 — Off
        StateDescriptor {
            mode: Mode::Off,
            name: "Off",
            on_enter: Some(off_enter),
            on_exit: None,
            on_update: off_update,
        },
        // Index 1 — Initializing
        StateDescriptor {
            mode: Mode::Initializing,
            name: "Initializing",
            on_enter: Some(initializing_enter),
            on_exit: None,
            on_update: initializing_update,
        },
        // Index 2 — Running
        StateDescriptor {
            mode: Mode::Running,
            name: "Running",
            on_enter: Some(running_enter),
            on_exit: None,
            on_update: running_update,
        },
        // Index 3 — Error
        StateDescriptor {
            mode: Mode::Error,
            name: "Error",
            on_enter: Some(error_enter),
            on_exit: Some(error_exit),
            on_update: error_update,
        },
        // Index 4 — EmergencyStop
        StateDescriptor {
            mode: Mode::EmergencyStop,
            name: "EmergencyStop",
            on_enter: Some(emergency_enter),
            on_exit: None,
            on_update: emergency_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  OFF — quiescent, waiting for ignition
// ═══════════════════════════════════════════════════════════════════════════

fn off_enter(ctx: &mut FsmContext) {
    ctx.command = ActuatorCommand::all_off();
    info!("OFF: outputs zeroed, waiting for ignition");
}

fn off_update(ctx: &mut FsmContext) -> Option<Mode> {
    ctx.command = ActuatorCommand::all_off();

    if ctx.sensors.ignition_on {
        info!("ignition ON — starting initialization");
        return Some(Mode::Initializing);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  INITIALIZING — pump priming before closed-loop control begins
// ═══════════════════════════════════════════════════════════════════════════

fn initializing_enter(ctx: &mut FsmContext) {
    ctx.pump_started_at = Some(ctx.now);
    ctx.command.pump_on = true;
    ctx.command.fan_on = false;
    ctx.command.fan_speed_percent = 0;
    info!(
        "INITIALIZING: pump priming for {:.1}s",
        ctx.config.pump_prime_secs
    );
}

fn initializing_update(ctx: &mut FsmContext) -> Option<Mode> {
    if !ctx.sensors.coolant_level_ok {
        warn!("low coolant level during initialization");
        ctx.last_fault = Some(SafetyFault::LowCoolant);
        return Some(Mode::Error);
    }

    ctx.command.pump_on = true;

    let started = match ctx.pump_started_at {
        Some(t) => t,
        None => {
            ctx.pump_started_at = Some(ctx.now);
            ctx.now
        }
    };
    if ctx.now - started >= ctx.config.pump_prime_secs {
        info!("initialization complete — system running");
        return Some(Mode::Running);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  RUNNING — safety envelope, then temperature control
// ═══════════════════════════════════════════════════════════════════════════

fn running_enter(ctx: &mut FsmContext) {
    ctx.command.pump_on = true;
    info!("RUNNING: closed-loop temperature control active");
}

fn running_update(ctx: &mut FsmContext) -> Option<Mode> {
    if !ctx.sensors.ignition_on {
        info!("ignition OFF — shutting down");
        return Some(Mode::Off);
    }

    if let Some(next) = check_safety(ctx) {
        return Some(next);
    }

    control_temperature(ctx);
    None
}

/// Safety checks, in fixed order. Returns the escalation target if one trips.
fn check_safety(ctx: &mut FsmContext) -> Option<Mode> {
    let temp = ctx.sensors.temperature_c;

    // (1) Coolant level, with grace period
    if ctx.sensors.coolant_level_ok {
        ctx.low_level_since = None;
    } else {
        let since = match ctx.low_level_since {
            Some(t) => t,
            None => {
                warn!("coolant level low — grace timer armed");
                ctx.low_level_since = Some(ctx.now);
                ctx.now
            }
        };
        if ctx.now - since >= ctx.config.low_coolant_grace_secs {
            error!(
                "coolant level low for >={:.1}s",
                ctx.config.low_coolant_grace_secs
            );
            ctx.last_fault = Some(SafetyFault::LowCoolant);
            return Some(Mode::Error);
        }
    }

    // (2) Critical temperature — no grace period
    if temp > ctx.config.temp_critical_c {
        error!(
            "CRITICAL: temperature {temp:.1}°C exceeds {:.1}°C limit",
            ctx.config.temp_critical_c
        );
        ctx.last_fault = Some(SafetyFault::CriticalTemperature);
        return Some(Mode::EmergencyStop);
    }

    // (3) Over-temperature, with grace period
    if temp > ctx.config.temp_max_c {
        let since = match ctx.over_temp_since {
            Some(t) => t,
            None => {
                warn!("temperature {temp:.1}°C above max — grace timer armed");
                ctx.over_temp_since = Some(ctx.now);
                ctx.now
            }
        };
        if ctx.now - since >= ctx.config.over_temp_grace_secs {
            error!(
                "over-temperature for >={:.1}s",
                ctx.config.over_temp_grace_secs
            );
            ctx.last_fault = Some(SafetyFault::OverTemperature);
            return Some(Mode::Error);
        }
    } else {
        ctx.over_temp_since = None;
    }

    None
}

/// Pump always on while RUNNING; fan gated by hysteresis, speed from the PID.
fn control_temperature(ctx: &mut FsmContext) {
    ctx.command.pump_on = true;

    let temp = ctx.sensors.temperature_c;
    let now = ctx.now;

    if temp > ctx.config.fan_start_temp_c {
        ctx.command.fan_on = true;
        ctx.command.fan_speed_percent = ctx.fan_pid.update(temp, now);
    } else if temp < ctx.config.fan_start_temp_c - ctx.config.fan_hysteresis_c {
        // Hysteresis: only stop the fan well below the start threshold
        if ctx.command.fan_on {
            ctx.fan_pid.reset();
        }
        ctx.command.fan_on = false;
        ctx.command.fan_speed_percent = 0;
    }
    // Inside the dead band the fan holds its previous state and speed.
}

// ═══════════════════════════════════════════════════════════════════════════
//  ERROR — actuators disabled until the fault condition clears
// ═══════════════════════════════════════════════════════════════════════════

fn error_enter(ctx: &mut FsmContext) {
    ctx.command = ActuatorCommand::all_off();
    warn!("ERROR: all actuators disabled");
}

fn error_exit(ctx: &mut FsmContext) {
    info!("error cleared — resuming");
    ctx.last_fault = None;
}

fn error_update(ctx: &mut FsmContext) -> Option<Mode> {
    ctx.command = ActuatorCommand::all_off();

    let cleared =
        ctx.sensors.coolant_level_ok && ctx.sensors.temperature_c < ctx.config.temp_max_c;
    if cleared {
        if ctx.sensors.ignition_on {
            info!("error cleared — restarting system");
            return Some(Mode::Initializing);
        }
        return Some(Mode::Off);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  EMERGENCY_STOP — maximum cooling, pump off
// ═══════════════════════════════════════════════════════════════════════════

fn emergency_enter(ctx: &mut FsmContext) {
    ctx.command.pump_on = false;
    ctx.command.fan_on = true;
    ctx.command.fan_speed_percent = 100;
    error!("EMERGENCY_STOP: fan forced to 100%, pump off");
}

fn emergency_update(ctx: &mut FsmContext) -> Option<Mode> {
    ctx.command.pump_on = false;
    ctx.command.fan_on = true;
    ctx.command.fan_speed_percent = 100;

    if ctx.sensors.temperature_c < ctx.config.temp_max_c {
        info!("temperature reduced — attempting recovery");
        return Some(Mode::Error);
    }

    None
}
