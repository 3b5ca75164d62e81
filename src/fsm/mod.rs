//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  StateTable                                                  │
//! │  ┌───────────────┬───────────┬──────────┬───────────────────┐│
//! │  │ Mode          │ on_enter  │ on_exit  │ on_update         ││
//! │  ├───────────────┼───────────┼──────────┼───────────────────┤│
//! │  │ Off           │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> ││
//! │  │ Initializing  │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> ││
//! │  │ Running       │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> ││
//! │  │ Error         │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> ││
//! │  │ EmergencyStop │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> ││
//! │  └───────────────┴───────────┴──────────┴───────────────────┘│
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** mode. If it
//! returns `Some(next)`, the engine runs `on_exit` for the current mode,
//! clears the grace-period anchors, then runs `on_enter` for the next and
//! updates the current pointer. All handlers receive `&mut FsmContext`,
//! which holds the sensor snapshot, actuator command, timing, and config.

pub mod context;
pub mod states;

use context::FsmContext;
use log::info;

// ---------------------------------------------------------------------------
// Mode identity
// ---------------------------------------------------------------------------

/// Operating mode of the coolant loop. Exactly one is active at any time.
/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Mode {
    Off = 0,
    Initializing = 1,
    Running = 2,
    Error = 3,
    EmergencyStop = 4,
}

impl Mode {
    /// Total number of modes — used to size the table array.
    pub const COUNT: usize = 5;

    /// Convert a `usize` index back to `Mode`. Panics on out-of-range in
    /// debug builds; returns `Error` in release (safe fallback).
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Off,
            1 => Self::Initializing,
            2 => Self::Running,
            3 => Self::Error,
            4 => Self::EmergencyStop,
            _ => {
                debug_assert!(false, "invalid mode index: {idx}");
                Self::Error
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each mode transition.
pub type StateActionFn = fn(&mut FsmContext);

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut FsmContext) -> Option<Mode>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single mode.
/// Stored in a fixed-size array — no heap, no `dyn`.
pub struct StateDescriptor {
    pub mode: Mode,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the state table (array of [`StateDescriptor`]) and dispatches into
/// it with a mutable [`FsmContext`] threaded through every handler call.
pub struct Fsm {
    /// Fixed-size table indexed by `Mode as usize`.
    table: [StateDescriptor; Mode::COUNT],
    /// Index of the currently active mode.
    current: usize,
    /// Monotonically increasing tick counter (wraps at u64::MAX).
    tick_count: u64,
    /// Timestamp at which the current mode was entered.
    mode_entered_at: f64,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; Mode::COUNT], initial: Mode) -> Self {
        Self {
            table,
            current: initial as usize,
            tick_count: 0,
            mode_entered_at: 0.0,
        }
    }

    /// Run the initial `on_enter` for the starting mode.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        info!("FSM starting in mode: {}", self.table[self.current].name);
        self.mode_entered_at = ctx.now;
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM by one tick.
    ///
    /// 1. Call `on_update` for the current mode.
    /// 2. If it returns `Some(next)`, execute the transition:
    ///    `on_exit(current)` → clear anchors → `on_enter(next)`.
    /// 3. Increment tick counter.
    pub fn tick(&mut self, ctx: &mut FsmContext) {
        self.tick_count += 1;

        let next = (self.table[self.current].on_update)(ctx);

        if let Some(next_mode) = next {
            self.transition(next_mode, ctx);
        }
    }

    /// Force an immediate transition (used by the shutdown path to jump to
    /// `Off` regardless of what `on_update` would return).
    pub fn force_transition(&mut self, next: Mode, ctx: &mut FsmContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    /// The current mode.
    pub fn current_mode(&self) -> Mode {
        Mode::from_index(self.current)
    }

    /// Total ticks executed since `start`.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Seconds the FSM has spent in the current mode, as of `now`.
    pub fn secs_in_mode(&self, now: f64) -> f64 {
        now - self.mode_entered_at
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_mode: Mode, ctx: &mut FsmContext) {
        let next_idx = next_mode as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        // Exit current mode
        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        // Anchors must not survive a mode change
        ctx.clear_grace_anchors();

        // Update pointer and timing
        self.current = next_idx;
        self.mode_entered_at = ctx.now;

        // Enter new mode
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
