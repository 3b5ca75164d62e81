//! Coolantctl — closed-loop thermal controller for a coolant circuit
//! serving an inverter and DC-DC converter.
//!
//! The core is a pure, synchronous step function: the state machine
//! ([`fsm`]) plus the fan-speed PID regulator ([`control`]), driven once per
//! tick with a sensor snapshot and a monotonic timestamp. Everything that
//! touches the outside world sits behind port traits ([`app::ports`]);
//! host-side adapters and the cadence driver live in [`adapters`] and
//! [`runner`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod fsm;
pub mod runner;
