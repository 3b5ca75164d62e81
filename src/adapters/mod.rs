//! Driven adapters implementing the port traits.
//!
//! Only host-side adapters live here: a simulated hardware rig for the demo
//! and tests, a log-backed event sink, and a JSON file config store. Real
//! hardware adapters belong to the surrounding system, not this crate.

pub mod config_file;
pub mod log_sink;
pub mod sim;
