//! Closed-loop regulators.

pub mod pid;
