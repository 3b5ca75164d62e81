//! Domain fault taxonomy.
//!
//! There is no exception-style error propagation inside the control core —
//! every anomaly is a domain state, not a fault to bubble up. The variants
//! here exist so that event sinks and logs can name *why* the state machine
//! escalated. All variants are `Copy` so they pass through the event path
//! without allocation.

use core::fmt;

/// The safety condition that caused an escalation out of RUNNING.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafetyFault {
    /// Coolant level switch read low beyond its grace period.
    LowCoolant,
    /// Coolant temperature exceeded the over-temperature threshold
    /// beyond its grace period.
    OverTemperature,
    /// Coolant temperature exceeded the critical threshold.
    /// No grace period — escalates immediately.
    CriticalTemperature,
}

impl fmt::Display for SafetyFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LowCoolant => write!(f, "coolant level low"),
            Self::OverTemperature => write!(f, "over temperature"),
            Self::CriticalTemperature => write!(f, "critical temperature"),
        }
    }
}
