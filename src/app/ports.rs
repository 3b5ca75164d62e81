//! Port traits — the hexagonal boundary between domain logic and hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ CoolantService (domain)
//! ```
//!
//! Driven adapters (sensor hub, pump/fan drivers, event sinks, config
//! storage) implement these traits. The
//! [`CoolantService`](super::service::CoolantService) consumes them via
//! generics, so the domain core never touches hardware directly, never
//! blocks, and never reads a real clock.

use crate::config::SystemConfig;
use crate::fsm::context::{ActuatorCommand, SensorSnapshot};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per tick to obtain the latest
/// snapshot. Implementations must return already debounced/filtered values
/// captured as of a single observation instant — the core revalidates
/// nothing.
pub trait SensorPort {
    fn read(&mut self) -> SensorSnapshot;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: translates a command set into the physical pump relay
/// and fan PWM duty cycle.
pub trait ActuatorPort {
    fn apply(&mut self, cmd: &ActuatorCommand);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`ControlEvent`](super::events::ControlEvent)s
/// through this port. Adapters decide where they go (log, console, test
/// capture); the core does not format or transmit anything itself.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::ControlEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate before persisting. Invalid ranges are
/// rejected with [`ConfigError::ValidationFailed`], not silently clamped —
/// a corrupted config file must not be able to disable a safety envelope.
pub trait ConfigPort {
    /// Load configuration. Returns [`SystemConfig::default()`] if no stored
    /// config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
