//! Error types for the robot program.
//!
//! The control cycle itself has no recoverable errors: inputs are always
//! available and out-of-range sensor readings are clamped by the state
//! machines.  Errors exist only at the edges (configuration, device
//! setup, scenario files) and all of them funnel into [`Error`].
//!
//! Safety flags are not errors.  They are tracked in a bitfield by the
//! safety supervisor and reported through telemetry.

use core::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum Error {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("device: {0}")]
    Device(#[from] DeviceError),
    #[error("scenario: {0}")]
    Scenario(#[from] ScenarioError),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config file exists (first run).
    #[error("config not found")]
    NotFound,
    /// The file is not valid TOML or does not match the schema.
    #[error("failed to parse config: {0}")]
    Parse(String),
    /// A field failed range validation.
    #[error("validation failed: {0}")]
    ValidationFailed(&'static str),
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Device errors
// ---------------------------------------------------------------------------

/// A digital pin read or write failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeviceError {
    #[error("pin read failed on {0}")]
    PinRead(&'static str),
    #[error("pin write failed on {0}")]
    PinWrite(&'static str),
}

// ---------------------------------------------------------------------------
// Scenario errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Safety flags
// ---------------------------------------------------------------------------

/// Conditions tracked by the safety supervisor.  Accumulated in a
/// bitfield so several can be active at once and cleared individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SafetyFault {
    /// Collector and shooter/indexer both commanded non-zero.
    CollectorShooterOverlap = 0b0000_0001,
    /// Raise requested with the arm at its upper voltage limit.
    ArmUpperLimit = 0b0000_0010,
    /// Lower requested with the arm at its lower voltage limit.
    ArmLowerLimit = 0b0000_0100,
    /// Drive outputs were not refreshed within the expiration window.
    DriveWatchdogExpired = 0b0000_1000,
}

impl SafetyFault {
    pub const ALL: [Self; 4] = [
        Self::CollectorShooterOverlap,
        Self::ArmUpperLimit,
        Self::ArmLowerLimit,
        Self::DriveWatchdogExpired,
    ];

    pub const fn mask(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for SafetyFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CollectorShooterOverlap => write!(f, "collector/shooter overlap"),
            Self::ArmUpperLimit => write!(f, "arm at upper limit"),
            Self::ArmLowerLimit => write!(f, "arm at lower limit"),
            Self::DriveWatchdogExpired => write!(f, "drive watchdog expired"),
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
