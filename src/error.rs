//! Error types
//!
//! The physics core is total and never fails. Errors only come from loading
//! configuration and from commands the machine refuses to run.

use std::fmt;

/// Configuration could not be loaded or is out of range
#[derive(Debug)]
pub enum ConfigError {
    /// Config file could not be read
    Io {
        path: String,
        source: std::io::Error,
    },
    /// Config document is not valid JSON for `MachineConfig`
    Parse(serde_json::Error),
    /// A value is outside the range the simulation supports
    InvalidValue {
        /// Field name
        name: &'static str,
        /// The rejected value
        value: f64,
        /// Human-readable description of the accepted range
        expected: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed to read config {path}: {source}"),
            Self::Parse(e) => write!(f, "invalid config: {e}"),
            Self::InvalidValue {
                name,
                value,
                expected,
            } => write!(f, "config value {name} = {value} (expected {expected})"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(e) => Some(e),
            Self::InvalidValue { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

/// A claw command was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClawError {
    /// A move or grab sequence is already in flight; commands are not queued
    Busy,
    /// Automation holds the claw, manual input is ignored until it finishes
    UserControlLocked,
}

impl fmt::Display for ClawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy => write!(f, "claw is busy with another move"),
            Self::UserControlLocked => write!(f, "claw is under automated control"),
        }
    }
}

impl std::error::Error for ClawError {}
