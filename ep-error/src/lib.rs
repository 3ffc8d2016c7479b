//! Unified error handling for ev3port
//!
//! This crate provides the single error type used by every ev3port module.
//! Each variant belongs to one [`ErrorKind`], so callers can turn failures into
//! operational alerts ("sensor on port S2 failed to reset") without matching on
//! payloads.

use std::fmt;
use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::time::Duration;

/// Result type alias using SensorError
pub type Result<T> = std::result::Result<T, SensorError>;

/// The file operation that failed, kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    Open,
    Read,
    Write,
    Seek,
    Flush,
    List,
}

impl fmt::Display for IoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            IoOp::Open => "open",
            IoOp::Read => "read",
            IoOp::Write => "write",
            IoOp::Seek => "seek",
            IoOp::Flush => "flush",
            IoOp::List => "list",
        };
        f.write_str(op)
    }
}

/// Flat classification of [`SensorError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    DeviceNotFound,
    Io,
    Parse,
    ResetTimeout,
    OutOfRange,
    NotOpen,
}

/// Unified error type for all ev3port operations
#[derive(thiserror::Error, Debug)]
pub enum SensorError {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Invalid port {0} (must be 1-4)")]
    InvalidPort(u8),

    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidConfig {
        field: String,
        reason: String,
    },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Device Discovery Errors
    // ============================================================================
    #[error("No such sensor on Port S{port}")]
    DeviceNotFound {
        port: u8,
    },

    // ============================================================================
    // I/O and Parsing Errors
    // ============================================================================
    #[error("Failed to {op} {path}: {source}")]
    Io {
        op: IoOp,
        path: PathBuf,
        source: io::Error,
    },

    #[error("Failed to parse integer from {path}: '{content}': {source}")]
    Parse {
        path: PathBuf,
        content: String,
        source: ParseIntError,
    },

    // ============================================================================
    // Recovery Errors
    // ============================================================================
    #[error(
        "Unable to reset sensor on Port S{port}: {found} of {expected} sensors present after {}ms",
        .waited.as_millis()
    )]
    ResetTimeout {
        port: u8,
        expected: usize,
        found: usize,
        waited: Duration,
    },

    // ============================================================================
    // Usage Errors
    // ============================================================================
    #[error("Value index {index} out of range ({count} values bound)")]
    ValueIndexOutOfRange {
        index: usize,
        count: usize,
    },

    #[error("Sensor on Port S{port} is not open")]
    NotOpen {
        port: u8,
    },
}

impl SensorError {
    /// Create an I/O error carrying the failing operation and path
    pub fn io(op: IoOp, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidPort(_) | Self::InvalidConfig { .. } | Self::JsonParse(_) => {
                ErrorKind::Configuration
            }
            Self::DeviceNotFound { .. } => ErrorKind::DeviceNotFound,
            Self::Io { .. } => ErrorKind::Io,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::ResetTimeout { .. } => ErrorKind::ResetTimeout,
            Self::ValueIndexOutOfRange { .. } => ErrorKind::OutOfRange,
            Self::NotOpen { .. } => ErrorKind::NotOpen,
        }
    }
}
