//! Error types for the SPI slave transport
//!
//! Errors are organized by domain:
//! - [`ConfigError`]: Initialization and configuration failures
//! - [`IoError`]: Queue-level outcomes of the fallible `try_*` calls
//!
//! The lossy link policy means the plain `submit`/`receive` calls never
//! return an error; these types only surface through bring-up and the
//! explicit `try_submit`/`try_receive` variants.

// =============================================================================
// Configuration Errors
// =============================================================================

/// Configuration and initialization errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Transport already initialized
    AlreadyInitialized,
    /// Pin cannot carry the requested SPI signal on this instance
    InvalidPin,
    /// Two signals were assigned to the same pin
    PinConflict,
    /// Baud rate is zero or cannot be reached from the peripheral clock
    InvalidBaudRate,
    /// No unclaimed DMA channel (or the requested channel is taken)
    NoFreeDmaChannel,
    /// Peripheral reset did not complete in time
    ResetFailed,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::AlreadyInitialized => "already initialized",
            ConfigError::InvalidPin => "pin not valid for SPI function",
            ConfigError::PinConflict => "pin assigned twice",
            ConfigError::InvalidBaudRate => "baud rate out of range",
            ConfigError::NoFreeDmaChannel => "no free DMA channel",
            ConfigError::ResetFailed => "peripheral reset failed",
        }
    }
}

// =============================================================================
// I/O Errors
// =============================================================================

/// Queue-level errors reported by the fallible API variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// Transport has not been initialized
    NotInitialized,
    /// Outbound queue full, frame dropped
    QueueFull,
    /// No inbound frame queued
    NoFrame,
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IoError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            IoError::NotInitialized => "transport not initialized",
            IoError::QueueFull => "outbound queue full",
            IoError::NoFrame => "no frame available",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// Wraps all domain-specific errors.
///
/// ```ignore
/// match slave.initialize(config, &mut delay) {
///     Err(Error::Config(ConfigError::NoFreeDmaChannel)) => { /* ... */ }
///     Err(e) => { /* ... */ }
///     Ok(()) => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration error
    Config(ConfigError),
    /// I/O error
    Io(IoError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Io(e) => write!(f, "io: {}", e.as_str()),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::Io(e)
    }
}

/// Result type alias for transport operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for queue operations
pub type IoResult<T> = core::result::Result<T, IoError>;

// =============================================================================
// Unit Tests
// =============================================================================
