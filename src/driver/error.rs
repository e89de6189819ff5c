//! Error types for the ENC28J60 driver
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ConfigError`]: Initialization and configuration failures
//! - [`BusError`]: SPI transfer failures reported by the host controller
//! - [`IoError`]: Runtime receive/transmit/buffer status
//!
//! The unified [`Error`] enum wraps all domain errors and is returned
//! by most driver methods.

use embedded_hal::spi::ErrorKind;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Configuration and initialization errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Driver already initialized
    AlreadyInitialized,
    /// Invalid configuration parameter
    InvalidConfig,
    /// Receive ring / transmit buffer layout violates the chip's constraints
    InvalidMemoryLayout,
    /// Clock never became ready after the system reset
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
            ConfigError::InvalidConfig => "invalid configuration",
            ConfigError::InvalidMemoryLayout => "invalid buffer memory layout",
            ConfigError::ResetFailed => "system reset failed",
        }
    }
}

// =============================================================================
// Bus Errors
// =============================================================================

/// SPI bus errors
///
/// Mapped from the [`ErrorKind`] of the host SPI implementation so the
/// driver's error type does not depend on the HAL in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// Receive data was lost
    Overrun,
    /// Multiple controllers on the bus
    ModeFault,
    /// Frame format error
    FrameFormat,
    /// Chip-select could not be driven
    ChipSelectFault,
    /// Any other SPI failure
    Other,
}

impl core::fmt::Display for BusError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BusError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            BusError::Overrun => "SPI overrun",
            BusError::ModeFault => "SPI mode fault",
            BusError::FrameFormat => "SPI frame format error",
            BusError::ChipSelectFault => "chip-select fault",
            BusError::Other => "SPI transfer failed",
        }
    }
}

impl From<ErrorKind> for BusError {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Overrun => BusError::Overrun,
            ErrorKind::ModeFault => BusError::ModeFault,
            ErrorKind::FrameFormat => BusError::FrameFormat,
            ErrorKind::ChipSelectFault => BusError::ChipSelectFault,
            _ => BusError::Other,
        }
    }
}

// =============================================================================
// I/O Errors
// =============================================================================

/// Runtime receive, transmit and buffer errors
///
/// These distinguish "nothing to do" from "try again" from "something
/// went wrong", which plain boolean results cannot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// No packet pending
    NoData,
    /// Transmission or DMA still in flight
    Busy,
    /// A header was fetched while the previous packet was still checked out
    ///
    /// The previous packet has been discarded; retry immediately.
    PacketOutstanding,
    /// Late-collision retransmit budget exhausted
    RetryExhausted,
    /// A bounded poll loop ran out of budget
    Timeout,
    /// Transmission failed for a reason other than a late collision
    TxAborted,
    /// Invalid state for operation (e.g., not running, no packet checked out)
    InvalidState,
    /// Frame larger than the transmit buffer or MTU
    FrameTooLarge,
    /// Buffer too small for received frame
    BufferTooSmall,
    /// EtherType cannot be written into a header
    UnsupportedEtherType,
    /// Receive preamble failed validation; the ring must be reinitialized
    CorruptPreamble,
    /// PHY busy flag never cleared
    PhyError,
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
            IoError::NoData => "no packet pending",
            IoError::Busy => "device busy",
            IoError::PacketOutstanding => "previous packet was not discarded",
            IoError::RetryExhausted => "transmit retries exhausted",
            IoError::Timeout => "operation timed out",
            IoError::TxAborted => "transmission aborted",
            IoError::InvalidState => "invalid state for operation",
            IoError::FrameTooLarge => "frame too large",
            IoError::BufferTooSmall => "buffer too small for frame",
            IoError::UnsupportedEtherType => "unsupported EtherType",
            IoError::CorruptPreamble => "corrupt receive preamble",
            IoError::PhyError => "PHY communication error",
        }
    }

    /// Whether the same call may succeed if simply retried
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            IoError::NoData | IoError::Busy | IoError::PacketOutstanding
        )
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match enc.try_get_header() {
///     Err(Error::Io(IoError::NoData)) => { /* idle */ }
///     Err(Error::Io(IoError::PacketOutstanding)) => { /* retry now */ }
///     Err(Error::Bus(_)) => { /* SPI failure */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration error
    Config(ConfigError),
    /// SPI bus error
    Bus(BusError),
    /// I/O error
    Io(IoError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Bus(e) => write!(f, "bus: {}", e.as_str()),
            Error::Io(e) => write!(f, "io: {}", e.as_str()),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<BusError> for Error {
    fn from(e: BusError) -> Self {
        Error::Bus(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::Io(e)
    }
}

/// Result type alias for driver operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for I/O operations
pub type IoResult<T> = core::result::Result<T, IoError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    extern crate std;
    use std::format;

    use super::*;

    // =========================================================================
    // ConfigError Tests
    // =========================================================================

    #[test]
    fn config_error_as_str_non_empty() {
        let variants = [
            ConfigError::AlreadyInitialized,
            ConfigError::InvalidConfig,
            ConfigError::InvalidMemoryLayout,
            ConfigError::ResetFailed,
        ];

        for variant in variants {
            assert!(!variant.as_str().is_empty(), "ConfigError::{variant:?} has empty string");
        }
    }

    #[test]
    fn config_error_display() {
        let display = format!("{}", ConfigError::InvalidMemoryLayout);
        assert_eq!(display, "invalid buffer memory layout");
    }

    // =========================================================================
    // BusError Tests
    // =========================================================================

    #[test]
    fn bus_error_from_error_kind() {
        assert_eq!(BusError::from(ErrorKind::Overrun), BusError::Overrun);
        assert_eq!(BusError::from(ErrorKind::ModeFault), BusError::ModeFault);
        assert_eq!(BusError::from(ErrorKind::FrameFormat), BusError::FrameFormat);
        assert_eq!(
            BusError::from(ErrorKind::ChipSelectFault),
            BusError::ChipSelectFault
        );
        assert_eq!(BusError::from(ErrorKind::Other), BusError::Other);
    }

    // =========================================================================
    // IoError Tests
    // =========================================================================

    #[test]
    fn io_error_as_str_non_empty() {
        let variants = [
            IoError::NoData,
            IoError::Busy,
            IoError::PacketOutstanding,
            IoError::RetryExhausted,
            IoError::Timeout,
            IoError::TxAborted,
            IoError::InvalidState,
            IoError::FrameTooLarge,
            IoError::BufferTooSmall,
            IoError::UnsupportedEtherType,
            IoError::CorruptPreamble,
            IoError::PhyError,
        ];

        for variant in variants {
            assert!(!variant.as_str().is_empty(), "IoError::{variant:?} has empty string");
        }
    }

    #[test]
    fn io_error_transient_classification() {
        assert!(IoError::NoData.is_transient());
        assert!(IoError::Busy.is_transient());
        assert!(IoError::PacketOutstanding.is_transient());
        assert!(!IoError::RetryExhausted.is_transient());
        assert!(!IoError::CorruptPreamble.is_transient());
        assert!(!IoError::Timeout.is_transient());
    }

    // =========================================================================
    // Unified Error Tests
    // =========================================================================

    #[test]
    fn error_from_domain_errors() {
        assert_eq!(
            Error::from(ConfigError::ResetFailed),
            Error::Config(ConfigError::ResetFailed)
        );
        assert_eq!(Error::from(BusError::Overrun), Error::Bus(BusError::Overrun));
        assert_eq!(Error::from(IoError::NoData), Error::Io(IoError::NoData));
    }

    #[test]
    fn error_display_prefixes_domain() {
        let display = format!("{}", Error::Io(IoError::RetryExhausted));
        assert!(display.starts_with("io:"));
        assert!(display.contains("retries"));

        let display = format!("{}", Error::Bus(BusError::ModeFault));
        assert!(display.starts_with("bus:"));

        let display = format!("{}", Error::Config(ConfigError::AlreadyInitialized));
        assert!(display.starts_with("config:"));
    }
}
