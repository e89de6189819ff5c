//! ENC28J60 Driver
//!
//! A `no_std`, `no_alloc` Rust driver for the Microchip ENC28J60 stand-alone
//! 10BASE-T Ethernet controller with SPI interface.
//!
//! The chip holds an 8 KiB packet buffer split into a hardware-managed
//! receive ring and a transmit buffer. All access, including the frames
//! themselves, goes through SPI commands, so the driver never needs a frame
//! sized buffer of its own.
//!
//! # Architecture
//!
//! The driver is organized into three layers:
//!
//! 1. **Driver Layer** ([`driver`]): [`Enc28j60`] with initialization,
//!    receive ring, transmit, DMA, filtering and interrupt operations
//! 2. **HAL Layer** ([`hal`]): SPI command bus, register bank switching,
//!    PHY indirect access and system reset over [`embedded_hal`] traits
//! 3. **Register Layer** (internal): control and PHY register maps
//!
//! ## Silicon Errata
//!
//! - Revisions B5 and B7 can stall a transmission after a late collision;
//!   [`Enc28j60::flush`] retransmits the staged frame up to 16 times.
//! - The receive read pointer (ERXRDPT) must stay odd, so it is always
//!   programmed one byte before the next packet.
//!
//! # Features
//!
//! - `defmt`: Enable defmt formatting for error types and driver logging
//! - `smoltcp`: Enable smoltcp network stack integration
//! - `critical-section`: Enable ISR-safe `SharedEnc28j60` wrapper
//!
//! # Example
//!
//! ```ignore
//! use ph_enc28j60::{Enc28j60, Enc28j60Config, Error, IoError};
//!
//! // Any embedded-hal 1.0 SpiDevice (mode 0, up to 20 MHz) and DelayNs
//! let mut eth = Enc28j60::new(spi);
//!
//! let config = Enc28j60Config::new()
//!     .with_mac_address([0x02, 0x00, 0x00, 0x12, 0x34, 0x56]);
//! eth.init(config, &mut delay)?;
//!
//! let mut frame = [0u8; 1514];
//! loop {
//!     match eth.receive(&mut frame) {
//!         Ok(len) => handle(&frame[..len]),
//!         Err(Error::Io(IoError::NoData)) => {}
//!         Err(e) => return Err(e),
//!     }
//! }
//! ```

#![no_std]
#![deny(missing_docs)]
#![forbid(unsafe_code)]
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements
)]

// =============================================================================
// Modules
// =============================================================================

pub mod driver;
pub mod hal;

// Internal implementation details (pub(crate) only)
mod internal;

#[cfg(feature = "smoltcp")]
#[cfg_attr(docsrs, doc(cfg(feature = "smoltcp")))]
pub mod integration;

#[cfg(feature = "critical-section")]
#[cfg_attr(docsrs, doc(cfg(feature = "critical-section")))]
pub mod sync;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod test_utils;

// =============================================================================
// Re-exports
// =============================================================================

pub use driver::config::{
    ChecksumMode, ClockOut, Duplex, Enc28j60Config, MemoryLayout, ReceiveFilter, Revision, State,
};
pub use driver::dma::BufferPointer;
pub use driver::enc28j60::Enc28j60;
pub use driver::error::{
    BusError, ConfigError, ConfigResult, Error, IoError, IoResult, Result,
};
pub use driver::frame::{EtherType, RxHeader, RxStatus, TxStatus};
pub use driver::interrupt::InterruptStatus;
pub use hal::LinkStatus;

// Re-export sync types when critical-section is enabled
#[cfg(feature = "critical-section")]
pub use sync::SharedEnc28j60;

/// Shared driver constants.
///
/// These are grouped into a dedicated module to keep the top-level facade
/// focused on driver types and integration points.
pub mod constants {
    pub use crate::internal::constants::{
        // Buffer memory
        BUFFER_SIZE,
        // Frame sizes
        CRC_SIZE,
        // MAC address
        DEFAULT_MAC_ADDR,
        DEFAULT_RX_START,
        DEFAULT_RX_STOP,
        DEFAULT_TX_START,
        ETH_HEADER_SIZE,
        MAC_ADDR_LEN,
        MAX_FRAME_SIZE,
        MTU,
        PREAMBLE_SIZE,
        RX_STATUS_SIZE,
        TX_STATUS_SIZE,
    };
}
