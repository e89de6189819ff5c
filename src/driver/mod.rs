//! Core driver components for the ENC28J60 controller.
//!
//! This module contains the building blocks for configuring and operating
//! the chip:
//!
//! - [`config`] - Configuration types and builder patterns
//! - [`error`] - Error types and result aliases
//! - [`enc28j60`] - The driver handle, initialization, link and power control
//! - [`rx`] / [`tx`] - Receive ring and transmit buffer management
//! - [`dma`] - Buffer checksums and on-chip copies
//! - [`filtering`] / [`interrupt`] - Receive filters and interrupt flags
//! - [`frame`] / [`ring`] / [`checksum`] - Plain data types and arithmetic
//!
//! # Example
//!
//! ```ignore
//! use ph_enc28j60::driver::{Enc28j60, Enc28j60Config, Error};
//!
//! let config = Enc28j60Config::new()
//!     .with_mac_address([0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
//! ```

// Submodules
pub mod checksum;
pub mod config;
pub mod dma;
pub mod enc28j60;
pub mod error;
pub mod filtering;
pub mod frame;
pub mod interrupt;
pub mod ring;
pub mod rx;
pub mod tx;

// Re-exports for convenience
pub use checksum::{ChecksumAccumulator, internet_checksum};
pub use config::{
    ChecksumMode, ClockOut, Duplex, Enc28j60Config, MemoryLayout, ReceiveFilter, Revision, State,
};
pub use dma::BufferPointer;
pub use enc28j60::Enc28j60;
pub use error::{BusError, ConfigError, ConfigResult, Error, IoError, IoResult, Result};
pub use filtering::hash_index;
pub use frame::{EtherType, RxHeader, RxStatus, TxStatus};
pub use interrupt::InterruptStatus;
pub use ring::{RingOffset, RxRing};
