//! Synchronization Support
//!
//! This module provides critical-section based wrappers for using the
//! driver from more than one context:
//!
//! - **Primitives** (`primitives`): [`CriticalSectionCell`] - ISR-safe
//!   interior mutability
//! - **Shared Wrapper** (`shared`): [`SharedEnc28j60`] - static,
//!   critical-section protected driver holder
//!
//! # Feature Flags
//!
//! - `critical-section`: Enables this module
//!
//! # Example
//!
//! ```ignore
//! use ph_enc28j60::sync::SharedEnc28j60;
//!
//! static ETH: SharedEnc28j60<MySpiDevice> = SharedEnc28j60::new();
//!
//! fn main() {
//!     ETH.install(eth);
//!     ETH.with(|eth| eth.transmit(&frame));
//! }
//! ```

mod primitives;
mod shared;

pub use primitives::CriticalSectionCell;
pub use shared::SharedEnc28j60;
