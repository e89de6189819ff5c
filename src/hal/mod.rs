//! Hardware Abstraction Layer
//!
//! Command-level access to the controller over SPI, with the register bank,
//! PHY and reset handling built on top of it.
//!
//! # Modules
//!
//! - [`bus`]: SPI opcodes and the [`ControlBus`] command layer
//! - [`bank`]: Register bank selection with scoped restore of bank 0
//! - [`phy`]: PHY register access through the MII interface
//! - [`reset`]: System reset and clock-ready wait
//!
//! # Delay Integration
//!
//! The reset controller uses `embedded_hal::delay::DelayNs` directly.
//! Pass any delay implementation from your HAL.

pub mod bank;
pub mod bus;
pub mod phy;
pub mod reset;

pub use bank::Bank;
pub use bus::ControlBus;
pub use phy::LinkStatus;
pub use reset::ResetController;
