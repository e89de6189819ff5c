//! Internal Implementation Details
//!
//! This module contains implementation details that are not part of the public API.
//! Types in this module may change without notice between minor versions.
//!
//! # Contents
//!
//! - [`register`]: Control register map (banked ETH and MAC/MII registers)
//! - [`phy_regs`]: PHY register map, reached through the MII interface
//! - [`constants`]: Buffer geometry, frame sizes and poll budgets

pub(crate) mod constants;
pub(crate) mod phy_regs;
pub(crate) mod register;
