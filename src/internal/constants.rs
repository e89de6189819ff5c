//! Centralized Constants
//!
//! Single source of truth for buffer geometry, frame sizes and poll budgets
//! used throughout the driver.
//!
//! # Organization
//!
//! - **Buffer memory**: size of the on-chip SRAM and default ring split
//! - **Frame sizes**: Ethernet and hardware preamble dimensions
//! - **Timing**: poll budgets and settle delays
//!
//! Register bit definitions live next to the registers in
//! [`register`](super::register) and [`phy_regs`](super::phy_regs).

// =============================================================================
// Buffer Memory
// =============================================================================

/// On-chip Ethernet buffer size in bytes
pub const BUFFER_SIZE: usize = 8192;

/// Highest valid buffer address
pub const BUFFER_END: u16 = (BUFFER_SIZE - 1) as u16;

/// Bytes reserved at the top of the buffer for one outgoing frame
///
/// Control byte + maximum frame + transmit status vector.
pub const TX_REGION_SIZE: usize = 1 + MAX_FRAME_SIZE + TX_STATUS_SIZE;

/// Default transmit buffer start
pub const DEFAULT_TX_START: u16 = (BUFFER_SIZE - 1526) as u16;

/// Default receive ring start (must be even)
pub const DEFAULT_RX_START: u16 = 0x0000;

/// Default receive ring end, inclusive (must be odd)
pub const DEFAULT_RX_STOP: u16 = DEFAULT_TX_START - 1;

// =============================================================================
// Frame Sizes
// =============================================================================

/// MAC address length in bytes
pub const MAC_ADDR_LEN: usize = 6;

/// Ethernet header size (dst MAC + src MAC + EtherType)
pub const ETH_HEADER_SIZE: usize = 14;

/// CRC/FCS size at end of frame
pub const CRC_SIZE: usize = 4;

/// Standard Ethernet MTU
pub const MTU: usize = 1500;

/// Maximum frame on the wire including CRC
pub const MAX_FRAME_SIZE: usize = ETH_HEADER_SIZE + MTU + CRC_SIZE;

/// Next packet pointer (2) + receive status vector (4)
pub const RX_STATUS_SIZE: usize = 6;

/// Hardware receive preamble: next pointer, status vector and the Ethernet header
pub const PREAMBLE_SIZE: usize = RX_STATUS_SIZE + ETH_HEADER_SIZE;

/// Transmit status vector written after the frame end
pub const TX_STATUS_SIZE: usize = 7;

/// Per-packet control byte value placed before every outgoing frame
///
/// Zero means "use the MACON3 settings".
pub const TX_CONTROL_BYTE: u8 = 0x00;

/// Default MAC address (locally administered, unicast)
pub const DEFAULT_MAC_ADDR: [u8; MAC_ADDR_LEN] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];

/// Default LED configuration: LEDA link status, LEDB TX/RX activity, stretched
pub const DEFAULT_LED_CONFIG: u16 = 0x3472;

/// Bytes streamed per SPI transaction when checksumming the buffer
pub const CHECKSUM_CHUNK: usize = 20;

// =============================================================================
// Timing
// =============================================================================

/// Iterations to wait for TXIF/TXERIF before inspecting the status vector
pub const ERRATA_POLL_LIMIT: u32 = 1000;

/// Maximum late-collision retransmissions
pub const ERRATA_RETRY_LIMIT: u32 = 16;

/// Default budget for every other busy-wait
pub const DEFAULT_POLL_LIMIT: u32 = 100_000;

/// Settle time around the system reset command in microseconds
pub const RESET_DELAY_US: u32 = 1000;
