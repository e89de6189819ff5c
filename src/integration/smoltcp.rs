//! smoltcp Network Stack Integration
#![cfg_attr(docsrs, doc(cfg(feature = "smoltcp")))]
//!
//! This module provides integration with the [smoltcp](https://docs.rs/smoltcp) network stack.
//! It implements the `smoltcp::phy::Device` trait for the ENC28J60 driver, allowing it to be
//! used as a network interface with smoltcp's TCP/IP stack.
//!
//! # Example
//!
//! ```ignore
//! use smoltcp::iface::{Config, Interface, SocketSet};
//! use smoltcp::wire::{EthernetAddress, IpCidr};
//! use ph_enc28j60::{Enc28j60, Enc28j60Config};
//!
//! let mut eth = Enc28j60::new(spi);
//! eth.init(Enc28j60Config::new(), &mut delay).unwrap();
//!
//! let config = Config::new(ethernet_address(&eth).into());
//! let mut iface = Interface::new(config, &mut eth, smoltcp::time::Instant::ZERO);
//!
//! iface.update_ip_addrs(|addrs| {
//!     addrs.push(IpCidr::new(IpAddress::v4(192, 168, 1, 100), 24)).unwrap();
//! });
//! ```
//!
//! # Frame Handling
//!
//! smoltcp wants an RX and a TX token from the same `receive()` call. The
//! chip has a single SPI bus, so the frame is copied out of the receive ring
//! while `receive()` runs and the RX token owns that copy; the TX token
//! borrows the driver. No raw pointers are needed.
//!
//! The chip computes no checksums, so smoltcp computes and verifies all of
//! them in software.

use embedded_hal::spi::SpiDevice;
use smoltcp::phy::{ChecksumCapabilities, Device, DeviceCapabilities, Medium};
use smoltcp::time::Instant;

use crate::driver::enc28j60::Enc28j60;
use crate::internal::constants::{ETH_HEADER_SIZE, MTU};

/// Largest frame exchanged with smoltcp (header included, CRC excluded)
const FRAME_BUF_SIZE: usize = ETH_HEADER_SIZE + MTU;

// =============================================================================
// RX Token
// =============================================================================

/// Receive token for smoltcp
///
/// Holds a frame already copied out of the chip's receive ring.
///
/// This type is an implementation detail of the smoltcp integration; most
/// users won't need to name it directly.
pub struct Enc28j60RxToken {
    buffer: [u8; FRAME_BUF_SIZE],
    len: usize,
}

impl smoltcp::phy::RxToken for Enc28j60RxToken {
    fn consume<R, F>(self, f: F) -> R
    where
        F: FnOnce(&[u8]) -> R,
    {
        f(&self.buffer[..self.len])
    }
}

// =============================================================================
// TX Token
// =============================================================================

/// Transmit token for smoltcp
///
/// This type is an implementation detail of the smoltcp integration; most
/// users won't need to name it directly.
pub struct Enc28j60TxToken<'a, SPI> {
    eth: &'a mut Enc28j60<SPI>,
}

impl<SPI: SpiDevice> smoltcp::phy::TxToken for Enc28j60TxToken<'_, SPI> {
    fn consume<R, F>(self, len: usize, f: F) -> R
    where
        F: FnOnce(&mut [u8]) -> R,
    {
        let len = len.min(FRAME_BUF_SIZE);
        let mut buffer = [0u8; FRAME_BUF_SIZE];
        let result = f(&mut buffer[..len]);

        // Dropped frames are recovered by smoltcp's retransmission
        if let Err(_e) = self.eth.transmit(&buffer[..len]) {
            #[cfg(feature = "defmt")]
            defmt::warn!("smoltcp frame dropped: {}", _e);
        }

        result
    }
}

// =============================================================================
// Device Implementation
// =============================================================================

impl<SPI: SpiDevice> Device for Enc28j60<SPI> {
    type RxToken<'a>
        = Enc28j60RxToken
    where
        Self: 'a;
    type TxToken<'a>
        = Enc28j60TxToken<'a, SPI>
    where
        Self: 'a;

    fn receive(&mut self, _timestamp: Instant) -> Option<(Self::RxToken<'_>, Self::TxToken<'_>)> {
        if !self.is_running() {
            return None;
        }

        let mut buffer = [0u8; FRAME_BUF_SIZE];
        let len = self.receive(&mut buffer).ok()?;
        Some((Enc28j60RxToken { buffer, len }, Enc28j60TxToken { eth: self }))
    }

    fn transmit(&mut self, _timestamp: Instant) -> Option<Self::TxToken<'_>> {
        if !self.is_running() || !self.is_tx_ready().unwrap_or(false) {
            return None;
        }
        Some(Enc28j60TxToken { eth: self })
    }

    fn capabilities(&self) -> DeviceCapabilities {
        let mut caps = DeviceCapabilities::default();
        caps.medium = Medium::Ethernet;
        // Ethernet medium counts the 14 byte header
        caps.max_transmission_unit = FRAME_BUF_SIZE;
        // One frame fits the transmit buffer at a time
        caps.max_burst_size = Some(1);
        caps.checksum = ChecksumCapabilities::default();
        caps
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get the station address as a smoltcp `EthernetAddress`
///
/// This is a convenience function for creating smoltcp interface configurations.
pub fn ethernet_address<SPI>(eth: &Enc28j60<SPI>) -> smoltcp::wire::EthernetAddress {
    smoltcp::wire::EthernetAddress(eth.mac_address())
}
