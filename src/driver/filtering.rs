//! Receive filtering for the ENC28J60.
//!
//! This module extends [`Enc28j60`] with the bank 1 filter registers:
//!
//! - **Receive filter** - ERXFCON: unicast, broadcast, multicast, hash
//!   table, magic packet and pattern match acceptance, plus the post-filter
//!   CRC check
//! - **Hash table** - 64-bit table (EHT0..EHT7) indexed by bits 28:23 of the
//!   destination address CRC
//!
//! # Hash Filtering
//!
//! With [`ReceiveFilter::hash_table`] enabled, a frame is accepted when the
//! hash table bit selected by its destination address is set. Collisions
//! are possible: unrelated addresses may map to the same bit, so software
//! still has to check the destination of frames accepted this way.

use embedded_hal::spi::SpiDevice;

use super::config::ReceiveFilter;
use super::enc28j60::Enc28j60;
use super::error::Result;
use crate::hal::Bank;
use crate::internal::constants::MAC_ADDR_LEN;
use crate::internal::register::eth::{ERXFCON, HASH_TABLE_LEN, eht};

/// CRC-32 polynomial used by the hash filter
const CRC32_POLY: u32 = 0x04C1_1DB7;

/// Hash table index (0-63) of a destination address
///
/// CRC-32 of the six address bytes, least significant bit of each byte
/// first, without the final inversion; the index is bits 28:23.
pub const fn hash_index(addr: &[u8; MAC_ADDR_LEN]) -> u8 {
    let mut crc: u32 = 0xFFFF_FFFF;
    let mut i = 0;
    while i < MAC_ADDR_LEN {
        let mut byte = addr[i];
        let mut bit = 0;
        while bit < 8 {
            let feedback = ((crc >> 31) as u8 ^ byte) & 1;
            crc <<= 1;
            if feedback != 0 {
                crc ^= CRC32_POLY;
            }
            byte >>= 1;
            bit += 1;
        }
        i += 1;
    }
    ((crc >> 23) & 0x3F) as u8
}

// =============================================================================
// Receive Filter
// =============================================================================

impl<SPI: SpiDevice> Enc28j60<SPI> {
    /// Program the receive filter
    pub fn set_receive_filter(&mut self, filter: ReceiveFilter) -> Result<()> {
        self.ensure_initialized()?;
        self.bus
            .with_bank(Bank::Bank1, |bus| bus.write(ERXFCON, filter.to_erxfcon()))?;
        self.config.receive_filter = filter;
        Ok(())
    }

    /// Read the receive filter back from ERXFCON
    pub fn receive_filter(&mut self) -> Result<ReceiveFilter> {
        self.ensure_initialized()?;
        let value = self.bus.with_bank(Bank::Bank1, |bus| bus.read(ERXFCON))?;
        Ok(ReceiveFilter::from_erxfcon(value))
    }

    /// Accept every frame, or go back to the default filter
    pub fn set_promiscuous(&mut self, enabled: bool) -> Result<()> {
        let filter = if enabled {
            ReceiveFilter::promiscuous()
        } else {
            ReceiveFilter::new()
        };
        self.set_receive_filter(filter)
    }
}

// =============================================================================
// Hash Table Filtering
// =============================================================================

impl<SPI: SpiDevice> Enc28j60<SPI> {
    /// Set the hash table bit for `addr`
    ///
    /// Returns the hash index (0-63). Only has an effect while the hash
    /// table filter is enabled in the receive filter.
    ///
    /// # Example
    /// ```ignore
    /// // Subscribe to IPv4 multicast group 224.0.0.1
    /// eth.add_hash_table_entry(&[0x01, 0x00, 0x5E, 0x00, 0x00, 0x01])?;
    /// eth.set_receive_filter(ReceiveFilter::new().with_hash_table(true))?;
    /// ```
    pub fn add_hash_table_entry(&mut self, addr: &[u8; MAC_ADDR_LEN]) -> Result<u8> {
        self.update_hash_bit(addr, true)
    }

    /// Clear the hash table bit for `addr`
    ///
    /// **Warning:** every other address sharing the bit is dropped too.
    pub fn remove_hash_table_entry(&mut self, addr: &[u8; MAC_ADDR_LEN]) -> Result<u8> {
        self.update_hash_bit(addr, false)
    }

    fn update_hash_bit(&mut self, addr: &[u8; MAC_ADDR_LEN], set: bool) -> Result<u8> {
        self.ensure_initialized()?;
        let index = hash_index(addr);
        let reg = eht(index >> 3);
        let mask = 1u8 << (index & 0x07);
        self.bus.with_bank(Bank::Bank1, |bus| {
            if set {
                bus.set_bits(reg, mask)
            } else {
                bus.clear_bits(reg, mask)
            }
        })?;
        Ok(index)
    }

    /// Whether the hash table bit for `addr` is set
    pub fn check_hash_table(&mut self, addr: &[u8; MAC_ADDR_LEN]) -> Result<bool> {
        let index = hash_index(addr);
        Ok(self.hash_table()? & (1u64 << index) != 0)
    }

    /// Clear all 64 hash table bits
    pub fn clear_hash_table(&mut self) -> Result<()> {
        self.set_hash_table(0)
    }

    /// The whole hash table, EHT0 in the low byte
    pub fn hash_table(&mut self) -> Result<u64> {
        self.ensure_initialized()?;
        self.bus.with_bank(Bank::Bank1, |bus| {
            let mut bytes = [0u8; HASH_TABLE_LEN as usize];
            for (index, byte) in (0..HASH_TABLE_LEN).zip(bytes.iter_mut()) {
                *byte = bus.read(eht(index))?;
            }
            Ok(u64::from_le_bytes(bytes))
        })
    }

    /// Write the whole hash table at once
    pub fn set_hash_table(&mut self, value: u64) -> Result<()> {
        self.ensure_initialized()?;
        self.bus.with_bank(Bank::Bank1, |bus| {
            for (index, byte) in (0..HASH_TABLE_LEN).zip(value.to_le_bytes()) {
                bus.write(eht(index), byte)?;
            }
            Ok(())
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
