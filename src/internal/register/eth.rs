//! ETH-class control registers and bit definitions
//!
//! Register names follow the ENC28J60 data sheet (DS39662).

// Complete register map, not every entry is referenced by the driver
#![allow(dead_code)]

use super::Register;
use crate::hal::bank::Bank;

// =============================================================================
// Bank 0 - Buffer pointers and DMA
// =============================================================================

/// Buffer read pointer, low byte
pub const ERDPTL: Register = Register::eth(Bank::Bank0, 0x00);
/// Buffer read pointer, high byte
pub const ERDPTH: Register = Register::eth(Bank::Bank0, 0x01);
/// Buffer write pointer, low byte
pub const EWRPTL: Register = Register::eth(Bank::Bank0, 0x02);
/// Buffer write pointer, high byte
pub const EWRPTH: Register = Register::eth(Bank::Bank0, 0x03);
/// Transmit buffer start, low byte
pub const ETXSTL: Register = Register::eth(Bank::Bank0, 0x04);
/// Transmit buffer start, high byte
pub const ETXSTH: Register = Register::eth(Bank::Bank0, 0x05);
/// Transmit buffer end, low byte
pub const ETXNDL: Register = Register::eth(Bank::Bank0, 0x06);
/// Transmit buffer end, high byte
pub const ETXNDH: Register = Register::eth(Bank::Bank0, 0x07);
/// Receive ring start, low byte
pub const ERXSTL: Register = Register::eth(Bank::Bank0, 0x08);
/// Receive ring start, high byte
pub const ERXSTH: Register = Register::eth(Bank::Bank0, 0x09);
/// Receive ring end, low byte
pub const ERXNDL: Register = Register::eth(Bank::Bank0, 0x0A);
/// Receive ring end, high byte
pub const ERXNDH: Register = Register::eth(Bank::Bank0, 0x0B);
/// Receive read (write-protect) pointer, low byte
pub const ERXRDPTL: Register = Register::eth(Bank::Bank0, 0x0C);
/// Receive read (write-protect) pointer, high byte
pub const ERXRDPTH: Register = Register::eth(Bank::Bank0, 0x0D);
/// Receive hardware write pointer, low byte
pub const ERXWRPTL: Register = Register::eth(Bank::Bank0, 0x0E);
/// Receive hardware write pointer, high byte
pub const ERXWRPTH: Register = Register::eth(Bank::Bank0, 0x0F);
/// DMA source start, low byte
pub const EDMASTL: Register = Register::eth(Bank::Bank0, 0x10);
/// DMA source start, high byte
pub const EDMASTH: Register = Register::eth(Bank::Bank0, 0x11);
/// DMA source end, low byte
pub const EDMANDL: Register = Register::eth(Bank::Bank0, 0x12);
/// DMA source end, high byte
pub const EDMANDH: Register = Register::eth(Bank::Bank0, 0x13);
/// DMA destination, low byte
pub const EDMADSTL: Register = Register::eth(Bank::Bank0, 0x14);
/// DMA destination, high byte
pub const EDMADSTH: Register = Register::eth(Bank::Bank0, 0x15);
/// DMA checksum result, low byte
pub const EDMACSL: Register = Register::eth(Bank::Bank0, 0x16);
/// DMA checksum result, high byte
pub const EDMACSH: Register = Register::eth(Bank::Bank0, 0x17);

// =============================================================================
// Common (all banks)
// =============================================================================

/// Interrupt enable
pub const EIE: Register = Register::common(0x1B);
/// Interrupt request flags
pub const EIR: Register = Register::common(0x1C);
/// Ethernet status
pub const ESTAT: Register = Register::common(0x1D);
/// Ethernet control 2
pub const ECON2: Register = Register::common(0x1E);
/// Ethernet control 1 (holds the bank select bits)
pub const ECON1: Register = Register::common(0x1F);

// =============================================================================
// Bank 1 - Filters and packet counter
// =============================================================================

/// Hash table byte 0 (bits 7:0)
pub const EHT0: Register = Register::eth(Bank::Bank1, 0x00);
/// Pattern match mask byte 0
pub const EPMM0: Register = Register::eth(Bank::Bank1, 0x08);
/// Pattern match checksum, low byte
pub const EPMCSL: Register = Register::eth(Bank::Bank1, 0x10);
/// Pattern match offset, low byte
pub const EPMOL: Register = Register::eth(Bank::Bank1, 0x14);
/// Receive filter control
pub const ERXFCON: Register = Register::eth(Bank::Bank1, 0x18);
/// Pending packet count
pub const EPKTCNT: Register = Register::eth(Bank::Bank1, 0x19);

/// Number of hash table bytes (EHT0..EHT7)
pub const HASH_TABLE_LEN: u8 = 8;

/// Hash table byte `index` (0-7)
pub const fn eht(index: u8) -> Register {
    Register::eth(Bank::Bank1, EHT0.address() + (index & 0x07))
}

// =============================================================================
// Bank 3 - ETH-class registers
// =============================================================================

/// Silicon revision ID
pub const EREVID: Register = Register::eth(Bank::Bank3, 0x12);
/// Clock output control
pub const ECOCON: Register = Register::eth(Bank::Bank3, 0x15);
/// Flow control
pub const EFLOCON: Register = Register::eth(Bank::Bank3, 0x17);

// =============================================================================
// EIE bits
// =============================================================================

/// EIE bit definitions
pub mod eie {
    /// Global interrupt enable
    pub const INTIE: u8 = 1 << 7;
    /// Receive packet pending interrupt enable
    pub const PKTIE: u8 = 1 << 6;
    /// DMA interrupt enable
    pub const DMAIE: u8 = 1 << 5;
    /// Link status change interrupt enable
    pub const LINKIE: u8 = 1 << 4;
    /// Transmit interrupt enable
    pub const TXIE: u8 = 1 << 3;
    /// Transmit error interrupt enable
    pub const TXERIE: u8 = 1 << 1;
    /// Receive error interrupt enable
    pub const RXERIE: u8 = 1 << 0;
}

/// EIR bit definitions
pub mod eir {
    /// Receive packet pending
    pub const PKTIF: u8 = 1 << 6;
    /// DMA copy or checksum complete
    pub const DMAIF: u8 = 1 << 5;
    /// Link change
    pub const LINKIF: u8 = 1 << 4;
    /// Transmit complete
    pub const TXIF: u8 = 1 << 3;
    /// Transmit error
    pub const TXERIF: u8 = 1 << 1;
    /// Receive error
    pub const RXERIF: u8 = 1 << 0;
}

/// ESTAT bit definitions
pub mod estat {
    /// INT pin asserted
    pub const INT: u8 = 1 << 7;
    /// Buffer error
    pub const BUFER: u8 = 1 << 6;
    /// Late collision during the last transmission
    pub const LATECOL: u8 = 1 << 4;
    /// Unimplemented, reads 1 while the part is held in reset
    pub const UNIMPLEMENTED: u8 = 1 << 3;
    /// Receiver busy
    pub const RXBUSY: u8 = 1 << 2;
    /// Transmit aborted
    pub const TXABRT: u8 = 1 << 1;
    /// Oscillator start-up timer expired, clock ready
    pub const CLKRDY: u8 = 1 << 0;
}

/// ECON2 bit definitions
pub mod econ2 {
    /// Automatic buffer pointer increment
    pub const AUTOINC: u8 = 1 << 7;
    /// Decrement the packet counter
    pub const PKTDEC: u8 = 1 << 6;
    /// Power save
    pub const PWRSV: u8 = 1 << 5;
    /// Voltage regulator power save
    pub const VRPS: u8 = 1 << 3;
}

/// ECON1 bit definitions
pub mod econ1 {
    /// Transmit logic reset
    pub const TXRST: u8 = 1 << 7;
    /// Receive logic reset
    pub const RXRST: u8 = 1 << 6;
    /// DMA start / busy
    pub const DMAST: u8 = 1 << 5;
    /// DMA checksum mode (instead of copy)
    pub const CSUMEN: u8 = 1 << 4;
    /// Transmit request to send / busy
    pub const TXRTS: u8 = 1 << 3;
    /// Receive enable
    pub const RXEN: u8 = 1 << 2;
    /// Bank select bit 1
    pub const BSEL1: u8 = 1 << 1;
    /// Bank select bit 0
    pub const BSEL0: u8 = 1 << 0;
    /// Both bank select bits
    pub const BSEL_MASK: u8 = BSEL1 | BSEL0;
}

/// ERXFCON bit definitions
pub mod erxfcon {
    /// Unicast filter enable
    pub const UCEN: u8 = 1 << 7;
    /// AND/OR filter select (set = AND)
    pub const ANDOR: u8 = 1 << 6;
    /// Post-filter CRC check enable
    pub const CRCEN: u8 = 1 << 5;
    /// Pattern match filter enable
    pub const PMEN: u8 = 1 << 4;
    /// Magic packet filter enable
    pub const MPEN: u8 = 1 << 3;
    /// Hash table filter enable
    pub const HTEN: u8 = 1 << 2;
    /// Multicast filter enable
    pub const MCEN: u8 = 1 << 1;
    /// Broadcast filter enable
    pub const BCEN: u8 = 1 << 0;
}
