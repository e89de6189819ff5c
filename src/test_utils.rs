//! Testing utilities and mock implementations
//!
//! [`MockEnc28j60`] is a behavioural model of the controller that sits
//! behind `embedded_hal::spi::SpiDevice`, so the real driver code can be
//! exercised on the host. It models:
//!
//! - banked control registers with the common registers mirrored into
//!   every bank, and the dummy byte MAC/MII registers shift out on reads
//! - 8 KiB buffer memory with auto-incrementing read/write pointers and
//!   read-pointer wraparound at the end of the receive ring
//! - the packet counter, ECON2.PKTDEC and the ERXRDPT high-byte latch
//! - PHY registers behind the MII interface, with a programmable busy time
//!   and the latching link status bit
//! - the DMA copy and checksum engine
//! - a scriptable transmitter (normal, late collisions, stuck, aborted)
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::RefCell;
use std::rc::Rc;
use std::vec;
use std::vec::Vec;

use embedded_hal::spi::{ErrorKind, ErrorType, Operation, SpiDevice};

use crate::driver::config::Enc28j60Config;
use crate::driver::enc28j60::Enc28j60;
use crate::hal::bank::Bank;
use crate::hal::bus::{OP_RBM, OP_SRC, OP_WBM};
use crate::internal::constants::BUFFER_SIZE;
use crate::internal::phy_regs::{PHID1_VALUE, PHID2_VALUE, phcon1, phstat1, phstat2, phy_reg};
use crate::internal::register::Register;
use crate::internal::register::eth::{
    ECON1, ECON2, EDMACSL, EDMADSTL, EDMANDL, EDMASTL, EIR, EPKTCNT, ERDPTL, EREVID, ERXNDL,
    ERXRDPTH, ERXRDPTL, ERXSTH, ERXSTL, ERXWRPTL, ESTAT, ETXNDL, ETXSTL, EWRPTL, econ1, econ2,
    eir, estat,
};
use crate::internal::register::mac::{MICMD, MIRDL, MIREGADR, MISTAT, MIWRH, MIWRL, micmd, mistat};

const COMMON_BASE: u8 = 0x1B;
const BANK_REGS: usize = COMMON_BASE as usize;

/// Ring bytes a packet takes when it arrives during an EPKTCNT read
pub const ARRIVAL_LEN: u16 = 0x40;

/// Receive status vector: received OK
pub const RSV_RECEIVED_OK: u32 = 1 << 23;
/// Receive status vector: multicast
pub const RSV_MULTICAST: u32 = 1 << 24;
/// Receive status vector: broadcast
pub const RSV_BROADCAST: u32 = 1 << 25;

// =============================================================================
// Transmitter Script
// =============================================================================

/// How the modelled transmitter reacts to TXRTS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TxMode {
    /// Every attempt succeeds
    #[default]
    Normal,
    /// Every attempt ends in a late collision (TXERIF, TXRTS stays set)
    LateCollisionAlways,
    /// The first `n` attempts end in a late collision
    LateCollisionTimes(u32),
    /// Nothing ever happens; TXRTS stays set and no flag is raised
    Stuck,
    /// TXERIF without a late collision in the status vector
    AbortWithoutCollision,
}

// =============================================================================
// Chip Model
// =============================================================================

#[derive(Debug)]
struct ChipModel {
    banked: [[u8; BANK_REGS]; 4],
    common: [u8; 5],
    memory: Vec<u8>,
    phy: [u16; 32],
    erxrdpt_latch: u8,
    erxrdpt_commits: Vec<u16>,
    packet_count: u8,
    pktdec_count: u32,
    arrivals_during_count_reads: u32,
    transactions: u32,
    last_read_len: usize,
    reset_count: u32,
    fail_next: Option<ErrorKind>,
    mii_busy_polls: u32,
    mii_busy_remaining: u32,
    link_up: bool,
    link_latch: bool,
    clock_stuck: bool,
    tx_mode: TxMode,
    tx_attempts: u32,
    tx_resets: u32,
    sent: Vec<Vec<u8>>,
    dma_stall: bool,
    dma_runs: u32,
    revision: u8,
}

impl ChipModel {
    fn new() -> Self {
        let mut phy = [0u16; 32];
        phy[phy_reg::PHID1 as usize] = PHID1_VALUE;
        phy[phy_reg::PHID2 as usize] = PHID2_VALUE | 0x0005;
        phy[phy_reg::PHLCON as usize] = 0x3422;

        let mut model = Self {
            banked: [[0; BANK_REGS]; 4],
            common: [0; 5],
            memory: vec![0; BUFFER_SIZE],
            phy,
            erxrdpt_latch: 0,
            erxrdpt_commits: Vec::new(),
            packet_count: 0,
            pktdec_count: 0,
            arrivals_during_count_reads: 0,
            transactions: 0,
            last_read_len: 0,
            reset_count: 0,
            fail_next: None,
            mii_busy_polls: 0,
            mii_busy_remaining: 0,
            link_up: true,
            link_latch: true,
            clock_stuck: false,
            tx_mode: TxMode::Normal,
            tx_attempts: 0,
            tx_resets: 0,
            sent: Vec::new(),
            dma_stall: false,
            dma_runs: 0,
            revision: 0x06,
        };
        model.power_on_defaults();
        model
    }

    fn power_on_defaults(&mut self) {
        self.banked = [[0; BANK_REGS]; 4];
        self.common = [0; 5];
        self.set(ECON2, econ2::AUTOINC);
        self.set16(ERXSTL, 0x05FA);
        self.set16(ERXRDPTL, 0x05FA);
        self.set16(ERXNDL, 0x1FFF);
        self.set16(ERDPTL, 0x05FA);
        self.set16(ERXWRPTL, 0x0000);
        self.packet_count = 0;
        self.mii_busy_remaining = 0;
    }

    // =========================================================================
    // Raw Register Storage
    // =========================================================================

    fn bank(&self) -> Bank {
        Bank::from_bits(self.common[(ECON1.address() - COMMON_BASE) as usize])
    }

    fn raw(&self, bank: Bank, addr: u8) -> u8 {
        if addr >= COMMON_BASE {
            self.common[(addr - COMMON_BASE) as usize]
        } else {
            self.banked[bank as usize][addr as usize]
        }
    }

    fn set_raw(&mut self, bank: Bank, addr: u8, value: u8) {
        if addr >= COMMON_BASE {
            self.common[(addr - COMMON_BASE) as usize] = value;
        } else {
            self.banked[bank as usize][addr as usize] = value;
        }
    }

    fn get(&self, reg: Register) -> u8 {
        self.raw(reg.bank().unwrap_or(Bank::Bank0), reg.address())
    }

    fn set(&mut self, reg: Register, value: u8) {
        self.set_raw(reg.bank().unwrap_or(Bank::Bank0), reg.address(), value);
    }

    fn get16(&self, low: Register) -> u16 {
        u16::from_le_bytes([self.get(low), self.get(low.high())])
    }

    fn set16(&mut self, low: Register, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.set(low, lo);
        self.set(low.high(), hi);
    }

    fn is_mac_class(bank: Bank, addr: u8) -> bool {
        match bank {
            Bank::Bank2 => addr < COMMON_BASE,
            Bank::Bank3 => addr <= 0x05 || addr == MISTAT.address(),
            _ => false,
        }
    }

    // =========================================================================
    // Register Side Effects
    // =========================================================================

    fn read_reg(&mut self, addr: u8) -> u8 {
        let bank = self.bank();
        if addr == ESTAT.address() {
            let mut value = self.get(ESTAT);
            if !self.clock_stuck && self.get(ECON2) & econ2::PWRSV == 0 {
                value |= estat::CLKRDY;
            }
            return value;
        }
        match (bank, addr) {
            (Bank::Bank1, a) if a == EPKTCNT.address() => {
                let count = self.packet_count;
                if self.arrivals_during_count_reads > 0 {
                    if self.arrivals_during_count_reads != u32::MAX {
                        self.arrivals_during_count_reads -= 1;
                    }
                    self.packet_arrives(ARRIVAL_LEN);
                }
                count
            }
            (Bank::Bank3, a) if a == MISTAT.address() => {
                if self.mii_busy_remaining > 0 {
                    if self.mii_busy_remaining != u32::MAX {
                        self.mii_busy_remaining -= 1;
                    }
                    mistat::BUSY
                } else {
                    0
                }
            }
            (Bank::Bank3, a) if a == EREVID.address() => self.revision,
            _ => self.raw(bank, addr),
        }
    }

    /// Count a packet and move ERXWRPT past it, without storing any bytes
    fn packet_arrives(&mut self, len: u16) {
        let start = u32::from(self.get16(ERXSTL));
        let size = u32::from(self.get16(ERXNDL)) - start + 1;
        let write = u32::from(self.get16(ERXWRPTL));
        let next = start + (write + size - start + u32::from(len)) % size;
        self.set16(ERXWRPTL, next as u16);
        self.packet_count = self.packet_count.saturating_add(1);
    }

    fn write_reg(&mut self, addr: u8, value: u8) {
        let bank = self.bank();

        if addr == ECON1.address() {
            let old = self.get(ECON1);
            self.set(ECON1, value);
            self.econ1_changed(old, value);
            return;
        }
        if addr == ECON2.address() {
            if value & econ2::PKTDEC != 0 {
                self.packet_count = self.packet_count.saturating_sub(1);
                self.pktdec_count += 1;
            }
            self.set(ECON2, value & !econ2::PKTDEC);
            return;
        }

        match bank {
            Bank::Bank0 if addr == ERXRDPTL.address() => {
                self.erxrdpt_latch = value;
                return;
            }
            Bank::Bank0 if addr == ERXRDPTH.address() => {
                let latched = self.erxrdpt_latch;
                self.set(ERXRDPTL, latched);
                self.set(ERXRDPTH, value);
                self.erxrdpt_commits.push(u16::from_le_bytes([latched, value]));
                return;
            }
            Bank::Bank0 if addr == ERXSTL.address() || addr == ERXSTH.address() => {
                self.set_raw(bank, addr, value);
                let start = self.get16(ERXSTL);
                self.set16(ERXWRPTL, start);
                return;
            }
            Bank::Bank2 if addr == MICMD.address() => {
                self.set(MICMD, value);
                if value & micmd::MIIRD != 0 {
                    let data = self.phy_read(self.get(MIREGADR));
                    self.set16(MIRDL, data);
                    self.mii_busy_remaining = self.mii_busy_polls;
                }
                return;
            }
            Bank::Bank2 if addr == MIWRH.address() => {
                self.set(MIWRH, value);
                let data = u16::from_le_bytes([self.get(MIWRL), value]);
                self.phy_write(self.get(MIREGADR), data);
                self.mii_busy_remaining = self.mii_busy_polls;
                return;
            }
            _ => {}
        }
        self.set_raw(bank, addr, value);
    }

    fn bit_set(&mut self, addr: u8, mask: u8) {
        let current = self.raw(self.bank(), addr);
        self.write_reg(addr, current | mask);
    }

    fn bit_clear(&mut self, addr: u8, mask: u8) {
        let current = self.raw(self.bank(), addr);
        self.write_reg(addr, current & !mask);
    }

    fn econ1_changed(&mut self, old: u8, new: u8) {
        let rising = !old & new;
        if rising & econ1::TXRST != 0 {
            self.tx_resets += 1;
        }
        if rising & econ1::TXRTS != 0 {
            self.start_tx();
        }
        if rising & econ1::DMAST != 0 {
            self.run_dma();
        }
    }

    // =========================================================================
    // PHY
    // =========================================================================

    fn phy_read(&mut self, addr: u8) -> u16 {
        match addr {
            phy_reg::PHSTAT1 => {
                let mut value = phstat1::PFDPX | phstat1::PHDPX;
                if self.link_latch {
                    value |= phstat1::LLSTAT;
                }
                self.link_latch = self.link_up;
                value
            }
            phy_reg::PHSTAT2 => {
                let mut value = 0;
                if self.link_up {
                    value |= phstat2::LSTAT;
                }
                if self.phy[phy_reg::PHCON1 as usize] & phcon1::PDPXMD != 0 {
                    value |= phstat2::DPXSTAT;
                }
                value
            }
            _ => self.phy[(addr & 0x1F) as usize],
        }
    }

    fn phy_write(&mut self, addr: u8, value: u16) {
        self.phy[(addr & 0x1F) as usize] = value;
    }

    // =========================================================================
    // Buffer Memory
    // =========================================================================

    fn next_in_ring(&self, addr: u16) -> u16 {
        if addr == self.get16(ERXNDL) {
            self.get16(ERXSTL)
        } else {
            ((addr as usize + 1) % BUFFER_SIZE) as u16
        }
    }

    fn read_memory(&mut self, buf: &mut [u8]) {
        let mut ptr = self.get16(ERDPTL);
        for byte in buf.iter_mut() {
            *byte = self.memory[ptr as usize];
            ptr = self.next_in_ring(ptr);
        }
        self.set16(ERDPTL, ptr);
    }

    fn write_memory(&mut self, data: &[u8]) {
        let mut ptr = self.get16(EWRPTL) as usize;
        for &byte in data {
            self.memory[ptr] = byte;
            ptr = (ptr + 1) % BUFFER_SIZE;
        }
        self.set16(EWRPTL, ptr as u16);
    }

    // =========================================================================
    // Transmitter
    // =========================================================================

    fn start_tx(&mut self) {
        self.tx_attempts += 1;
        let collide = match self.tx_mode {
            TxMode::Normal | TxMode::AbortWithoutCollision => false,
            TxMode::LateCollisionAlways => true,
            TxMode::LateCollisionTimes(n) => self.tx_attempts <= n,
            TxMode::Stuck => return,
        };

        let start = self.get16(ETXSTL) as usize;
        let end = self.get16(ETXNDL) as usize;
        let frame = self.memory[start + 1..=end].to_vec();
        let [count_lo, count_hi] = ((frame.len() + 4) as u16).to_le_bytes();
        let mut status = [count_lo, count_hi, 0, 0, count_lo, count_hi, 0];

        if collide {
            status[3] |= 0x20;
            self.set(EIR, self.get(EIR) | eir::TXERIF);
            self.set(ESTAT, self.get(ESTAT) | estat::LATECOL | estat::TXABRT);
        } else if self.tx_mode == TxMode::AbortWithoutCollision {
            self.set(EIR, self.get(EIR) | eir::TXERIF);
            self.set(ESTAT, self.get(ESTAT) | estat::TXABRT);
        } else {
            status[2] |= 0x80;
            self.set(EIR, self.get(EIR) | eir::TXIF);
            self.set(ECON1, self.get(ECON1) & !econ1::TXRTS);
            self.sent.push(frame);
        }

        for (i, byte) in status.iter().enumerate() {
            self.memory[(end + 1 + i) % BUFFER_SIZE] = *byte;
        }
    }

    // =========================================================================
    // DMA
    // =========================================================================

    fn run_dma(&mut self) {
        self.dma_runs += 1;
        if self.dma_stall {
            return;
        }

        let end = self.get16(EDMANDL);
        let mut src = self.get16(EDMASTL);
        let mut bytes = Vec::new();
        for _ in 0..BUFFER_SIZE {
            bytes.push(self.memory[src as usize]);
            if src == end {
                break;
            }
            src = self.next_in_ring(src);
        }

        if self.get(ECON1) & econ1::CSUMEN != 0 {
            let checksum = reference_checksum(&bytes);
            let [hi, lo] = checksum.to_be_bytes();
            self.set(EDMACSL, lo);
            self.set(EDMACSL.high(), hi);
        } else {
            let mut dst = self.get16(EDMADSTL);
            for byte in bytes {
                self.memory[dst as usize] = byte;
                dst = self.next_in_ring(dst);
            }
        }

        self.set(ECON1, self.get(ECON1) & !econ1::DMAST);
        self.set(EIR, self.get(EIR) | eir::DMAIF);
    }

    // =========================================================================
    // SPI Commands
    // =========================================================================

    fn serve_read(&mut self, opcode: u8, buf: &mut [u8]) {
        self.last_read_len = buf.len();
        if opcode == OP_RBM {
            self.read_memory(buf);
            return;
        }
        assert_eq!(opcode >> 5, 0, "read data requested for opcode {opcode:#04x}");
        let addr = opcode & 0x1F;
        let mac = Self::is_mac_class(self.bank(), addr);
        let value = self.read_reg(addr);
        for (i, byte) in buf.iter_mut().enumerate() {
            *byte = if mac && i == 0 { 0xA5 } else { value };
        }
    }

    fn execute(&mut self, opcode: u8, args: &[u8]) {
        match opcode {
            OP_SRC => {
                self.power_on_defaults();
                self.reset_count += 1;
            }
            OP_WBM => self.write_memory(args),
            OP_RBM => {}
            _ => {
                let addr = opcode & 0x1F;
                match opcode >> 5 {
                    0 => {}
                    2 => self.write_reg(addr, args[0]),
                    4 => self.bit_set(addr, args[0]),
                    5 => self.bit_clear(addr, args[0]),
                    _ => panic!("unknown opcode {opcode:#04x}"),
                }
            }
        }
    }
}

/// Independent RFC 1071 checksum used by the modelled DMA engine
fn reference_checksum(data: &[u8]) -> u16 {
    let mut sum: u64 = 0;
    for pair in data.chunks(2) {
        let word = if pair.len() == 2 {
            (pair[0] as u64) << 8 | pair[1] as u64
        } else {
            (pair[0] as u64) << 8
        };
        sum += word;
    }
    while sum > 0xFFFF {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    !(sum as u16)
}

// =============================================================================
// Mock SPI Device
// =============================================================================

/// Shared handle to the chip model
///
/// Clones share the same model, so a test keeps one clone for inspection
/// and hands another to the driver.
#[derive(Debug, Clone)]
pub struct MockEnc28j60 {
    model: Rc<RefCell<ChipModel>>,
}

impl Default for MockEnc28j60 {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEnc28j60 {
    /// Controller in its power-on state, rev. B7, link up
    pub fn new() -> Self {
        Self {
            model: Rc::new(RefCell::new(ChipModel::new())),
        }
    }

    // =========================================================================
    // Bus Observations
    // =========================================================================

    pub fn transaction_count(&self) -> u32 {
        self.model.borrow().transactions
    }

    pub fn last_read_len(&self) -> usize {
        self.model.borrow().last_read_len
    }

    pub fn reset_count(&self) -> u32 {
        self.model.borrow().reset_count
    }

    /// Fail the next SPI transaction with `kind`
    pub fn fail_next(&self, kind: ErrorKind) {
        self.model.borrow_mut().fail_next = Some(kind);
    }

    pub fn selected_bank(&self) -> Bank {
        self.model.borrow().bank()
    }

    // =========================================================================
    // Registers
    // =========================================================================

    pub fn reg(&self, reg: Register) -> u8 {
        self.model.borrow().get(reg)
    }

    pub fn reg16(&self, low: Register) -> u16 {
        self.model.borrow().get16(low)
    }

    pub fn set_reg16(&self, low: Register, value: u16) {
        self.model.borrow_mut().set16(low, value);
    }

    pub fn econ1(&self) -> u8 {
        self.reg(ECON1)
    }

    pub fn econ2(&self) -> u8 {
        self.reg(ECON2)
    }

    pub fn eir(&self) -> u8 {
        self.reg(EIR)
    }

    pub fn set_eir(&self, value: u8) {
        self.model.borrow_mut().set(EIR, value);
    }

    pub fn poke_econ2(&self, bits: u8) {
        let mut model = self.model.borrow_mut();
        let value = model.get(ECON2) | bits;
        model.set(ECON2, value);
    }

    pub fn set_rx_busy(&self, busy: bool) {
        let mut model = self.model.borrow_mut();
        let mut value = model.get(ESTAT) & !estat::RXBUSY;
        if busy {
            value |= estat::RXBUSY;
        }
        model.set(ESTAT, value);
    }

    pub fn set_clock_stuck(&self, stuck: bool) {
        self.model.borrow_mut().clock_stuck = stuck;
    }

    pub fn set_revision(&self, erevid: u8) {
        self.model.borrow_mut().revision = erevid;
    }

    // =========================================================================
    // Receive Ring
    // =========================================================================

    pub fn packet_count(&self) -> u8 {
        self.model.borrow().packet_count
    }

    pub fn set_packet_count(&self, count: u8) {
        self.model.borrow_mut().packet_count = count;
    }

    /// Let a packet of [`ARRIVAL_LEN`] bytes arrive right after each of the
    /// next `reads` EPKTCNT reads; `u32::MAX` never stops
    pub fn set_arrivals_during_count_reads(&self, reads: u32) {
        self.model.borrow_mut().arrivals_during_count_reads = reads;
    }

    pub fn pktdec_count(&self) -> u32 {
        self.model.borrow().pktdec_count
    }

    /// Committed ERXRDPT value
    pub fn erxrdpt(&self) -> u16 {
        self.reg16(ERXRDPTL)
    }

    /// Every ERXRDPT value committed by a high byte write, in order
    pub fn erxrdpt_commits(&self) -> Vec<u16> {
        self.model.borrow().erxrdpt_commits.clone()
    }

    pub fn erxwrpt(&self) -> u16 {
        self.reg16(ERXWRPTL)
    }

    pub fn set_erxwrpt(&self, value: u16) {
        self.set_reg16(ERXWRPTL, value);
    }

    pub fn erdpt(&self) -> u16 {
        self.reg16(ERDPTL)
    }

    pub fn ewrpt(&self) -> u16 {
        self.reg16(EWRPTL)
    }

    /// Store a received frame in the ring as the hardware would
    ///
    /// Returns the packet's start address.
    pub fn inject_frame(&self, frame: &[u8]) -> u16 {
        self.inject_frame_with_status(frame, 0)
    }

    /// Like [`MockEnc28j60::inject_frame`] with extra receive status bits
    pub fn inject_frame_with_status(&self, frame: &[u8], status_bits: u32) -> u16 {
        let mut model = self.model.borrow_mut();
        let start = model.get16(ERXWRPTL);
        let ring_start = model.get16(ERXSTL) as usize;
        let ring_stop = model.get16(ERXNDL) as usize;
        let ring_size = ring_stop - ring_start + 1;

        let byte_count = frame.len() + 4;
        let mut next = start as usize + 6 + byte_count;
        if next % 2 == 1 {
            next += 1;
        }
        while next > ring_stop {
            next -= ring_size;
        }

        let status = byte_count as u32 | RSV_RECEIVED_OK | status_bits;
        let mut bytes = Vec::with_capacity(6 + byte_count);
        bytes.extend_from_slice(&(next as u16).to_le_bytes());
        bytes.extend_from_slice(&status.to_le_bytes());
        bytes.extend_from_slice(frame);
        bytes.extend_from_slice(&[0xC0, 0xC1, 0xC2, 0xC3]);

        let mut ptr = start;
        for byte in bytes {
            model.memory[ptr as usize] = byte;
            ptr = model.next_in_ring(ptr);
        }

        model.set16(ERXWRPTL, next as u16);
        model.packet_count += 1;
        let flags = model.get(EIR) | eir::PKTIF;
        model.set(EIR, flags);
        start
    }

    // =========================================================================
    // Buffer Memory
    // =========================================================================

    pub fn memory(&self, addr: u16, len: usize) -> Vec<u8> {
        let model = self.model.borrow();
        (0..len)
            .map(|i| model.memory[(addr as usize + i) % BUFFER_SIZE])
            .collect()
    }

    pub fn poke(&self, addr: u16, data: &[u8]) {
        let mut model = self.model.borrow_mut();
        for (i, byte) in data.iter().enumerate() {
            model.memory[(addr as usize + i) % BUFFER_SIZE] = *byte;
        }
    }

    // =========================================================================
    // PHY
    // =========================================================================

    pub fn phy(&self, addr: u8) -> u16 {
        self.model.borrow().phy[(addr & 0x1F) as usize]
    }

    /// Number of MISTAT reads that report BUSY after each MII command
    ///
    /// `u32::MAX` keeps the interface busy forever.
    pub fn set_mii_busy_polls(&self, polls: u32) {
        self.model.borrow_mut().mii_busy_polls = polls;
    }

    /// Change the link state; a drop is latched until PHSTAT1 is read
    pub fn set_link(&self, up: bool) {
        let mut model = self.model.borrow_mut();
        model.link_up = up;
        if !up {
            model.link_latch = false;
        }
    }

    // =========================================================================
    // Transmitter and DMA
    // =========================================================================

    pub fn set_tx_mode(&self, mode: TxMode) {
        self.model.borrow_mut().tx_mode = mode;
    }

    /// TXRTS rising edges seen
    pub fn tx_attempts(&self) -> u32 {
        self.model.borrow().tx_attempts
    }

    /// TXRST rising edges seen
    pub fn tx_resets(&self) -> u32 {
        self.model.borrow().tx_resets
    }

    /// Frames that completed transmission (control byte excluded)
    pub fn sent_frames(&self) -> Vec<Vec<u8>> {
        self.model.borrow().sent.clone()
    }

    /// Keep DMAST set after a DMA start
    pub fn set_dma_stall(&self, stall: bool) {
        self.model.borrow_mut().dma_stall = stall;
    }

    pub fn dma_runs(&self) -> u32 {
        self.model.borrow().dma_runs
    }
}

impl ErrorType for MockEnc28j60 {
    type Error = ErrorKind;
}

impl SpiDevice for MockEnc28j60 {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), ErrorKind> {
        let mut model = self.model.borrow_mut();
        model.transactions += 1;
        if let Some(kind) = model.fail_next.take() {
            return Err(kind);
        }

        let mut opcode = None;
        let mut args = Vec::new();
        for op in operations.iter_mut() {
            match op {
                Operation::Write(data) => {
                    let mut bytes = data.iter().copied();
                    if opcode.is_none() {
                        opcode = bytes.next();
                    }
                    args.extend(bytes);
                }
                Operation::Read(buf) => {
                    let code = opcode.unwrap_or_else(|| panic!("read before opcode"));
                    model.serve_read(code, buf);
                }
                Operation::DelayNs(_) => {}
                Operation::Transfer(..) | Operation::TransferInPlace(..) => {
                    panic!("full-duplex transfers are not used by the driver")
                }
            }
        }

        if let Some(code) = opcode {
            model.execute(code, &args);
        }
        Ok(())
    }
}

// =============================================================================
// Mock Delay
// =============================================================================

/// Mock delay for testing without actual timing
///
/// Records delays for verification without actually waiting.
#[derive(Debug, Default)]
pub struct MockDelay {
    /// Total nanoseconds delayed
    total_ns: RefCell<u64>,
}

impl MockDelay {
    /// Create a new mock delay
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total nanoseconds that were "delayed"
    pub fn total_ns(&self) -> u64 {
        *self.total_ns.borrow()
    }

    /// Get total microseconds that were "delayed"
    pub fn total_us(&self) -> u64 {
        self.total_ns() / 1_000
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        *self.total_ns.borrow_mut() += ns as u64;
    }
}

// =============================================================================
// Driver Fixtures
// =============================================================================

/// Driver initialized with the default configuration
pub fn running_driver(chip: &MockEnc28j60) -> Enc28j60<MockEnc28j60> {
    running_driver_with(chip, Enc28j60Config::new())
}

/// Driver initialized with `config`
pub fn running_driver_with(
    chip: &MockEnc28j60,
    config: Enc28j60Config,
) -> Enc28j60<MockEnc28j60> {
    let mut eth = Enc28j60::new(chip.clone());
    eth.init(config, MockDelay::new()).unwrap();
    eth
}

/// Ethernet frame with the given addresses, EtherType and payload
pub fn build_frame(dest: [u8; 6], src: [u8; 6], ether_type: u16, payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(14 + payload.len());
    frame.extend_from_slice(&dest);
    frame.extend_from_slice(&src);
    frame.extend_from_slice(&ether_type.to_be_bytes());
    frame.extend_from_slice(payload);
    frame
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_checksum_matches_known_header() {
        let header = [
            0x45, 0x00, 0x00, 0x3c, 0x1c, 0x46, 0x40, 0x00, 0x40, 0x06, 0x00, 0x00, 0xac, 0x10,
            0x0a, 0x63, 0xac, 0x10, 0x0a, 0x0c,
        ];
        assert_eq!(reference_checksum(&header), 0xB1E6);
    }

    #[test]
    fn injected_frames_chain_through_ring() {
        let chip = MockEnc28j60::new();
        chip.set_reg16(ERXSTL, 0x0000);
        chip.set_reg16(ERXNDL, 0x00FF);
        chip.set_erxwrpt(0x00F0);

        let start = chip.inject_frame(&[0x11; 15]);
        assert_eq!(start, 0x00F0);
        // 6 + 15 + 4 = 25 bytes, padded to even, wrapped
        assert_eq!(chip.erxwrpt(), (0x00F0 + 26 - 0x100) as u16);
        assert_eq!(chip.packet_count(), 1);
    }
}
