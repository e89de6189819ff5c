//! Configuration types for the ENC28J60 driver

use super::error::{ConfigError, ConfigResult};
use super::ring::RxRing;
use crate::internal::constants::{
    BUFFER_SIZE, DEFAULT_LED_CONFIG, DEFAULT_MAC_ADDR, DEFAULT_POLL_LIMIT, DEFAULT_RX_START,
    DEFAULT_RX_STOP, DEFAULT_TX_START, MAX_FRAME_SIZE, TX_REGION_SIZE,
};
use crate::internal::register::eth::erxfcon;

/// Smallest frame length accepted for MAMXFL (minimum Ethernet frame with CRC)
const MIN_MAX_FRAME_LEN: u16 = 64;

/// Ethernet duplex mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Duplex {
    /// Half duplex
    Half,
    /// Full duplex
    #[default]
    Full,
}

/// CLKOUT pin configuration (ECOCON)
///
/// Divides the 25 MHz main clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ClockOut {
    /// CLKOUT driven low
    #[default]
    Disabled = 0,
    /// 25 MHz
    Div1 = 1,
    /// 12.5 MHz
    Div2 = 2,
    /// 8.333 MHz
    Div3 = 3,
    /// 6.25 MHz
    Div4 = 4,
    /// 3.125 MHz
    Div8 = 5,
}

impl ClockOut {
    /// ECOCON register value
    #[must_use]
    pub const fn to_reg_value(self) -> u8 {
        self as u8
    }

    /// Decode an ECOCON value; reserved encodings read as disabled
    #[must_use]
    pub const fn from_reg_value(value: u8) -> Self {
        match value & 0x07 {
            1 => ClockOut::Div1,
            2 => ClockOut::Div2,
            3 => ClockOut::Div3,
            4 => ClockOut::Div4,
            5 => ClockOut::Div8,
            _ => ClockOut::Disabled,
        }
    }

    /// Output frequency in Hz
    #[must_use]
    pub const fn frequency_hz(self) -> u32 {
        match self {
            ClockOut::Disabled => 0,
            ClockOut::Div1 => 25_000_000,
            ClockOut::Div2 => 12_500_000,
            ClockOut::Div3 => 8_333_333,
            ClockOut::Div4 => 6_250_000,
            ClockOut::Div8 => 3_125_000,
        }
    }
}

/// How buffer checksums are computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChecksumMode {
    /// Stream the bytes over SPI and sum them on the host
    #[default]
    Software,
    /// Use the controller's DMA checksum engine
    Dma,
}

/// Silicon revision (EREVID)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Revision {
    /// Rev. B1
    B1,
    /// Rev. B4
    B4,
    /// Rev. B5
    B5,
    /// Rev. B7
    B7,
    /// Anything else
    Unknown(u8),
}

impl Revision {
    /// Decode an EREVID value
    #[must_use]
    pub const fn from_erevid(value: u8) -> Self {
        match value {
            0x02 => Revision::B1,
            0x04 => Revision::B4,
            0x05 => Revision::B5,
            0x06 => Revision::B7,
            other => Revision::Unknown(other),
        }
    }

    /// Raw EREVID value
    #[must_use]
    pub const fn erevid(self) -> u8 {
        match self {
            Revision::B1 => 0x02,
            Revision::B4 => 0x04,
            Revision::B5 => 0x05,
            Revision::B7 => 0x06,
            Revision::Unknown(value) => value,
        }
    }

    /// Whether this silicon needs the late-collision retransmit workaround
    #[must_use]
    pub const fn needs_tx_errata_workaround(self) -> bool {
        matches!(self, Revision::B5 | Revision::B7)
    }
}

// =============================================================================
// Receive Filter
// =============================================================================

/// Receive filter configuration (ERXFCON)
///
/// With every filter disabled the controller is promiscuous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReceiveFilter {
    /// Accept frames addressed to the station address
    pub unicast: bool,
    /// Require every enabled filter to match instead of any
    pub and_logic: bool,
    /// Drop frames with a bad CRC
    pub crc_check: bool,
    /// Pattern match filter
    pub pattern_match: bool,
    /// Magic packet filter
    pub magic_packet: bool,
    /// Hash table filter
    pub hash_table: bool,
    /// Accept all multicast frames
    pub multicast: bool,
    /// Accept broadcast frames
    pub broadcast: bool,
}

impl Default for ReceiveFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiveFilter {
    /// Unicast to our address, broadcast, CRC checked
    #[must_use]
    pub const fn new() -> Self {
        Self {
            unicast: true,
            and_logic: false,
            crc_check: true,
            pattern_match: false,
            magic_packet: false,
            hash_table: false,
            multicast: false,
            broadcast: true,
        }
    }

    /// Accept every frame, including ones with CRC errors
    #[must_use]
    pub const fn promiscuous() -> Self {
        Self {
            unicast: false,
            and_logic: false,
            crc_check: false,
            pattern_match: false,
            magic_packet: false,
            hash_table: false,
            multicast: false,
            broadcast: false,
        }
    }

    /// Enable or disable the multicast filter
    #[must_use]
    pub const fn with_multicast(mut self, enabled: bool) -> Self {
        self.multicast = enabled;
        self
    }

    /// Enable or disable the hash table filter
    #[must_use]
    pub const fn with_hash_table(mut self, enabled: bool) -> Self {
        self.hash_table = enabled;
        self
    }

    /// Enable or disable the broadcast filter
    #[must_use]
    pub const fn with_broadcast(mut self, enabled: bool) -> Self {
        self.broadcast = enabled;
        self
    }

    /// Enable or disable the post-filter CRC check
    #[must_use]
    pub const fn with_crc_check(mut self, enabled: bool) -> Self {
        self.crc_check = enabled;
        self
    }

    /// Encode as an ERXFCON value
    #[must_use]
    pub const fn to_erxfcon(self) -> u8 {
        let mut value = 0;
        if self.unicast {
            value |= erxfcon::UCEN;
        }
        if self.and_logic {
            value |= erxfcon::ANDOR;
        }
        if self.crc_check {
            value |= erxfcon::CRCEN;
        }
        if self.pattern_match {
            value |= erxfcon::PMEN;
        }
        if self.magic_packet {
            value |= erxfcon::MPEN;
        }
        if self.hash_table {
            value |= erxfcon::HTEN;
        }
        if self.multicast {
            value |= erxfcon::MCEN;
        }
        if self.broadcast {
            value |= erxfcon::BCEN;
        }
        value
    }

    /// Decode an ERXFCON value
    #[must_use]
    pub const fn from_erxfcon(value: u8) -> Self {
        Self {
            unicast: value & erxfcon::UCEN != 0,
            and_logic: value & erxfcon::ANDOR != 0,
            crc_check: value & erxfcon::CRCEN != 0,
            pattern_match: value & erxfcon::PMEN != 0,
            magic_packet: value & erxfcon::MPEN != 0,
            hash_table: value & erxfcon::HTEN != 0,
            multicast: value & erxfcon::MCEN != 0,
            broadcast: value & erxfcon::BCEN != 0,
        }
    }

    /// No filter enabled
    #[must_use]
    pub const fn is_promiscuous(self) -> bool {
        self.to_erxfcon() & !(erxfcon::ANDOR | erxfcon::CRCEN) == 0
    }
}

// =============================================================================
// Memory Layout
// =============================================================================

/// Split of the 8 KiB buffer between the receive ring and the transmit buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MemoryLayout {
    /// First byte of the receive ring (even)
    pub rx_start: u16,
    /// Last byte of the receive ring, inclusive (odd)
    pub rx_stop: u16,
    /// Transmit control byte address
    pub tx_start: u16,
}

impl Default for MemoryLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLayout {
    /// Receive ring at the bottom, one maximum-size frame at the top
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rx_start: DEFAULT_RX_START,
            rx_stop: DEFAULT_RX_STOP,
            tx_start: DEFAULT_TX_START,
        }
    }

    /// Check the layout against the controller's constraints
    ///
    /// - `rx_start` even and `rx_stop` odd (ERXRDPT errata)
    /// - `rx_stop > rx_start`; a ring that wraps the address space is not supported
    /// - transmit region (control byte, frame, status vector) inside the
    ///   buffer and disjoint from the ring
    pub const fn validate(&self) -> ConfigResult<()> {
        let tx_end = self.tx_start as usize + TX_REGION_SIZE;
        let valid = self.rx_start % 2 == 0
            && self.rx_stop % 2 == 1
            && self.rx_stop > self.rx_start
            && (self.rx_stop as usize) < BUFFER_SIZE
            && tx_end <= BUFFER_SIZE
            && (self.tx_start > self.rx_stop || tx_end <= self.rx_start as usize);
        if valid {
            Ok(())
        } else {
            Err(ConfigError::InvalidMemoryLayout)
        }
    }

    /// The receive ring described by this layout
    pub const fn rx_ring(&self) -> ConfigResult<RxRing> {
        match RxRing::new(self.rx_start, self.rx_stop) {
            Some(ring) => Ok(ring),
            None => Err(ConfigError::InvalidMemoryLayout),
        }
    }
}

// =============================================================================
// Driver Configuration
// =============================================================================

/// Complete driver configuration
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Enc28j60Config {
    /// Station MAC address
    pub mac_address: [u8; 6],
    /// Duplex mode for MAC and PHY
    pub duplex: Duplex,
    /// Receive ring and transmit buffer placement
    pub memory: MemoryLayout,
    /// Receive filter
    pub receive_filter: ReceiveFilter,
    /// CLKOUT configuration
    pub clock_out: ClockOut,
    /// PHLCON value
    pub led_config: u16,
    /// Largest frame accepted or sent, CRC included (MAMXFL)
    pub max_frame_len: u16,
    /// Buffer checksum engine
    pub checksum_mode: ChecksumMode,
    /// Iteration budget for busy-waits
    pub poll_limit: u32,
}

impl Default for Enc28j60Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Enc28j60Config {
    /// Create a new configuration with defaults
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mac_address: DEFAULT_MAC_ADDR,
            duplex: Duplex::Full,
            memory: MemoryLayout::new(),
            receive_filter: ReceiveFilter::new(),
            clock_out: ClockOut::Disabled,
            led_config: DEFAULT_LED_CONFIG,
            max_frame_len: MAX_FRAME_SIZE as u16,
            checksum_mode: ChecksumMode::Software,
            poll_limit: DEFAULT_POLL_LIMIT,
        }
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    /// Set the MAC address
    ///
    /// If not set, a default locally-administered address
    /// (02:00:00:00:00:01) will be used.
    #[must_use]
    pub const fn with_mac_address(mut self, addr: [u8; 6]) -> Self {
        self.mac_address = addr;
        self
    }

    /// Set the duplex mode
    #[must_use]
    pub const fn with_duplex(mut self, duplex: Duplex) -> Self {
        self.duplex = duplex;
        self
    }

    /// Set the buffer memory layout
    #[must_use]
    pub const fn with_memory_layout(mut self, memory: MemoryLayout) -> Self {
        self.memory = memory;
        self
    }

    /// Set the receive filter
    #[must_use]
    pub const fn with_receive_filter(mut self, filter: ReceiveFilter) -> Self {
        self.receive_filter = filter;
        self
    }

    /// Enable or disable promiscuous mode
    #[must_use]
    pub const fn with_promiscuous(mut self, enabled: bool) -> Self {
        self.receive_filter = if enabled {
            ReceiveFilter::promiscuous()
        } else {
            ReceiveFilter::new()
        };
        self
    }

    /// Set the CLKOUT configuration
    #[must_use]
    pub const fn with_clock_out(mut self, clock_out: ClockOut) -> Self {
        self.clock_out = clock_out;
        self
    }

    /// Set the LED configuration (PHLCON)
    #[must_use]
    pub const fn with_led_config(mut self, led_config: u16) -> Self {
        self.led_config = led_config;
        self
    }

    /// Set the maximum frame length
    #[must_use]
    pub const fn with_max_frame_len(mut self, len: u16) -> Self {
        self.max_frame_len = len;
        self
    }

    /// Set the checksum engine
    #[must_use]
    pub const fn with_checksum_mode(mut self, mode: ChecksumMode) -> Self {
        self.checksum_mode = mode;
        self
    }

    /// Set the busy-wait budget
    #[must_use]
    pub const fn with_poll_limit(mut self, limit: u32) -> Self {
        self.poll_limit = limit;
        self
    }

    /// Validate the whole configuration
    pub const fn validate(&self) -> ConfigResult<()> {
        if let Err(e) = self.memory.validate() {
            return Err(e);
        }
        // Station address must be unicast
        if self.mac_address[0] & 0x01 != 0 {
            return Err(ConfigError::InvalidConfig);
        }
        if self.max_frame_len < MIN_MAX_FRAME_LEN || self.max_frame_len as usize > MAX_FRAME_SIZE {
            return Err(ConfigError::InvalidConfig);
        }
        if self.poll_limit == 0 {
            return Err(ConfigError::InvalidConfig);
        }
        Ok(())
    }
}

/// Driver state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Not initialized
    #[default]
    Uninitialized,
    /// Initialized, receiver enabled
    Running,
    /// In power save, receiver disabled
    PoweredDown,
}

// =============================================================================
// Unit Tests
// =============================================================================
