//! Internet checksum (RFC 1071)
//!
//! One's complement sum of big-endian 16-bit words. Data may arrive in
//! chunks of any length; an odd byte at the end of one chunk pairs with the
//! first byte of the next.

/// Running one's complement sum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChecksumAccumulator {
    sum: u32,
    pending: Option<u8>,
}

impl ChecksumAccumulator {
    /// Empty accumulator
    pub const fn new() -> Self {
        Self {
            sum: 0,
            pending: None,
        }
    }

    /// Add a chunk of bytes
    pub fn update(&mut self, mut data: &[u8]) {
        if let Some(high) = self.pending.take() {
            match data.split_first() {
                Some((&low, rest)) => {
                    self.add_word(u16::from_be_bytes([high, low]));
                    data = rest;
                }
                None => {
                    self.pending = Some(high);
                    return;
                }
            }
        }

        let mut words = data.chunks_exact(2);
        for word in words.by_ref() {
            self.add_word(u16::from_be_bytes([word[0], word[1]]));
        }
        if let [last] = words.remainder() {
            self.pending = Some(*last);
        }
    }

    #[inline(always)]
    fn add_word(&mut self, word: u16) {
        self.sum += word as u32;
        // Keep the carry from overflowing on long inputs
        if self.sum > 0xFFFF {
            self.sum = (self.sum & 0xFFFF) + (self.sum >> 16);
        }
    }

    /// Fold, complement and return the checksum
    ///
    /// A trailing odd byte is padded with a zero low byte.
    pub fn finish(mut self) -> u16 {
        if let Some(high) = self.pending.take() {
            self.add_word(u16::from_be_bytes([high, 0]));
        }
        let mut sum = self.sum;
        sum = (sum & 0xFFFF) + (sum >> 16);
        sum = (sum & 0xFFFF) + (sum >> 16);
        !(sum as u16)
    }
}

/// Checksum of a contiguous byte slice
pub fn internet_checksum(data: &[u8]) -> u16 {
    let mut acc = ChecksumAccumulator::new();
    acc.update(data);
    acc.finish()
}

// =============================================================================
// Unit Tests
// =============================================================================
