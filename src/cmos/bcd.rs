//! BCD/binary data mode.
//!
//! The MC146818 stores time and alarm fields either as packed BCD (one
//! decimal digit per nibble) or as plain binary, selected by the DM bit of
//! Register B. The same bit also governs encoding on write, so a caller that
//! converts several fields must take the mode once and apply it to all of
//! them. [`DataMode`] is that snapshot.

use super::status::RegisterB;

/// Packed BCD to binary.
pub fn bcd_to_bin(bcd: u8) -> u8 {
    (bcd >> 4) * 10 + (bcd & 0x0f)
}

/// Binary to packed BCD. Only meaningful for 0-99.
pub fn bin_to_bcd(bin: u8) -> u8 {
    ((bin / 10) << 4) | (bin % 10)
}

/// Encoding of the clock fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataMode {
    Bcd,
    Binary,
}

impl DataMode {
    /// Extract the mode from a Register B value.
    pub fn from_register_b(reg_b: u8) -> Self {
        if RegisterB::from_bits_retain(reg_b).contains(RegisterB::DM) {
            DataMode::Binary
        } else {
            DataMode::Bcd
        }
    }

    /// Decode a stored field.
    pub fn decode(self, raw: u8) -> u8 {
        match self {
            DataMode::Bcd => bcd_to_bin(raw),
            DataMode::Binary => raw,
        }
    }

    /// Encode a value for storage.
    pub fn encode(self, value: u8) -> u8 {
        match self {
            DataMode::Bcd => bin_to_bcd(value),
            DataMode::Binary => value,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DataMode::Bcd => "BCD",
            DataMode::Binary => "Binary",
        }
    }
}
