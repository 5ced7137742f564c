//! Configuration checksum.
//!
//! The BIOS validates cells 0x10-0x2D at POST by summing them into 16 bits
//! and comparing against the big-endian word at 0x2E/0x2F. A mismatch sets
//! the "checksum bad" diagnostic bit and the machine asks for setup, so every
//! write inside the range has to be followed by [`Cmos::update_checksum`].
//!
//! Time, alarm and status registers are outside the range and never touch
//! the checksum.

use super::{regs, Cmos, CMOS_SIZE};
use crate::port::{PortError, PortIo};
use std::ops::RangeInclusive;
use tracing::{info, warn};

/// Cells summed into the checksum.
pub const CHECKSUM_RANGE: RangeInclusive<u8> = 0x10..=0x2d;

/// Whether a write to `addr` invalidates the checksum.
pub fn covers(addr: u8) -> bool {
    CHECKSUM_RANGE.contains(&addr)
}

/// Checksum of an in-memory image.
pub fn compute(cells: &[u8; CMOS_SIZE]) -> u16 {
    cells[*CHECKSUM_RANGE.start() as usize..=*CHECKSUM_RANGE.end() as usize]
        .iter()
        .fold(0u16, |sum, &b| sum.wrapping_add(u16::from(b)))
}

/// Checksum word stored in an in-memory image.
pub fn stored(cells: &[u8; CMOS_SIZE]) -> u16 {
    u16::from_be_bytes([
        cells[regs::CHECKSUM_HI as usize],
        cells[regs::CHECKSUM_LO as usize],
    ])
}

/// Result of comparing the stored and computed checksums.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecksumStatus {
    pub computed: u16,
    pub stored: u16,
}

impl ChecksumStatus {
    pub fn is_valid(&self) -> bool {
        self.computed == self.stored
    }
}

impl<P: PortIo> Cmos<P> {
    /// Sum the covered range, wrapping at 16 bits.
    pub fn compute_checksum(&mut self) -> Result<u16, PortError> {
        let mut sum = 0u16;
        for addr in CHECKSUM_RANGE {
            sum = sum.wrapping_add(u16::from(self.read(addr)?));
        }
        Ok(sum)
    }

    pub fn stored_checksum(&mut self) -> Result<u16, PortError> {
        let hi = self.read(regs::CHECKSUM_HI)?;
        let lo = self.read(regs::CHECKSUM_LO)?;
        Ok(u16::from_be_bytes([hi, lo]))
    }

    /// Compare the stored checksum against the covered range.
    ///
    /// A mismatch is logged but never repaired here.
    pub fn checksum_status(&mut self) -> Result<ChecksumStatus, PortError> {
        let status = ChecksumStatus {
            computed: self.compute_checksum()?,
            stored: self.stored_checksum()?,
        };
        if !status.is_valid() {
            warn!(
                "CMOS checksum mismatch: stored {:#06x}, computed {:#06x}",
                status.stored, status.computed
            );
        }
        Ok(status)
    }

    pub fn verify_checksum(&mut self) -> Result<bool, PortError> {
        Ok(self.checksum_status()?.is_valid())
    }

    /// Recompute and store the checksum. Returns the new value.
    pub fn update_checksum(&mut self) -> Result<u16, PortError> {
        let sum = self.compute_checksum()?;
        let [hi, lo] = sum.to_be_bytes();
        self.write(regs::CHECKSUM_HI, hi)?;
        self.write(regs::CHECKSUM_LO, lo)?;
        info!("CMOS checksum updated to {:#06x}", sum);
        Ok(sum)
    }
}
