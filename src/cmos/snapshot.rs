//! Whole-store snapshots, factory defaults and comparison.
//!
//! A snapshot file is the 64 cells in address order with no header. Loading
//! also accepts 128-byte images (as written by tools that assume an AT-size
//! store); only the first 64 bytes are used.

use super::{is_read_only, regs, Cmos, NvrError, CMOS_SIZE, REG_B_SET};
use crate::port::{PortError, PortIo};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Largest accepted image.
const EXTENDED_IMAGE_SIZE: usize = 128;

/// A copy of the 64 cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot(pub [u8; CMOS_SIZE]);

impl Snapshot {
    /// Validate an image, keeping the first 64 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, NvrError> {
        match bytes.len() {
            CMOS_SIZE | EXTENDED_IMAGE_SIZE => {
                let mut cells = [0u8; CMOS_SIZE];
                cells.copy_from_slice(&bytes[..CMOS_SIZE]);
                Ok(Self(cells))
            }
            len => Err(NvrError::SnapshotSize { len }),
        }
    }

    pub fn load(path: &Path) -> Result<Self, NvrError> {
        let bytes = fs::read(path).map_err(|source| NvrError::SnapshotFile {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("read {} bytes from {}", bytes.len(), path.display());
        Self::from_bytes(&bytes)
    }

    pub fn save(&self, path: &Path) -> Result<(), NvrError> {
        fs::write(path, self.0).map_err(|source| NvrError::SnapshotFile {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn cells(&self) -> &[u8; CMOS_SIZE] {
        &self.0
    }
}

/// One differing cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellDiff {
    pub address: u8,
    pub left: u8,
    pub right: u8,
}

/// Cells that differ, in ascending address order.
pub fn diff(left: &Snapshot, right: &Snapshot) -> Vec<CellDiff> {
    left.0
        .iter()
        .zip(right.0.iter())
        .enumerate()
        .filter(|(_, (l, r))| l != r)
        .map(|(address, (&left, &right))| CellDiff {
            address: address as u8,
            left,
            right,
        })
        .collect()
}

/// Human-readable name of a cell, for the cells that have one.
pub fn cell_label(address: u8) -> Option<&'static str> {
    let label = match address {
        regs::SECONDS => "Seconds",
        regs::ALARM_SECONDS => "Alarm seconds",
        regs::MINUTES => "Minutes",
        regs::ALARM_MINUTES => "Alarm minutes",
        regs::HOURS => "Hours",
        regs::ALARM_HOURS => "Alarm hours",
        regs::DAY_OF_WEEK => "Day of week",
        regs::DAY_OF_MONTH => "Day of month",
        regs::MONTH => "Month",
        regs::YEAR => "Year",
        regs::REG_A => "Register A",
        regs::REG_B => "Register B",
        regs::REG_C => "Register C (flags)",
        regs::REG_D => "Register D (battery)",
        regs::DIAGNOSTIC => "Diagnostic status",
        regs::SHUTDOWN => "Shutdown status",
        regs::FLOPPY => "Floppy types",
        regs::HARD_DISK => "Hard disk types",
        regs::EQUIPMENT => "Equipment byte",
        regs::BASE_MEM_LO => "Base mem low",
        regs::BASE_MEM_HI => "Base mem high",
        regs::EXT_MEM_LO => "Ext mem low",
        regs::EXT_MEM_HI => "Ext mem high",
        regs::DISK0_EXT => "HD0 ext type",
        regs::DISK1_EXT => "HD1 ext type",
        regs::CHECKSUM_HI => "Checksum high",
        regs::CHECKSUM_LO => "Checksum low",
        regs::CENTURY => "Century",
        _ => return None,
    };
    Some(label)
}

/// Defaults written by [`Cmos::factory_reset`], in write order.
///
/// 24-hour BCD clock at 1024 Hz, one 720KB drive A, no hard disk, EGA,
/// 640KB base memory, all alarm fields wildcarded.
const FACTORY_DEFAULTS: [(u8, u8); 16] = [
    (regs::REG_A, 0x26),
    (regs::DIAGNOSTIC, 0x00),
    (regs::SHUTDOWN, 0x00),
    (regs::FLOPPY, 0x30),
    (regs::HARD_DISK, 0x00),
    (regs::EQUIPMENT, 0x01),
    (regs::BASE_MEM_LO, 0x80),
    (regs::BASE_MEM_HI, 0x02),
    (regs::EXT_MEM_LO, 0x00),
    (regs::EXT_MEM_HI, 0x00),
    (regs::DISK0_EXT, 0x00),
    (regs::DISK1_EXT, 0x00),
    (regs::CENTURY, 0x20),
    (regs::ALARM_SECONDS, 0xc0),
    (regs::ALARM_MINUTES, 0xc0),
    (regs::ALARM_HOURS, 0xc0),
];

const FACTORY_REGISTER_B: u8 = 0x02;

impl<P: PortIo> Cmos<P> {
    /// Read all 64 cells.
    ///
    /// Register C is read like every other cell, which clears its pending
    /// interrupt flags.
    pub fn export_snapshot(&mut self) -> Result<Snapshot, PortError> {
        self.wait_for_update()?;
        let mut cells = [0u8; CMOS_SIZE];
        for (addr, cell) in cells.iter_mut().enumerate() {
            *cell = self.read(addr as u8)?;
        }
        Ok(Snapshot(cells))
    }

    /// Write an image back to the store.
    ///
    /// Updates are halted throughout. Registers C and D are skipped and
    /// Register B ends up as the imported value with SET cleared. The
    /// checksum is written as imported, not recomputed.
    pub fn import_snapshot(&mut self, bytes: &[u8]) -> Result<(), NvrError> {
        let snapshot = Snapshot::from_bytes(bytes)?;
        self.restore(&snapshot)?;
        Ok(())
    }

    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<(), PortError> {
        let current_b = self.read(regs::REG_B)?;
        self.write(regs::REG_B, current_b | REG_B_SET)?;

        let imported_b = snapshot.0[regs::REG_B as usize];
        for (addr, &value) in snapshot.0.iter().enumerate() {
            let addr = addr as u8;
            if is_read_only(addr) {
                continue;
            }
            let value = if addr == regs::REG_B {
                imported_b | REG_B_SET
            } else {
                value
            };
            self.write(addr, value)?;
        }

        self.write(regs::REG_B, imported_b & !REG_B_SET)?;
        info!("restored {} CMOS cells", CMOS_SIZE - 2);
        Ok(())
    }

    /// Restore factory defaults and zero the unused cells.
    ///
    /// The clock is left as it was. Running it twice produces the same store.
    pub fn factory_reset(&mut self) -> Result<(), PortError> {
        let reg_b = self.read(regs::REG_B)?;
        self.write(regs::REG_B, reg_b | REG_B_SET)?;

        for (addr, value) in FACTORY_DEFAULTS {
            self.write(addr, value)?;
        }
        for addr in (0x1b..=0x2d).chain(0x33..=0x3f) {
            self.write(addr, 0x00)?;
        }

        self.write(regs::REG_B, FACTORY_REGISTER_B)?;
        self.update_checksum()?;
        Ok(())
    }
}
