//! MC146818 RTC/CMOS register store.
//!
//! The PC1640 carries a 64-byte battery-backed store behind the usual AT
//! index/data port pair. The host writes a register index to port 0x70, then
//! reads or writes the register through port 0x71. Unlike an AT, only six
//! address bits are decoded and bit 7 of the index does not mask NMI.
//!
//! # Layout
//!
//! ```text
//! 0x00-0x09  time, date and alarm            (BCD or binary, see Register B)
//! 0x0A-0x0D  status registers A-D            (C and D are read-only)
//! 0x0E       diagnostic status
//! 0x0F       shutdown status
//! 0x10       floppy drive types              ┐
//! 0x12       hard disk types                 │
//! 0x14       equipment byte                  │ checksummed
//! 0x15-0x18  base / extended memory (KB, LE) │
//! 0x19-0x1A  hard disk extended types        ┘ (through 0x2D)
//! 0x2E-0x2F  checksum (big-endian)
//! 0x32       century
//! ```
//!
//! [`Cmos`] is the handle every core operation goes through. It owns the
//! [`PortIo`] backend, so the same code runs against `/dev/port`, direct
//! port instructions or a simulated machine.
//!
//! Reference: <https://wiki.osdev.org/CMOS>

pub mod bcd;
pub mod checksum;
pub mod config;
pub mod rtc;
pub mod snapshot;
pub mod status;

use crate::port::{PortError, PortIo};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{trace, warn};

/// CMOS I/O port for the index register.
pub const CMOS_PORT_INDEX: u16 = 0x70;

/// CMOS I/O port for the data register.
pub const CMOS_PORT_DATA: u16 = 0x71;

/// Number of addressable cells on the PC1640.
pub const CMOS_SIZE: usize = 64;

/// Mask applied to every register address.
pub const ADDRESS_MASK: u8 = 0x3f;

/// Register addresses.
pub mod regs {
    pub const SECONDS: u8 = 0x00;
    pub const ALARM_SECONDS: u8 = 0x01;
    pub const MINUTES: u8 = 0x02;
    pub const ALARM_MINUTES: u8 = 0x03;
    pub const HOURS: u8 = 0x04;
    pub const ALARM_HOURS: u8 = 0x05;
    pub const DAY_OF_WEEK: u8 = 0x06;
    pub const DAY_OF_MONTH: u8 = 0x07;
    pub const MONTH: u8 = 0x08;
    pub const YEAR: u8 = 0x09;

    /// Status Register A - UIP, divider and rate select.
    pub const REG_A: u8 = 0x0a;
    /// Status Register B - mode and interrupt enables.
    pub const REG_B: u8 = 0x0b;
    /// Status Register C - interrupt flags (read clears).
    pub const REG_C: u8 = 0x0c;
    /// Status Register D - bit 7 indicates valid RAM/time.
    pub const REG_D: u8 = 0x0d;

    pub const DIAGNOSTIC: u8 = 0x0e;
    pub const SHUTDOWN: u8 = 0x0f;
    pub const FLOPPY: u8 = 0x10;
    pub const HARD_DISK: u8 = 0x12;
    pub const EQUIPMENT: u8 = 0x14;
    pub const BASE_MEM_LO: u8 = 0x15;
    pub const BASE_MEM_HI: u8 = 0x16;
    pub const EXT_MEM_LO: u8 = 0x17;
    pub const EXT_MEM_HI: u8 = 0x18;
    pub const DISK0_EXT: u8 = 0x19;
    pub const DISK1_EXT: u8 = 0x1a;
    pub const CHECKSUM_HI: u8 = 0x2e;
    pub const CHECKSUM_LO: u8 = 0x2f;
    pub const CENTURY: u8 = 0x32;
}

/// Register A: update in progress.
pub const REG_A_UIP: u8 = 0x80;

/// Register B: halt updates so the clock can be written safely.
pub const REG_B_SET: u8 = 0x80;

/// Whether `addr` is one of the read-only status registers.
pub fn is_read_only(addr: u8) -> bool {
    matches!(addr & ADDRESS_MASK, regs::REG_C | regs::REG_D)
}

/// Errors returned by the core operations.
///
/// Validation errors are always raised before any register is written, so a
/// failed call leaves the store untouched.
#[derive(Error, Debug)]
pub enum NvrError {
    /// A numeric argument is outside its allowed range.
    #[error("Invalid {field}: {value} (expected {expected})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        expected: &'static str,
    },

    /// A symbolic argument (drive, field or mode name) is not recognised.
    #[error("Unknown {kind}: {name} (expected one of: {expected})")]
    UnknownName {
        kind: &'static str,
        name: String,
        expected: &'static str,
    },

    /// A snapshot image has the wrong size.
    #[error("Snapshot is {len} bytes, expected 64 or 128")]
    SnapshotSize { len: usize },

    /// A snapshot file could not be read or written.
    #[error("Snapshot file {}: {source}", .path.display())]
    SnapshotFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The port I/O backend failed.
    #[error("Port I/O error: {0}")]
    Port(#[from] PortError),
}

impl NvrError {
    /// Whether this error was raised by argument validation.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            NvrError::OutOfRange { .. } | NvrError::UnknownName { .. }
        )
    }
}

/// Check `value` against an inclusive range, naming the field on failure.
pub(crate) fn check_range<T>(
    field: &'static str,
    value: T,
    range: std::ops::RangeInclusive<T>,
    expected: &'static str,
) -> Result<T, NvrError>
where
    T: PartialOrd + Copy + Into<i64>,
{
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(NvrError::OutOfRange {
            field,
            value: value.into(),
            expected,
        })
    }
}

/// Bounded wait for the update-in-progress flag.
///
/// The clock sets UIP for about 2ms each second. Reading the time while it
/// is set can return a torn value, so reads first poll Register A. The poll
/// gives up after `max_polls` reads and carries on, reporting the timeout to
/// the caller instead of hanging on a stopped oscillator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Maximum number of Register A reads.
    pub max_polls: u32,
    /// Optional sleep between polls.
    pub pause: Option<Duration>,
}

impl PollPolicy {
    /// Default poll ceiling.
    pub const DEFAULT_MAX_POLLS: u32 = 10_000;
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_polls: Self::DEFAULT_MAX_POLLS,
            pause: None,
        }
    }
}

/// Handle to the register store.
pub struct Cmos<P> {
    port: P,
    poll: PollPolicy,
}

impl<P: PortIo> Cmos<P> {
    /// Wrap a port backend with the default poll policy.
    pub fn new(port: P) -> Self {
        Self::with_poll_policy(port, PollPolicy::default())
    }

    pub fn with_poll_policy(port: P, poll: PollPolicy) -> Self {
        Self { port, poll }
    }

    /// The underlying port backend, for accesses outside the CMOS.
    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    pub fn into_inner(self) -> P {
        self.port
    }

    /// Read one register.
    ///
    /// Reading [`regs::REG_C`] clears its interrupt flags.
    pub fn read(&mut self, addr: u8) -> Result<u8, PortError> {
        let addr = addr & ADDRESS_MASK;
        self.port.outb(CMOS_PORT_INDEX, addr)?;
        self.port.settle()?;
        let value = self.port.inb(CMOS_PORT_DATA)?;
        trace!("cmos read {:#04x} = {:#04x}", addr, value);
        Ok(value)
    }

    /// Write one register.
    ///
    /// Writes to the read-only status registers are passed through and
    /// ignored by the chip.
    pub fn write(&mut self, addr: u8, value: u8) -> Result<(), PortError> {
        let addr = addr & ADDRESS_MASK;
        trace!("cmos write {:#04x} <- {:#04x}", addr, value);
        self.port.outb(CMOS_PORT_INDEX, addr)?;
        self.port.settle()?;
        self.port.outb(CMOS_PORT_DATA, value)?;
        self.port.settle()
    }

    /// Read a little-endian 16-bit value from `lo` and `lo + 1`.
    pub(crate) fn read_word(&mut self, lo: u8) -> Result<u16, PortError> {
        let low = self.read(lo)?;
        let high = self.read(lo + 1)?;
        Ok(u16::from_le_bytes([low, high]))
    }

    pub(crate) fn write_word(&mut self, lo: u8, value: u16) -> Result<(), PortError> {
        let [low, high] = value.to_le_bytes();
        self.write(lo, low)?;
        self.write(lo + 1, high)
    }

    /// Poll Register A until no update is in progress.
    ///
    /// Returns `false` when the poll budget ran out. The caller proceeds
    /// either way.
    pub fn wait_for_update(&mut self) -> Result<bool, PortError> {
        for _ in 0..self.poll.max_polls {
            if self.read(regs::REG_A)? & REG_A_UIP == 0 {
                return Ok(true);
            }
            if let Some(pause) = self.poll.pause {
                std::thread::sleep(pause);
            }
        }
        warn!(
            "RTC update still in progress after {} polls; reading anyway",
            self.poll.max_polls
        );
        Ok(false)
    }

    /// Run `body` with clock updates halted.
    ///
    /// Sets the SET bit in Register B, runs `body`, then writes back the
    /// original Register B with SET cleared. Updates are resumed even if
    /// `body` fails.
    pub(crate) fn with_updates_halted<T>(
        &mut self,
        body: impl FnOnce(&mut Self, u8) -> Result<T, NvrError>,
    ) -> Result<T, NvrError> {
        let reg_b = self.read(regs::REG_B)?;
        self.write(regs::REG_B, reg_b | REG_B_SET)?;
        let result = body(self, reg_b);
        self.write(regs::REG_B, reg_b & !REG_B_SET)?;
        result
    }

    /// Read one cell by user-supplied address.
    ///
    /// Unlike [`Cmos::read`], the address is validated instead of masked.
    pub fn read_cell(&mut self, addr: u8) -> Result<u8, NvrError> {
        let addr = check_address("address", addr)?;
        Ok(self.read(addr)?)
    }

    /// Write one cell by user-supplied address.
    ///
    /// Writing inside the checksummed range recomputes the checksum.
    pub fn write_cell(&mut self, addr: u8, value: u8) -> Result<(), NvrError> {
        let addr = check_address("address", addr)?;
        self.write(addr, value)?;
        if checksum::covers(addr) {
            self.update_checksum()?;
        }
        Ok(())
    }

    /// Fill `start..=end` with `value`, skipping the read-only registers,
    /// then recompute the checksum.
    pub fn fill(&mut self, start: u8, end: u8, value: u8) -> Result<(), NvrError> {
        let start = check_address("start address", start)?;
        let end = check_address("end address", end)?;
        if start > end {
            return Err(NvrError::OutOfRange {
                field: "address range",
                value: i64::from(start),
                expected: "start <= end",
            });
        }
        for addr in start..=end {
            if !is_read_only(addr) {
                self.write(addr, value)?;
            }
        }
        self.update_checksum()?;
        Ok(())
    }
}

fn check_address(field: &'static str, addr: u8) -> Result<u8, NvrError> {
    check_range(field, addr, 0..=(CMOS_SIZE as u8 - 1), "0x00-0x3F")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::SimulatedPc1640;

    #[test]
    fn test_read_write_roundtrip() {
        let mut cmos = Cmos::new(SimulatedPc1640::new());
        cmos.write(0x33, 0x5a).unwrap();
        assert_eq!(cmos.read(0x33).unwrap(), 0x5a);
    }

    #[test]
    fn test_address_masked() {
        let mut cmos = Cmos::new(SimulatedPc1640::new());
        cmos.write(0x40 | 0x21, 0x11).unwrap();
        assert_eq!(cmos.read(0x21).unwrap(), 0x11);
        assert_eq!(cmos.port_mut().cmos()[0x21], 0x11);
    }

    #[test]
    fn test_wait_for_update_settles() {
        let mut sim = SimulatedPc1640::new();
        sim.hold_update_in_progress(5);
        let mut cmos = Cmos::new(sim);
        assert!(cmos.wait_for_update().unwrap());
    }

    #[test]
    fn test_wait_for_update_times_out() {
        let mut sim = SimulatedPc1640::new();
        sim.stick_update_in_progress();
        let poll = PollPolicy {
            max_polls: 8,
            pause: None,
        };
        let mut cmos = Cmos::with_poll_policy(sim, poll);
        assert!(!cmos.wait_for_update().unwrap());
    }

    #[test]
    fn test_halted_updates_restore_register_b() {
        let mut sim = SimulatedPc1640::new();
        sim.set_cell(regs::REG_B, 0x22);
        let mut cmos = Cmos::new(sim);
        cmos.with_updates_halted(|cmos, _| {
            assert_eq!(cmos.read(regs::REG_B)?, 0xa2);
            Ok(())
        })
        .unwrap();
        assert_eq!(cmos.read(regs::REG_B).unwrap(), 0x22);
    }

    #[test]
    fn test_write_cell_rejects_out_of_range() {
        let mut cmos = Cmos::new(SimulatedPc1640::new());
        let err = cmos.write_cell(0x40, 0x01).unwrap_err();
        assert!(err.is_validation());
        assert!(cmos.port_mut().cmos_writes().is_empty());
    }

    #[test]
    fn test_write_cell_updates_checksum_in_range() {
        let mut cmos = Cmos::new(SimulatedPc1640::new());
        cmos.write_cell(0x20, 0x07).unwrap();
        assert!(cmos.verify_checksum().unwrap());

        cmos.write_cell(0x33, 0x07).unwrap();
        assert_eq!(cmos.stored_checksum().unwrap(), 0x0007);
    }

    #[test]
    fn test_fill_skips_status_registers() {
        let mut sim = SimulatedPc1640::new();
        sim.raise_interrupt_flags(0x90);
        let mut cmos = Cmos::new(sim);
        cmos.fill(0x0a, 0x0f, 0x55).unwrap();

        let sim = cmos.into_inner();
        assert!(sim
            .cmos_writes()
            .iter()
            .all(|&(addr, _)| !is_read_only(addr)));
        assert_eq!(sim.cmos()[0x0e], 0x55);
        assert_eq!(sim.cmos_image()[regs::REG_C as usize], 0x90);
    }

    #[test]
    fn test_fill_rejects_reversed_range() {
        let mut cmos = Cmos::new(SimulatedPc1640::new());
        assert!(cmos.fill(0x20, 0x10, 0).unwrap_err().is_validation());
    }
}
