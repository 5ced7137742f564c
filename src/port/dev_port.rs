//! `/dev/port` backend.
//!
//! The kernel exposes the I/O port space as a character device: reading or
//! writing one byte at file offset N performs `inb`/`outb` on port N. This is
//! slower than issuing the instructions directly but needs no inline assembly
//! and works on any architecture the kernel supports port I/O on.

use super::{PortError, PortIo};
use nix::sys::uio::{pread, pwrite};
use std::fs::{File, OpenOptions};

/// Port access through `/dev/port`.
pub struct DevPort {
    file: File,
}

impl DevPort {
    /// Path of the port device.
    pub const PATH: &'static str = "/dev/port";

    /// Open `/dev/port` for reading and writing.
    ///
    /// # Errors
    ///
    /// Fails with [`PortError::Open`] when the device is missing or the
    /// process lacks `CAP_SYS_RAWIO` (usually: not running as root).
    pub fn open() -> Result<Self, PortError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(Self::PATH)
            .map_err(|source| PortError::Open {
                path: Self::PATH,
                source,
            })?;
        Ok(Self { file })
    }
}

impl PortIo for DevPort {
    fn inb(&mut self, port: u16) -> Result<u8, PortError> {
        let mut buf = [0u8; 1];
        let n = pread(&self.file, &mut buf, libc::off_t::from(port))
            .map_err(|source| PortError::Read { port, source })?;
        if n != 1 {
            return Err(PortError::ShortTransfer { port });
        }
        Ok(buf[0])
    }

    fn outb(&mut self, port: u16, value: u8) -> Result<(), PortError> {
        let n = pwrite(&self.file, &[value], libc::off_t::from(port))
            .map_err(|source| PortError::Write { port, source })?;
        if n != 1 {
            return Err(PortError::ShortTransfer { port });
        }
        Ok(())
    }
}
