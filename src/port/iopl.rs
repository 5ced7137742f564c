//! Direct port access via `iopl(3)`.
//!
//! Raising the I/O privilege level lets user space execute `in`/`out` for the
//! whole 64K port space. `ioperm` would be narrower but only reaches ports
//! below 0x400, and the dead-man diagnostic port lives at 0xDEAD.

use super::{PortError, PortIo};
use std::arch::asm;

/// Port access with `in`/`out` instructions.
///
/// Constructing one raises the process I/O privilege level; it is lowered
/// again when the value is dropped.
pub struct IoplPort {
    _private: (),
}

impl IoplPort {
    /// Raise the I/O privilege level to 3.
    ///
    /// # Errors
    ///
    /// Fails with [`PortError::Privilege`] without `CAP_SYS_RAWIO`, or when
    /// the kernel was built without `iopl` emulation.
    pub fn acquire() -> Result<Self, PortError> {
        // SAFETY: iopl only changes the privilege level of this process.
        let ret = unsafe { libc::iopl(3) };
        if ret != 0 {
            return Err(PortError::Privilege(std::io::Error::last_os_error()));
        }
        Ok(Self { _private: () })
    }
}

impl Drop for IoplPort {
    fn drop(&mut self) {
        // SAFETY: lowering the privilege level cannot violate memory safety.
        unsafe {
            libc::iopl(0);
        }
    }
}

impl PortIo for IoplPort {
    fn inb(&mut self, port: u16) -> Result<u8, PortError> {
        let value: u8;
        // SAFETY: iopl(3) was granted in `acquire`; the instruction touches
        // no memory.
        unsafe {
            asm!("in al, dx", out("al") value, in("dx") port, options(nomem, nostack, preserves_flags));
        }
        Ok(value)
    }

    fn outb(&mut self, port: u16, value: u8) -> Result<(), PortError> {
        // SAFETY: as above.
        unsafe {
            asm!("out dx, al", in("dx") port, in("al") value, options(nomem, nostack, preserves_flags));
        }
        Ok(())
    }
}
