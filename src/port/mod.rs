//! Port I/O primitives.
//!
//! Everything the utility does ends up as byte-wide `IN`/`OUT` transfers on
//! the x86 I/O bus. This module defines the [`PortIo`] capability that the
//! rest of the crate is written against, plus the backends that provide it:
//!
//! - [`DevPort`]: `/dev/port`, where the file offset is the port number.
//!   Works on any Linux kernel built with `CONFIG_DEVPORT`, needs root.
//! - [`IoplPort`]: raises the I/O privilege level with `iopl(3)` and issues
//!   `in`/`out` instructions directly. x86 Linux only.
//! - [`SimulatedPc1640`]: an in-memory model of the PC1640 ports, used by the
//!   tests and by `--image` to edit saved snapshot files offline.
//!
//! # Bus settling
//!
//! Real hardware needs a short pause between selecting a CMOS register and
//! touching its data. The traditional way to get ~1µs of delay is a dummy
//! write to the POST diagnostic port 0x80, which is what
//! [`PortIo::settle`] does by default.

#[cfg(target_os = "linux")]
mod dev_port;
#[cfg(all(
    target_os = "linux",
    target_env = "gnu",
    any(target_arch = "x86", target_arch = "x86_64")
))]
mod iopl;
pub mod sim;

#[cfg(target_os = "linux")]
pub use dev_port::DevPort;
#[cfg(all(
    target_os = "linux",
    target_env = "gnu",
    any(target_arch = "x86", target_arch = "x86_64")
))]
pub use iopl::IoplPort;
pub use sim::SimulatedPc1640;

use thiserror::Error;

/// POST diagnostic port. Writes here have no effect beyond taking one bus cycle.
pub const POST_DIAG_PORT: u16 = 0x80;

/// Errors raised by the port I/O backends.
///
/// These are surfaced verbatim to the user. The most common cause is running
/// without root privileges.
#[derive(Error, Debug)]
pub enum PortError {
    /// Failed to open the port device file.
    #[error("Failed to open {path}: {source}")]
    Open {
        path: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The kernel refused to raise the I/O privilege level.
    #[error("Failed to raise I/O privilege level: {0}")]
    Privilege(#[source] std::io::Error),

    /// A read transfer failed.
    #[cfg(target_os = "linux")]
    #[error("Failed to read port {port:#06x}: {source}")]
    Read {
        port: u16,
        #[source]
        source: nix::errno::Errno,
    },

    /// A write transfer failed.
    #[cfg(target_os = "linux")]
    #[error("Failed to write port {port:#06x}: {source}")]
    Write {
        port: u16,
        #[source]
        source: nix::errno::Errno,
    },

    /// The transfer completed but moved no data.
    #[error("Short transfer on port {port:#06x}")]
    ShortTransfer { port: u16 },
}

/// Byte-wide access to the x86 I/O port space.
///
/// Implementors perform each call as one real bus transaction. There is no
/// caching and no batching: callers rely on the exact sequence of accesses,
/// since several registers have side effects when read.
pub trait PortIo {
    /// Read one byte from `port`.
    fn inb(&mut self, port: u16) -> Result<u8, PortError>;

    /// Write one byte to `port`.
    fn outb(&mut self, port: u16, value: u8) -> Result<(), PortError>;

    /// Bus-settling barrier between dependent accesses.
    fn settle(&mut self) -> Result<(), PortError> {
        self.outb(POST_DIAG_PORT, 0)
    }
}

impl<P: PortIo + ?Sized> PortIo for &mut P {
    fn inb(&mut self, port: u16) -> Result<u8, PortError> {
        (**self).inb(port)
    }

    fn outb(&mut self, port: u16, value: u8) -> Result<(), PortError> {
        (**self).outb(port, value)
    }

    fn settle(&mut self) -> Result<(), PortError> {
        (**self).settle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every access so the default barrier can be observed.
    #[derive(Default)]
    struct Recorder {
        writes: Vec<(u16, u8)>,
    }

    impl PortIo for Recorder {
        fn inb(&mut self, _port: u16) -> Result<u8, PortError> {
            Ok(0xff)
        }

        fn outb(&mut self, port: u16, value: u8) -> Result<(), PortError> {
            self.writes.push((port, value));
            Ok(())
        }
    }

    #[test]
    fn test_default_settle_writes_post_port() {
        let mut rec = Recorder::default();
        rec.settle().unwrap();
        assert_eq!(rec.writes, vec![(POST_DIAG_PORT, 0)]);
    }

    #[test]
    fn test_mut_ref_forwards() {
        fn select<P: PortIo>(mut port: P) {
            port.outb(0x70, 0x0b).unwrap();
            port.settle().unwrap();
        }

        let mut rec = Recorder::default();
        select(&mut rec);
        assert_eq!(rec.writes, vec![(0x70, 0x0b), (POST_DIAG_PORT, 0)]);
    }
}
