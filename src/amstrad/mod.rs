//! Amstrad PC1640 system status latches.
//!
//! Besides the MC146818, the PC1640 keeps configuration in latches that the
//! BIOS reads through the 8255-style PB register:
//!
//! ```text
//!   port 0x61 (PB)                 port 0x62 (status 2, read)
//!   bit 7  0x60 reads status 1     bits 3-0  selected nibble of the latch
//!   bit 6  keyboard reset          bit 5     speaker output
//!   bit 2  nibble select           bit 6     NMI status
//!   bit 1  speaker enable
//!   bit 0  speaker gate            port 0x65 (write)  NVR latch
//! ```
//!
//! System status 2 is eight bits wide but only four reach port 0x62 at a
//! time. PB bit 2 picks the nibble: clear for the high nibble, set for the
//! low one. Every read here restores PB before returning.
//!
//! The language and display DIP switches are wired to the LPT1 status port,
//! see [`switches`].

pub mod switches;

pub use switches::{DisplayType, IdaStatus, Language, LptStatus};

use crate::port::{PortError, PortIo};
use tracing::{debug, info};

/// Keyboard data, or system status 1 when PB bit 7 is set.
pub const PORT_KBD_DATA: u16 = 0x60;
/// PB register.
pub const PORT_PB: u16 = 0x61;
/// System status 2 nibble read.
pub const PORT_STATUS2: u16 = 0x62;
/// NVR latch write.
pub const PORT_NVR_LATCH: u16 = 0x65;
/// Any write resets the machine.
pub const PORT_SOFT_RESET: u16 = 0x66;
/// LPT1 status, carries the DIP switches.
pub const PORT_LPT1_STATUS: u16 = 0x379;
/// Internal display adapter status.
pub const PORT_IDA_STATUS: u16 = 0x3de;
/// Last POST progress code.
pub const PORT_DEADMAN: u16 = 0xdead;

/// PB register bits.
pub mod pb {
    pub const SPEAKER_GATE: u8 = 0x01;
    pub const SPEAKER_ENABLE: u8 = 0x02;
    /// 0 = high nibble of status 2, 1 = low nibble.
    pub const NIBBLE_SEL: u8 = 0x04;
    pub const KBD_RESET: u8 = 0x40;
    /// Port 0x60 returns system status 1 instead of keyboard data.
    pub const STATUS_MODE: u8 = 0x80;
}

/// Port 0x62 bits outside the nibble.
pub mod status2 {
    pub const SPEAKER_OUT: u8 = 0x20;
    pub const NMI: u8 = 0x40;
}

/// Decoded PB register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PbRegister {
    pub raw: u8,
}

impl PbRegister {
    pub fn speaker_gate(&self) -> bool {
        self.raw & pb::SPEAKER_GATE != 0
    }

    pub fn speaker_enable(&self) -> bool {
        self.raw & pb::SPEAKER_ENABLE != 0
    }

    /// `true` when port 0x62 currently shows the low nibble.
    pub fn low_nibble_selected(&self) -> bool {
        self.raw & pb::NIBBLE_SEL != 0
    }

    pub fn keyboard_reset(&self) -> bool {
        self.raw & pb::KBD_RESET != 0
    }

    pub fn status_mode(&self) -> bool {
        self.raw & pb::STATUS_MODE != 0
    }
}

/// Everything [`read_platform_status`] collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformStatus {
    pub pb: PbRegister,
    /// Port 0x62 as read with the current PB, including the speaker and NMI
    /// bits.
    pub status2_raw: u8,
    /// Both nibbles of system status 2.
    pub status2: u8,
    pub status1: u8,
    pub lpt: LptStatus,
}

impl PlatformStatus {
    pub fn speaker_output(&self) -> bool {
        self.status2_raw & status2::SPEAKER_OUT != 0
    }

    pub fn nmi_active(&self) -> bool {
        self.status2_raw & status2::NMI != 0
    }
}

/// One row of [`trace_nvr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NvrTraceRow {
    /// Value written to the NVR latch.
    pub address: u8,
    pub high: u8,
    pub low: u8,
}

impl NvrTraceRow {
    pub fn combined(&self) -> u8 {
        (self.high << 4) | self.low
    }
}

pub fn read_pb<P: PortIo>(port: &mut P) -> Result<PbRegister, PortError> {
    Ok(PbRegister {
        raw: port.inb(PORT_PB)?,
    })
}

/// Read both nibbles of system status 2.
fn read_status2_nibbles<P: PortIo>(port: &mut P) -> Result<(u8, u8), PortError> {
    let saved = port.inb(PORT_PB)?;

    port.outb(PORT_PB, saved & !pb::NIBBLE_SEL)?;
    port.settle()?;
    let high = port.inb(PORT_STATUS2)? & 0x0f;

    port.outb(PORT_PB, saved | pb::NIBBLE_SEL)?;
    port.settle()?;
    let low = port.inb(PORT_STATUS2)? & 0x0f;

    port.outb(PORT_PB, saved)?;
    debug!("status 2: hi={:#x} lo={:#x}", high, low);
    Ok((high, low))
}

/// Read system status 2 with the nibble-select protocol.
pub fn read_status2<P: PortIo>(port: &mut P) -> Result<u8, PortError> {
    let (high, low) = read_status2_nibbles(port)?;
    Ok((high << 4) | low)
}

/// Read system status 1 by switching port 0x60 into status mode.
pub fn read_status1<P: PortIo>(port: &mut P) -> Result<u8, PortError> {
    let saved = port.inb(PORT_PB)?;
    port.outb(PORT_PB, saved | pb::STATUS_MODE)?;
    port.settle()?;
    let value = port.inb(PORT_KBD_DATA)?;
    port.outb(PORT_PB, saved)?;
    debug!("status 1: {:#04x}", value);
    Ok(value)
}

pub fn read_lpt_status<P: PortIo>(port: &mut P) -> Result<LptStatus, PortError> {
    Ok(LptStatus {
        raw: port.inb(PORT_LPT1_STATUS)?,
    })
}

pub fn read_ida_status<P: PortIo>(port: &mut P) -> Result<IdaStatus, PortError> {
    Ok(IdaStatus {
        raw: port.inb(PORT_IDA_STATUS)?,
    })
}

/// Read the PB register, both status latches and the DIP switches.
pub fn read_platform_status<P: PortIo>(port: &mut P) -> Result<PlatformStatus, PortError> {
    let pb = read_pb(port)?;
    let status2_raw = port.inb(PORT_STATUS2)?;
    let status2 = read_status2(port)?;
    let status1 = read_status1(port)?;
    let lpt = read_lpt_status(port)?;
    Ok(PlatformStatus {
        pb,
        status2_raw,
        status2,
        status1,
        lpt,
    })
}

/// Write each NVR latch address 0-15 and read back status 2.
pub fn trace_nvr<P: PortIo>(port: &mut P) -> Result<Vec<NvrTraceRow>, PortError> {
    let mut rows = Vec::with_capacity(16);
    for address in 0..16u8 {
        port.outb(PORT_NVR_LATCH, address)?;
        port.settle()?;
        let (high, low) = read_status2_nibbles(port)?;
        rows.push(NvrTraceRow { address, high, low });
    }
    Ok(rows)
}

pub fn read_deadman<P: PortIo>(port: &mut P) -> Result<u8, PortError> {
    port.inb(PORT_DEADMAN)
}

/// Reboot the machine through the soft-reset port.
///
/// On real hardware this does not return.
pub fn soft_reset<P: PortIo>(port: &mut P) -> Result<(), PortError> {
    info!("triggering soft reset via port {:#04x}", PORT_SOFT_RESET);
    port.outb(PORT_SOFT_RESET, 0x00)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::SimulatedPc1640;

    #[test]
    fn test_status2_combines_nibbles_and_restores_pb() {
        let mut sim = SimulatedPc1640::new();
        sim.set_status2_latch(0xa7);
        sim.set_status2_extra(0x60);
        sim.set_pb(0x8b);

        assert_eq!(read_status2(&mut sim).unwrap(), 0xa7);
        assert_eq!(sim.pb(), 0x8b);
    }

    #[test]
    fn test_status1_uses_status_mode() {
        let mut sim = SimulatedPc1640::new();
        sim.set_status1_latch(0x2d);
        sim.set_pb(0x04);

        assert_eq!(read_status1(&mut sim).unwrap(), 0x2d);
        assert_eq!(sim.pb(), 0x04);
    }

    #[test]
    fn test_platform_status() {
        let mut sim = SimulatedPc1640::new();
        sim.set_pb(pb::SPEAKER_GATE | pb::NIBBLE_SEL);
        sim.set_status2_latch(0x3c);
        sim.set_status2_extra(status2::NMI);
        sim.set_lpt_status(0xc7);

        let status = read_platform_status(&mut sim).unwrap();
        assert!(status.pb.speaker_gate());
        assert!(status.pb.low_nibble_selected());
        assert!(!status.pb.status_mode());
        assert_eq!(status.status2_raw, 0x4c);
        assert!(status.nmi_active());
        assert!(!status.speaker_output());
        assert_eq!(status.status2, 0x3c);
        assert_eq!(status.lpt.language(), Language::English);
        assert_eq!(status.lpt.display(), DisplayType::Mda);
    }

    #[test]
    fn test_switch_ports() {
        let mut sim = SimulatedPc1640::new();
        sim.set_lpt_status(0x85);
        sim.set_ida_status(0x20);

        let lpt = read_lpt_status(&mut sim).unwrap();
        assert_eq!(lpt.language(), Language::French);
        assert_eq!(lpt.display(), DisplayType::Cga);
        assert!(read_ida_status(&mut sim).unwrap().disabled());
    }

    #[test]
    fn test_trace_walks_sixteen_addresses() {
        let mut sim = SimulatedPc1640::new();
        let rows = trace_nvr(&mut sim).unwrap();
        assert_eq!(rows.len(), 16);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.address, i as u8);
            assert_eq!(row.combined(), i as u8);
        }
    }

    #[test]
    fn test_deadman_and_soft_reset() {
        let mut sim = SimulatedPc1640::new();
        sim.set_deadman(0x42);
        assert_eq!(read_deadman(&mut sim).unwrap(), 0x42);

        soft_reset(&mut sim).unwrap();
        assert_eq!(sim.soft_resets(), 1);
    }
}
