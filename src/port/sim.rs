//! Simulated Amstrad PC1640 I/O ports.
//!
//! Models the parts of the machine this utility talks to:
//!
//! - The MC146818 RTC/CMOS behind ports 0x70 (index) and 0x71 (data), with
//!   the PC1640's 64-byte address space, the read-only status registers C and
//!   D, clear-on-read interrupt flags and a controllable update-in-progress
//!   flag.
//! - The PB register (0x61) and the nibble-multiplexed system status 2 read
//!   on port 0x62, system status 1 on port 0x60 when PB bit 7 is set.
//! - The LPT1 status port (language/display DIP switches), the IDA status
//!   port, the dead-man port and the soft-reset trigger.
//!
//! Time does not advance. Unhandled reads return 0xff and unhandled writes
//! are ignored, like an empty ISA bus.
//!
//! Reference: MC146818A datasheet; <https://wiki.osdev.org/CMOS>

use super::{PortError, PortIo};
use crate::amstrad::{
    pb, PORT_DEADMAN, PORT_IDA_STATUS, PORT_KBD_DATA, PORT_LPT1_STATUS, PORT_NVR_LATCH, PORT_PB,
    PORT_SOFT_RESET, PORT_STATUS2,
};
use crate::cmos::{regs, CMOS_PORT_DATA, CMOS_PORT_INDEX, CMOS_SIZE};

/// Register A bit 7, synthesized on read.
const UIP: u8 = 0x80;

/// Register D bit 7: valid RAM and time.
const VRT: u8 = 0x80;

/// In-memory PC1640.
pub struct SimulatedPc1640 {
    /// Currently selected CMOS register.
    index: u8,
    /// Battery-backed store. Registers C and D live outside it.
    cmos: [u8; CMOS_SIZE],
    /// Pending interrupt flags reported (and cleared) by Register C.
    pending_irq: u8,
    /// Register D contents.
    reg_d: u8,
    /// Number of upcoming Register A reads that report an update in progress.
    uip_reads: u32,
    /// Keep UIP set forever (a stuck or absent oscillator).
    uip_stuck: bool,
    /// Every completed CMOS data write, as (register, value).
    writes: Vec<(u8, u8)>,
    pb: u8,
    status1_latch: u8,
    status2_latch: u8,
    /// Upper bits of port 0x62 (speaker output, NMI status).
    status2_extra: u8,
    lpt_status: u8,
    ida_status: u8,
    deadman: u8,
    soft_resets: u32,
}

impl SimulatedPc1640 {
    /// A machine with a healthy battery and an all-zero store.
    pub fn new() -> Self {
        Self {
            index: 0,
            cmos: [0; CMOS_SIZE],
            pending_irq: 0,
            reg_d: VRT,
            uip_reads: 0,
            uip_stuck: false,
            writes: Vec::new(),
            pb: 0,
            status1_latch: 0,
            status2_latch: 0,
            status2_extra: 0,
            lpt_status: 0,
            ida_status: 0,
            deadman: 0,
            soft_resets: 0,
        }
    }

    /// A machine whose store holds `cells`.
    ///
    /// Registers C and D take their contents from the image too, so pending
    /// flags and a dead battery survive the round trip through a file.
    pub fn with_cmos(cells: [u8; CMOS_SIZE]) -> Self {
        let mut sim = Self::new();
        sim.cmos = cells;
        sim.cmos[regs::REG_A as usize] &= !UIP;
        sim.pending_irq = cells[regs::REG_C as usize];
        sim.reg_d = cells[regs::REG_D as usize];
        sim
    }

    /// Store contents as seen through the port protocol, without side effects.
    pub fn cmos_image(&self) -> [u8; CMOS_SIZE] {
        let mut image = self.cmos;
        image[regs::REG_C as usize] = self.pending_irq;
        image[regs::REG_D as usize] = self.reg_d;
        image
    }

    /// CMOS data writes performed through the ports so far.
    pub fn cmos_writes(&self) -> &[(u8, u8)] {
        &self.writes
    }

    fn read_cmos(&mut self) -> u8 {
        match self.index {
            regs::REG_A => {
                let busy = if self.uip_stuck {
                    true
                } else if self.uip_reads > 0 {
                    self.uip_reads -= 1;
                    true
                } else {
                    false
                };
                let value = self.cmos[regs::REG_A as usize] & !UIP;
                if busy {
                    value | UIP
                } else {
                    value
                }
            }
            regs::REG_C => std::mem::take(&mut self.pending_irq),
            regs::REG_D => self.reg_d,
            index => self.cmos[index as usize],
        }
    }

    fn write_cmos(&mut self, value: u8) {
        match self.index {
            // Read-only status registers.
            regs::REG_C | regs::REG_D => return,
            // UIP is read-only.
            regs::REG_A => self.cmos[regs::REG_A as usize] = value & !UIP,
            index => self.cmos[index as usize] = value,
        }
        self.writes.push((self.index, value));
    }

    fn read_status2(&self) -> u8 {
        let nibble = if self.pb & pb::NIBBLE_SEL != 0 {
            self.status2_latch & 0x0f
        } else {
            self.status2_latch >> 4
        };
        self.status2_extra | nibble
    }
}

/// Knobs for setting up machine state in tests.
#[cfg(test)]
impl SimulatedPc1640 {
    /// Raw store contents, bypassing the port protocol.
    pub fn cmos(&self) -> &[u8; CMOS_SIZE] {
        &self.cmos
    }

    /// Poke a cell directly.
    pub fn set_cell(&mut self, addr: u8, value: u8) {
        self.cmos[(addr & 0x3f) as usize] = value;
    }

    pub fn clear_write_log(&mut self) {
        self.writes.clear();
    }

    /// Latch interrupt flags into Register C.
    pub fn raise_interrupt_flags(&mut self, flags: u8) {
        self.pending_irq |= flags;
    }

    /// Set or clear the battery-good flag in Register D.
    pub fn set_battery_ok(&mut self, ok: bool) {
        self.reg_d = if ok { VRT } else { 0 };
    }

    /// Report an update in progress for the next `reads` reads of Register A.
    pub fn hold_update_in_progress(&mut self, reads: u32) {
        self.uip_reads = reads;
    }

    /// Report an update in progress forever.
    pub fn stick_update_in_progress(&mut self) {
        self.uip_stuck = true;
    }

    pub fn pb(&self) -> u8 {
        self.pb
    }

    pub fn set_pb(&mut self, value: u8) {
        self.pb = value;
    }

    pub fn set_status1_latch(&mut self, value: u8) {
        self.status1_latch = value;
    }

    pub fn set_status2_latch(&mut self, value: u8) {
        self.status2_latch = value;
    }

    pub fn set_status2_extra(&mut self, value: u8) {
        self.status2_extra = value & 0xf0;
    }

    pub fn set_lpt_status(&mut self, value: u8) {
        self.lpt_status = value;
    }

    pub fn set_ida_status(&mut self, value: u8) {
        self.ida_status = value;
    }

    pub fn set_deadman(&mut self, value: u8) {
        self.deadman = value;
    }

    /// Number of writes to the soft-reset port.
    pub fn soft_resets(&self) -> u32 {
        self.soft_resets
    }
}

impl Default for SimulatedPc1640 {
    fn default() -> Self {
        Self::new()
    }
}

impl PortIo for SimulatedPc1640 {
    fn inb(&mut self, port: u16) -> Result<u8, PortError> {
        let value = match port {
            CMOS_PORT_DATA => self.read_cmos(),
            PORT_PB => self.pb,
            PORT_STATUS2 => self.read_status2(),
            PORT_KBD_DATA if self.pb & pb::STATUS_MODE != 0 => self.status1_latch,
            // No keyboard attached.
            PORT_KBD_DATA => 0x00,
            PORT_LPT1_STATUS => self.lpt_status,
            PORT_IDA_STATUS => self.ida_status,
            PORT_DEADMAN => self.deadman,
            _ => 0xff,
        };
        Ok(value)
    }

    fn outb(&mut self, port: u16, value: u8) -> Result<(), PortError> {
        match port {
            // The PC1640 decodes only six address bits; bit 7 does not gate NMI.
            CMOS_PORT_INDEX => self.index = value & 0x3f,
            CMOS_PORT_DATA => self.write_cmos(value),
            PORT_PB => self.pb = value,
            PORT_NVR_LATCH => self.status2_latch = value,
            PORT_SOFT_RESET => self.soft_resets += 1,
            PORT_DEADMAN => self.deadman = value,
            // Includes the POST port used for settling.
            _ => {}
        }
        Ok(())
    }
}
