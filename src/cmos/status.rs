//! Status registers A-D.
//!
//! ```text
//! Register A  UIP | DV2 DV1 DV0 | RS3 RS2 RS1 RS0
//! Register B  SET PIE AIE UIE SQWE DM 24/12 DSE
//! Register C  IRQF PF AF UF 0 0 0 0           (read-only, read clears)
//! Register D  VRT 0 0 0 0 0 0 0               (read-only)
//! ```
//!
//! Reading Register C acknowledges every pending interrupt, so
//! [`Cmos::read_status`] reads it exactly once and the returned value is the
//! only record of the flags.

use super::{regs, Cmos};
use crate::port::{PortError, PortIo};
use bitflags::bitflags;

bitflags! {
    /// Register B mode and interrupt-enable bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RegisterB: u8 {
        /// Halt updates.
        const SET     = 0x80;
        /// Periodic interrupt enable.
        const PIE     = 0x40;
        /// Alarm interrupt enable.
        const AIE     = 0x20;
        /// Update-ended interrupt enable.
        const UIE     = 0x10;
        /// Square wave output enable.
        const SQWE    = 0x08;
        /// Binary data mode (clear = BCD).
        const DM      = 0x04;
        /// 24-hour mode (clear = 12-hour).
        const HOUR_24 = 0x02;
        /// Daylight saving enable.
        const DSE     = 0x01;
    }
}

bitflags! {
    /// Register C interrupt flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct InterruptFlags: u8 {
        const IRQF = 0x80;
        const PF   = 0x40;
        const AF   = 0x20;
        const UF   = 0x10;
    }
}

bitflags! {
    /// Register D.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RegisterD: u8 {
        /// Valid RAM and time: the battery held up.
        const VRT = 0x80;
    }
}

/// Register A bits 6-4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Divider {
    /// 4.194304 MHz time base.
    Mhz4,
    /// 1.048576 MHz time base.
    Mhz1,
    /// 32.768 kHz time base, the normal setting.
    Khz32,
    /// Test modes (3 and 4).
    Test(u8),
    /// Divider chain held in reset (5-7).
    Reset(u8),
}

impl Divider {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => Divider::Mhz4,
            1 => Divider::Mhz1,
            2 => Divider::Khz32,
            n @ 3..=4 => Divider::Test(n),
            n => Divider::Reset(n),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Divider::Mhz4 => "4.194304 MHz (time base)",
            Divider::Mhz1 => "1.048576 MHz",
            Divider::Khz32 => "32.768 kHz",
            Divider::Test(_) => "Test: any",
            Divider::Reset(_) => "Reset / divider held",
        }
    }
}

/// Rate selects 1 and 2 alias to 256 Hz and 128 Hz on a 32.768 kHz base;
/// from 3 up each step halves the frequency.
pub fn periodic_rate_hz(rate: u8) -> Option<u32> {
    match rate & 0x0f {
        0 => None,
        1 => Some(256),
        2 => Some(128),
        rs => Some(32_768 >> (rs - 1)),
    }
}

/// Decoded Register A.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterA {
    pub raw: u8,
}

impl RegisterA {
    pub fn update_in_progress(&self) -> bool {
        self.raw & super::REG_A_UIP != 0
    }

    pub fn divider(&self) -> Divider {
        Divider::from_bits(self.raw >> 4)
    }

    /// Rate select, bits 3-0.
    pub fn rate(&self) -> u8 {
        self.raw & 0x0f
    }

    pub fn periodic_rate_hz(&self) -> Option<u32> {
        periodic_rate_hz(self.rate())
    }
}

/// One read of all four status registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtcStatus {
    pub a: RegisterA,
    pub b: RegisterB,
    pub c: InterruptFlags,
    pub d: RegisterD,
}

impl RtcStatus {
    pub fn battery_ok(&self) -> bool {
        self.d.contains(RegisterD::VRT)
    }
}

impl<P: PortIo> Cmos<P> {
    /// Read registers A-D.
    ///
    /// This clears the pending interrupt flags in Register C.
    pub fn read_status(&mut self) -> Result<RtcStatus, PortError> {
        let a = self.read(regs::REG_A)?;
        let b = self.read(regs::REG_B)?;
        let c = self.read(regs::REG_C)?;
        let d = self.read(regs::REG_D)?;
        Ok(RtcStatus {
            a: RegisterA { raw: a },
            b: RegisterB::from_bits_retain(b),
            c: InterruptFlags::from_bits_retain(c),
            d: RegisterD::from_bits_retain(d),
        })
    }

    pub fn register_b(&mut self) -> Result<RegisterB, PortError> {
        Ok(RegisterB::from_bits_retain(self.read(regs::REG_B)?))
    }
}
