//! Time, date and alarm.
//!
//! Every operation takes one snapshot of Register B and converts all of its
//! fields with it, so a mode change between two field accesses can never
//! produce a mix of BCD and binary values.
//!
//! Writes to the clock are bracketed by the SET bit (see
//! [`Cmos::with_updates_halted`]): the chip stops ticking, the fields are
//! written, and Register B is restored with SET cleared.
//!
//! In 12-hour mode the hours register carries PM in bit 7 and 1-12 in the
//! low bits. Callers only ever see 0-23.

use super::bcd::DataMode;
use super::status::RegisterB;
use super::{check_range, regs, Cmos, NvrError};
use crate::port::{PortError, PortIo};
use std::str::FromStr;
use tracing::debug;

/// Raw alarm values at or above this match any time.
pub const ALARM_WILDCARD: u8 = 0xc0;

/// PM flag in the hours register, 12-hour mode only.
const HOUR_PM: u8 = 0x80;

static DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

static MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Name of a day of week (1 = Sunday).
pub fn day_name(day_of_week: Option<u8>) -> &'static str {
    day_of_week
        .and_then(|d| DAY_NAMES.get(usize::from(d).checked_sub(1)?))
        .copied()
        .unwrap_or("???")
}

pub fn month_name(month: Option<u8>) -> &'static str {
    month
        .and_then(|m| MONTH_NAMES.get(usize::from(m).checked_sub(1)?))
        .copied()
        .unwrap_or("???")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HourFormat {
    TwelveHour,
    TwentyFourHour,
}

/// Register B fields that govern how clock cells are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockFormat {
    pub data_mode: DataMode,
    pub hour_format: HourFormat,
}

impl ClockFormat {
    pub fn from_register_b(reg_b: u8) -> Self {
        let hour_format = if RegisterB::from_bits_retain(reg_b).contains(RegisterB::HOUR_24) {
            HourFormat::TwentyFourHour
        } else {
            HourFormat::TwelveHour
        };
        Self {
            data_mode: DataMode::from_register_b(reg_b),
            hour_format,
        }
    }

    /// Decode an hours register to 0-23.
    pub fn decode_hours(&self, raw: u8) -> u8 {
        match self.hour_format {
            HourFormat::TwentyFourHour => self.data_mode.decode(raw),
            HourFormat::TwelveHour => {
                let pm = raw & HOUR_PM != 0;
                let hours = self.data_mode.decode(raw & !HOUR_PM);
                match (pm, hours) {
                    (true, h) if h < 12 => h + 12,
                    (false, 12) => 0,
                    (_, h) => h,
                }
            }
        }
    }

    /// Encode 0-23 for the hours register.
    pub fn encode_hours(&self, hours: u8) -> u8 {
        match self.hour_format {
            HourFormat::TwentyFourHour => self.data_mode.encode(hours),
            HourFormat::TwelveHour => {
                let pm = if hours >= 12 { HOUR_PM } else { 0 };
                let twelve = match hours % 12 {
                    0 => 12,
                    h => h,
                };
                self.data_mode.encode(twelve) | pm
            }
        }
    }
}

/// Decoded clock contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtcTime {
    pub seconds: u8,
    pub minutes: u8,
    /// Always 0-23, whatever the hour format.
    pub hours: u8,
    /// 1 = Sunday. `None` when the register holds something else.
    pub day_of_week: Option<u8>,
    pub day_of_month: u8,
    /// `None` when the register holds something outside 1-12.
    pub month: Option<u8>,
    pub year: u8,
    pub century: u8,
}

impl RtcTime {
    pub fn full_year(&self) -> u16 {
        u16::from(self.century) * 100 + u16::from(self.year)
    }
}

/// Result of [`Cmos::read_time`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtcReading {
    pub time: RtcTime,
    pub format: ClockFormat,
    /// `false` if the update-in-progress wait timed out.
    pub settled: bool,
}

/// One alarm field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmField {
    /// Match any value.
    Wildcard,
    Value(u8),
}

impl AlarmField {
    /// Negative input means wildcard.
    pub fn from_signed(field: &'static str, value: i32, max: u8) -> Result<Self, NvrError> {
        if value < 0 {
            return Ok(AlarmField::Wildcard);
        }
        match u8::try_from(value) {
            Ok(v) if v <= max => Ok(AlarmField::Value(v)),
            _ => Err(NvrError::OutOfRange {
                field,
                value: i64::from(value),
                expected: if max == 23 { "0-23 or -1" } else { "0-59 or -1" },
            }),
        }
    }

    fn check(self, field: &'static str, max: u8, expected: &'static str) -> Result<Self, NvrError> {
        if let AlarmField::Value(v) = self {
            check_range(field, v, 0..=max, expected)?;
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alarm {
    pub hours: AlarmField,
    pub minutes: AlarmField,
    pub seconds: AlarmField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmReading {
    pub alarm: Alarm,
    /// Alarm interrupt enable, independent of the wildcard state.
    pub enabled: bool,
    pub settled: bool,
}

/// Register B/A setting changed by `set-rtc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RtcMode {
    /// 24-hour mode (1) or 12-hour mode (0).
    Hour24,
    /// BCD (1) or binary (0).
    Bcd,
    SquareWave,
    DaylightSaving,
    PeriodicInterrupt,
    UpdateInterrupt,
    /// Periodic rate select, 0-15.
    Rate,
}

impl FromStr for RtcMode {
    type Err = NvrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "24h" => Ok(RtcMode::Hour24),
            "bcd" => Ok(RtcMode::Bcd),
            "sqw" => Ok(RtcMode::SquareWave),
            "dse" => Ok(RtcMode::DaylightSaving),
            "pie" => Ok(RtcMode::PeriodicInterrupt),
            "uie" => Ok(RtcMode::UpdateInterrupt),
            "rate" => Ok(RtcMode::Rate),
            _ => Err(NvrError::UnknownName {
                kind: "RTC mode",
                name: s.to_string(),
                expected: "24h, bcd, sqw, dse, pie, uie, rate",
            }),
        }
    }
}

impl<P: PortIo> Cmos<P> {
    /// Read the clock.
    ///
    /// Waits for any update in progress first. A timeout is reported in
    /// [`RtcReading::settled`] and the fields are read anyway.
    pub fn read_time(&mut self) -> Result<RtcReading, PortError> {
        let settled = self.wait_for_update()?;

        let seconds = self.read(regs::SECONDS)?;
        let minutes = self.read(regs::MINUTES)?;
        let hours = self.read(regs::HOURS)?;
        let dow = self.read(regs::DAY_OF_WEEK)?;
        let dom = self.read(regs::DAY_OF_MONTH)?;
        let month = self.read(regs::MONTH)?;
        let year = self.read(regs::YEAR)?;
        let century = self.read(regs::CENTURY)?;
        let reg_b = self.read(regs::REG_B)?;
        debug!(
            "raw time: sec={:02x} min={:02x} hrs={:02x} dow={:02x} dom={:02x} mon={:02x} yr={:02x} cen={:02x} regB={:02x}",
            seconds, minutes, hours, dow, dom, month, year, century, reg_b
        );

        let format = ClockFormat::from_register_b(reg_b);
        let mode = format.data_mode;
        let dow = mode.decode(dow);
        let month = mode.decode(month);
        let time = RtcTime {
            seconds: mode.decode(seconds),
            minutes: mode.decode(minutes),
            hours: format.decode_hours(hours),
            day_of_week: (1..=7).contains(&dow).then_some(dow),
            day_of_month: mode.decode(dom),
            month: (1..=12).contains(&month).then_some(month),
            year: mode.decode(year),
            century: mode.decode(century),
        };
        Ok(RtcReading {
            time,
            format,
            settled,
        })
    }

    /// Set the time of day.
    pub fn write_time(&mut self, hours: u8, minutes: u8, seconds: u8) -> Result<(), NvrError> {
        check_range("hours", hours, 0..=23, "0-23")?;
        check_range("minutes", minutes, 0..=59, "0-59")?;
        check_range("seconds", seconds, 0..=59, "0-59")?;

        self.with_updates_halted(|cmos, reg_b| {
            let format = ClockFormat::from_register_b(reg_b);
            cmos.write(regs::SECONDS, format.data_mode.encode(seconds))?;
            cmos.write(regs::MINUTES, format.data_mode.encode(minutes))?;
            cmos.write(regs::HOURS, format.encode_hours(hours))?;
            Ok(())
        })
    }

    /// Set the date. The year is split into century and year-of-century.
    pub fn write_date(&mut self, day: u8, month: u8, year: u16) -> Result<(), NvrError> {
        check_range("day", day, 1..=31, "1-31")?;
        check_range("month", month, 1..=12, "1-12")?;
        check_range("year", year, 1980..=2099, "1980-2099")?;
        let century = (year / 100) as u8;
        let year = (year % 100) as u8;

        self.with_updates_halted(|cmos, reg_b| {
            let mode = DataMode::from_register_b(reg_b);
            cmos.write(regs::DAY_OF_MONTH, mode.encode(day))?;
            cmos.write(regs::MONTH, mode.encode(month))?;
            cmos.write(regs::YEAR, mode.encode(year))?;
            cmos.write(regs::CENTURY, mode.encode(century))?;
            Ok(())
        })
    }

    /// Set the day of week, 1 = Sunday.
    pub fn write_dow(&mut self, day_of_week: u8) -> Result<(), NvrError> {
        check_range("day of week", day_of_week, 1..=7, "1-7")?;
        self.with_updates_halted(|cmos, reg_b| {
            let mode = DataMode::from_register_b(reg_b);
            cmos.write(regs::DAY_OF_WEEK, mode.encode(day_of_week))?;
            Ok(())
        })
    }

    pub fn read_alarm(&mut self) -> Result<AlarmReading, PortError> {
        let settled = self.wait_for_update()?;
        let seconds = self.read(regs::ALARM_SECONDS)?;
        let minutes = self.read(regs::ALARM_MINUTES)?;
        let hours = self.read(regs::ALARM_HOURS)?;
        let reg_b = self.read(regs::REG_B)?;

        let format = ClockFormat::from_register_b(reg_b);
        let field = |raw: u8| {
            if raw >= ALARM_WILDCARD {
                AlarmField::Wildcard
            } else {
                AlarmField::Value(format.data_mode.decode(raw))
            }
        };
        let hours = if hours >= ALARM_WILDCARD {
            AlarmField::Wildcard
        } else {
            AlarmField::Value(format.decode_hours(hours))
        };

        Ok(AlarmReading {
            alarm: Alarm {
                hours,
                minutes: field(minutes),
                seconds: field(seconds),
            },
            enabled: RegisterB::from_bits_retain(reg_b).contains(RegisterB::AIE),
            settled,
        })
    }

    /// Program the alarm. Wildcard fields are stored as 0xC0.
    ///
    /// Does not change the alarm interrupt enable.
    pub fn write_alarm(&mut self, alarm: Alarm) -> Result<(), NvrError> {
        let hours = alarm.hours.check("alarm hours", 23, "0-23 or wildcard")?;
        let minutes = alarm.minutes.check("alarm minutes", 59, "0-59 or wildcard")?;
        let seconds = alarm.seconds.check("alarm seconds", 59, "0-59 or wildcard")?;

        self.with_updates_halted(|cmos, reg_b| {
            let format = ClockFormat::from_register_b(reg_b);
            let encode = |field: AlarmField| match field {
                AlarmField::Wildcard => ALARM_WILDCARD,
                AlarmField::Value(v) => format.data_mode.encode(v),
            };
            let hours = match hours {
                AlarmField::Wildcard => ALARM_WILDCARD,
                AlarmField::Value(h) => format.encode_hours(h),
            };
            cmos.write(regs::ALARM_SECONDS, encode(seconds))?;
            cmos.write(regs::ALARM_MINUTES, encode(minutes))?;
            cmos.write(regs::ALARM_HOURS, hours)?;
            Ok(())
        })
    }

    /// Set or clear the alarm interrupt enable, leaving the rest of
    /// Register B alone.
    pub fn set_alarm_enabled(&mut self, enabled: bool) -> Result<(), PortError> {
        let mut reg_b = self.register_b()?;
        reg_b.set(RegisterB::AIE, enabled);
        self.write(regs::REG_B, reg_b.bits())
    }

    /// Change one mode bit of Register B, or the rate select of Register A.
    ///
    /// For the flag modes any non-zero `value` enables the feature. Returns
    /// the new register value.
    pub fn set_rtc_mode(&mut self, mode: RtcMode, value: u8) -> Result<u8, NvrError> {
        let on = value != 0;
        let (flag, enable) = match mode {
            RtcMode::Rate => return self.set_periodic_rate(value),
            RtcMode::Hour24 => (RegisterB::HOUR_24, on),
            // DM set means binary.
            RtcMode::Bcd => (RegisterB::DM, !on),
            RtcMode::SquareWave => (RegisterB::SQWE, on),
            RtcMode::DaylightSaving => (RegisterB::DSE, on),
            RtcMode::PeriodicInterrupt => (RegisterB::PIE, on),
            RtcMode::UpdateInterrupt => (RegisterB::UIE, on),
        };
        let mut reg_b = self.register_b()?;
        reg_b.set(flag, enable);
        self.write(regs::REG_B, reg_b.bits())?;
        Ok(reg_b.bits())
    }

    fn set_periodic_rate(&mut self, rate: u8) -> Result<u8, NvrError> {
        let rate = check_range("rate select", rate, 0..=15, "0-15")?;
        let reg_a = self.read(regs::REG_A)?;
        let reg_a = (reg_a & 0x70) | rate;
        self.write(regs::REG_A, reg_a)?;
        Ok(reg_a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::SimulatedPc1640;

    fn cmos_with_register_b(reg_b: u8) -> Cmos<SimulatedPc1640> {
        let mut sim = SimulatedPc1640::new();
        sim.set_cell(regs::REG_B, reg_b);
        Cmos::new(sim)
    }

    #[test]
    fn test_read_time_bcd_24h() {
        let mut sim = SimulatedPc1640::new();
        for (addr, value) in [
            (regs::SECONDS, 0x45),
            (regs::MINUTES, 0x30),
            (regs::HOURS, 0x13),
            (regs::DAY_OF_WEEK, 0x03),
            (regs::DAY_OF_MONTH, 0x15),
            (regs::MONTH, 0x06),
            (regs::YEAR, 0x24),
            (regs::CENTURY, 0x20),
            (regs::REG_B, 0x02),
        ] {
            sim.set_cell(addr, value);
        }
        let reading = Cmos::new(sim).read_time().unwrap();
        let t = reading.time;
        assert!(reading.settled);
        assert_eq!((t.hours, t.minutes, t.seconds), (13, 30, 45));
        assert_eq!(day_name(t.day_of_week), "Tuesday");
        assert_eq!(t.day_of_month, 15);
        assert_eq!(month_name(t.month), "June");
        assert_eq!(t.full_year(), 2024);
    }

    #[test]
    fn test_twelve_hour_folding() {
        let format = ClockFormat::from_register_b(0x00);
        assert_eq!(format.hour_format, HourFormat::TwelveHour);
        assert_eq!(format.decode_hours(0x12), 0); // 12 AM
        assert_eq!(format.decode_hours(0x92), 12); // 12 PM
        assert_eq!(format.decode_hours(0x81), 13);
        assert_eq!(format.decode_hours(0x11), 11);

        assert_eq!(format.encode_hours(0), 0x12);
        assert_eq!(format.encode_hours(12), 0x92);
        assert_eq!(format.encode_hours(23), 0x91);
    }

    #[test]
    fn test_binary_mode_read() {
        let mut cmos = cmos_with_register_b(0x06);
        cmos.port_mut().set_cell(regs::HOURS, 23);
        cmos.port_mut().set_cell(regs::MINUTES, 59);
        let t = cmos.read_time().unwrap().time;
        assert_eq!((t.hours, t.minutes), (23, 59));
    }

    #[test]
    fn test_unknown_day_and_month() {
        let mut cmos = cmos_with_register_b(0x02);
        cmos.port_mut().set_cell(regs::DAY_OF_WEEK, 0x09);
        cmos.port_mut().set_cell(regs::MONTH, 0x13);
        let t = cmos.read_time().unwrap().time;
        assert_eq!(t.day_of_week, None);
        assert_eq!(t.month, None);
        assert_eq!(day_name(t.day_of_week), "???");
        assert_eq!(day_name(Some(0)), "???");
    }

    #[test]
    fn test_read_time_after_uip_timeout() {
        let mut sim = SimulatedPc1640::new();
        sim.stick_update_in_progress();
        sim.set_cell(regs::REG_B, 0x02);
        sim.set_cell(regs::SECONDS, 0x07);
        let poll = crate::cmos::PollPolicy {
            max_polls: 3,
            pause: None,
        };
        let reading = Cmos::with_poll_policy(sim, poll).read_time().unwrap();
        assert!(!reading.settled);
        assert_eq!(reading.time.seconds, 7);
    }

    #[test]
    fn test_write_time_brackets_with_set() {
        let mut cmos = cmos_with_register_b(0x12);
        cmos.write_time(12, 34, 56).unwrap();
        let sim = cmos.into_inner();
        assert_eq!(
            sim.cmos_writes(),
            &[
                (regs::REG_B, 0x92),
                (regs::SECONDS, 0x56),
                (regs::MINUTES, 0x34),
                (regs::HOURS, 0x12),
                (regs::REG_B, 0x12),
            ]
        );
    }

    #[test]
    fn test_write_time_twelve_hour_mode() {
        let mut cmos = cmos_with_register_b(0x00);
        cmos.write_time(15, 0, 0).unwrap();
        assert_eq!(cmos.port_mut().cmos()[regs::HOURS as usize], 0x83);
        assert_eq!(cmos.read_time().unwrap().time.hours, 15);
    }

    #[test]
    fn test_write_time_rejects_before_writing() {
        let mut cmos = cmos_with_register_b(0x02);
        let err = cmos.write_time(24, 0, 0).unwrap_err();
        assert!(err.is_validation());
        assert!(cmos.write_time(0, 60, 0).is_err());
        assert!(cmos.port_mut().cmos_writes().is_empty());
    }

    #[test]
    fn test_write_date_splits_century() {
        let mut cmos = cmos_with_register_b(0x02);
        cmos.write_date(29, 2, 2024).unwrap();
        let cells = *cmos.port_mut().cmos();
        assert_eq!(cells[regs::DAY_OF_MONTH as usize], 0x29);
        assert_eq!(cells[regs::MONTH as usize], 0x02);
        assert_eq!(cells[regs::YEAR as usize], 0x24);
        assert_eq!(cells[regs::CENTURY as usize], 0x20);

        assert!(cmos.write_date(1, 1, 1979).unwrap_err().is_validation());
        assert!(cmos.write_date(32, 1, 2000).is_err());
    }

    #[test]
    fn test_write_dow_range() {
        let mut cmos = cmos_with_register_b(0x02);
        cmos.write_dow(7).unwrap();
        assert_eq!(cmos.port_mut().cmos()[regs::DAY_OF_WEEK as usize], 0x07);
        assert!(cmos.write_dow(0).is_err());
        assert!(cmos.write_dow(8).is_err());
    }

    #[test]
    fn test_alarm_wildcard_roundtrip() {
        let mut cmos = cmos_with_register_b(0x02);
        let alarm = Alarm {
            hours: AlarmField::from_signed("alarm hours", -1, 23).unwrap(),
            minutes: AlarmField::from_signed("alarm minutes", -1, 59).unwrap(),
            seconds: AlarmField::from_signed("alarm seconds", 0, 59).unwrap(),
        };
        cmos.write_alarm(alarm).unwrap();

        let cells = *cmos.port_mut().cmos();
        assert_eq!(cells[regs::ALARM_HOURS as usize], 0xc0);
        assert_eq!(cells[regs::ALARM_MINUTES as usize], 0xc0);
        assert_eq!(cells[regs::ALARM_SECONDS as usize], 0x00);

        let reading = cmos.read_alarm().unwrap();
        assert_eq!(reading.alarm, alarm);
        assert!(!reading.enabled);
    }

    #[test]
    fn test_alarm_twelve_hour_mode() {
        let mut cmos = cmos_with_register_b(0x00);
        let alarm = Alarm {
            hours: AlarmField::Value(15),
            minutes: AlarmField::Value(30),
            seconds: AlarmField::Wildcard,
        };
        cmos.write_alarm(alarm).unwrap();
        assert_eq!(cmos.port_mut().cmos()[regs::ALARM_HOURS as usize], 0x83);
        assert_eq!(cmos.read_alarm().unwrap().alarm, alarm);

        let midnight = Alarm {
            hours: AlarmField::Value(0),
            ..alarm
        };
        cmos.write_alarm(midnight).unwrap();
        assert_eq!(cmos.port_mut().cmos()[regs::ALARM_HOURS as usize], 0x12);
        assert_eq!(cmos.read_alarm().unwrap().alarm.hours, AlarmField::Value(0));
    }

    #[test]
    fn test_alarm_wildcard_above_c0() {
        let mut cmos = cmos_with_register_b(0x06);
        cmos.port_mut().set_cell(regs::ALARM_SECONDS, 0xff);
        cmos.port_mut().set_cell(regs::ALARM_MINUTES, 0xc5);
        cmos.port_mut().set_cell(regs::ALARM_HOURS, 7);
        let alarm = cmos.read_alarm().unwrap().alarm;
        assert_eq!(alarm.seconds, AlarmField::Wildcard);
        assert_eq!(alarm.minutes, AlarmField::Wildcard);
        assert_eq!(alarm.hours, AlarmField::Value(7));
    }

    #[test]
    fn test_alarm_validation() {
        assert!(AlarmField::from_signed("alarm minutes", 60, 59).is_err());
        assert_eq!(
            AlarmField::from_signed("alarm hours", -5, 23).unwrap(),
            AlarmField::Wildcard
        );

        let mut cmos = cmos_with_register_b(0x02);
        let bad = Alarm {
            hours: AlarmField::Value(24),
            minutes: AlarmField::Wildcard,
            seconds: AlarmField::Wildcard,
        };
        assert!(cmos.write_alarm(bad).unwrap_err().is_validation());
        assert!(cmos.port_mut().cmos_writes().is_empty());
    }

    #[test]
    fn test_alarm_enable_touches_only_aie() {
        let mut cmos = cmos_with_register_b(0x52);
        cmos.set_alarm_enabled(true).unwrap();
        assert_eq!(cmos.read(regs::REG_B).unwrap(), 0x72);
        assert!(cmos.read_alarm().unwrap().enabled);
        cmos.set_alarm_enabled(false).unwrap();
        assert_eq!(cmos.read(regs::REG_B).unwrap(), 0x52);
    }

    #[test]
    fn test_set_rtc_mode() {
        let mut cmos = cmos_with_register_b(0x02);
        cmos.port_mut().set_cell(regs::REG_A, 0x26);

        assert_eq!(cmos.set_rtc_mode(RtcMode::Bcd, 0).unwrap(), 0x06);
        assert_eq!(cmos.set_rtc_mode(RtcMode::Bcd, 1).unwrap(), 0x02);
        assert_eq!(cmos.set_rtc_mode(RtcMode::Hour24, 0).unwrap(), 0x00);
        assert_eq!(cmos.set_rtc_mode(RtcMode::SquareWave, 1).unwrap(), 0x08);
        assert_eq!(cmos.set_rtc_mode(RtcMode::Rate, 15).unwrap(), 0x2f);

        assert!(cmos.set_rtc_mode(RtcMode::Rate, 16).unwrap_err().is_validation());
        assert_eq!(cmos.read(regs::REG_A).unwrap(), 0x2f);
    }

    #[test]
    fn test_rtc_mode_names() {
        assert_eq!("pie".parse::<RtcMode>().unwrap(), RtcMode::PeriodicInterrupt);
        let err = "alarm".parse::<RtcMode>().unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("alarm"));
    }
}
