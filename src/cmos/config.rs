//! Configuration bytes: drives, equipment, memory, diagnostics.
//!
//! ```text
//! 0x0E  diagnostic status   8 POST fault flags
//! 0x0F  shutdown status     reason for the last CPU reset
//! 0x10  floppy types        A in bits 7-4, B in bits 3-0
//! 0x12  hard disk types     0 in bits 7-4, 1 in bits 3-0 (15 = see 0x19/0x1A)
//! 0x14  equipment           bit 0 floppy present, bit 1 FPU,
//!                           bits 5-4 video mode, bits 7-6 floppy count - 1
//! 0x15  base memory         KB, little-endian word
//! 0x17  extended memory     KB, little-endian word
//! ```
//!
//! Every setter here writes inside the checksummed range, validates its
//! arguments before touching the store and recomputes the checksum last.

use super::status::RegisterD;
use super::{check_range, regs, Cmos, NvrError};
use crate::port::{PortError, PortIo};
use bitflags::bitflags;
use std::str::FromStr;
use tracing::debug;

/// Floppy drive selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloppyDrive {
    A,
    B,
}

impl FloppyDrive {
    fn shift(self) -> u8 {
        match self {
            FloppyDrive::A => 4,
            FloppyDrive::B => 0,
        }
    }
}

impl FromStr for FloppyDrive {
    type Err = NvrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" | "a" | "0" => Ok(FloppyDrive::A),
            "B" | "b" | "1" => Ok(FloppyDrive::B),
            _ => Err(NvrError::UnknownName {
                kind: "floppy drive",
                name: s.to_string(),
                expected: "A, B",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloppyType {
    NotInstalled,
    Dd360,
    Hd1200,
    Dd720,
    Hd1440,
    /// Codes 5-15, never written by this utility.
    Unknown(u8),
}

impl FloppyType {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => FloppyType::NotInstalled,
            1 => FloppyType::Dd360,
            2 => FloppyType::Hd1200,
            3 => FloppyType::Dd720,
            4 => FloppyType::Hd1440,
            n => FloppyType::Unknown(n),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            FloppyType::NotInstalled => 0,
            FloppyType::Dd360 => 1,
            FloppyType::Hd1200 => 2,
            FloppyType::Dd720 => 3,
            FloppyType::Hd1440 => 4,
            FloppyType::Unknown(n) => n,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FloppyType::NotInstalled => "Not installed",
            FloppyType::Dd360 => "360KB 5.25\" DD",
            FloppyType::Hd1200 => "1.2MB 5.25\" HD",
            FloppyType::Dd720 => "720KB 3.5\" DD",
            FloppyType::Hd1440 => "1.44MB 3.5\" HD",
            FloppyType::Unknown(_) => "Unknown",
        }
    }
}

/// Hard disk selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardDisk {
    Disk0,
    Disk1,
}

impl HardDisk {
    fn shift(self) -> u8 {
        match self {
            HardDisk::Disk0 => 4,
            HardDisk::Disk1 => 0,
        }
    }

    fn extended_register(self) -> u8 {
        match self {
            HardDisk::Disk0 => regs::DISK0_EXT,
            HardDisk::Disk1 => regs::DISK1_EXT,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            HardDisk::Disk0 => 0,
            HardDisk::Disk1 => 1,
        }
    }
}

impl FromStr for HardDisk {
    type Err = NvrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" | "C" | "c" => Ok(HardDisk::Disk0),
            "1" | "D" | "d" => Ok(HardDisk::Disk1),
            _ => Err(NvrError::UnknownName {
                kind: "hard disk",
                name: s.to_string(),
                expected: "0, 1, C, D",
            }),
        }
    }
}

/// Hard disk geometry for one BIOS drive type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HdGeometry {
    pub cylinders: u16,
    pub heads: u8,
    /// Write precompensation cylinder, `None` when unused.
    pub precomp: Option<u16>,
    pub landing_zone: u16,
    pub sectors: u8,
}

impl HdGeometry {
    const fn new(cylinders: u16, heads: u8, precomp: Option<u16>, landing_zone: u16) -> Self {
        Self {
            cylinders,
            heads,
            precomp,
            landing_zone,
            sectors: 17,
        }
    }

    /// Formatted capacity in MiB, rounded down.
    pub fn capacity_mb(&self) -> u32 {
        u32::from(self.cylinders) * u32::from(self.heads) * u32::from(self.sectors) * 512
            / (1024 * 1024)
    }
}

/// BIOS drive types 1-14.
pub static HD_TYPES: [HdGeometry; 14] = [
    HdGeometry::new(306, 4, Some(128), 305),
    HdGeometry::new(615, 4, Some(300), 615),
    HdGeometry::new(615, 6, Some(300), 615),
    HdGeometry::new(940, 8, Some(512), 940),
    HdGeometry::new(940, 6, Some(512), 940),
    HdGeometry::new(615, 4, None, 615),
    HdGeometry::new(462, 8, Some(256), 511),
    HdGeometry::new(733, 5, None, 733),
    HdGeometry::new(900, 15, None, 901),
    HdGeometry::new(820, 3, None, 820),
    HdGeometry::new(855, 5, None, 855),
    HdGeometry::new(855, 7, None, 855),
    HdGeometry::new(306, 8, Some(128), 319),
    HdGeometry::new(733, 7, None, 733),
];

/// Type nibble meaning "see the extended type byte".
pub const HD_TYPE_EXTENDED: u8 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardDiskType {
    NotInstalled,
    Standard {
        code: u8,
        geometry: &'static HdGeometry,
    },
    /// Type nibble 15; the real type lives in 0x19/0x1A.
    Extended { code: u8 },
    /// A type with no entry in [`HD_TYPES`].
    Unknown(u8),
}

impl HardDiskType {
    pub fn geometry(code: u8) -> Option<&'static HdGeometry> {
        HD_TYPES.get(usize::from(code).checked_sub(1)?)
    }

    /// Look up a table type.
    pub fn standard(code: u8) -> Self {
        match Self::geometry(code) {
            Some(geometry) => HardDiskType::Standard { code, geometry },
            None => HardDiskType::Unknown(code),
        }
    }
}

/// Video mode selected at boot, equipment bits 5-4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoMode {
    Ega,
    Cga40,
    Cga80,
    Mda,
}

impl VideoMode {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => VideoMode::Ega,
            1 => VideoMode::Cga40,
            2 => VideoMode::Cga80,
            _ => VideoMode::Mda,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            VideoMode::Ega => "EGA/VGA (built-in PEGA)",
            VideoMode::Cga40 => "40-column CGA",
            VideoMode::Cga80 => "80-column CGA",
            VideoMode::Mda => "MDA/Hercules",
        }
    }
}

mod equip {
    pub const FLOPPY_PRESENT: u8 = 0x01;
    pub const FPU: u8 = 0x02;
    pub const VIDEO_MASK: u8 = 0x30;
    pub const VIDEO_SHIFT: u8 = 4;
    pub const FLOPPY_COUNT_MASK: u8 = 0xc0;
    pub const FLOPPY_COUNT_SHIFT: u8 = 6;
}

/// Decoded equipment byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Equipment {
    pub raw: u8,
}

impl Equipment {
    pub fn floppy_present(&self) -> bool {
        self.raw & equip::FLOPPY_PRESENT != 0
    }

    pub fn fpu(&self) -> bool {
        self.raw & equip::FPU != 0
    }

    pub fn video(&self) -> VideoMode {
        VideoMode::from_bits(self.raw >> equip::VIDEO_SHIFT)
    }

    /// Number of floppy drives, 0 when bit 0 is clear.
    pub fn floppy_count(&self) -> u8 {
        if self.floppy_present() {
            ((self.raw & equip::FLOPPY_COUNT_MASK) >> equip::FLOPPY_COUNT_SHIFT) + 1
        } else {
            0
        }
    }
}

/// Equipment field selector for [`Cmos::set_equipment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipmentField {
    /// Any non-zero value marks the coprocessor installed.
    Fpu,
    /// 0-3, see [`VideoMode`].
    Video,
    /// 0-4.
    FloppyCount,
}

impl FromStr for EquipmentField {
    type Err = NvrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fpu" | "coprocessor" | "8087" => Ok(EquipmentField::Fpu),
            "video" => Ok(EquipmentField::Video),
            "floppy-count" => Ok(EquipmentField::FloppyCount),
            _ => Err(NvrError::UnknownName {
                kind: "equipment field",
                name: s.to_string(),
                expected: "fpu, video, floppy-count",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryConfig {
    pub base_kb: u16,
    pub extended_kb: u16,
}

bitflags! {
    /// Diagnostic status byte (0x0E), set by POST.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DiagnosticFlags: u8 {
        const RTC_POWER_LOST      = 0x80;
        const CHECKSUM_BAD        = 0x40;
        const INVALID_CONFIG      = 0x20;
        const MEMORY_SIZE_MISMATCH = 0x10;
        const HD_INIT_FAILED      = 0x08;
        const TIME_INVALID        = 0x04;
        const ADAPTER_ERROR       = 0x02;
        const ADAPTER_ROM_TIMEOUT = 0x01;
    }
}

impl DiagnosticFlags {
    /// Every flag with its description, highest bit first.
    pub const DESCRIPTIONS: [(DiagnosticFlags, &'static str); 8] = [
        (DiagnosticFlags::RTC_POWER_LOST, "RTC lost power"),
        (DiagnosticFlags::CHECKSUM_BAD, "CMOS checksum bad"),
        (DiagnosticFlags::INVALID_CONFIG, "Invalid configuration"),
        (DiagnosticFlags::MEMORY_SIZE_MISMATCH, "Memory size mismatch"),
        (DiagnosticFlags::HD_INIT_FAILED, "Hard disk controller init failed"),
        (DiagnosticFlags::TIME_INVALID, "Time is invalid"),
        (DiagnosticFlags::ADAPTER_ERROR, "Installed adapters error"),
        (DiagnosticFlags::ADAPTER_ROM_TIMEOUT, "Timeout reading adapter ROM"),
    ];
}

/// Shutdown status byte (0x0F).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownCode {
    NormalPost,
    ChipsetInit,
    JumpBootstrap,
    UserWarmBoot,
    BlockMoveReturn,
    JumpDword,
    /// Any code without a defined meaning, passed through.
    Other(u8),
}

impl ShutdownCode {
    pub fn from_code(code: u8) -> Self {
        match code {
            0x00 => ShutdownCode::NormalPost,
            0x01 => ShutdownCode::ChipsetInit,
            0x04 => ShutdownCode::JumpBootstrap,
            0x05 => ShutdownCode::UserWarmBoot,
            0x09 => ShutdownCode::BlockMoveReturn,
            0x0a => ShutdownCode::JumpDword,
            n => ShutdownCode::Other(n),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            ShutdownCode::NormalPost => 0x00,
            ShutdownCode::ChipsetInit => 0x01,
            ShutdownCode::JumpBootstrap => 0x04,
            ShutdownCode::UserWarmBoot => 0x05,
            ShutdownCode::BlockMoveReturn => 0x09,
            ShutdownCode::JumpDword => 0x0a,
            ShutdownCode::Other(n) => n,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ShutdownCode::NormalPost => "Normal POST",
            ShutdownCode::ChipsetInit => "Chip set init for real mode return",
            ShutdownCode::JumpBootstrap => "Jump to bootstrap (INT 19h)",
            ShutdownCode::UserWarmBoot => "User-defined warm boot",
            ShutdownCode::BlockMoveReturn => "Return to real mode (block move)",
            ShutdownCode::JumpDword => "Jump to DWORD at 0040:0067",
            ShutdownCode::Other(_) => "Code",
        }
    }
}

/// Combined Register D and diagnostic bit 7 verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryHealth {
    Healthy,
    /// Battery is good now but was depleted or disconnected at some point.
    PowerWasLost,
    Dead,
}

impl<P: PortIo> Cmos<P> {
    pub fn floppy(&mut self, drive: FloppyDrive) -> Result<FloppyType, PortError> {
        let cell = self.read(regs::FLOPPY)?;
        Ok(FloppyType::from_code((cell >> drive.shift()) & 0x0f))
    }

    /// Set a floppy drive type, 0-4.
    pub fn set_floppy(&mut self, drive: FloppyDrive, code: u8) -> Result<(), NvrError> {
        check_range("floppy type", code, 0..=4, "0-4")?;
        self.write_nibble(regs::FLOPPY, drive.shift(), code)?;
        self.update_checksum()?;
        Ok(())
    }

    pub fn harddisk(&mut self, disk: HardDisk) -> Result<HardDiskType, PortError> {
        let cell = self.read(regs::HARD_DISK)?;
        let code = (cell >> disk.shift()) & 0x0f;
        Ok(match code {
            0 => HardDiskType::NotInstalled,
            HD_TYPE_EXTENDED => HardDiskType::Extended {
                code: self.read(disk.extended_register())?,
            },
            code => HardDiskType::standard(code),
        })
    }

    /// Set a hard disk type nibble, 0-15.
    ///
    /// Type 15 refers to the extended type byte, which is left unchanged.
    pub fn set_harddisk(&mut self, disk: HardDisk, code: u8) -> Result<(), NvrError> {
        check_range("hard disk type", code, 0..=15, "0-15")?;
        self.write_nibble(regs::HARD_DISK, disk.shift(), code)?;
        self.update_checksum()?;
        Ok(())
    }

    pub fn equipment(&mut self) -> Result<Equipment, PortError> {
        Ok(Equipment {
            raw: self.read(regs::EQUIPMENT)?,
        })
    }

    /// Change one equipment field.
    pub fn set_equipment(&mut self, field: EquipmentField, value: u8) -> Result<Equipment, NvrError> {
        match field {
            EquipmentField::Fpu => {}
            EquipmentField::Video => {
                check_range("video mode", value, 0..=3, "0-3")?;
            }
            EquipmentField::FloppyCount => {
                check_range("floppy count", value, 0..=4, "0-4")?;
            }
        }

        let mut raw = self.read(regs::EQUIPMENT)?;
        match field {
            EquipmentField::Fpu if value != 0 => raw |= equip::FPU,
            EquipmentField::Fpu => raw &= !equip::FPU,
            EquipmentField::Video => {
                raw = (raw & !equip::VIDEO_MASK) | (value << equip::VIDEO_SHIFT);
            }
            EquipmentField::FloppyCount if value == 0 => {
                raw &= !(equip::FLOPPY_PRESENT | equip::FLOPPY_COUNT_MASK);
            }
            EquipmentField::FloppyCount => {
                raw = (raw & !equip::FLOPPY_COUNT_MASK)
                    | equip::FLOPPY_PRESENT
                    | ((value - 1) << equip::FLOPPY_COUNT_SHIFT);
            }
        }
        debug!("equipment byte -> {:#04x}", raw);
        self.write(regs::EQUIPMENT, raw)?;
        self.update_checksum()?;
        Ok(Equipment { raw })
    }

    pub fn memory(&mut self) -> Result<MemoryConfig, PortError> {
        Ok(MemoryConfig {
            base_kb: self.read_word(regs::BASE_MEM_LO)?,
            extended_kb: self.read_word(regs::EXT_MEM_LO)?,
        })
    }

    /// Set base memory size in KB, 64-640.
    pub fn set_base_memory(&mut self, kb: u32) -> Result<(), NvrError> {
        let kb = check_range("base memory", kb, 64..=640, "64-640 KB")?;
        self.write_word(regs::BASE_MEM_LO, kb as u16)?;
        self.update_checksum()?;
        Ok(())
    }

    /// Set extended memory size in KB, 0-65535.
    pub fn set_extended_memory(&mut self, kb: u32) -> Result<(), NvrError> {
        let kb = check_range("extended memory", kb, 0..=0xffff, "0-65535 KB")?;
        self.write_word(regs::EXT_MEM_LO, kb as u16)?;
        self.update_checksum()?;
        Ok(())
    }

    pub fn diagnostic_status(&mut self) -> Result<DiagnosticFlags, PortError> {
        Ok(DiagnosticFlags::from_bits_retain(
            self.read(regs::DIAGNOSTIC)?,
        ))
    }

    pub fn shutdown_status(&mut self) -> Result<ShutdownCode, PortError> {
        Ok(ShutdownCode::from_code(self.read(regs::SHUTDOWN)?))
    }

    /// Zero the diagnostic status byte. It lies outside the checksum.
    pub fn clear_diagnostics(&mut self) -> Result<(), PortError> {
        self.write(regs::DIAGNOSTIC, 0x00)
    }

    pub fn battery(&mut self) -> Result<BatteryHealth, PortError> {
        let reg_d = RegisterD::from_bits_retain(self.read(regs::REG_D)?);
        let diag = self.diagnostic_status()?;
        Ok(if !reg_d.contains(RegisterD::VRT) {
            BatteryHealth::Dead
        } else if diag.contains(DiagnosticFlags::RTC_POWER_LOST) {
            BatteryHealth::PowerWasLost
        } else {
            BatteryHealth::Healthy
        })
    }

    fn write_nibble(&mut self, addr: u8, shift: u8, value: u8) -> Result<(), PortError> {
        let cell = self.read(addr)?;
        let cell = (cell & !(0x0f << shift)) | ((value & 0x0f) << shift);
        self.write(addr, cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::SimulatedPc1640;

    fn cmos() -> Cmos<SimulatedPc1640> {
        Cmos::new(SimulatedPc1640::new())
    }

    #[test]
    fn test_floppy_nibbles() {
        let mut cmos = cmos();
        cmos.port_mut().set_cell(regs::FLOPPY, 0x34);
        assert_eq!(cmos.floppy(FloppyDrive::A).unwrap(), FloppyType::Dd720);
        assert_eq!(cmos.floppy(FloppyDrive::B).unwrap(), FloppyType::Hd1440);

        cmos.set_floppy(FloppyDrive::B, 1).unwrap();
        assert_eq!(cmos.port_mut().cmos()[regs::FLOPPY as usize], 0x31);
        assert!(cmos.verify_checksum().unwrap());
    }

    #[test]
    fn test_floppy_unknown_code() {
        let mut cmos = cmos();
        cmos.port_mut().set_cell(regs::FLOPPY, 0x90);
        let floppy = cmos.floppy(FloppyDrive::A).unwrap();
        assert_eq!(floppy, FloppyType::Unknown(9));
        assert_eq!(floppy.name(), "Unknown");
    }

    #[test]
    fn test_set_floppy_rejects_and_leaves_cell() {
        let mut cmos = cmos();
        cmos.port_mut().set_cell(regs::FLOPPY, 0x30);
        let err = cmos.set_floppy(FloppyDrive::A, 5).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(cmos.port_mut().cmos()[regs::FLOPPY as usize], 0x30);
        assert!(cmos.port_mut().cmos_writes().is_empty());
    }

    #[test]
    fn test_drive_selectors() {
        assert_eq!("a".parse::<FloppyDrive>().unwrap(), FloppyDrive::A);
        assert_eq!("1".parse::<FloppyDrive>().unwrap(), FloppyDrive::B);
        assert!("C".parse::<FloppyDrive>().is_err());
        assert_eq!("C".parse::<HardDisk>().unwrap(), HardDisk::Disk0);
        assert_eq!("d".parse::<HardDisk>().unwrap(), HardDisk::Disk1);
        assert!("2".parse::<HardDisk>().is_err());
    }

    #[test]
    fn test_harddisk_types() {
        let mut cmos = cmos();
        cmos.port_mut().set_cell(regs::HARD_DISK, 0x2f);
        cmos.port_mut().set_cell(regs::DISK1_EXT, 47);

        match cmos.harddisk(HardDisk::Disk0).unwrap() {
            HardDiskType::Standard { code, geometry } => {
                assert_eq!(code, 2);
                assert_eq!(geometry.cylinders, 615);
                assert_eq!(geometry.heads, 4);
                assert_eq!(geometry.capacity_mb(), 20);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            cmos.harddisk(HardDisk::Disk1).unwrap(),
            HardDiskType::Extended { code: 47 }
        );
    }

    #[test]
    fn test_set_harddisk_range() {
        let mut cmos = cmos();
        cmos.set_harddisk(HardDisk::Disk1, 15).unwrap();
        assert_eq!(cmos.port_mut().cmos()[regs::HARD_DISK as usize], 0x0f);
        assert!(cmos.verify_checksum().unwrap());

        cmos.port_mut().clear_write_log();
        assert!(cmos.set_harddisk(HardDisk::Disk0, 16).is_err());
        assert!(cmos.port_mut().cmos_writes().is_empty());
    }

    #[test]
    fn test_geometry_table() {
        assert_eq!(HardDiskType::geometry(0), None);
        assert_eq!(HardDiskType::geometry(15), None);
        let type9 = HardDiskType::geometry(9).unwrap();
        assert_eq!((type9.cylinders, type9.heads, type9.landing_zone), (900, 15, 901));
        assert_eq!(type9.precomp, None);
        assert_eq!(type9.capacity_mb(), 112);
    }

    #[test]
    fn test_every_table_type_has_geometry() {
        for code in 1..HD_TYPE_EXTENDED {
            assert!(matches!(
                HardDiskType::standard(code),
                HardDiskType::Standard { code: c, .. } if c == code
            ));
        }
        assert_eq!(HardDiskType::standard(0), HardDiskType::Unknown(0));
        assert_eq!(HardDiskType::standard(16), HardDiskType::Unknown(16));
    }

    #[test]
    fn test_equipment_decode() {
        let eq = Equipment { raw: 0x63 };
        assert!(eq.floppy_present());
        assert!(eq.fpu());
        assert_eq!(eq.video(), VideoMode::Cga80);
        assert_eq!(eq.floppy_count(), 2);
        assert_eq!(Equipment { raw: 0xc0 }.floppy_count(), 0);
    }

    #[test]
    fn test_set_equipment_fields() {
        let mut cmos = cmos();
        cmos.port_mut().set_cell(regs::EQUIPMENT, 0x01);

        let eq = cmos.set_equipment("8087".parse().unwrap(), 1).unwrap();
        assert_eq!(eq.raw, 0x03);
        let eq = cmos.set_equipment(EquipmentField::Video, 3).unwrap();
        assert_eq!(eq.raw, 0x33);
        let eq = cmos.set_equipment(EquipmentField::FloppyCount, 4).unwrap();
        assert_eq!(eq.raw, 0xf3);
        let eq = cmos.set_equipment(EquipmentField::FloppyCount, 0).unwrap();
        assert_eq!(eq.raw, 0x32);
        assert!(cmos.verify_checksum().unwrap());

        assert!(cmos.set_equipment(EquipmentField::Video, 4).is_err());
        assert!("mouse".parse::<EquipmentField>().unwrap_err().is_validation());
    }

    #[test]
    fn test_memory_words() {
        let mut cmos = cmos();
        cmos.set_base_memory(640).unwrap();
        cmos.set_extended_memory(384).unwrap();
        let cells = *cmos.port_mut().cmos();
        assert_eq!(cells[regs::BASE_MEM_LO as usize], 0x80);
        assert_eq!(cells[regs::BASE_MEM_HI as usize], 0x02);
        assert_eq!(
            cmos.memory().unwrap(),
            MemoryConfig {
                base_kb: 640,
                extended_kb: 384
            }
        );
        assert!(cmos.verify_checksum().unwrap());

        assert!(cmos.set_base_memory(63).is_err());
        assert!(cmos.set_base_memory(641).is_err());
        assert!(cmos.set_extended_memory(65536).is_err());
    }

    #[test]
    fn test_shutdown_codes() {
        assert_eq!(ShutdownCode::from_code(0x0a), ShutdownCode::JumpDword);
        let other = ShutdownCode::from_code(0x07);
        assert_eq!(other, ShutdownCode::Other(0x07));
        assert_eq!(other.code(), 0x07);
    }

    #[test]
    fn test_diagnostics_clear() {
        let mut cmos = cmos();
        cmos.port_mut().set_cell(regs::DIAGNOSTIC, 0xc4);
        let diag = cmos.diagnostic_status().unwrap();
        assert!(diag.contains(DiagnosticFlags::CHECKSUM_BAD | DiagnosticFlags::TIME_INVALID));
        cmos.clear_diagnostics().unwrap();
        assert!(cmos.diagnostic_status().unwrap().is_empty());
    }

    #[test]
    fn test_battery_health() {
        let mut cmos = cmos();
        assert_eq!(cmos.battery().unwrap(), BatteryHealth::Healthy);
        cmos.port_mut().set_cell(regs::DIAGNOSTIC, 0x80);
        assert_eq!(cmos.battery().unwrap(), BatteryHealth::PowerWasLost);
        cmos.port_mut().set_battery_ok(false);
        assert_eq!(cmos.battery().unwrap(), BatteryHealth::Dead);
    }
}
