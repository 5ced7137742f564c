//! Text rendering for the command-line tool.
//!
//! Each function prints one decoded structure to stdout. Nothing here touches
//! the hardware.

use crate::amstrad::{IdaStatus, LptStatus, NvrTraceRow, PlatformStatus};
use crate::cmos::checksum::ChecksumStatus;
use crate::cmos::config::{
    BatteryHealth, DiagnosticFlags, Equipment, FloppyType, HardDisk, HardDiskType, MemoryConfig,
    ShutdownCode,
};
use crate::cmos::rtc::{day_name, month_name, AlarmField, AlarmReading, HourFormat, RtcReading};
use crate::cmos::snapshot::{cell_label, CellDiff, Snapshot};
use crate::cmos::status::{InterruptFlags, RegisterB, RtcStatus};
use crate::cmos::CMOS_SIZE;

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "YES"
    } else {
        "no"
    }
}

fn set_clear(flag: bool) -> &'static str {
    if flag {
        "SET"
    } else {
        "clear"
    }
}

pub fn time(reading: &RtcReading) {
    let t = &reading.time;
    println!(
        "Date: {} {} {} {}",
        day_name(t.day_of_week),
        t.day_of_month,
        month_name(t.month),
        t.full_year()
    );
    println!("Time: {:02}:{:02}:{:02}", t.hours, t.minutes, t.seconds);
    let hours = match reading.format.hour_format {
        HourFormat::TwentyFourHour => "24-hour",
        HourFormat::TwelveHour => "12-hour",
    };
    println!("Mode: {}, {}", hours, reading.format.data_mode.name());
    if !reading.settled {
        println!("  (update in progress did not clear; value may be torn)");
    }
}

fn alarm_field(field: AlarmField) -> String {
    match field {
        AlarmField::Wildcard => "**".to_string(),
        AlarmField::Value(v) => format!("{v:02}"),
    }
}

pub fn alarm(reading: &AlarmReading) {
    let a = &reading.alarm;
    println!("\nRTC Alarm:");
    if [a.hours, a.minutes, a.seconds]
        .iter()
        .all(|f| *f == AlarmField::Wildcard)
    {
        println!("  Alarm: Not set (all wildcards)");
    } else {
        println!(
            "  Alarm time: {}:{}:{}",
            alarm_field(a.hours),
            alarm_field(a.minutes),
            alarm_field(a.seconds)
        );
        println!("  (** = wildcard/don't care)");
    }
    println!(
        "  Alarm IRQ: {}",
        if reading.enabled {
            "ENABLED (routes to IRQ 1 on PC1640)"
        } else {
            "Disabled"
        }
    );
}

pub fn rtc_status(status: &RtcStatus) {
    let a = status.a;
    let b = status.b;
    let c = status.c;

    println!("\nRTC Status Registers:");
    println!("  Register A (0x0A): {:#04x}", a.raw);
    println!(
        "    Update In Progress: {}",
        if a.update_in_progress() {
            "Yes (do not read time)"
        } else {
            "No"
        }
    );
    println!(
        "    Divider: {} - {}",
        (a.raw >> 4) & 0x07,
        a.divider().description()
    );
    let rate = match a.periodic_rate_hz() {
        Some(hz) => format!("{hz} Hz"),
        None => "None".to_string(),
    };
    println!("    Rate select: {} - {}", a.rate(), rate);

    println!("  Register B (0x0B): {:#04x}", b.bits());
    for (flag, label) in [
        (RegisterB::SET, "SET (halt updates):    "),
        (RegisterB::PIE, "Periodic IRQ enable:   "),
        (RegisterB::AIE, "Alarm IRQ enable:      "),
        (RegisterB::UIE, "Update-end IRQ enable: "),
        (RegisterB::SQWE, "Square wave output:    "),
    ] {
        println!("    {} {}", label, yes_no(b.contains(flag)));
    }
    println!(
        "    Data mode:              {}",
        if b.contains(RegisterB::DM) { "Binary" } else { "BCD" }
    );
    println!(
        "    Hour format:            {}",
        if b.contains(RegisterB::HOUR_24) {
            "24-hour"
        } else {
            "12-hour"
        }
    );
    println!(
        "    Daylight savings:       {}",
        yes_no(b.contains(RegisterB::DSE))
    );

    println!("  Register C (0x0C): {:#04x}  [read clears flags]", c.bits());
    for (flag, label) in [
        (InterruptFlags::IRQF, "IRQ flag (composite):  "),
        (InterruptFlags::PF, "Periodic flag:         "),
        (InterruptFlags::AF, "Alarm flag:            "),
        (InterruptFlags::UF, "Update-ended flag:     "),
    ] {
        println!("    {} {}", label, set_clear(c.contains(flag)));
    }

    println!("  Register D (0x0D): {:#04x}", status.d.bits());
    println!(
        "    Battery: {}",
        if status.battery_ok() {
            "OK (valid RAM & time)"
        } else {
            "*** DEAD - REPLACE BATTERY ***"
        }
    );
}

pub fn floppy(a: FloppyType, b: FloppyType) {
    println!("\nFloppy Drives (CMOS 0x10):");
    println!("  Drive A: {} - {}", a.code(), a.name());
    println!("  Drive B: {} - {}", b.code(), b.name());
}

pub fn harddisks(disks: &[(HardDisk, HardDiskType)]) {
    println!("\nHard Disks (CMOS 0x12):");
    for (disk, kind) in disks {
        match kind {
            HardDiskType::NotInstalled => println!("  Drive {}: Not installed", disk.index()),
            HardDiskType::Unknown(code) => {
                println!("  Drive {}: Type {} (unknown)", disk.index(), code)
            }
            HardDiskType::Extended { code } => {
                println!("  Drive {}: Type 15 (extended type {})", disk.index(), code)
            }
            HardDiskType::Standard { code, geometry } => {
                let precomp = match geometry.precomp {
                    Some(cyl) => cyl.to_string(),
                    None => "none".to_string(),
                };
                println!(
                    "  Drive {}: Type {} - {} cyl, {} heads, {} spt, precomp {}, landing {} ({} MB)",
                    disk.index(),
                    code,
                    geometry.cylinders,
                    geometry.heads,
                    geometry.sectors,
                    precomp,
                    geometry.landing_zone,
                    geometry.capacity_mb()
                );
            }
        }
    }
}

pub fn equipment(eq: &Equipment) {
    println!("\nEquipment Byte (CMOS 0x14): {:#04x}", eq.raw);
    println!(
        "  Floppy drives present: {}",
        if eq.floppy_present() { "Yes" } else { "No" }
    );
    println!(
        "  Math coprocessor:      {}",
        if eq.fpu() { "Installed" } else { "Not installed" }
    );
    println!("  Initial video mode:    {}", eq.video().name());
    println!("  Floppy drive count:    {}", eq.floppy_count());
}

pub fn memory(mem: &MemoryConfig) {
    println!("\nMemory Configuration:");
    println!("  Base memory:     {} KB", mem.base_kb);
    println!("  Extended memory: {} KB", mem.extended_kb);
}

pub fn diagnostics(flags: DiagnosticFlags, shutdown: ShutdownCode) {
    println!("\nDiagnostic Status (CMOS 0x0E): {:#04x}", flags.bits());
    if flags.is_empty() {
        println!("  No errors");
    }
    for (flag, description) in DiagnosticFlags::DESCRIPTIONS {
        if flags.contains(flag) {
            println!("  [!] {description}");
        }
    }
    println!(
        "\nShutdown Status (CMOS 0x0F): {:#04x} - {}",
        shutdown.code(),
        shutdown.description()
    );
}

pub fn battery(health: BatteryHealth) {
    println!("\nBattery Status:");
    match health {
        BatteryHealth::Dead => {
            println!("  *** WARNING: Battery is dead or disconnected! ***");
            println!("  All CMOS settings will be lost on power-off.");
            println!("  Replace the 4x AA batteries in the monitor base.");
        }
        BatteryHealth::PowerWasLost => {
            println!("  Battery was previously depleted or disconnected.");
            println!("  CMOS may contain incorrect settings.");
            println!("  Use 'nvr factory-reset' to restore defaults.");
        }
        BatteryHealth::Healthy => println!("  Battery and CMOS RAM are healthy."),
    }
}

pub fn platform(status: &PlatformStatus) {
    let pb = status.pb;
    println!("\nAmstrad PC1640 System Status:");
    println!("  PB Register (port 0x61): {:#04x}", pb.raw);
    println!(
        "    Bit 0 - Speaker gate:   {}",
        if pb.speaker_gate() { "ON" } else { "off" }
    );
    println!(
        "    Bit 1 - Speaker enable: {}",
        if pb.speaker_enable() { "ON" } else { "off" }
    );
    println!(
        "    Bit 2 - Nibble select:  {} nibble",
        if pb.low_nibble_selected() { "Low" } else { "High" }
    );
    println!(
        "    Bit 6 - Keyboard reset: {}",
        if pb.keyboard_reset() { "ACTIVE" } else { "inactive" }
    );
    println!(
        "    Bit 7 - Port 0x60 mode: {}",
        if pb.status_mode() {
            "System status"
        } else {
            "Keyboard data"
        }
    );
    println!("  Port 0x62 raw read: {:#04x}", status.status2_raw);
    println!(
        "    Bit 5 - Speaker output: {}",
        if status.speaker_output() { "HIGH" } else { "low" }
    );
    println!(
        "    Bit 6 - NMI status:     {}",
        if status.nmi_active() { "ACTIVE" } else { "inactive" }
    );
    println!("  System Status 2 (combined): {:#04x}", status.status2);
    println!("  System Status 1 (port 0x60): {:#04x}", status.status1);
    lpt(&status.lpt);
}

fn lpt(lpt: &LptStatus) {
    println!("  LPT1 Status (port 0x379): {:#04x}", lpt.raw);
    println!(
        "    Bits 0-2 - Language:     {} ({})",
        lpt.language().code(),
        lpt.language().name()
    );
    println!(
        "    Bit 5    - DIP latch:    {}",
        if lpt.dip_latch() { "SW10" } else { "SW9/none" }
    );
    println!(
        "    Bits 6-7 - Display type: {} ({})",
        lpt.display().code(),
        lpt.display().name()
    );
}

pub fn language(lpt: &LptStatus) {
    let language = lpt.language();
    println!("\nLanguage Selection (DIP switches -> port 0x379 bits 0-2):");
    println!("  LPT1 status byte: {:#04x}", lpt.raw);
    println!("  Language code:    {} - {}", language.code(), language.name());
}

pub fn display(lpt: &LptStatus, ida: &IdaStatus) {
    let display = lpt.display();
    println!("\nDisplay Type Detection:");
    println!(
        "  LPT1 status bits 6-7: {} - {}",
        display.code(),
        display.name()
    );
    println!(
        "  IDA status (0x3DE):   {:#04x} - Internal Display Adapter {}",
        ida.raw,
        if ida.disabled() { "DISABLED" } else { "active" }
    );
}

pub fn deadman(value: u8) {
    println!("\nDead-Man Diagnostic Port (0xDEAD): {value:#04x}");
    println!("  Last POST progress code written by the BIOS.");
}

pub fn checksum(status: &ChecksumStatus) {
    println!(
        "Checksum (0x10-0x2D): stored {:#06x}, computed {:#06x} - {}",
        status.stored,
        status.computed,
        if status.is_valid() {
            "VALID"
        } else {
            "*** INVALID ***"
        }
    );
}

pub fn dump(snapshot: &Snapshot, status: &ChecksumStatus) {
    println!("\nCMOS RAM Dump ({CMOS_SIZE} bytes):");
    println!("       00 01 02 03 04 05 06 07 08 09 0A 0B 0C 0D 0E 0F");
    println!("       -- -- -- -- -- -- -- -- -- -- -- -- -- -- -- --");
    for (row, chunk) in snapshot.cells().chunks(16).enumerate() {
        let bytes: Vec<String> = chunk.iter().map(|b| format!("{b:02X}")).collect();
        println!("  {:02X}:  {}", row * 16, bytes.join(" "));
    }
    println!();
    checksum(status);
}

pub fn compare(diffs: &[CellDiff]) {
    println!("\n  Addr  Live  File");
    for d in diffs {
        let label = cell_label(d.address).unwrap_or("");
        println!(
            "  0x{:02X}  0x{:02X}  0x{:02X}  {}",
            d.address, d.left, d.right, label
        );
    }
    if diffs.is_empty() {
        println!("  No differences found");
    } else {
        println!("\n  Total: {} byte(s) differ", diffs.len());
    }
}

pub fn trace(rows: &[NvrTraceRow]) {
    println!("\nNVR Protocol Trace (port 0x65 -> port 0x62):");
    println!("  Addr  Rd62(hi)  Rd62(lo)  Combined");
    for row in rows {
        println!(
            "  0x{:02X}  0x{:X}       0x{:X}       0x{:02X}",
            row.address,
            row.high,
            row.low,
            row.combined()
        );
    }
}
