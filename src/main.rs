//! nvr - Amstrad PC1640 NVR/CMOS configuration utility.
//!
//! Reads and edits the MC146818 battery-backed configuration of a PC1640:
//! clock and alarm, drive types, equipment byte, memory sizes, diagnostics
//! and the Amstrad status latches.
//!
//! Hardware access needs root on Linux, through `/dev/port` (default) or
//! `iopl`. With `--image FILE` every command runs against a saved 64-byte
//! snapshot instead, and changes are written back to the file.

mod amstrad;
mod cmos;
mod port;
mod report;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use cmos::config::{FloppyDrive, HardDisk};
use cmos::rtc::{Alarm, AlarmField};
use cmos::snapshot::{self, Snapshot};
use cmos::{Cmos, NvrError, PollPolicy};
use port::{PortIo, SimulatedPc1640};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, warn, Level};

#[derive(Parser, Debug)]
#[command(name = "nvr")]
#[command(version, about = "Amstrad PC1640 NVR/CMOS configuration utility")]
struct Args {
    /// Increase log verbosity (-d info, -dd debug, -ddd register trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    debug: u8,

    /// Port access method
    #[arg(long, value_enum, default_value_t = Backend::DevPort, global = true)]
    backend: Backend,

    /// Operate on a snapshot file instead of the hardware
    #[arg(long, value_name = "FILE", global = true)]
    image: Option<PathBuf>,

    /// Maximum Register A polls while waiting for a clock update to finish
    #[arg(long, value_name = "N", default_value_t = PollPolicy::DEFAULT_MAX_POLLS, global = true)]
    uip_polls: u32,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Backend {
    /// Byte transfers through /dev/port
    DevPort,
    /// in/out instructions after iopl(3), x86 only
    Iopl,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the full configuration (default)
    Show,
    /// Show date and time
    Time,
    /// Show the alarm setting
    Alarm,
    /// Show floppy drive types
    Floppy,
    /// Show hard disk types
    #[command(alias = "hd")]
    Harddisk,
    /// Show the equipment byte
    #[command(alias = "equip")]
    Equipment,
    /// Show base and extended memory
    #[command(alias = "mem")]
    Memory,
    /// Show RTC status registers A-D (clears pending interrupt flags)
    Status,
    /// Show diagnostic and shutdown status
    Diag,
    /// Show battery status
    Battery,
    /// Show Amstrad system status latches
    Amstrad,
    /// Show the language DIP switches
    Language,
    /// Show the display type switches
    Display,
    /// Read the dead-man diagnostic port (0xDEAD)
    #[command(alias = "dead")]
    Deadman,

    /// Set the time
    SetTime {
        /// HH:MM:SS, 24-hour
        #[arg(value_parser = parse_time)]
        time: (u8, u8, u8),
    },
    /// Set the date
    SetDate {
        /// DD/MM/YYYY, 1980-2099
        #[arg(value_parser = parse_date)]
        date: (u8, u8, u16),
    },
    /// Set the day of week
    SetDow {
        /// 1 = Sunday ... 7 = Saturday
        #[arg(value_parser = parse_number::<u8>)]
        day: u8,
    },
    /// Set the alarm
    SetAlarm {
        /// HH:MM:SS, -1 in any field matches every value
        #[arg(value_parser = parse_alarm, allow_hyphen_values = true)]
        time: (i32, i32, i32),
    },
    /// Enable the alarm interrupt
    AlarmEnable,
    /// Disable the alarm interrupt
    AlarmDisable,
    /// Continuously display the time
    Watch {
        /// Stop after this many updates
        #[arg(long)]
        count: Option<u32>,
    },

    /// Set a floppy drive type (0 none, 1 360K, 2 1.2M, 3 720K, 4 1.44M)
    SetFloppy {
        /// A or B
        drive: String,
        #[arg(value_parser = parse_number::<u8>)]
        kind: u8,
    },
    /// Set a hard disk type (0 none, 1-14 table, 15 extended)
    SetHarddisk {
        /// 0/C or 1/D
        disk: String,
        #[arg(value_parser = parse_number::<u8>)]
        kind: u8,
    },
    /// Set an equipment field: fpu 0/1, video 0-3, floppy-count 0-4
    SetEquip {
        field: String,
        #[arg(value_parser = parse_number::<u8>)]
        value: u8,
    },
    /// Set base memory in KB (64-640)
    SetBasemem {
        #[arg(value_parser = parse_number::<u32>)]
        kb: u32,
    },
    /// Set extended memory in KB
    SetExtmem {
        #[arg(value_parser = parse_number::<u32>)]
        kb: u32,
    },
    /// Change an RTC mode: 24h, bcd, sqw, dse, pie, uie (0/1) or rate (0-15)
    SetRtc {
        mode: String,
        #[arg(value_parser = parse_number::<u8>)]
        value: u8,
    },

    /// Hex dump of all 64 cells
    Dump,
    /// Read one cell
    Read {
        #[arg(value_parser = parse_number::<u8>)]
        addr: u8,
    },
    /// Write one cell (checksum updated for 0x10-0x2D)
    Write {
        #[arg(value_parser = parse_number::<u8>)]
        addr: u8,
        #[arg(value_parser = parse_number::<u8>)]
        value: u8,
    },
    /// Fill a range of cells, then update the checksum
    Fill {
        #[arg(value_parser = parse_number::<u8>)]
        start: u8,
        #[arg(value_parser = parse_number::<u8>)]
        end: u8,
        #[arg(value_parser = parse_number::<u8>)]
        value: u8,
    },
    /// Verify the configuration checksum
    Checksum {
        /// Rewrite the stored checksum if it is wrong
        #[arg(long)]
        fix: bool,
    },
    /// Save all 64 cells to a file
    Save { file: PathBuf },
    /// Restore cells from a 64- or 128-byte file
    Load { file: PathBuf },
    /// Compare the live cells against a file
    Compare { file: PathBuf },
    /// Restore factory defaults
    FactoryReset,
    /// Clear the diagnostic status byte
    ClearDiag,

    /// Trace the NVR latch protocol for addresses 0-15
    Trace,
    /// Read an I/O port
    Inb {
        #[arg(value_parser = parse_number::<u16>)]
        port: u16,
    },
    /// Write an I/O port
    Outb {
        #[arg(value_parser = parse_number::<u16>)]
        port: u16,
        #[arg(value_parser = parse_number::<u8>)]
        value: u8,
    },
    /// Reboot through the soft-reset port
    #[command(alias = "reboot")]
    SoftReset,
}

/// Decimal, or hex with a `0x` prefix.
fn parse_number<T: TryFrom<u64>>(s: &str) -> Result<T, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse::<u64>(),
    };
    let value = parsed.map_err(|e| format!("invalid number '{s}': {e}"))?;
    T::try_from(value).map_err(|_| format!("{s} is out of range"))
}

fn split3<'a>(s: &'a str, sep: char, format: &str) -> Result<[&'a str; 3], String> {
    let parts: Vec<&str> = s.split(sep).collect();
    <[&str; 3]>::try_from(parts).map_err(|_| format!("expected {format}, got '{s}'"))
}

fn parse_time(s: &str) -> Result<(u8, u8, u8), String> {
    let [h, m, sec] = split3(s, ':', "HH:MM:SS")?;
    Ok((
        parse_number(h)?,
        parse_number(m)?,
        parse_number(sec)?,
    ))
}

fn parse_alarm(s: &str) -> Result<(i32, i32, i32), String> {
    let [h, m, sec] = split3(s, ':', "HH:MM:SS")?;
    let field = |f: &str| f.parse::<i32>().map_err(|e| format!("invalid field '{f}': {e}"));
    Ok((field(h)?, field(m)?, field(sec)?))
}

fn parse_date(s: &str) -> Result<(u8, u8, u16), String> {
    let [d, m, y] = split3(s, '/', "DD/MM/YYYY")?;
    Ok((parse_number(d)?, parse_number(m)?, parse_number(y)?))
}

fn init_logging(debug: u8) {
    let level = match debug {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.debug);

    if let Err(e) = run(args) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let poll = PollPolicy {
        max_polls: args.uip_polls,
        pause: None,
    };
    let command = args.command.unwrap_or(Command::Show);
    debug!("command: {:?}", command);

    match args.image {
        Some(path) => run_image(&path, poll, &command),
        None => run_hardware(args.backend, poll, &command),
    }
}

/// Run against a snapshot file, writing it back if anything changed.
fn run_image(path: &Path, poll: PollPolicy, command: &Command) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = Snapshot::load(path)?;
    let mut cmos = Cmos::with_poll_policy(SimulatedPc1640::with_cmos(snapshot.0), poll);
    execute(&mut cmos, command)?;

    let sim = cmos.into_inner();
    if !sim.cmos_writes().is_empty() {
        let mut image = sim.cmos_image();
        // Reading Register C clears it; keep the flags the file was saved with.
        image[cmos::regs::REG_C as usize] = snapshot.0[cmos::regs::REG_C as usize];
        Snapshot(image).save(path)?;
        debug!("wrote {}", path.display());
    }
    Ok(())
}

#[cfg(target_os = "linux")]
fn run_hardware(backend: Backend, poll: PollPolicy, command: &Command) -> Result<(), Box<dyn std::error::Error>> {
    match backend {
        Backend::DevPort => {
            let mut cmos = Cmos::with_poll_policy(port::DevPort::open()?, poll);
            execute(&mut cmos, command)?;
            Ok(())
        }
        Backend::Iopl => run_iopl(poll, command),
    }
}

#[cfg(all(
    target_os = "linux",
    target_env = "gnu",
    any(target_arch = "x86", target_arch = "x86_64")
))]
fn run_iopl(poll: PollPolicy, command: &Command) -> Result<(), Box<dyn std::error::Error>> {
    let mut cmos = Cmos::with_poll_policy(port::IoplPort::acquire()?, poll);
    execute(&mut cmos, command)?;
    Ok(())
}

#[cfg(all(
    target_os = "linux",
    not(all(target_env = "gnu", any(target_arch = "x86", target_arch = "x86_64")))
))]
fn run_iopl(_poll: PollPolicy, _command: &Command) -> Result<(), Box<dyn std::error::Error>> {
    Err("The iopl backend requires x86 Linux with glibc. Use --backend dev-port.".into())
}

#[cfg(not(target_os = "linux"))]
fn run_hardware(_backend: Backend, _poll: PollPolicy, _command: &Command) -> Result<(), Box<dyn std::error::Error>> {
    Err("Port access requires Linux. Use --image to edit a snapshot file.".into())
}

fn execute<P: PortIo>(cmos: &mut Cmos<P>, command: &Command) -> Result<(), NvrError> {
    match command {
        Command::Show => show_all(cmos)?,
        Command::Time => report::time(&cmos.read_time()?),
        Command::Alarm => report::alarm(&cmos.read_alarm()?),
        Command::Floppy => report::floppy(cmos.floppy(FloppyDrive::A)?, cmos.floppy(FloppyDrive::B)?),
        Command::Harddisk => report::harddisks(&[
            (HardDisk::Disk0, cmos.harddisk(HardDisk::Disk0)?),
            (HardDisk::Disk1, cmos.harddisk(HardDisk::Disk1)?),
        ]),
        Command::Equipment => report::equipment(&cmos.equipment()?),
        Command::Memory => report::memory(&cmos.memory()?),
        Command::Status => report::rtc_status(&cmos.read_status()?),
        Command::Diag => report::diagnostics(cmos.diagnostic_status()?, cmos.shutdown_status()?),
        Command::Battery => report::battery(cmos.battery()?),
        Command::Amstrad => report::platform(&amstrad::read_platform_status(cmos.port_mut())?),
        Command::Language => report::language(&amstrad::read_lpt_status(cmos.port_mut())?),
        Command::Display => {
            let lpt = amstrad::read_lpt_status(cmos.port_mut())?;
            let ida = amstrad::read_ida_status(cmos.port_mut())?;
            report::display(&lpt, &ida);
        }
        Command::Deadman => report::deadman(amstrad::read_deadman(cmos.port_mut())?),

        Command::SetTime { time: (h, m, s) } => {
            cmos.write_time(*h, *m, *s)?;
            println!("Time set to {h:02}:{m:02}:{s:02}");
        }
        Command::SetDate { date: (d, m, y) } => {
            cmos.write_date(*d, *m, *y)?;
            println!("Date set to {d:02}/{m:02}/{y:04}");
        }
        Command::SetDow { day } => {
            cmos.write_dow(*day)?;
            println!("Day of week set to {} ({})", day, cmos::rtc::day_name(Some(*day)));
        }
        Command::SetAlarm { time: (h, m, s) } => {
            let alarm = Alarm {
                hours: AlarmField::from_signed("alarm hours", *h, 23)?,
                minutes: AlarmField::from_signed("alarm minutes", *m, 59)?,
                seconds: AlarmField::from_signed("alarm seconds", *s, 59)?,
            };
            cmos.write_alarm(alarm)?;
            report::alarm(&cmos.read_alarm()?);
        }
        Command::AlarmEnable => {
            cmos.set_alarm_enabled(true)?;
            println!("Alarm interrupt enabled");
        }
        Command::AlarmDisable => {
            cmos.set_alarm_enabled(false)?;
            println!("Alarm interrupt disabled");
        }
        Command::Watch { count } => {
            println!("RTC Watch Mode (Ctrl+C to stop):\n");
            watch(cmos, *count, &mut std::io::stdout())?;
        }

        Command::SetFloppy { drive, kind } => {
            let drive: FloppyDrive = drive.parse()?;
            cmos.set_floppy(drive, *kind)?;
            println!("Floppy {:?}: {}", drive, cmos.floppy(drive)?.name());
        }
        Command::SetHarddisk { disk, kind } => {
            let disk: HardDisk = disk.parse()?;
            cmos.set_harddisk(disk, *kind)?;
            report::harddisks(&[(disk, cmos.harddisk(disk)?)]);
        }
        Command::SetEquip { field, value } => {
            let equipment = cmos.set_equipment(field.parse()?, *value)?;
            report::equipment(&equipment);
        }
        Command::SetBasemem { kb } => {
            cmos.set_base_memory(*kb)?;
            println!("Base memory set to {kb} KB");
        }
        Command::SetExtmem { kb } => {
            cmos.set_extended_memory(*kb)?;
            println!("Extended memory set to {kb} KB");
        }
        Command::SetRtc { mode, value } => {
            let raw = cmos.set_rtc_mode(mode.parse()?, *value)?;
            println!("RTC mode {mode} set to {value} (register now {raw:#04x})");
        }

        Command::Dump => {
            let snapshot = cmos.export_snapshot()?;
            report::dump(&snapshot, &cmos.checksum_status()?);
        }
        Command::Read { addr } => {
            let value = cmos.read_cell(*addr)?;
            println!("CMOS[{addr:#04x}] = {value:#04x} ({value})");
        }
        Command::Write { addr, value } => {
            cmos.write_cell(*addr, *value)?;
            println!("CMOS[{addr:#04x}] = {value:#04x} written");
        }
        Command::Fill { start, end, value } => {
            cmos.fill(*start, *end, *value)?;
            println!("CMOS[{start:#04x}..={end:#04x}] filled with {value:#04x}");
        }
        Command::Checksum { fix } => {
            let status = cmos.checksum_status()?;
            report::checksum(&status);
            if *fix && !status.is_valid() {
                let sum = cmos.update_checksum()?;
                println!("Checksum updated to {sum:#06x}");
            }
        }
        Command::Save { file } => {
            cmos.export_snapshot()?.save(file)?;
            println!("CMOS saved to {}", file.display());
        }
        Command::Load { file } => {
            let snapshot = Snapshot::load(file)?;
            cmos.import_snapshot(snapshot.cells())?;
            println!("CMOS restored from {}", file.display());
        }
        Command::Compare { file } => {
            let saved = Snapshot::load(file)?;
            let live = cmos.export_snapshot()?;
            println!("Comparing live CMOS against {}:", file.display());
            report::compare(&snapshot::diff(&live, &saved));
        }
        Command::FactoryReset => {
            cmos.factory_reset()?;
            println!("CMOS reset to factory defaults:");
            println!("  Floppy A: 720 KB 3.5\"  Floppy B: None");
            println!("  Hard disk: None");
            println!("  Video: EGA (built-in PEGA)");
            println!("  Memory: 640 KB base, 0 KB extended");
            println!("  RTC: 24-hour BCD mode");
        }
        Command::ClearDiag => {
            cmos.clear_diagnostics()?;
            println!("Diagnostic status cleared");
        }

        Command::Trace => report::trace(&amstrad::trace_nvr(cmos.port_mut())?),
        Command::Inb { port } => {
            let value = cmos.port_mut().inb(*port)?;
            println!("IN  port {port:#06x} = {value:#04x} ({value})");
        }
        Command::Outb { port, value } => {
            cmos.port_mut().outb(*port, *value)?;
            println!("OUT port {port:#06x} = {value:#04x}");
        }
        Command::SoftReset => {
            println!("Triggering soft reset via port 0x66...");
            amstrad::soft_reset(cmos.port_mut())?;
        }
    }
    Ok(())
}

fn show_all<P: PortIo>(cmos: &mut Cmos<P>) -> Result<(), NvrError> {
    println!("Amstrad PC1640 NVR Full Configuration");
    println!("======================================");
    report::time(&cmos.read_time()?);
    report::alarm(&cmos.read_alarm()?);
    report::rtc_status(&cmos.read_status()?);
    report::floppy(cmos.floppy(FloppyDrive::A)?, cmos.floppy(FloppyDrive::B)?);
    report::harddisks(&[
        (HardDisk::Disk0, cmos.harddisk(HardDisk::Disk0)?),
        (HardDisk::Disk1, cmos.harddisk(HardDisk::Disk1)?),
    ]);
    report::equipment(&cmos.equipment()?);
    report::memory(&cmos.memory()?);
    report::diagnostics(cmos.diagnostic_status()?, cmos.shutdown_status()?);
    report::platform(&amstrad::read_platform_status(cmos.port_mut())?);
    let lpt = amstrad::read_lpt_status(cmos.port_mut())?;
    let ida = amstrad::read_ida_status(cmos.port_mut())?;
    report::display(&lpt, &ida);
    report::deadman(amstrad::read_deadman(cmos.port_mut())?);
    println!();
    report::checksum(&cmos.checksum_status()?);
    Ok(())
}

/// Write the time to `out` each time the seconds change, until `count`
/// updates, the process is interrupted, or `out` stops accepting output.
fn watch<P: PortIo, W: Write>(cmos: &mut Cmos<P>, count: Option<u32>, out: &mut W) -> Result<(), NvrError> {
    let mut last = None;
    let mut shown = 0u32;
    loop {
        let t = cmos.read_time()?.time;
        if last != Some(t.seconds) {
            last = Some(t.seconds);
            let written = write!(out, "  {:02}:{:02}:{:02}\r", t.hours, t.minutes, t.seconds)
                .and_then(|()| out.flush());
            if let Err(e) = written {
                warn!("stopping watch: {e}");
                return Ok(());
            }
            shown += 1;
            if count.is_some_and(|c| shown >= c) {
                break;
            }
        }
        std::thread::sleep(Duration::from_millis(100));
    }
    if let Err(e) = writeln!(out) {
        warn!("stopping watch: {e}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_hex_and_decimal() {
        assert_eq!(parse_number::<u8>("0x3f"), Ok(0x3f));
        assert_eq!(parse_number::<u8>("0X10"), Ok(0x10));
        assert_eq!(parse_number::<u16>("57005"), Ok(0xdead));
        assert!(parse_number::<u8>("0x100").is_err());
        assert!(parse_number::<u8>("ten").is_err());
    }

    #[test]
    fn test_parse_time_and_date() {
        assert_eq!(parse_time("23:59:07"), Ok((23, 59, 7)));
        assert!(parse_time("23:59").is_err());
        assert_eq!(parse_date("29/02/2024"), Ok((29, 2, 2024)));
        assert!(parse_date("2024-02-29").is_err());
    }

    #[test]
    fn test_parse_alarm_wildcards() {
        assert_eq!(parse_alarm("-1:-1:0"), Ok((-1, -1, 0)));
        assert_eq!(parse_alarm("7:30:00"), Ok((7, 30, 0)));
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let args = Args::try_parse_from(["nvr", "-dd", "set-alarm", "-1:-1:0"]).unwrap();
        assert_eq!(args.debug, 2);
        assert!(matches!(
            args.command,
            Some(Command::SetAlarm { time: (-1, -1, 0) })
        ));

        let args = Args::try_parse_from(["nvr", "--image", "cmos.bin", "write", "0x14", "0x41"]).unwrap();
        assert_eq!(args.image, Some(PathBuf::from("cmos.bin")));
        assert!(matches!(
            args.command,
            Some(Command::Write { addr: 0x14, value: 0x41 })
        ));

        let args = Args::try_parse_from(["nvr"]).unwrap();
        assert!(args.command.is_none());
    }

    #[test]
    fn test_execute_against_simulator() {
        let mut cmos = Cmos::new(SimulatedPc1640::new());
        execute(&mut cmos, &Command::FactoryReset).unwrap();
        execute(
            &mut cmos,
            &Command::SetFloppy {
                drive: "b".to_string(),
                kind: 4,
            },
        )
        .unwrap();
        assert_eq!(cmos.port_mut().cmos()[0x10], 0x34);
        assert!(cmos.verify_checksum().unwrap());

        let err = execute(
            &mut cmos,
            &Command::SetEquip {
                field: "mouse".to_string(),
                value: 1,
            },
        )
        .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_image_roundtrip() {
        let path = std::env::temp_dir().join(format!("nvr-image-{}.bin", std::process::id()));
        Snapshot([0; cmos::CMOS_SIZE]).save(&path).unwrap();

        run_image(&path, PollPolicy::default(), &Command::FactoryReset).unwrap();
        let saved = Snapshot::load(&path).unwrap();
        assert_eq!(saved.0[cmos::regs::FLOPPY as usize], 0x30);
        assert_eq!(cmos::checksum::compute(&saved.0), cmos::checksum::stored(&saved.0));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_image_keeps_status_registers() {
        use cmos::config::BatteryHealth;
        use cmos::regs;

        let path = std::env::temp_dir().join(format!("nvr-dead-{}.bin", std::process::id()));
        let mut cells = [0u8; cmos::CMOS_SIZE];
        cells[regs::REG_B as usize] = 0x02;
        cells[regs::REG_C as usize] = 0x90;
        cells[regs::REG_D as usize] = 0x00;
        Snapshot(cells).save(&path).unwrap();

        let mut cmos = Cmos::new(SimulatedPc1640::with_cmos(Snapshot::load(&path).unwrap().0));
        assert_eq!(cmos.battery().unwrap(), BatteryHealth::Dead);

        run_image(
            &path,
            PollPolicy::default(),
            &Command::Write {
                addr: 0x20,
                value: 0x01,
            },
        )
        .unwrap();
        let saved = Snapshot::load(&path).unwrap();
        assert_eq!(saved.0[0x20], 0x01);
        assert_eq!(saved.0[regs::REG_C as usize], 0x90);
        assert_eq!(saved.0[regs::REG_D as usize], 0x00);

        std::fs::remove_file(&path).unwrap();
    }

    /// Accepts writes but fails every flush, like a closed pipe.
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
    }

    #[test]
    fn test_watch_prints_until_count() {
        let mut sim = SimulatedPc1640::new();
        sim.set_cell(cmos::regs::REG_B, 0x02);
        sim.set_cell(cmos::regs::HOURS, 0x07);
        sim.set_cell(cmos::regs::MINUTES, 0x45);
        sim.set_cell(cmos::regs::SECONDS, 0x12);
        let mut cmos = Cmos::new(sim);

        let mut out = Vec::new();
        watch(&mut cmos, Some(1), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "  07:45:12\r\n");
    }

    #[test]
    fn test_watch_stops_on_output_error() {
        // The simulated clock never ticks, so without the error this would
        // wait forever.
        let mut cmos = Cmos::new(SimulatedPc1640::new());
        watch(&mut cmos, None, &mut ClosedPipe).unwrap();
    }
}
