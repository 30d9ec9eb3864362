//! CLI entry point for the z140-ctrl binary.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env};
#[cfg(test)]
use tempfile as _;
use z140_core::{ConfigField, OpenConfig, Z140Device};
use z140_ctrl::{run, FileRegisters, Plan};

/// Control the 16Z140 frequency counter.
///
/// The driver resets the distance counters and disables the test pattern
/// generator when the device is closed.
#[derive(Debug, Parser)]
#[command(name = "z140-ctrl", version, about)]
struct Cli {
    /// Register block device or image file.
    device: PathBuf,

    /// Byte offset of the register block inside the device file.
    #[arg(long, default_value_t = 0, value_parser = parse_offset)]
    offset: u64,

    /// Debounce time (0..[1]..255us).
    #[arg(short = 'b', value_name = "us", allow_negative_numbers = true)]
    debounce_time: Option<i64>,

    /// Measurement timeout (100..[100]..10000ms).
    #[arg(short = 'm', value_name = "ms", allow_negative_numbers = true)]
    measurement_timeout: Option<i64>,

    /// Rolling time period (10..[10]..2550ms).
    #[arg(short = 'r', value_name = "ms", allow_negative_numbers = true)]
    rolling_time: Option<i64>,

    /// Standstill time period (10..[10]..2550ms).
    #[arg(short = 's', value_name = "ms", allow_negative_numbers = true)]
    standstill_time: Option<i64>,

    /// Direction detection timeout (10..[10]..2550ms).
    #[arg(short = 'd', value_name = "ms", allow_negative_numbers = true)]
    direction_detection_timeout: Option<i64>,

    /// Print the configuration parameters.
    #[arg(short = 'g')]
    get_config: bool,

    /// Clear forward and backward distance counters.
    #[arg(short = 'c')]
    clear: bool,

    /// Test pattern: 0 disable, 1 clockwise, 2 counterclockwise, 3 silence.
    #[arg(short = 'p', value_name = "0..3", allow_negative_numbers = true)]
    pattern: Option<i64>,

    /// Print period A/B and distance pulse counts.
    #[arg(short = 'M')]
    measure: bool,

    /// Print status flags.
    #[arg(short = 'S')]
    status: bool,

    /// Repeat -M/-S every <ms> milliseconds.
    #[arg(short = 'L', value_name = "ms")]
    loop_ms: Option<u64>,

    /// Stop the loop after <n> cycles.
    #[arg(short = 'A', value_name = "n", requires = "loop_ms")]
    abort_after: Option<u32>,

    /// Raise log verbosity (repeatable).
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn plan(&self) -> Plan {
        let settings = [
            (ConfigField::DebounceTime, self.debounce_time),
            (ConfigField::MeasurementTimeout, self.measurement_timeout),
            (ConfigField::RollingTime, self.rolling_time),
            (ConfigField::StandstillTime, self.standstill_time),
            (
                ConfigField::DirectionDetectionTimeout,
                self.direction_detection_timeout,
            ),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|value| (field, value)))
        .collect();

        Plan {
            settings,
            print_config: self.get_config,
            clear_distances: self.clear,
            pattern: self.pattern,
            measure: self.measure,
            status: self.status,
            loop_delay: self.loop_ms.map(Duration::from_millis),
            abort_after: self.abort_after,
        }
    }

    const fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }

    fn debug_level(&self) -> u32 {
        u32::from(self.verbose)
    }
}

fn parse_offset(text: &str) -> Result<u64, String> {
    let parsed = text.strip_prefix("0x").map_or_else(
        || text.parse::<u64>(),
        |hex| u64::from_str_radix(hex, 16),
    );
    parsed.map_err(|error| format!("invalid offset {text}: {error}"))
}

fn execute(cli: &Cli) -> Result<()> {
    let plan = cli.plan();
    plan.validate()?;

    let regs = FileRegisters::open(&cli.device, cli.offset)
        .with_context(|| format!("can't open {}", cli.device.display()))?;
    let config = OpenConfig {
        debug_level: Some(cli.debug_level()),
        ..OpenConfig::default()
    };
    let mut device = Z140Device::open(regs, &config).context("can't open device")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let outcome = run(&mut device, &plan, &mut out);
    out.flush()?;

    let closed = device.close().context("can't close");
    outcome.and(closed.map(drop))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    Builder::from_env(Env::default().default_filter_or(cli.log_level().as_str()))
        .format_target(false)
        .init();

    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            println!("*** {error:#}");
            ExitCode::FAILURE
        }
    }
}
