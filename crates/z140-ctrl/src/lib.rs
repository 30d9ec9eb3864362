//! Control tool library for the 16Z140 frequency counter.
//!
//! The tool drives a register block reachable through a file, such as a UIO
//! or memory window device node, or a plain register image used for testing.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap as _;
use env_logger as _;
#[cfg(test)]
use tempfile as _;
use z140_core::{
    decode_status, validate_offset, AccessError, Channel, ConfigField, DriverError,
    RegisterAccess, StatCode, StatReply, StatusFlags, Z140Device,
};

/// Register block backed by a file at a fixed byte offset.
///
/// Words are little-endian. Every access seeks to the absolute position, so
/// the file may be shared with other readers.
#[derive(Debug)]
pub struct FileRegisters {
    file: File,
    base: u64,
}

impl FileRegisters {
    /// Opens `path` for reading and writing with the block at `base`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error of the open call.
    pub fn open(path: &Path, base: u64) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Ok(Self { file, base })
    }

    fn seek_to(&mut self, offset: u32) -> io::Result<()> {
        self.file
            .seek(SeekFrom::Start(self.base + u64::from(offset)))
            .map(drop)
    }
}

impl RegisterAccess for FileRegisters {
    fn read32(&mut self, offset: u32) -> Result<u32, AccessError> {
        validate_offset(offset)?;
        let mut bytes = [0_u8; 4];
        self.seek_to(offset)
            .and_then(|()| self.file.read_exact(&mut bytes))
            .map_err(|error| {
                log::warn!("read at {offset:#04x} failed: {error}");
                AccessError::ReadFailed { offset }
            })?;
        Ok(u32::from_le_bytes(bytes))
    }

    fn write32(&mut self, offset: u32, value: u32) -> Result<(), AccessError> {
        validate_offset(offset)?;
        self.seek_to(offset)
            .and_then(|()| self.file.write_all(&value.to_le_bytes()))
            .map_err(|error| {
                log::warn!("write at {offset:#04x} failed: {error}");
                AccessError::WriteFailed { offset }
            })
    }
}

/// Actions requested on the command line, applied in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Plan {
    /// Tunables to set, in application order.
    pub settings: Vec<(ConfigField, i64)>,
    /// Print the configuration after applying settings.
    pub print_config: bool,
    /// Clear both distance counters.
    pub clear_distances: bool,
    /// Test pattern code to select.
    pub pattern: Option<i64>,
    /// Print periods and distances.
    pub measure: bool,
    /// Print status flags.
    pub status: bool,
    /// Repeat the measurement block with this delay.
    pub loop_delay: Option<Duration>,
    /// Stop looping after this many cycles.
    pub abort_after: Option<u32>,
}

impl Plan {
    /// Checks option combinations that cannot be expressed per option.
    ///
    /// # Errors
    ///
    /// Fails when a loop is requested without anything to print.
    pub fn validate(&self) -> Result<()> {
        if self.loop_delay.is_some() && !self.measure && !self.status {
            bail!("-L= requires option -M and/or -S");
        }
        Ok(())
    }
}

/// Formats one configuration line.
#[must_use]
pub fn config_line(field: ConfigField, value: i64) -> String {
    format!(
        "{:<28}: {value}{}",
        field.label(),
        field.spec().unit.suffix()
    )
}

/// Returns the tool's text for a measurement annotation.
///
/// # Errors
///
/// Returns the error itself when it is not a measurement annotation.
pub fn measurement_status(annotation: Option<DriverError>) -> Result<&'static str, DriverError> {
    match annotation {
        None => Ok("success"),
        Some(DriverError::PeriodInvalid) => Ok("*** period-err"),
        Some(DriverError::PhaseViolation) => Ok("*** phase-err"),
        Some(DriverError::NoNewData) => Ok("*** no-new-data"),
        Some(error) => Err(error),
    }
}

/// Formats one period line from a period status reply.
///
/// # Errors
///
/// Returns the reply's annotation when it is not a measurement annotation.
pub fn period_line(channel: Channel, reply: StatReply) -> Result<String, DriverError> {
    let status = measurement_status(reply.annotation)?;
    let magnitude = u32::try_from(reply.value).map_err(|_| DriverError::InvalidParam)?;
    Ok(format!(
        "period-{channel}     :   {:8}.{:03}us ({status})",
        z140_core::period_us(magnitude),
        z140_core::period_ns(magnitude)
    ))
}

/// Formats one distance counter line.
#[must_use]
pub fn distance_line(label: &str, pulses: i64) -> String {
    format!("{label:<13}: {pulses:10} pulses")
}

/// Formats the status flag line; every set flag is followed by a space.
#[must_use]
pub fn status_line(flags: StatusFlags) -> String {
    let mut line = String::from("status flags : ");
    for name in flags.names() {
        line.push_str(name);
        line.push(' ');
    }
    line
}

fn set<R: RegisterAccess>(device: &mut Z140Device<R>, code: StatCode, value: i64) -> Result<()> {
    device
        .set_stat(code.raw(), value)
        .with_context(|| format!("can't setstat {code:?}"))
}

fn get<R: RegisterAccess>(device: &mut Z140Device<R>, code: StatCode) -> Result<StatReply> {
    device
        .get_stat(code.raw())
        .with_context(|| format!("can't getstat {code:?}"))
}

fn get_value<R: RegisterAccess>(device: &mut Z140Device<R>, code: StatCode) -> Result<i64> {
    get(device, code)?
        .into_result()
        .with_context(|| format!("can't getstat {code:?}"))
}

fn print_measurement<R: RegisterAccess, W: Write>(
    device: &mut Z140Device<R>,
    out: &mut W,
) -> Result<()> {
    let period_a = get(device, StatCode::PeriodA)?;
    let period_b = get(device, StatCode::PeriodB)?;
    let forward = get_value(device, StatCode::DistanceForward)?;
    let backward = get_value(device, StatCode::DistanceBackward)?;

    writeln!(
        out,
        "{}",
        period_line(Channel::A, period_a).context("can't getstat PeriodA")?
    )?;
    writeln!(
        out,
        "{}",
        period_line(Channel::B, period_b).context("can't getstat PeriodB")?
    )?;
    writeln!(out, "{}", distance_line("dist-fwd", forward))?;
    writeln!(out, "{}", distance_line("dist-bwd", backward))?;
    Ok(())
}

fn status_flags(raw: i64) -> Result<StatusFlags> {
    let word = u32::try_from(raw).with_context(|| format!("status word {raw} out of range"))?;
    Ok(decode_status(word))
}

fn print_status<R: RegisterAccess, W: Write>(
    device: &mut Z140Device<R>,
    out: &mut W,
) -> Result<()> {
    let flags = status_flags(get_value(device, StatCode::Status)?)?;
    writeln!(out, "{}", status_line(flags))?;
    Ok(())
}

/// Applies `plan` to an open device and prints the requested readings.
///
/// The device is left open; callers close it on every path.
///
/// # Errors
///
/// Fails on the first rejected setting or failed read, or when writing to
/// `out` fails.
pub fn run<R: RegisterAccess, W: Write>(
    device: &mut Z140Device<R>,
    plan: &Plan,
    out: &mut W,
) -> Result<()> {
    for &(field, value) in &plan.settings {
        set(device, StatCode::for_field(field), value)?;
    }

    if plan.print_config {
        for field in ConfigField::ALL {
            let value = get_value(device, StatCode::for_field(field))?;
            writeln!(out, "{}", config_line(field, value))?;
        }
    }

    if plan.clear_distances {
        set(device, StatCode::DistanceReset, 0)?;
    }

    if let Some(pattern) = plan.pattern {
        set(device, StatCode::TestPattern, pattern)?;
    }

    let mut cycle: u32 = 1;
    while plan.measure || plan.status {
        if plan.loop_delay.is_some() {
            writeln!(out, "#{cycle}")?;
        }
        if plan.measure {
            print_measurement(device, out)?;
        }
        if plan.status {
            print_status(device, out)?;
        }

        let Some(delay) = plan.loop_delay else {
            break;
        };
        out.flush()?;
        thread::sleep(delay);
        if plan.abort_after == Some(cycle) {
            break;
        }
        cycle = cycle.wrapping_add(1);
    }

    writeln!(out)?;
    Ok(())
}
