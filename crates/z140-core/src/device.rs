//! Open device handle: lifecycle, typed operations and status dispatch.

use core::fmt;

use crate::command::{self, PatternReadout, TestPattern};
use crate::config::{read_field, write_field, ConfigField, OpenConfig, Tunables};
use crate::period::{read_period, Channel, PeriodReading};
use crate::regs::{Register, RegisterAccess};
use crate::stat::{ChannelDirection, ChannelType, StatCode, StatReply};
use crate::status::{read_status, StatusFlags};
use crate::DriverError;

/// Width of the single logical channel in bits.
pub const CHANNEL_LENGTH: i64 = 32;
/// Number of logical channels.
pub const CHANNEL_COUNT: i64 = 1;

const LEVEL_CALLS: u32 = 1;
const LEVEL_VALUES: u32 = 2;

/// One open session to a 16Z140 register block.
///
/// The handle owns its register access for its whole lifetime. Opening
/// applies the configuration and resets the counters; closing resets the
/// counters again and hands the register access back.
#[derive(Debug)]
pub struct Z140Device<R: RegisterAccess> {
    regs: R,
    debug_level: u32,
    tunables: Tunables,
}

impl<R: RegisterAccess> Z140Device<R> {
    /// Opens a handle, applies all five tunables and quiesces the hardware.
    ///
    /// Absent configuration keys fall back to their defaults. Fields are
    /// applied in [`ConfigField::ALL`] order and the first failure aborts the
    /// open.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::InvalidParam`] for the first rejected value and
    /// [`DriverError::Access`] when a register access fails.
    pub fn open(regs: R, config: &OpenConfig) -> Result<Self, DriverError> {
        let mut device = Self {
            regs,
            debug_level: config.debug_level(),
            tunables: Tunables::default(),
        };
        device.log_call(format_args!("open"));

        let requested = config.resolve();
        for field in ConfigField::ALL {
            device.set_field(field, requested.get(field))?;
        }
        command::quiesce(&mut device.regs)?;
        Ok(device)
    }

    /// Quiesces the hardware and releases the handle.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Access`] when the quiescing write fails.
    pub fn close(mut self) -> Result<R, DriverError> {
        self.log_call(format_args!("close"));
        command::quiesce(&mut self.regs)?;
        Ok(self.regs)
    }

    /// Returns the register access backing this handle.
    #[must_use]
    pub const fn registers(&self) -> &R {
        &self.regs
    }

    /// Returns the register access backing this handle mutably.
    #[allow(clippy::missing_const_for_fn)]
    pub fn registers_mut(&mut self) -> &mut R {
        &mut self.regs
    }

    /// Returns the configuration snapshot applied through this handle.
    #[must_use]
    pub const fn tunables(&self) -> &Tunables {
        &self.tunables
    }

    /// Returns the handle debug level.
    #[must_use]
    pub const fn debug_level(&self) -> u32 {
        self.debug_level
    }

    /// Replaces the handle debug level.
    #[allow(clippy::missing_const_for_fn)]
    pub fn set_debug_level(&mut self, level: u32) {
        self.debug_level = level;
    }

    /// Validates and writes one tunable.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::InvalidParam`] without writing when the value is
    /// rejected, and [`DriverError::Access`] when the write fails.
    pub fn set_field(&mut self, field: ConfigField, value: u32) -> Result<(), DriverError> {
        if let Err(error) = write_field(&mut self.regs, field, value) {
            log::error!("{}", field_failure(field, value, &error));
            return Err(error);
        }
        self.tunables.set(field, value);
        self.log_value(format_args!(
            "{} = {value}{}",
            field.label(),
            field.spec().unit.suffix()
        ));
        Ok(())
    }

    /// Reads one tunable back from its register.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Access`] when the read fails.
    pub fn field(&mut self, field: ConfigField) -> Result<u32, DriverError> {
        read_field(&mut self.regs, field)
    }

    /// Resets both distance counters, keeping the test pattern.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Access`] when the register access fails.
    pub fn reset_distance_counters(&mut self) -> Result<(), DriverError> {
        command::reset_distance_counters(&mut self.regs)
    }

    /// Selects a test pattern mode.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Access`] when the write fails.
    pub fn set_test_pattern(&mut self, pattern: TestPattern) -> Result<(), DriverError> {
        command::set_test_pattern(&mut self.regs, pattern)
    }

    /// Reads back the test pattern state.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Access`] when the read fails.
    pub fn test_pattern(&mut self) -> Result<PatternReadout, DriverError> {
        command::read_test_pattern(&mut self.regs)
    }

    /// Reads one period register. Each read consumes the new-data bit.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Access`] when the read fails.
    pub fn period(&mut self, channel: Channel) -> Result<PeriodReading, DriverError> {
        read_period(&mut self.regs, channel)
    }

    /// Reads the forward distance pulse counter.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Access`] when the read fails.
    pub fn distance_forward(&mut self) -> Result<u32, DriverError> {
        Ok(self.regs.read32(Register::DistanceFwd.offset())?)
    }

    /// Reads the backward distance pulse counter.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Access`] when the read fails.
    pub fn distance_backward(&mut self) -> Result<u32, DriverError> {
        Ok(self.regs.read32(Register::DistanceBwd.offset())?)
    }

    /// Reads and decodes the status flags.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Access`] when the read fails.
    pub fn status(&mut self) -> Result<StatusFlags, DriverError> {
        read_status(&mut self.regs)
    }

    /// Applies a host status code.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::UnknownCode`] for unrecognized codes,
    /// [`DriverError::IllegalFunction`] for read-only codes,
    /// [`DriverError::InvalidParam`] or [`DriverError::IllegalDirection`] for
    /// rejected values, and [`DriverError::Access`] for register failures.
    pub fn set_stat(&mut self, raw: u32, value: i64) -> Result<(), DriverError> {
        self.log_call(format_args!("set_stat code={raw:#06x} value={value}"));
        let code = lookup(raw)?;
        if !code.writable() {
            log::error!("set_stat: {code:?} is read only");
            return Err(DriverError::IllegalFunction);
        }
        if let Some(field) = code.config_field() {
            return self.set_field(field, host_u32(value)?);
        }

        match code {
            StatCode::DistanceReset => self.reset_distance_counters(),
            StatCode::TestPattern => {
                let pattern = TestPattern::from_code(host_u32(value)?).ok_or_else(|| {
                    log::error!("set_stat: test pattern {value} rejected");
                    DriverError::InvalidParam
                })?;
                self.set_test_pattern(pattern)
            }
            StatCode::ChannelDirection => {
                if value == ChannelDirection::InOut.code() {
                    Ok(())
                } else {
                    log::error!("set_stat: channel direction {value} rejected");
                    Err(DriverError::IllegalDirection)
                }
            }
            StatCode::DebugLevel => {
                self.debug_level = host_u32(value)?;
                Ok(())
            }
            _ => Err(DriverError::IllegalFunction),
        }
    }

    /// Reads a host status code.
    ///
    /// Measurement codes return their value together with the quality
    /// annotation in [`StatReply`].
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::UnknownCode`] for unrecognized codes,
    /// [`DriverError::IllegalFunction`] for set-only codes and
    /// [`DriverError::Access`] for register failures.
    pub fn get_stat(&mut self, raw: u32) -> Result<StatReply, DriverError> {
        self.log_call(format_args!("get_stat code={raw:#06x}"));
        let code = lookup(raw)?;
        if !code.readable() {
            log::error!("get_stat: {code:?} is set only");
            return Err(DriverError::IllegalFunction);
        }
        if let Some(field) = code.config_field() {
            return Ok(StatReply::ok(i64::from(self.field(field)?)));
        }

        let reply = match code {
            StatCode::TestPattern => {
                let readout = self.test_pattern()?;
                StatReply {
                    value: i64::from(readout.pattern().code()),
                    annotation: readout.error(),
                }
            }
            StatCode::PeriodA | StatCode::PeriodB => {
                let channel = if code == StatCode::PeriodA {
                    Channel::A
                } else {
                    Channel::B
                };
                let reading = self.period(channel)?;
                self.log_value(format_args!(
                    "period-{channel}: {reading} ({:?})",
                    reading.class
                ));
                StatReply {
                    value: i64::from(reading.magnitude),
                    annotation: reading.class.error(),
                }
            }
            StatCode::DistanceForward => StatReply::ok(i64::from(self.distance_forward()?)),
            StatCode::DistanceBackward => StatReply::ok(i64::from(self.distance_backward()?)),
            StatCode::Status => {
                StatReply::ok(i64::from(self.regs.read32(Register::Status.offset())?))
            }
            StatCode::ChannelNumber => StatReply::ok(CHANNEL_COUNT),
            StatCode::ChannelDirection => StatReply::ok(ChannelDirection::In.code()),
            StatCode::ChannelLength => StatReply::ok(CHANNEL_LENGTH),
            StatCode::ChannelType => StatReply::ok(ChannelType::Counter.code()),
            StatCode::DebugLevel => StatReply::ok(i64::from(self.debug_level)),
            _ => return Err(DriverError::IllegalFunction),
        };
        Ok(reply)
    }

    fn log_call(&self, args: fmt::Arguments<'_>) {
        if self.debug_level >= LEVEL_CALLS {
            log::debug!("z140: {args}");
        }
    }

    fn log_value(&self, args: fmt::Arguments<'_>) {
        if self.debug_level >= LEVEL_VALUES {
            log::trace!("z140: {args}");
        }
    }
}

fn field_failure(field: ConfigField, value: u32, error: &DriverError) -> String {
    match error {
        DriverError::Access(access) => {
            format!("{}: writing {value} failed ({access})", field.label())
        }
        _ => format!("{}: {value} rejected ({error})", field.label()),
    }
}

fn lookup(raw: u32) -> Result<StatCode, DriverError> {
    StatCode::from_raw(raw).ok_or_else(|| {
        log::error!("unknown status code {raw:#06x}");
        DriverError::UnknownCode { code: raw }
    })
}

/// Converts a host value to a register-width unsigned value.
fn host_u32(value: i64) -> Result<u32, DriverError> {
    u32::try_from(value).map_err(|_| {
        log::error!("host value {value} out of range");
        DriverError::InvalidParam
    })
}
