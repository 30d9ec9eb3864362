//! Engineering-unit configuration fields and their register tick encoding.
//!
//! Each tunable is stored by the IP core as a tick count. The codec accepts
//! only values inside the field's inclusive range that are exact multiples of
//! its step, and writes `value / step` ticks. Reading multiplies back by the
//! step, so every accepted value round-trips exactly.

use crate::regs::{Register, RegisterAccess};
use crate::DriverError;

/// Engineering unit of a configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Unit {
    /// Microseconds.
    Microseconds,
    /// Milliseconds.
    Milliseconds,
}

impl Unit {
    /// Returns the short unit suffix used in tool output.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Microseconds => "us",
            Self::Milliseconds => "ms",
        }
    }
}

/// Static validation and encoding parameters of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Inclusive lower bound in engineering units.
    pub min: u32,
    /// Inclusive upper bound in engineering units.
    pub max: u32,
    /// Required granularity; also the size of one register tick.
    pub step: u32,
    /// Engineering unit.
    pub unit: Unit,
    /// Backing register.
    pub register: Register,
    /// Value applied at open when no configuration is supplied.
    pub default: u32,
    /// Descriptor key naming the field.
    pub key: &'static str,
}

/// The five tunables of the IP core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ConfigField {
    /// Input debouncing time, 0..=255 µs in steps of 1 µs.
    DebounceTime,
    /// Period measurement timeout, 100..=10000 ms in steps of 100 ms.
    MeasurementTimeout,
    /// Rolling time period, 10..=2550 ms in steps of 10 ms.
    RollingTime,
    /// Standstill time period, 10..=2550 ms in steps of 10 ms.
    StandstillTime,
    /// Direction detection timeout, 10..=2550 ms in steps of 10 ms.
    DirectionDetectionTimeout,
}

impl ConfigField {
    /// All fields in the order they are applied at open.
    pub const ALL: [Self; 5] = [
        Self::DebounceTime,
        Self::MeasurementTimeout,
        Self::RollingTime,
        Self::StandstillTime,
        Self::DirectionDetectionTimeout,
    ];

    /// Returns the validation table entry of this field.
    #[must_use]
    pub const fn spec(self) -> FieldSpec {
        match self {
            Self::DebounceTime => FieldSpec {
                min: 0,
                max: 255,
                step: 1,
                unit: Unit::Microseconds,
                register: Register::DebTime,
                default: 5,
                key: "DEBOUNCE_TIME",
            },
            Self::MeasurementTimeout => FieldSpec {
                min: 100,
                max: 10_000,
                step: 100,
                unit: Unit::Milliseconds,
                register: Register::MeasTout,
                default: 100,
                key: "MEAS_TOUT",
            },
            Self::RollingTime => FieldSpec {
                min: 10,
                max: 2550,
                step: 10,
                unit: Unit::Milliseconds,
                register: Register::RollingTime,
                default: 10,
                key: "ROLLING_TIME",
            },
            // Default differs from the range floor.
            Self::StandstillTime => FieldSpec {
                min: 10,
                max: 2550,
                step: 10,
                unit: Unit::Milliseconds,
                register: Register::StandstillTime,
                default: 20,
                key: "STANDSTILL_TIME",
            },
            Self::DirectionDetectionTimeout => FieldSpec {
                min: 10,
                max: 2550,
                step: 10,
                unit: Unit::Milliseconds,
                register: Register::DirDetTout,
                default: 100,
                key: "DIRDET_TOUT",
            },
        }
    }

    /// Returns the human-readable field label used by tools.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DebounceTime => "Debounce time",
            Self::MeasurementTimeout => "Measurement timeout",
            Self::RollingTime => "Rolling time period",
            Self::StandstillTime => "Standstill time period",
            Self::DirectionDetectionTimeout => "Direction detection timeout",
        }
    }

    /// Looks up a field by its descriptor key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.spec().key == key)
    }

    /// Validates an engineering value and returns its tick count.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::InvalidParam`] when `value` is outside the
    /// field's inclusive range or not a multiple of its step.
    pub const fn encode_ticks(self, value: u32) -> Result<u32, DriverError> {
        let spec = self.spec();
        if value < spec.min || value > spec.max || !value.is_multiple_of(spec.step) {
            return Err(DriverError::InvalidParam);
        }
        Ok(value / spec.step)
    }

    /// Converts a raw tick count back into engineering units.
    #[must_use]
    pub const fn decode_ticks(self, ticks: u32) -> u32 {
        ticks.wrapping_mul(self.spec().step)
    }
}

/// Validates `value` and writes its tick count to the field's register.
///
/// Nothing is written when validation fails.
///
/// # Errors
///
/// Returns [`DriverError::InvalidParam`] for rejected values and
/// [`DriverError::Access`] when the register write fails.
pub fn write_field<R: RegisterAccess>(
    regs: &mut R,
    field: ConfigField,
    value: u32,
) -> Result<(), DriverError> {
    let ticks = field.encode_ticks(value)?;
    regs.write32(field.spec().register.offset(), ticks)?;
    Ok(())
}

/// Reads the field's register and returns the value in engineering units.
///
/// # Errors
///
/// Returns [`DriverError::Access`] when the register read fails.
pub fn read_field<R: RegisterAccess>(regs: &mut R, field: ConfigField) -> Result<u32, DriverError> {
    let ticks = regs.read32(field.spec().register.offset())?;
    Ok(field.decode_ticks(ticks))
}

/// Resolved values of all five tunables, in engineering units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Tunables {
    /// Debounce time in µs.
    pub debounce_time: u32,
    /// Measurement timeout in ms.
    pub measurement_timeout: u32,
    /// Rolling time period in ms.
    pub rolling_time: u32,
    /// Standstill time period in ms.
    pub standstill_time: u32,
    /// Direction detection timeout in ms.
    pub direction_detection_timeout: u32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            debounce_time: ConfigField::DebounceTime.spec().default,
            measurement_timeout: ConfigField::MeasurementTimeout.spec().default,
            rolling_time: ConfigField::RollingTime.spec().default,
            standstill_time: ConfigField::StandstillTime.spec().default,
            direction_detection_timeout: ConfigField::DirectionDetectionTimeout.spec().default,
        }
    }
}

impl Tunables {
    /// Returns the value of one field.
    #[must_use]
    pub const fn get(&self, field: ConfigField) -> u32 {
        match field {
            ConfigField::DebounceTime => self.debounce_time,
            ConfigField::MeasurementTimeout => self.measurement_timeout,
            ConfigField::RollingTime => self.rolling_time,
            ConfigField::StandstillTime => self.standstill_time,
            ConfigField::DirectionDetectionTimeout => self.direction_detection_timeout,
        }
    }

    /// Replaces the value of one field.
    #[allow(clippy::missing_const_for_fn)]
    pub fn set(&mut self, field: ConfigField, value: u32) {
        match field {
            ConfigField::DebounceTime => self.debounce_time = value,
            ConfigField::MeasurementTimeout => self.measurement_timeout = value,
            ConfigField::RollingTime => self.rolling_time = value,
            ConfigField::StandstillTime => self.standstill_time = value,
            ConfigField::DirectionDetectionTimeout => self.direction_detection_timeout = value,
        }
    }
}

/// Debug level used when the configuration does not name one.
pub const DEFAULT_DEBUG_LEVEL: u32 = 0;

/// Caller-supplied open-time configuration; absent keys fall back to defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE", default))]
pub struct OpenConfig {
    /// Handle debug level.
    pub debug_level: Option<u32>,
    /// Debounce time in µs.
    pub debounce_time: Option<u32>,
    /// Measurement timeout in ms.
    pub meas_tout: Option<u32>,
    /// Rolling time period in ms.
    pub rolling_time: Option<u32>,
    /// Standstill time period in ms.
    pub standstill_time: Option<u32>,
    /// Direction detection timeout in ms.
    pub dirdet_tout: Option<u32>,
}

impl OpenConfig {
    /// Builds a configuration from descriptor key/value pairs.
    ///
    /// Keys that do not name a driver setting are ignored.
    pub fn from_descriptor<'a>(entries: impl IntoIterator<Item = (&'a str, u32)>) -> Self {
        let mut config = Self::default();
        for (key, value) in entries {
            if key == "DEBUG_LEVEL" {
                config.debug_level = Some(value);
            } else if let Some(field) = ConfigField::from_key(key) {
                config.set(field, value);
            } else {
                log::debug!("ignoring descriptor key {key}");
            }
        }
        config
    }

    /// Returns the configured value of one field, if present.
    #[must_use]
    pub const fn get(&self, field: ConfigField) -> Option<u32> {
        match field {
            ConfigField::DebounceTime => self.debounce_time,
            ConfigField::MeasurementTimeout => self.meas_tout,
            ConfigField::RollingTime => self.rolling_time,
            ConfigField::StandstillTime => self.standstill_time,
            ConfigField::DirectionDetectionTimeout => self.dirdet_tout,
        }
    }

    /// Sets one field.
    #[allow(clippy::missing_const_for_fn)]
    pub fn set(&mut self, field: ConfigField, value: u32) {
        let slot = match field {
            ConfigField::DebounceTime => &mut self.debounce_time,
            ConfigField::MeasurementTimeout => &mut self.meas_tout,
            ConfigField::RollingTime => &mut self.rolling_time,
            ConfigField::StandstillTime => &mut self.standstill_time,
            ConfigField::DirectionDetectionTimeout => &mut self.dirdet_tout,
        };
        *slot = Some(value);
    }

    /// Resolves absent fields to their defaults. Values are not validated here.
    #[must_use]
    pub fn resolve(&self) -> Tunables {
        let mut tunables = Tunables::default();
        for field in ConfigField::ALL {
            if let Some(value) = self.get(field) {
                tunables.set(field, value);
            }
        }
        tunables
    }

    /// Returns the configured debug level or [`DEFAULT_DEBUG_LEVEL`].
    #[must_use]
    pub fn debug_level(&self) -> u32 {
        self.debug_level.unwrap_or(DEFAULT_DEBUG_LEVEL)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{read_field, write_field, ConfigField, OpenConfig, Tunables, Unit};
    use crate::regs::map::{DEB_TIME, MEAS_TOUT, STANDSTILL_TIME};
    use crate::sim::SimulatedIpCore;
    use crate::DriverError;

    #[rstest]
    #[case(ConfigField::DebounceTime, 0, 0)]
    #[case(ConfigField::DebounceTime, 255, 255)]
    #[case(ConfigField::MeasurementTimeout, 100, 1)]
    #[case(ConfigField::MeasurementTimeout, 10_000, 100)]
    #[case(ConfigField::RollingTime, 10, 1)]
    #[case(ConfigField::StandstillTime, 2550, 255)]
    #[case(ConfigField::DirectionDetectionTimeout, 100, 10)]
    fn accepted_values_encode_to_ticks(
        #[case] field: ConfigField,
        #[case] value: u32,
        #[case] ticks: u32,
    ) {
        assert_eq!(field.encode_ticks(value), Ok(ticks));
        assert_eq!(field.decode_ticks(ticks), value);
    }

    #[rstest]
    #[case(ConfigField::DebounceTime, 256)]
    #[case(ConfigField::MeasurementTimeout, 0)]
    #[case(ConfigField::MeasurementTimeout, 150)]
    #[case(ConfigField::MeasurementTimeout, 10_100)]
    #[case(ConfigField::RollingTime, 0)]
    #[case(ConfigField::RollingTime, 2560)]
    #[case(ConfigField::StandstillTime, 15)]
    #[case(ConfigField::DirectionDetectionTimeout, 9)]
    fn rejected_values_report_invalid_param(#[case] field: ConfigField, #[case] value: u32) {
        assert_eq!(field.encode_ticks(value), Err(DriverError::InvalidParam));
    }

    #[test]
    fn write_field_stores_ticks_and_reads_back_value() {
        let mut core = SimulatedIpCore::new();
        write_field(&mut core, ConfigField::MeasurementTimeout, 2500).expect("valid timeout");
        assert_eq!(core.peek(MEAS_TOUT), 25);
        assert_eq!(read_field(&mut core, ConfigField::MeasurementTimeout), Ok(2500));
    }

    #[test]
    fn rejected_write_leaves_register_untouched() {
        let mut core = SimulatedIpCore::new();
        write_field(&mut core, ConfigField::StandstillTime, 20).expect("valid standstill");
        assert_eq!(
            write_field(&mut core, ConfigField::StandstillTime, 15),
            Err(DriverError::InvalidParam)
        );
        assert_eq!(core.peek(STANDSTILL_TIME), 2);
        assert_eq!(core.writes().len(), 1);
    }

    #[test]
    fn debounce_uses_microseconds_and_others_milliseconds() {
        assert_eq!(ConfigField::DebounceTime.spec().unit, Unit::Microseconds);
        assert_eq!(ConfigField::DebounceTime.spec().register.offset(), DEB_TIME);
        for field in &ConfigField::ALL[1..] {
            assert_eq!(field.spec().unit, Unit::Milliseconds);
        }
    }

    #[test]
    fn defaults_keep_standstill_above_range_floor() {
        let defaults = Tunables::default();
        assert_eq!(defaults.debounce_time, 5);
        assert_eq!(defaults.measurement_timeout, 100);
        assert_eq!(defaults.rolling_time, 10);
        assert_eq!(defaults.standstill_time, 20);
        assert_eq!(defaults.direction_detection_timeout, 100);
        assert_ne!(
            defaults.standstill_time,
            ConfigField::StandstillTime.spec().min
        );
    }

    #[test]
    fn descriptor_entries_override_defaults_per_key() {
        let config = OpenConfig::from_descriptor([
            ("ROLLING_TIME", 50),
            ("DEBUG_LEVEL", 2),
            ("UNRELATED_KEY", 7),
        ]);
        assert_eq!(config.debug_level(), 2);

        let resolved = config.resolve();
        assert_eq!(resolved.rolling_time, 50);
        assert_eq!(resolved.standstill_time, 20);
        assert_eq!(resolved.get(ConfigField::DebounceTime), 5);
    }

    #[test]
    fn empty_config_resolves_to_defaults() {
        assert_eq!(OpenConfig::default().resolve(), Tunables::default());
        assert_eq!(OpenConfig::default().debug_level(), 0);
    }
}
