//! Host status codes accepted by the get/set status surface.

use crate::config::ConfigField;
use crate::DriverError;

/// Base of the device-specific status codes.
pub const DEVICE_CODE_BASE: u32 = 0x200;
/// Base of the generic low-level status codes.
pub const GENERIC_CODE_BASE: u32 = 0x100;

/// Status code understood by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum StatCode {
    /// Debounce time in µs.
    DebounceTime,
    /// Measurement timeout in ms.
    MeasurementTimeout,
    /// Rolling time period in ms.
    RollingTime,
    /// Standstill time period in ms.
    StandstillTime,
    /// Direction detection timeout in ms.
    DirectionDetectionTimeout,
    /// Distance counter reset (set only; value ignored).
    DistanceReset,
    /// Test pattern mode code.
    TestPattern,
    /// Period magnitude of signal A (get only).
    PeriodA,
    /// Period magnitude of signal B (get only).
    PeriodB,
    /// Forward pulse count (get only).
    DistanceForward,
    /// Backward pulse count (get only).
    DistanceBackward,
    /// Raw status word (get only).
    Status,
    /// Number of channels (get only).
    ChannelNumber,
    /// Channel direction.
    ChannelDirection,
    /// Channel width in bits (get only).
    ChannelLength,
    /// Channel type (get only).
    ChannelType,
    /// Handle debug level.
    DebugLevel,
}

impl StatCode {
    /// Every code in ascending raw order.
    pub const ALL: [Self; 17] = [
        Self::ChannelNumber,
        Self::ChannelDirection,
        Self::ChannelLength,
        Self::ChannelType,
        Self::DebugLevel,
        Self::DebounceTime,
        Self::MeasurementTimeout,
        Self::RollingTime,
        Self::StandstillTime,
        Self::DirectionDetectionTimeout,
        Self::DistanceReset,
        Self::TestPattern,
        Self::PeriodA,
        Self::PeriodB,
        Self::DistanceForward,
        Self::DistanceBackward,
        Self::Status,
    ];

    /// Returns the raw host code.
    #[must_use]
    pub const fn raw(self) -> u32 {
        match self {
            Self::ChannelNumber => GENERIC_CODE_BASE,
            Self::ChannelDirection => GENERIC_CODE_BASE + 0x01,
            Self::ChannelLength => GENERIC_CODE_BASE + 0x02,
            Self::ChannelType => GENERIC_CODE_BASE + 0x03,
            Self::DebugLevel => GENERIC_CODE_BASE + 0x07,
            Self::DebounceTime => DEVICE_CODE_BASE,
            Self::MeasurementTimeout => DEVICE_CODE_BASE + 0x01,
            Self::RollingTime => DEVICE_CODE_BASE + 0x02,
            Self::StandstillTime => DEVICE_CODE_BASE + 0x03,
            Self::DirectionDetectionTimeout => DEVICE_CODE_BASE + 0x04,
            Self::DistanceReset => DEVICE_CODE_BASE + 0x05,
            Self::TestPattern => DEVICE_CODE_BASE + 0x06,
            Self::PeriodA => DEVICE_CODE_BASE + 0x07,
            Self::PeriodB => DEVICE_CODE_BASE + 0x08,
            Self::DistanceForward => DEVICE_CODE_BASE + 0x09,
            Self::DistanceBackward => DEVICE_CODE_BASE + 0x0A,
            Self::Status => DEVICE_CODE_BASE + 0x0B,
        }
    }

    /// Looks up a code by its raw value.
    #[must_use]
    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.raw() == raw)
    }

    /// Returns `true` when the code may be read.
    #[must_use]
    pub const fn readable(self) -> bool {
        !matches!(self, Self::DistanceReset)
    }

    /// Returns `true` when the code may be written.
    #[must_use]
    pub const fn writable(self) -> bool {
        matches!(
            self,
            Self::DebounceTime
                | Self::MeasurementTimeout
                | Self::RollingTime
                | Self::StandstillTime
                | Self::DirectionDetectionTimeout
                | Self::DistanceReset
                | Self::TestPattern
                | Self::ChannelDirection
                | Self::DebugLevel
        )
    }

    /// Returns the tunable code of a configuration field.
    #[must_use]
    pub const fn for_field(field: ConfigField) -> Self {
        match field {
            ConfigField::DebounceTime => Self::DebounceTime,
            ConfigField::MeasurementTimeout => Self::MeasurementTimeout,
            ConfigField::RollingTime => Self::RollingTime,
            ConfigField::StandstillTime => Self::StandstillTime,
            ConfigField::DirectionDetectionTimeout => Self::DirectionDetectionTimeout,
        }
    }

    /// Returns the configuration field behind a tunable code.
    #[must_use]
    pub const fn config_field(self) -> Option<ConfigField> {
        match self {
            Self::DebounceTime => Some(ConfigField::DebounceTime),
            Self::MeasurementTimeout => Some(ConfigField::MeasurementTimeout),
            Self::RollingTime => Some(ConfigField::RollingTime),
            Self::StandstillTime => Some(ConfigField::StandstillTime),
            Self::DirectionDetectionTimeout => Some(ConfigField::DirectionDetectionTimeout),
            _ => None,
        }
    }
}

/// Channel direction values of the generic direction code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelDirection {
    /// Input only.
    In,
    /// Output only.
    Out,
    /// Input and output.
    InOut,
}

impl ChannelDirection {
    /// Returns the host value.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::In => 0,
            Self::Out => 1,
            Self::InOut => 2,
        }
    }
}

/// Channel type values of the generic type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelType {
    /// Counter channel.
    Counter,
}

impl ChannelType {
    /// Returns the host value.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Counter => 3,
        }
    }
}

/// Result of a status read: the value plus an optional annotation.
///
/// Period reads and corrupt test pattern selectors deliver a value together
/// with an error; callers decide whether to use the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatReply {
    /// Value delivered to the caller.
    pub value: i64,
    /// Error reported alongside the value.
    pub annotation: Option<DriverError>,
}

impl StatReply {
    /// Creates an unannotated reply.
    #[must_use]
    pub const fn ok(value: i64) -> Self {
        Self {
            value,
            annotation: None,
        }
    }

    /// Converts the reply into the value or its annotation.
    ///
    /// # Errors
    ///
    /// Returns the annotation when one is present.
    pub const fn into_result(self) -> Result<i64, DriverError> {
        match self.annotation {
            None => Ok(self.value),
            Some(error) => Err(error),
        }
    }
}
