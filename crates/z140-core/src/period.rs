//! Period measurement word decoding.
//!
//! A period word carries three flag bits above a 29-bit magnitude in 1/32 µs
//! ticks. The flags are folded into a single [`PeriodClass`] with a fixed
//! precedence; the magnitude is reported for every class.

use core::fmt;

use crate::regs::map::{PERIOD_LSTS, PERIOD_MASK, PERIOD_NEW, PERIOD_VLD};
use crate::regs::{Register, RegisterAccess};
use crate::DriverError;

/// Measured signal channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Channel {
    /// Signal A.
    A,
    /// Signal B.
    B,
}

impl Channel {
    /// Both channels in register order.
    pub const ALL: [Self; 2] = [Self::A, Self::B];

    /// Returns the period register of this channel.
    #[must_use]
    pub const fn register(self) -> Register {
        match self {
            Self::A => Register::PeriodA,
            Self::B => Register::PeriodB,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

/// Quality classification of one period reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum PeriodClass {
    /// Fresh, valid measurement.
    Valid,
    /// No new value since the previous read.
    NoNewData,
    /// Fresh value that failed phase length validation.
    PhaseViolation,
    /// Fresh value flagged invalid.
    Invalid,
}

impl PeriodClass {
    /// Classifies a raw period word.
    ///
    /// The new-data bit is checked first, then phase violation, then validity.
    #[must_use]
    pub const fn of_word(raw: u32) -> Self {
        let new = raw & PERIOD_NEW != 0;
        let phase_violation = raw & PERIOD_LSTS != 0;
        let valid = raw & PERIOD_VLD != 0;
        match (new, phase_violation, valid) {
            (false, _, _) => Self::NoNewData,
            (true, true, _) => Self::PhaseViolation,
            (true, false, false) => Self::Invalid,
            (true, false, true) => Self::Valid,
        }
    }

    /// Returns the driver error reported for this class, if any.
    #[must_use]
    pub const fn error(self) -> Option<DriverError> {
        match self {
            Self::Valid => None,
            Self::NoNewData => Some(DriverError::NoNewData),
            Self::PhaseViolation => Some(DriverError::PhaseViolation),
            Self::Invalid => Some(DriverError::PeriodInvalid),
        }
    }

    /// Returns the flag bits a period word carries for this class.
    #[must_use]
    pub const fn flag_bits(self) -> u32 {
        match self {
            Self::Valid => PERIOD_NEW | PERIOD_VLD,
            Self::NoNewData => PERIOD_VLD,
            Self::PhaseViolation => PERIOD_NEW | PERIOD_LSTS,
            Self::Invalid => PERIOD_NEW,
        }
    }
}

/// Decoded period register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct PeriodReading {
    /// Period in 1/32 µs ticks (29 bits).
    pub magnitude: u32,
    /// Quality classification.
    pub class: PeriodClass,
}

impl PeriodReading {
    /// Returns the whole microseconds of the period.
    #[must_use]
    pub const fn micros(self) -> u32 {
        period_us(self.magnitude)
    }

    /// Returns the sub-microsecond remainder in nanoseconds.
    #[must_use]
    pub const fn nanos(self) -> u32 {
        period_ns(self.magnitude)
    }

    /// Returns `true` for a fresh, valid measurement.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        matches!(self.class, PeriodClass::Valid)
    }

    /// Converts the reading into the magnitude or the class error.
    ///
    /// # Errors
    ///
    /// Returns the [`PeriodClass::error`] of non-valid readings.
    pub const fn into_result(self) -> Result<u32, DriverError> {
        match self.class.error() {
            None => Ok(self.magnitude),
            Some(error) => Err(error),
        }
    }
}

impl fmt::Display for PeriodReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}us", self.micros(), self.nanos())
    }
}

/// Decodes a raw period word into magnitude and classification.
#[must_use]
pub const fn decode_period(raw: u32) -> PeriodReading {
    PeriodReading {
        magnitude: raw & PERIOD_MASK,
        class: PeriodClass::of_word(raw),
    }
}

/// Whole microseconds of a magnitude in 1/32 µs ticks.
#[must_use]
pub const fn period_us(magnitude: u32) -> u32 {
    magnitude >> 5
}

/// Nanosecond remainder of a magnitude in 1/32 µs ticks, truncated.
#[must_use]
pub const fn period_ns(magnitude: u32) -> u32 {
    ((magnitude & 0x1F) * 3125) / 100
}

/// Reads and decodes the period register of `channel`.
///
/// # Errors
///
/// Returns [`DriverError::Access`] when the register read fails.
pub fn read_period<R: RegisterAccess>(
    regs: &mut R,
    channel: Channel,
) -> Result<PeriodReading, DriverError> {
    let raw = regs.read32(channel.register().offset())?;
    Ok(decode_period(raw))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{decode_period, period_ns, period_us, PeriodClass, PeriodReading};
    use crate::DriverError;

    #[rstest]
    #[case(0x0000_0000, PeriodClass::NoNewData)]
    #[case(0x7FFF_FFFF, PeriodClass::NoNewData)]
    #[case(0x2000_0040, PeriodClass::NoNewData)]
    #[case(0xC000_0000, PeriodClass::PhaseViolation)]
    #[case(0xE000_0000, PeriodClass::PhaseViolation)]
    #[case(0x8000_0010, PeriodClass::Invalid)]
    #[case(0xA000_0010, PeriodClass::Valid)]
    fn classification_follows_precedence(#[case] raw: u32, #[case] class: PeriodClass) {
        assert_eq!(decode_period(raw).class, class);
    }

    #[test]
    fn magnitude_is_reported_for_every_class() {
        assert_eq!(decode_period(0x1234_5678).magnitude, 0x1234_5678);
        assert_eq!(decode_period(0xDFFF_FFFF).magnitude, 0x1FFF_FFFF);
        assert_eq!(decode_period(0x8000_0021).magnitude, 0x21);
    }

    #[test]
    fn unit_helpers_use_truncating_fixed_point() {
        assert_eq!(period_us(0x21), 1);
        assert_eq!(period_ns(0x21), 31);
        assert_eq!(period_ns(0x1F), 968);
        assert_eq!(period_us(0x1FFF_FFFF), 0x00FF_FFFF);
    }

    #[test]
    fn display_pads_nanoseconds() {
        let reading = decode_period(0xA000_0021);
        assert_eq!(reading.to_string(), "1.031us");
        assert_eq!(decode_period(0xA000_0040).to_string(), "2.000us");
    }

    #[test]
    fn class_errors_map_to_driver_taxonomy() {
        assert_eq!(PeriodClass::Valid.error(), None);
        assert_eq!(PeriodClass::NoNewData.error(), Some(DriverError::NoNewData));
        assert_eq!(
            PeriodClass::PhaseViolation.error(),
            Some(DriverError::PhaseViolation)
        );
        assert_eq!(
            PeriodClass::Invalid.error(),
            Some(DriverError::PeriodInvalid)
        );
    }

    #[test]
    fn flag_bits_reclassify_to_same_class() {
        for class in [
            PeriodClass::Valid,
            PeriodClass::NoNewData,
            PeriodClass::PhaseViolation,
            PeriodClass::Invalid,
        ] {
            assert_eq!(PeriodClass::of_word(class.flag_bits() | 0x55), class);
        }
    }

    #[test]
    fn into_result_keeps_magnitude_only_when_valid() {
        let valid = PeriodReading {
            magnitude: 40,
            class: PeriodClass::Valid,
        };
        assert_eq!(valid.into_result(), Ok(40));

        let stale = PeriodReading {
            magnitude: 40,
            class: PeriodClass::NoNewData,
        };
        assert_eq!(stale.into_result(), Err(DriverError::NoNewData));
    }
}
