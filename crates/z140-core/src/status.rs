//! Signal status flag decoding.

use core::fmt;

use crate::regs::map::{ST_DIR_BWD, ST_DIR_FWD, ST_DIR_INVALID, ST_ROLLING, ST_STANDSTILL};
use crate::regs::{Register, RegisterAccess};
use crate::DriverError;

/// Decoded `STATUS` register.
///
/// Flags are reported as the hardware latched them; combinations are not
/// checked for consistency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(clippy::struct_excessive_bools)]
pub struct StatusFlags {
    /// Edge seen on an input within the rolling time period.
    pub rolling: bool,
    /// No edge within the standstill time period.
    pub standstill: bool,
    /// Direction is forward (clockwise).
    pub forward: bool,
    /// Direction is backward (counterclockwise).
    pub backward: bool,
    /// No direction determined within the detection timeout.
    pub invalid_direction: bool,
}

impl StatusFlags {
    /// Re-encodes the flags as a `STATUS` word.
    #[must_use]
    pub const fn bits(self) -> u32 {
        let mut bits = 0;
        if self.rolling {
            bits |= ST_ROLLING;
        }
        if self.standstill {
            bits |= ST_STANDSTILL;
        }
        if self.forward {
            bits |= ST_DIR_FWD;
        }
        if self.backward {
            bits |= ST_DIR_BWD;
        }
        if self.invalid_direction {
            bits |= ST_DIR_INVALID;
        }
        bits
    }

    /// Returns the names of the set flags, highest bit first.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        [
            (self.invalid_direction, "invalid-dir"),
            (self.backward, "backward-dir"),
            (self.forward, "forward-dir"),
            (self.standstill, "standstill"),
            (self.rolling, "rolling"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
    }
}

impl fmt::Display for StatusFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, name) in self.names().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

/// Decodes the low five bits of a `STATUS` word; upper bits are ignored.
#[must_use]
pub const fn decode_status(raw: u32) -> StatusFlags {
    StatusFlags {
        rolling: raw & ST_ROLLING != 0,
        standstill: raw & ST_STANDSTILL != 0,
        forward: raw & ST_DIR_FWD != 0,
        backward: raw & ST_DIR_BWD != 0,
        invalid_direction: raw & ST_DIR_INVALID != 0,
    }
}

/// Reads and decodes the `STATUS` register.
///
/// # Errors
///
/// Returns [`DriverError::Access`] when the register read fails.
pub fn read_status<R: RegisterAccess>(regs: &mut R) -> Result<StatusFlags, DriverError> {
    let raw = regs.read32(Register::Status.offset())?;
    Ok(decode_status(raw))
}

#[cfg(test)]
mod tests {
    use super::{decode_status, StatusFlags};

    #[test]
    fn each_bit_maps_to_one_flag() {
        assert!(decode_status(0x01).rolling);
        assert!(decode_status(0x02).standstill);
        assert!(decode_status(0x04).forward);
        assert!(decode_status(0x08).backward);
        assert!(decode_status(0x10).invalid_direction);
        assert_eq!(decode_status(0), StatusFlags::default());
    }

    #[test]
    fn upper_bits_are_ignored() {
        assert_eq!(decode_status(0xFFFF_FFE0), StatusFlags::default());
        assert_eq!(decode_status(0xFFFF_FFFF).bits(), 0x1F);
    }

    #[test]
    fn contradictory_flags_are_reported_as_latched() {
        let flags = decode_status(0x0C);
        assert!(flags.forward);
        assert!(flags.backward);
    }

    #[test]
    fn display_lists_flags_highest_first() {
        assert_eq!(
            decode_status(0x1F).to_string(),
            "invalid-dir backward-dir forward-dir standstill rolling"
        );
        assert_eq!(decode_status(0x05).to_string(), "forward-dir rolling");
        assert_eq!(decode_status(0).to_string(), "");
    }
}
