//! `COMMAND` register composition: distance reset and test pattern control.

use crate::regs::map::{
    CMD_EN_TEST, CMD_PAT_CCW, CMD_PAT_CW, CMD_PAT_MASK, CMD_PAT_SILENT, CMD_RST_DIST,
};
use crate::regs::{Register, RegisterAccess};
use crate::DriverError;

/// Test pattern generator mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum TestPattern {
    /// Generator off.
    Disable,
    /// Forward / clockwise rotation pattern.
    ClockwiseForward,
    /// Backward / counterclockwise rotation pattern.
    CounterclockwiseBackward,
    /// Standstill / silence pattern.
    Silent,
}

impl TestPattern {
    /// All modes in host code order.
    pub const ALL: [Self; 4] = [
        Self::Disable,
        Self::ClockwiseForward,
        Self::CounterclockwiseBackward,
        Self::Silent,
    ];

    /// Looks up a mode by its host code (`0..=3`).
    #[must_use]
    pub const fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Disable),
            1 => Some(Self::ClockwiseForward),
            2 => Some(Self::CounterclockwiseBackward),
            3 => Some(Self::Silent),
            _ => None,
        }
    }

    /// Returns the host code of this mode.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Disable => 0,
            Self::ClockwiseForward => 1,
            Self::CounterclockwiseBackward => 2,
            Self::Silent => 3,
        }
    }

    /// Returns the full `COMMAND` word selecting this mode.
    #[must_use]
    pub const fn command_word(self) -> u32 {
        match self {
            Self::Disable => 0,
            Self::ClockwiseForward => CMD_EN_TEST | CMD_PAT_CW,
            Self::CounterclockwiseBackward => CMD_EN_TEST | CMD_PAT_CCW,
            Self::Silent => CMD_EN_TEST | CMD_PAT_SILENT,
        }
    }

    /// Returns the name used by the control tool.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Disable => "disabled",
            Self::ClockwiseForward => "forward (CW)",
            Self::CounterclockwiseBackward => "backward (CCW)",
            Self::Silent => "standstill (silent)",
        }
    }
}

/// Test pattern state decoded from a `COMMAND` word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternReadout {
    /// A defined mode.
    Pattern(TestPattern),
    /// Generator enabled with a selector that names no mode.
    UnknownSelector {
        /// Raw selector bits (`COMMAND & 0x0C`).
        selector: u32,
    },
}

impl PatternReadout {
    /// Returns the mode reported to callers; unknown selectors read as disabled.
    #[must_use]
    pub const fn pattern(self) -> TestPattern {
        match self {
            Self::Pattern(pattern) => pattern,
            Self::UnknownSelector { .. } => TestPattern::Disable,
        }
    }

    /// Returns the error reported alongside the mode, if any.
    #[must_use]
    pub const fn error(self) -> Option<DriverError> {
        match self {
            Self::Pattern(_) => None,
            Self::UnknownSelector { .. } => Some(DriverError::InvalidParam),
        }
    }
}

/// Decodes the test pattern fields of a `COMMAND` word.
///
/// Selector bits are ignored while the enable bit is clear.
#[must_use]
pub const fn decode_pattern(raw: u32) -> PatternReadout {
    if raw & CMD_EN_TEST == 0 {
        return PatternReadout::Pattern(TestPattern::Disable);
    }
    match raw & CMD_PAT_MASK {
        CMD_PAT_CW => PatternReadout::Pattern(TestPattern::ClockwiseForward),
        CMD_PAT_CCW => PatternReadout::Pattern(TestPattern::CounterclockwiseBackward),
        CMD_PAT_SILENT => PatternReadout::Pattern(TestPattern::Silent),
        selector => PatternReadout::UnknownSelector { selector },
    }
}

/// Resets both distance counters, keeping the other `COMMAND` bits.
///
/// # Errors
///
/// Returns [`DriverError::Access`] when the read-modify-write fails.
pub fn reset_distance_counters<R: RegisterAccess>(regs: &mut R) -> Result<(), DriverError> {
    regs.set_mask32(Register::Command.offset(), CMD_RST_DIST)?;
    Ok(())
}

/// Writes `RST_DIST` as the only `COMMAND` content.
///
/// This resets the counters and also turns the test pattern generator off.
///
/// # Errors
///
/// Returns [`DriverError::Access`] when the write fails.
pub fn quiesce<R: RegisterAccess>(regs: &mut R) -> Result<(), DriverError> {
    regs.write32(Register::Command.offset(), CMD_RST_DIST)?;
    Ok(())
}

/// Selects a test pattern mode.
///
/// # Errors
///
/// Returns [`DriverError::Access`] when the write fails.
pub fn set_test_pattern<R: RegisterAccess>(
    regs: &mut R,
    pattern: TestPattern,
) -> Result<(), DriverError> {
    regs.write32(Register::Command.offset(), pattern.command_word())?;
    Ok(())
}

/// Selects a test pattern mode by host code.
///
/// # Errors
///
/// Returns [`DriverError::InvalidParam`] without writing when `code` names no
/// mode, and [`DriverError::Access`] when the write fails.
pub fn set_test_pattern_code<R: RegisterAccess>(
    regs: &mut R,
    code: u32,
) -> Result<TestPattern, DriverError> {
    let pattern = TestPattern::from_code(code).ok_or(DriverError::InvalidParam)?;
    set_test_pattern(regs, pattern)?;
    Ok(pattern)
}

/// Reads back the test pattern state.
///
/// # Errors
///
/// Returns [`DriverError::Access`] when the read fails.
pub fn read_test_pattern<R: RegisterAccess>(regs: &mut R) -> Result<PatternReadout, DriverError> {
    let raw = regs.read32(Register::Command.offset())?;
    Ok(decode_pattern(raw))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{
        decode_pattern, quiesce, read_test_pattern, reset_distance_counters,
        set_test_pattern_code, PatternReadout, TestPattern,
    };
    use crate::regs::map::{COMMAND, DISTANCE_FWD};
    use crate::sim::SimulatedIpCore;
    use crate::DriverError;

    #[rstest]
    #[case(0, 0x00)]
    #[case(1, 0x02)]
    #[case(2, 0x06)]
    #[case(3, 0x0A)]
    fn pattern_codes_write_expected_words(#[case] code: u32, #[case] word: u32) {
        let mut core = SimulatedIpCore::new();
        let pattern = set_test_pattern_code(&mut core, code).expect("defined code");
        assert_eq!(pattern.code(), code);
        assert_eq!(core.peek(COMMAND), word);
        assert_eq!(
            read_test_pattern(&mut core).expect("read back"),
            PatternReadout::Pattern(pattern)
        );
    }

    #[test]
    fn undefined_code_leaves_register_unchanged() {
        let mut core = SimulatedIpCore::new();
        core.poke(COMMAND, 0x06);
        assert_eq!(
            set_test_pattern_code(&mut core, 4),
            Err(DriverError::InvalidParam)
        );
        assert_eq!(core.peek(COMMAND), 0x06);
        assert!(core.writes().is_empty());
    }

    #[test]
    fn selector_is_ignored_while_disabled() {
        assert_eq!(
            decode_pattern(0x0C),
            PatternReadout::Pattern(TestPattern::Disable)
        );
        assert_eq!(
            decode_pattern(0x08),
            PatternReadout::Pattern(TestPattern::Disable)
        );
    }

    #[test]
    fn unknown_selector_reads_disabled_with_error() {
        let readout = decode_pattern(0x0E);
        assert_eq!(readout, PatternReadout::UnknownSelector { selector: 0x0C });
        assert_eq!(readout.pattern(), TestPattern::Disable);
        assert_eq!(readout.error(), Some(DriverError::InvalidParam));
    }

    #[test]
    fn explicit_reset_keeps_pattern_but_quiesce_clears_it() {
        let mut core = SimulatedIpCore::new();
        core.set_distances(9, 9);
        set_test_pattern_code(&mut core, 2).expect("ccw");

        reset_distance_counters(&mut core).expect("reset");
        assert_eq!(core.peek(DISTANCE_FWD), 0);
        assert_eq!(core.peek(COMMAND), 0x06);

        quiesce(&mut core).expect("quiesce");
        assert_eq!(core.writes().last(), Some(&(COMMAND, 0x01)));
        assert_eq!(
            read_test_pattern(&mut core).expect("read").pattern(),
            TestPattern::Disable
        );
    }
}
