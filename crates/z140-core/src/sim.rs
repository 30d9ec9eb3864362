//! In-memory model of the 16Z140 register block.
//!
//! The model keeps one word per register slot and records every write in
//! order. It reproduces the two hardware side effects the driver depends on:
//! reading a period register clears its new-data bit, and writing `COMMAND`
//! with the reset bit zeroes both distance counters without latching the bit.

use crate::period::{Channel, PeriodClass};
use crate::regs::map::{CMD_RST_DIST, COMMAND, PERIOD_MASK, PERIOD_NEW};
use crate::regs::{
    validate_offset, AccessError, Register, RegisterAccess, RegisterAccessKind, REGISTER_COUNT,
};
use crate::status::StatusFlags;

/// Simulated register block implementing [`RegisterAccess`].
#[derive(Debug, Clone, Default)]
pub struct SimulatedIpCore {
    words: [u32; REGISTER_COUNT],
    writes: Vec<(u32, u32)>,
    failing: Option<u32>,
}

impl SimulatedIpCore {
    /// Creates a block with every register zeroed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored word at `offset` without side effects.
    ///
    /// Offsets outside the block read as zero.
    #[must_use]
    pub fn peek(&self, offset: u32) -> u32 {
        Register::from_offset(offset).map_or(0, |register| self.words[register.index()])
    }

    /// Stores a word at `offset` without side effects or write logging.
    ///
    /// Offsets outside the block are ignored.
    #[allow(clippy::missing_const_for_fn)]
    pub fn poke(&mut self, offset: u32, value: u32) {
        if let Some(register) = Register::from_offset(offset) {
            self.words[register.index()] = value;
        }
    }

    /// Returns all writes issued through [`RegisterAccess`], oldest first.
    #[must_use]
    pub fn writes(&self) -> &[(u32, u32)] {
        &self.writes
    }

    /// Forgets the recorded writes.
    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    /// Latches a period measurement on `channel` with the flags of `class`.
    #[allow(clippy::missing_const_for_fn)]
    pub fn latch_period(&mut self, channel: Channel, magnitude: u32, class: PeriodClass) {
        self.poke(
            channel.register().offset(),
            (magnitude & PERIOD_MASK) | class.flag_bits(),
        );
    }

    /// Sets both distance counters.
    #[allow(clippy::missing_const_for_fn)]
    pub fn set_distances(&mut self, forward: u32, backward: u32) {
        self.poke(Register::DistanceFwd.offset(), forward);
        self.poke(Register::DistanceBwd.offset(), backward);
    }

    /// Sets the status flags.
    #[allow(clippy::missing_const_for_fn)]
    pub fn set_status(&mut self, flags: StatusFlags) {
        self.poke(Register::Status.offset(), flags.bits());
    }

    /// Makes every subsequent access at `offset` fail until cleared.
    #[allow(clippy::missing_const_for_fn)]
    pub fn fail_at(&mut self, offset: Option<u32>) {
        self.failing = offset;
    }
}

fn slot(offset: u32) -> Result<Register, AccessError> {
    validate_offset(offset)?;
    Register::from_offset(offset).ok_or(AccessError::OutOfRange { offset })
}

impl RegisterAccess for SimulatedIpCore {
    fn read32(&mut self, offset: u32) -> Result<u32, AccessError> {
        let register = slot(offset)?;
        if self.failing == Some(offset) {
            return Err(AccessError::ReadFailed { offset });
        }
        let value = self.words[register.index()];
        if matches!(register, Register::PeriodA | Register::PeriodB) {
            self.words[register.index()] = value & !PERIOD_NEW;
        }
        Ok(value)
    }

    fn write32(&mut self, offset: u32, value: u32) -> Result<(), AccessError> {
        let register = slot(offset)?;
        if self.failing == Some(offset) {
            return Err(AccessError::WriteFailed { offset });
        }
        self.writes.push((offset, value));
        match register.access() {
            RegisterAccessKind::ReadOnly => {}
            RegisterAccessKind::ReadWrite => self.words[register.index()] = value,
            RegisterAccessKind::WriteOnly => {
                if offset == COMMAND && value & CMD_RST_DIST != 0 {
                    self.set_distances(0, 0);
                }
                self.words[register.index()] = value & !CMD_RST_DIST;
            }
        }
        Ok(())
    }
}
