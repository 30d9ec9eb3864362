//! Fixed 16Z140 register map and register-word bit fields.

/// Debouncing time register (ticks of 1 µs).
pub const DEB_TIME: u32 = 0x00;
/// Measurement timeout register (ticks of 100 ms).
pub const MEAS_TOUT: u32 = 0x04;
/// Period word of signal A.
pub const PERIOD_A: u32 = 0x08;
/// Period word of signal B.
pub const PERIOD_B: u32 = 0x0C;
/// Rolling time period register (ticks of 10 ms).
pub const ROLLING_TIME: u32 = 0x10;
/// Standstill time period register (ticks of 10 ms).
pub const STANDSTILL_TIME: u32 = 0x14;
/// Direction detection timeout register (ticks of 10 ms).
pub const DIR_DET_TOUT: u32 = 0x18;
/// Forward distance pulse counter.
pub const DISTANCE_FWD: u32 = 0x1C;
/// Backward distance pulse counter.
pub const DISTANCE_BWD: u32 = 0x20;
/// Status flag register.
pub const STATUS: u32 = 0x24;
/// Command register.
pub const COMMAND: u32 = 0x28;

/// Size in bytes of the register block.
pub const ADDRSPACE_SIZE: u32 = 0x2C;
/// Number of 32-bit register slots in the block.
pub const REGISTER_COUNT: usize = (ADDRSPACE_SIZE / 4) as usize;

/// `PERIOD_A/B` magnitude field (bits 28..0, 1/32 µs ticks).
pub const PERIOD_MASK: u32 = 0x1FFF_FFFF;
/// `PERIOD_A/B` valid bit.
pub const PERIOD_VLD: u32 = 0x2000_0000;
/// `PERIOD_A/B` phase length validation failed bit.
pub const PERIOD_LSTS: u32 = 0x4000_0000;
/// `PERIOD_A/B` new period value bit.
pub const PERIOD_NEW: u32 = 0x8000_0000;

/// `STATUS` bit: any edge on any input signal.
pub const ST_ROLLING: u32 = 0x01;
/// `STATUS` bit: no edge within the standstill time period.
pub const ST_STANDSTILL: u32 = 0x02;
/// `STATUS` bit: direction is forward.
pub const ST_DIR_FWD: u32 = 0x04;
/// `STATUS` bit: direction is backward.
pub const ST_DIR_BWD: u32 = 0x08;
/// `STATUS` bit: no direction determined within the detection timeout.
pub const ST_DIR_INVALID: u32 = 0x10;

/// `COMMAND` bit: reset both distance counters (self-clearing).
pub const CMD_RST_DIST: u32 = 0x01;
/// `COMMAND` bit: enable the test pattern generator.
pub const CMD_EN_TEST: u32 = 0x02;
/// `COMMAND` pattern selector field.
pub const CMD_PAT_MASK: u32 = 0x0C;
/// Selector value for the clockwise pattern.
pub const CMD_PAT_CW: u32 = 0x00;
/// Selector value for the counterclockwise pattern.
pub const CMD_PAT_CCW: u32 = 0x04;
/// Selector value for the silence pattern.
pub const CMD_PAT_SILENT: u32 = 0x08;

/// Access permitted on a register slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterAccessKind {
    /// Read and write.
    ReadWrite,
    /// Read only.
    ReadOnly,
    /// Write only.
    WriteOnly,
}

/// Named register slot of the 16Z140 block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Register {
    /// `DEB_TIME` at `0x00`.
    DebTime,
    /// `MEAS_TOUT` at `0x04`.
    MeasTout,
    /// `PERIOD_A` at `0x08`.
    PeriodA,
    /// `PERIOD_B` at `0x0C`.
    PeriodB,
    /// `ROLLING_TIME` at `0x10`.
    RollingTime,
    /// `STANDSTILL_TIME` at `0x14`.
    StandstillTime,
    /// `DIR_DET_TOUT` at `0x18`.
    DirDetTout,
    /// `DISTANCE_FWD` at `0x1C`.
    DistanceFwd,
    /// `DISTANCE_BWD` at `0x20`.
    DistanceBwd,
    /// `STATUS` at `0x24`.
    Status,
    /// `COMMAND` at `0x28`.
    Command,
}

impl Register {
    /// All registers in offset order.
    pub const ALL: [Self; REGISTER_COUNT] = [
        Self::DebTime,
        Self::MeasTout,
        Self::PeriodA,
        Self::PeriodB,
        Self::RollingTime,
        Self::StandstillTime,
        Self::DirDetTout,
        Self::DistanceFwd,
        Self::DistanceBwd,
        Self::Status,
        Self::Command,
    ];

    /// Returns the byte offset of this register inside the block.
    #[must_use]
    pub const fn offset(self) -> u32 {
        match self {
            Self::DebTime => DEB_TIME,
            Self::MeasTout => MEAS_TOUT,
            Self::PeriodA => PERIOD_A,
            Self::PeriodB => PERIOD_B,
            Self::RollingTime => ROLLING_TIME,
            Self::StandstillTime => STANDSTILL_TIME,
            Self::DirDetTout => DIR_DET_TOUT,
            Self::DistanceFwd => DISTANCE_FWD,
            Self::DistanceBwd => DISTANCE_BWD,
            Self::Status => STATUS,
            Self::Command => COMMAND,
        }
    }

    /// Looks up the register at a byte offset.
    #[must_use]
    pub const fn from_offset(offset: u32) -> Option<Self> {
        match offset {
            DEB_TIME => Some(Self::DebTime),
            MEAS_TOUT => Some(Self::MeasTout),
            PERIOD_A => Some(Self::PeriodA),
            PERIOD_B => Some(Self::PeriodB),
            ROLLING_TIME => Some(Self::RollingTime),
            STANDSTILL_TIME => Some(Self::StandstillTime),
            DIR_DET_TOUT => Some(Self::DirDetTout),
            DISTANCE_FWD => Some(Self::DistanceFwd),
            DISTANCE_BWD => Some(Self::DistanceBwd),
            STATUS => Some(Self::Status),
            COMMAND => Some(Self::Command),
            _ => None,
        }
    }

    /// Returns the slot index (`offset / 4`).
    #[must_use]
    pub const fn index(self) -> usize {
        (self.offset() / 4) as usize
    }

    /// Returns the hardware access kind of this register.
    #[must_use]
    pub const fn access(self) -> RegisterAccessKind {
        match self {
            Self::DebTime
            | Self::MeasTout
            | Self::RollingTime
            | Self::StandstillTime
            | Self::DirDetTout => RegisterAccessKind::ReadWrite,
            Self::PeriodA | Self::PeriodB | Self::DistanceFwd | Self::DistanceBwd | Self::Status => {
                RegisterAccessKind::ReadOnly
            }
            Self::Command => RegisterAccessKind::WriteOnly,
        }
    }

    /// Returns the register name used in the hardware documentation.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::DebTime => "DEB_TIME",
            Self::MeasTout => "MEAS_TOUT",
            Self::PeriodA => "PERIOD_A",
            Self::PeriodB => "PERIOD_B",
            Self::RollingTime => "ROLLING_TIME",
            Self::StandstillTime => "STANDSTILL_TIME",
            Self::DirDetTout => "DIR_DET_TOUT",
            Self::DistanceFwd => "DISTANCE_FWD",
            Self::DistanceBwd => "DISTANCE_BWD",
            Self::Status => "STATUS",
            Self::Command => "COMMAND",
        }
    }
}
