use thiserror::Error;

use crate::regs::AccessError;

/// Error classes used by callers to separate measurement annotations from failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// A value was rejected by a range, step or enum check.
    Parameter,
    /// A status code was not recognized.
    Dispatch,
    /// The operation is not provided by this device.
    Unsupported,
    /// The call succeeded but the measurement carries a quality annotation.
    Measurement,
    /// The register space could not be accessed.
    Bus,
}

/// Stable driver error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum DriverError {
    /// Value outside range, not step aligned, or not a defined enum value.
    #[error("illegal parameter")]
    InvalidParam,
    /// Status code not recognized by the driver.
    #[error("unknown status code {code:#06x}")]
    UnknownCode {
        /// Raw code passed by the caller.
        code: u32,
    },
    /// Operation not provided by this device (raw or block I/O, wrong code direction).
    #[error("illegal function")]
    IllegalFunction,
    /// Channel direction other than in/out requested.
    #[error("illegal channel direction")]
    IllegalDirection,
    /// Period measured but flagged invalid by the hardware.
    #[error("signal period invalid")]
    PeriodInvalid,
    /// Phase length validation failed for the measured signal.
    #[error("signal phase length violation")]
    PhaseViolation,
    /// No new period value since the last read.
    #[error("no new period value since last read")]
    NoNewData,
    /// Register space access failed.
    #[error(transparent)]
    Access(#[from] AccessError),
}

impl DriverError {
    /// Returns the class of this error.
    #[must_use]
    pub const fn class(self) -> ErrorClass {
        match self {
            Self::InvalidParam | Self::IllegalDirection => ErrorClass::Parameter,
            Self::UnknownCode { .. } => ErrorClass::Dispatch,
            Self::IllegalFunction => ErrorClass::Unsupported,
            Self::PeriodInvalid | Self::PhaseViolation | Self::NoNewData => {
                ErrorClass::Measurement
            }
            Self::Access(_) => ErrorClass::Bus,
        }
    }

    /// Returns `true` for measurement-quality annotations.
    #[must_use]
    pub const fn is_measurement(self) -> bool {
        matches!(self.class(), ErrorClass::Measurement)
    }
}
