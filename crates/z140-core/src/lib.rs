//! Driver core for the 16Z140 frequency counter IP core.

/// Register block layout and access primitives.
pub mod regs;
pub use regs::{
    validate_offset, AccessError, Register, RegisterAccess, RegisterAccessKind, ADDRSPACE_SIZE,
    REGISTER_COUNT,
};

/// Driver error taxonomy.
pub mod error;
pub use error::{DriverError, ErrorClass};

/// Engineering-unit configuration codec.
pub mod config;
pub use config::{
    read_field, write_field, ConfigField, FieldSpec, OpenConfig, Tunables, Unit,
    DEFAULT_DEBUG_LEVEL,
};

/// Command register composition.
pub mod command;
pub use command::{decode_pattern, PatternReadout, TestPattern};

/// Period word decoding.
pub mod period;
pub use period::{decode_period, period_ns, period_us, Channel, PeriodClass, PeriodReading};

/// Status word decoding.
pub mod status;
pub use status::{decode_status, StatusFlags};

/// Host status codes.
pub mod stat;
pub use stat::{ChannelDirection, ChannelType, StatCode, StatReply};

/// Open device handle.
pub mod device;
pub use device::Z140Device;

/// Host capability interface.
pub mod api;
pub use api::{
    info, open_driver, AddrMode, DataMode, IdentEntry, InfoReply, InfoRequest, IrqOutcome,
    LockMode, LowLevelDriver, IDENT_TABLE,
};

/// Behavioural model of the register block.
pub mod sim;
pub use sim::SimulatedIpCore;

#[cfg(test)]
use proptest as _;
