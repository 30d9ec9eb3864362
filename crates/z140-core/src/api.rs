//! Host-facing capability interface of the driver.
//!
//! Hosts hold an open device as `Box<dyn LowLevelDriver>` obtained from
//! [`open_driver`]. Static device properties are available without a handle
//! through [`info`] and [`IDENT_TABLE`].

use crate::config::OpenConfig;
use crate::device::Z140Device;
use crate::regs::{RegisterAccess, ADDRSPACE_SIZE};
use crate::stat::StatReply;
use crate::DriverError;

/// Address bus width supported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddrMode {
    /// 8-bit addressing.
    A08,
}

/// Data bus width supported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataMode {
    /// 8-bit data.
    D08,
    /// 16-bit data.
    D16,
}

/// Call locking the host must apply around driver calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockMode {
    /// No locking.
    None,
    /// Serialize every call.
    Call,
    /// Serialize calls per channel.
    Channel,
}

/// Static device property query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoRequest {
    /// Supported address and data modes.
    HwCharacter,
    /// Number of address spaces.
    AddrSpaceCount,
    /// Description of one address space.
    AddrSpace {
        /// Zero-based address space index.
        index: u32,
    },
    /// Whether the device uses interrupts.
    Irq,
    /// Required call locking.
    LockMode,
}

/// Answer to an [`InfoRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoReply {
    /// Supported address mode and data modes.
    HwCharacter {
        /// Address mode.
        addr_mode: AddrMode,
        /// Supported data modes.
        data_modes: &'static [DataMode],
    },
    /// Number of address spaces.
    AddrSpaceCount(u32),
    /// Address space description.
    AddrSpace {
        /// Address mode.
        addr_mode: AddrMode,
        /// Data mode.
        data_mode: DataMode,
        /// Size in bytes.
        size: u32,
    },
    /// Whether the device uses interrupts.
    Irq(bool),
    /// Required call locking.
    LockMode(LockMode),
}

/// Answers a static device property query.
///
/// # Errors
///
/// Returns [`DriverError::InvalidParam`] for an address space index other
/// than zero.
pub const fn info(request: InfoRequest) -> Result<InfoReply, DriverError> {
    match request {
        InfoRequest::HwCharacter => Ok(InfoReply::HwCharacter {
            addr_mode: AddrMode::A08,
            data_modes: &[DataMode::D08, DataMode::D16],
        }),
        InfoRequest::AddrSpaceCount => Ok(InfoReply::AddrSpaceCount(1)),
        InfoRequest::AddrSpace { index: 0 } => Ok(InfoReply::AddrSpace {
            addr_mode: AddrMode::A08,
            data_mode: DataMode::D16,
            size: ADDRSPACE_SIZE,
        }),
        InfoRequest::AddrSpace { .. } => Err(DriverError::InvalidParam),
        InfoRequest::Irq => Ok(InfoReply::Irq(false)),
        InfoRequest::LockMode => Ok(InfoReply::LockMode(LockMode::Call)),
    }
}

/// One entry of the ident table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdentEntry {
    /// Component name.
    pub component: &'static str,
    /// Component version.
    pub version: &'static str,
}

/// Versions of the components making up the driver.
pub const IDENT_TABLE: &[IdentEntry] = &[
    IdentEntry {
        component: "z140 low-level driver",
        version: env!("CARGO_PKG_VERSION"),
    },
    IdentEntry {
        component: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    },
];

/// Outcome of an interrupt service request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IrqOutcome {
    /// The interrupt was raised by this device.
    Mine,
    /// The interrupt was not raised by this device.
    NotMine,
}

/// Capability interface an open device exposes to its host.
pub trait LowLevelDriver {
    /// Applies a host status code.
    ///
    /// # Errors
    ///
    /// See [`Z140Device::set_stat`].
    fn set_stat(&mut self, code: u32, value: i64) -> Result<(), DriverError>;

    /// Reads a host status code.
    ///
    /// # Errors
    ///
    /// See [`Z140Device::get_stat`].
    fn get_stat(&mut self, code: u32) -> Result<StatReply, DriverError>;

    /// Reads one value from a channel.
    ///
    /// # Errors
    ///
    /// Always [`DriverError::IllegalFunction`] for this device.
    fn read(&mut self, channel: u32) -> Result<i32, DriverError> {
        let _ = channel;
        Err(DriverError::IllegalFunction)
    }

    /// Writes one value to a channel.
    ///
    /// # Errors
    ///
    /// Always [`DriverError::IllegalFunction`] for this device.
    fn write(&mut self, channel: u32, value: i32) -> Result<(), DriverError> {
        let _ = (channel, value);
        Err(DriverError::IllegalFunction)
    }

    /// Reads a block of data.
    ///
    /// # Errors
    ///
    /// Always [`DriverError::IllegalFunction`] for this device.
    fn block_read(&mut self, buf: &mut [u8]) -> Result<usize, DriverError> {
        let _ = buf;
        Err(DriverError::IllegalFunction)
    }

    /// Writes a block of data.
    ///
    /// # Errors
    ///
    /// Always [`DriverError::IllegalFunction`] for this device.
    fn block_write(&mut self, buf: &[u8]) -> Result<usize, DriverError> {
        let _ = buf;
        Err(DriverError::IllegalFunction)
    }

    /// Services an interrupt.
    fn irq(&mut self) -> IrqOutcome {
        IrqOutcome::NotMine
    }

    /// Answers a static device property query.
    ///
    /// # Errors
    ///
    /// See [`info`].
    fn info(&self, request: InfoRequest) -> Result<InfoReply, DriverError> {
        info(request)
    }

    /// Returns the component versions.
    fn ident(&self) -> &'static [IdentEntry] {
        IDENT_TABLE
    }

    /// Quiesces the device and releases the handle.
    ///
    /// # Errors
    ///
    /// See [`Z140Device::close`].
    fn close(self: Box<Self>) -> Result<(), DriverError>;
}

impl<R: RegisterAccess> LowLevelDriver for Z140Device<R> {
    fn set_stat(&mut self, code: u32, value: i64) -> Result<(), DriverError> {
        Self::set_stat(self, code, value)
    }

    fn get_stat(&mut self, code: u32) -> Result<StatReply, DriverError> {
        Self::get_stat(self, code)
    }

    fn close(self: Box<Self>) -> Result<(), DriverError> {
        Self::close(*self).map(drop)
    }
}

/// Opens a device over `regs` and returns it as a host capability object.
///
/// # Errors
///
/// See [`Z140Device::open`].
pub fn open_driver<'a, R: RegisterAccess + 'a>(
    regs: R,
    config: &OpenConfig,
) -> Result<Box<dyn LowLevelDriver + 'a>, DriverError> {
    let device = Z140Device::open(regs, config)?;
    Ok(Box::new(device))
}
