//! Register-space access contract consumed by the driver.

use thiserror::Error;

use super::map::ADDRSPACE_SIZE;

/// Register-space access failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum AccessError {
    /// Offset lies outside the 16Z140 register block.
    #[error("register offset {offset:#04x} outside register block")]
    OutOfRange {
        /// Offending byte offset.
        offset: u32,
    },
    /// Offset is not 32-bit aligned.
    #[error("register offset {offset:#04x} is not 32-bit aligned")]
    Misaligned {
        /// Offending byte offset.
        offset: u32,
    },
    /// Backend could not complete a read.
    #[error("register read at {offset:#04x} failed")]
    ReadFailed {
        /// Byte offset of the failed read.
        offset: u32,
    },
    /// Backend could not complete a write.
    #[error("register write at {offset:#04x} failed")]
    WriteFailed {
        /// Byte offset of the failed write.
        offset: u32,
    },
}

/// Word-wide access to one 16Z140 register block.
///
/// Offsets are byte offsets relative to the block base. Reads take `&mut self`
/// because reading a period register consumes its new-data bit on hardware.
pub trait RegisterAccess {
    /// Reads a 32-bit register.
    ///
    /// # Errors
    ///
    /// Returns an [`AccessError`] when the offset is invalid or the backend
    /// cannot complete the read.
    fn read32(&mut self, offset: u32) -> Result<u32, AccessError>;

    /// Writes a 32-bit register.
    ///
    /// # Errors
    ///
    /// Returns an [`AccessError`] when the offset is invalid or the backend
    /// cannot complete the write.
    fn write32(&mut self, offset: u32, value: u32) -> Result<(), AccessError>;

    /// Read-modify-write that sets `mask` bits and keeps all others.
    ///
    /// # Errors
    ///
    /// Propagates the read or write failure.
    fn set_mask32(&mut self, offset: u32, mask: u32) -> Result<(), AccessError> {
        let value = self.read32(offset)?;
        self.write32(offset, value | mask)
    }
}

impl<R: RegisterAccess + ?Sized> RegisterAccess for &mut R {
    fn read32(&mut self, offset: u32) -> Result<u32, AccessError> {
        (**self).read32(offset)
    }

    fn write32(&mut self, offset: u32, value: u32) -> Result<(), AccessError> {
        (**self).write32(offset, value)
    }
}

/// Validates that `offset` addresses a word inside the register block.
///
/// # Errors
///
/// Returns [`AccessError::Misaligned`] for offsets that are not a multiple of
/// four and [`AccessError::OutOfRange`] for offsets at or past the block end.
pub const fn validate_offset(offset: u32) -> Result<(), AccessError> {
    if !offset.is_multiple_of(4) {
        Err(AccessError::Misaligned { offset })
    } else if offset >= ADDRSPACE_SIZE {
        Err(AccessError::OutOfRange { offset })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_offset, AccessError, RegisterAccess};
    use crate::regs::map::{ADDRSPACE_SIZE, COMMAND, DEB_TIME};

    struct Word(u32);

    impl RegisterAccess for Word {
        fn read32(&mut self, _offset: u32) -> Result<u32, AccessError> {
            Ok(self.0)
        }

        fn write32(&mut self, _offset: u32, value: u32) -> Result<(), AccessError> {
            self.0 = value;
            Ok(())
        }
    }

    #[test]
    fn offset_validation_accepts_block_words() {
        assert_eq!(validate_offset(DEB_TIME), Ok(()));
        assert_eq!(validate_offset(COMMAND), Ok(()));
        assert_eq!(
            validate_offset(ADDRSPACE_SIZE),
            Err(AccessError::OutOfRange {
                offset: ADDRSPACE_SIZE
            })
        );
        assert_eq!(
            validate_offset(0x06),
            Err(AccessError::Misaligned { offset: 0x06 })
        );
    }

    #[test]
    fn set_mask_keeps_existing_bits() {
        let mut word = Word(0x0A);
        word.set_mask32(COMMAND, 0x01).expect("set mask");
        assert_eq!(word.0, 0x0B);
    }

    #[test]
    fn mutable_reference_forwards_access() {
        fn store<R: RegisterAccess>(mut regs: R) {
            regs.write32(DEB_TIME, 7).expect("write through reference");
        }

        let mut word = Word(0);
        store(&mut word);
        assert_eq!(word.0, 7);
    }
}
