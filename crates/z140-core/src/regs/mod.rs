//! Register block layout and access primitives.

/// Register-space access trait and offset validation.
pub mod access;
/// Fixed register map and bit-field constants.
pub mod map;

pub use access::{validate_offset, AccessError, RegisterAccess};
pub use map::{Register, RegisterAccessKind, ADDRSPACE_SIZE, REGISTER_COUNT};
