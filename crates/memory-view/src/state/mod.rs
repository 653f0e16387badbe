//! Register, status and stack state consulted by style resolution.

/// Canonical register arena, byte aliases and the status register.
pub mod registers;
/// Stack membership sets for the supervisor and user stacks.
pub mod stack;

pub use registers::{
    PointerRegister, RegisterAlias, RegisterAliasTable, RegisterId, RegisterSnapshot,
    RegisterWidth, StatusRegister, POINTER_REGISTER_COUNT, STATUS_REGISTER_BITS, SUPERVISOR_BIT,
};
pub use stack::{StackPointer, StackTracker};
