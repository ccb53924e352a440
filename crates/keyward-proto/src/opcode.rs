//! Command opcodes for the key-handling service.
//!
//! Opcodes are `u32` values, stable on the wire. The command set is closed:
//! decoding happens exactly once at the numeric boundary via
//! [`Opcode::from_u32`], which returns `None` for anything outside the set so
//! unknown commands are rejected up front rather than falling through a
//! silent default branch.

/// Command identifiers accepted by the key-handling service.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Seal a key-encryption key (allowed in both lock states).
    KeyEncrypt = 0x0,
    /// Unseal a key-encryption key (refused once the decrypt lock is set).
    KeyDecrypt = 0x1,
    /// Set the decrypt lock. One-way: no command clears it.
    Lock = 0x2,
    /// Read the decrypt lock as a 0/1 output value.
    GetLock = 0x3,
    /// Fill a caller buffer with cryptographic randomness.
    GenRandom = 0x4,
    /// Forward a caller-supplied message to the service log sink.
    Debug = 0x5,
}

impl Opcode {
    /// Decode a raw wire opcode. `None` if unrecognized.
    #[must_use]
    pub const fn from_u32(raw: u32) -> Option<Self> {
        match raw {
            0x0 => Some(Self::KeyEncrypt),
            0x1 => Some(Self::KeyDecrypt),
            0x2 => Some(Self::Lock),
            0x3 => Some(Self::GetLock),
            0x4 => Some(Self::GenRandom),
            0x5 => Some(Self::Debug),
            _ => None,
        }
    }

    /// Raw wire value of this opcode.
    #[must_use]
    pub const fn to_u32(self) -> u32 {
        self as u32
    }
}
