//! Error types and numeric result codes for the invocation boundary.
//!
//! Strongly-typed errors inside the crate boundary; a stable `u32`
//! [`ResultCode`] at the foreign-ABI surface. The untrusted caller only ever
//! sees result codes - the typed errors exist so the core and its hosts can
//! match on causes without string parsing.

use std::fmt;

use thiserror::Error;

use crate::shape::ParamKind;

/// Errors decoding a packed descriptor word.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeError {
    /// A slot nibble does not encode any parameter kind.
    #[error("invalid parameter kind {value:#x} in slot {slot}")]
    InvalidKind {
        /// Slot index (0-3) carrying the bad nibble
        slot: usize,
        /// The offending nibble value
        value: u8,
    },

    /// Bits 16-31 of the descriptor word must be zero.
    #[error("reserved descriptor bits set: {raw:#010x}")]
    ReservedBits {
        /// The full descriptor word as received
        raw: u32,
    },
}

impl ShapeError {
    /// Result code reported for this error at the foreign-ABI surface.
    #[must_use]
    pub fn result_code(&self) -> ResultCode {
        ResultCode::BAD_FORMAT
    }
}

/// Errors accessing invocation parameter slots.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamError {
    /// Slot holds a different kind than the access requires.
    #[error("slot {slot} is {actual}, expected {expected}")]
    KindMismatch {
        /// Slot index (0-3) that was accessed
        slot: usize,
        /// Kind the access requires
        expected: ParamKind,
        /// Kind actually occupying the slot
        actual: ParamKind,
    },

    /// Slot holds no value pair (read accepts any value kind).
    #[error("slot {slot} is {actual}, expected a value kind")]
    ValueExpected {
        /// Slot index (0-3) that was accessed
        slot: usize,
        /// Kind actually occupying the slot
        actual: ParamKind,
    },

    /// Slot index outside the fixed 4-slot range.
    #[error("slot index {slot} out of range")]
    SlotOutOfRange {
        /// The out-of-range index
        slot: usize,
    },

    /// Output buffer too small for the data to be written.
    #[error("output buffer too small: need {needed} bytes, have {available}")]
    ShortBuffer {
        /// Bytes the write requires
        needed: usize,
        /// Bytes the caller provided
        available: usize,
    },
}

impl ParamError {
    /// Result code reported for this error at the foreign-ABI surface.
    #[must_use]
    pub fn result_code(&self) -> ResultCode {
        match self {
            Self::ShortBuffer { .. } => ResultCode::SHORT_BUFFER,
            Self::KindMismatch { .. } | Self::ValueExpected { .. } | Self::SlotOutOfRange { .. } => {
                ResultCode::BAD_PARAMETERS
            },
        }
    }
}

/// Stable numeric result code handed back to the untrusted caller.
///
/// Values are fixed wire constants; hosts bridging a foreign ABI return them
/// verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResultCode(u32);

impl ResultCode {
    /// Operation completed.
    pub const SUCCESS: Self = Self(0x0000_0000);
    /// Unspecified backend failure.
    pub const GENERIC: Self = Self(0xFFFF_0000);
    /// Operation refused by the decrypt lock.
    pub const ACCESS_DENIED: Self = Self(0xFFFF_0001);
    /// Descriptor word could not be decoded.
    pub const BAD_FORMAT: Self = Self(0xFFFF_0005);
    /// Declared parameters do not match the command's shape.
    pub const BAD_PARAMETERS: Self = Self(0xFFFF_0006);
    /// Opcode outside the known command set.
    pub const NOT_SUPPORTED: Self = Self(0xFFFF_000A);
    /// Output buffer too small for the result.
    pub const SHORT_BUFFER: Self = Self(0xFFFF_0010);
    /// Sealed input failed authentication.
    pub const MAC_INVALID: Self = Self(0xFFFF_3071);

    /// Raw wire value of this code.
    #[must_use]
    pub const fn to_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_error_codes() {
        assert_eq!(
            ParamError::ShortBuffer { needed: 64, available: 16 }.result_code(),
            ResultCode::SHORT_BUFFER
        );
        assert_eq!(
            ParamError::KindMismatch {
                slot: 0,
                expected: ParamKind::BufferIn,
                actual: ParamKind::None,
            }
            .result_code(),
            ResultCode::BAD_PARAMETERS
        );
        assert_eq!(
            ParamError::ValueExpected { slot: 2, actual: ParamKind::BufferOut }.result_code(),
            ResultCode::BAD_PARAMETERS
        );
        assert_eq!(
            ParamError::SlotOutOfRange { slot: 7 }.result_code(),
            ResultCode::BAD_PARAMETERS
        );
    }

    #[test]
    fn shape_error_code() {
        assert_eq!(
            ShapeError::ReservedBits { raw: 0xFFFF_0000 }.result_code(),
            ResultCode::BAD_FORMAT
        );
    }

    #[test]
    fn result_codes_are_stable() {
        assert_eq!(ResultCode::SUCCESS.to_u32(), 0x0000_0000);
        assert_eq!(ResultCode::GENERIC.to_u32(), 0xFFFF_0000);
        assert_eq!(ResultCode::ACCESS_DENIED.to_u32(), 0xFFFF_0001);
        assert_eq!(ResultCode::BAD_FORMAT.to_u32(), 0xFFFF_0005);
        assert_eq!(ResultCode::BAD_PARAMETERS.to_u32(), 0xFFFF_0006);
        assert_eq!(ResultCode::NOT_SUPPORTED.to_u32(), 0xFFFF_000A);
        assert_eq!(ResultCode::SHORT_BUFFER.to_u32(), 0xFFFF_0010);
        assert_eq!(ResultCode::MAC_INVALID.to_u32(), 0xFFFF_3071);
    }

    #[test]
    fn result_codes_render_as_hex() {
        assert_eq!(ResultCode::SUCCESS.to_string(), "0x00000000");
        assert_eq!(ResultCode::ACCESS_DENIED.to_string(), "0xffff0001");
    }
}
