//! Parameter descriptors and their packed wire encoding.
//!
//! Every invocation carries exactly [`ParamShape::SLOTS`] parameter slots. A
//! [`ParamShape`] is the ordered type signature of those slots, and each
//! command has exactly one accepted shape. Matching is exact equality over
//! all four slots: there is no coercion between related kinds (`BufferIn`
//! is not interchangeable with `BufferInOut`), and unused slots must be
//! declared `None`.
//!
//! # Wire encoding
//!
//! The untrusted caller declares the shape as a single `u32`: slot `i`'s kind
//! occupies bits `[4*i, 4*i + 4)`, and bits 16-31 are reserved and must be
//! zero. Kind nibbles:
//!
//! ```text
//! 0 None       1 ValueIn     2 ValueOut    3 ValueInOut
//! 5 BufferIn   6 BufferOut   7 BufferInOut
//! ```
//!
//! Nibble 4 and nibbles 8-15 are invalid and fail decoding. The dispatcher
//! itself never consumes the raw word (slots carry their own kinds); hosts
//! bridging a foreign ABI use it to pre-validate and to render shapes in
//! errors and logs.

use std::fmt;

use crate::error::ShapeError;

/// Width in bits of one kind nibble in the packed descriptor word.
pub const KIND_BITS: u32 = 4;

/// The kind of data occupying one parameter slot.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// Slot is unused.
    None = 0,
    /// A pair of value words supplied by the caller.
    ValueIn = 1,
    /// A pair of value words written by the service.
    ValueOut = 2,
    /// A pair of value words read and updated in place.
    ValueInOut = 3,
    /// A caller-supplied input buffer.
    BufferIn = 5,
    /// A caller-supplied buffer the service writes into.
    BufferOut = 6,
    /// A caller-supplied buffer read and rewritten in place.
    BufferInOut = 7,
}

impl ParamKind {
    /// Decode a kind nibble. `None` for the invalid encodings (4, 8-15).
    #[must_use]
    pub const fn from_nibble(nibble: u8) -> Option<Self> {
        match nibble {
            0 => Some(Self::None),
            1 => Some(Self::ValueIn),
            2 => Some(Self::ValueOut),
            3 => Some(Self::ValueInOut),
            5 => Some(Self::BufferIn),
            6 => Some(Self::BufferOut),
            7 => Some(Self::BufferInOut),
            _ => None,
        }
    }

    /// Wire nibble of this kind.
    #[must_use]
    pub const fn to_nibble(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "None",
            Self::ValueIn => "ValueIn",
            Self::ValueOut => "ValueOut",
            Self::ValueInOut => "ValueInOut",
            Self::BufferIn => "BufferIn",
            Self::BufferOut => "BufferOut",
            Self::BufferInOut => "BufferInOut",
        };
        f.write_str(name)
    }
}

/// The 4-slot type signature of one invocation.
///
/// Compared slot-by-slot with exact equality; the derived `PartialEq` is the
/// validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamShape([ParamKind; ParamShape::SLOTS]);

impl ParamShape {
    /// Number of parameter slots in every invocation.
    pub const SLOTS: usize = 4;

    /// The all-`None` shape (commands taking no parameters).
    pub const EMPTY: Self = Self([ParamKind::None; Self::SLOTS]);

    /// Build a shape from explicit slot kinds.
    #[must_use]
    pub const fn new(kinds: [ParamKind; Self::SLOTS]) -> Self {
        Self(kinds)
    }

    /// Slot kinds in order.
    #[must_use]
    pub const fn kinds(&self) -> [ParamKind; Self::SLOTS] {
        self.0
    }

    /// Decode a packed descriptor word.
    ///
    /// # Errors
    ///
    /// - [`ShapeError::ReservedBits`] if any of bits 16-31 is set
    /// - [`ShapeError::InvalidKind`] if a slot nibble has no kind encoding
    pub fn from_raw(raw: u32) -> Result<Self, ShapeError> {
        if raw >> (KIND_BITS * Self::SLOTS as u32) != 0 {
            return Err(ShapeError::ReservedBits { raw });
        }

        let mut kinds = [ParamKind::None; Self::SLOTS];
        for (slot, kind) in kinds.iter_mut().enumerate() {
            let nibble = ((raw >> (KIND_BITS * slot as u32)) & 0xF) as u8;
            *kind = ParamKind::from_nibble(nibble)
                .ok_or(ShapeError::InvalidKind { slot, value: nibble })?;
        }
        Ok(Self(kinds))
    }

    /// Encode this shape as a packed descriptor word.
    #[must_use]
    pub fn to_raw(&self) -> u32 {
        self.0
            .iter()
            .enumerate()
            .fold(0u32, |raw, (slot, kind)| {
                raw | (u32::from(kind.to_nibble()) << (KIND_BITS * slot as u32))
            })
    }
}

impl fmt::Display for ParamShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}, {}]", self.0[0], self.0[1], self.0[2], self.0[3])
    }
}
