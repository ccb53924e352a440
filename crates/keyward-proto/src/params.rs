//! Invocation parameter slots.
//!
//! Each slot is a tagged union of kind and payload, so the shape the
//! validator compares is derived from the slots themselves by construction -
//! a side-band descriptor cannot disagree with slot contents. Buffers borrow
//! caller memory for the duration of one invocation only; nothing here
//! outlives the call.

use crate::{
    error::ParamError,
    shape::{ParamKind, ParamShape},
};

/// A pair of 32-bit value words, the payload of value-kind slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Value {
    /// First value word.
    pub a: u32,
    /// Second value word.
    pub b: u32,
}

impl Value {
    /// Build a value pair from both words.
    #[must_use]
    pub const fn new(a: u32, b: u32) -> Self {
        Self { a, b }
    }
}

/// A caller-provided output buffer with written-length tracking.
///
/// The service writes at most once per invocation; a write larger than the
/// caller's buffer fails with [`ParamError::ShortBuffer`] and leaves the
/// buffer untouched.
#[derive(Debug, PartialEq, Eq)]
pub struct OutBuf<'a> {
    data: &'a mut [u8],
    written: usize,
}

impl<'a> OutBuf<'a> {
    /// Wrap a caller buffer. Nothing is considered written yet.
    pub fn new(data: &'a mut [u8]) -> Self {
        Self { data, written: 0 }
    }

    /// Total capacity of the caller's buffer.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Copy `bytes` to the start of the buffer and record the length.
    ///
    /// # Errors
    ///
    /// - [`ParamError::ShortBuffer`] if `bytes` exceeds the capacity
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), ParamError> {
        if bytes.len() > self.data.len() {
            return Err(ParamError::ShortBuffer {
                needed: bytes.len(),
                available: self.data.len(),
            });
        }
        self.data[..bytes.len()].copy_from_slice(bytes);
        self.written = bytes.len();
        Ok(())
    }

    /// The bytes written so far (empty before any write).
    #[must_use]
    pub fn written(&self) -> &[u8] {
        &self.data[..self.written]
    }

    /// Length of the written prefix.
    #[must_use]
    pub fn written_len(&self) -> usize {
        self.written
    }
}

/// One invocation parameter slot: kind and payload together.
#[derive(Debug, PartialEq, Eq)]
pub enum Param<'a> {
    /// Unused slot.
    None,
    /// Value pair supplied by the caller.
    ValueIn(Value),
    /// Value pair written by the service; caller reads it back after dispatch.
    ValueOut(Value),
    /// Value pair read and updated in place.
    ValueInOut(Value),
    /// Borrowed input bytes.
    BufferIn(&'a [u8]),
    /// Borrowed output buffer.
    BufferOut(OutBuf<'a>),
    /// Borrowed buffer read and rewritten in place.
    BufferInOut(OutBuf<'a>),
}

impl Param<'_> {
    /// The kind tag of this slot.
    #[must_use]
    pub fn kind(&self) -> ParamKind {
        match self {
            Self::None => ParamKind::None,
            Self::ValueIn(_) => ParamKind::ValueIn,
            Self::ValueOut(_) => ParamKind::ValueOut,
            Self::ValueInOut(_) => ParamKind::ValueInOut,
            Self::BufferIn(_) => ParamKind::BufferIn,
            Self::BufferOut(_) => ParamKind::BufferOut,
            Self::BufferInOut(_) => ParamKind::BufferInOut,
        }
    }
}

/// The fixed 4-slot parameter array of one invocation.
#[derive(Debug, PartialEq, Eq)]
pub struct Params<'a>([Param<'a>; ParamShape::SLOTS]);

impl<'a> Params<'a> {
    /// Build the parameter array from explicit slots.
    #[must_use]
    pub fn new(slots: [Param<'a>; ParamShape::SLOTS]) -> Self {
        Self(slots)
    }

    /// The all-`None` parameter array (commands taking no parameters).
    #[must_use]
    pub fn empty() -> Self {
        Self([Param::None, Param::None, Param::None, Param::None])
    }

    /// The shape declared by these slots, derived from their kind tags.
    #[must_use]
    pub fn shape(&self) -> ParamShape {
        ParamShape::new([
            self.0[0].kind(),
            self.0[1].kind(),
            self.0[2].kind(),
            self.0[3].kind(),
        ])
    }

    fn slot(&self, slot: usize) -> Result<&Param<'a>, ParamError> {
        self.0.get(slot).ok_or(ParamError::SlotOutOfRange { slot })
    }

    fn slot_mut(&mut self, slot: usize) -> Result<&mut Param<'a>, ParamError> {
        self.0.get_mut(slot).ok_or(ParamError::SlotOutOfRange { slot })
    }

    /// Borrow the input bytes in a `BufferIn` slot.
    ///
    /// # Errors
    ///
    /// - [`ParamError::KindMismatch`] if the slot is not `BufferIn`
    /// - [`ParamError::SlotOutOfRange`] if `slot` is not 0-3
    pub fn buffer_in(&self, slot: usize) -> Result<&[u8], ParamError> {
        match self.slot(slot)? {
            Param::BufferIn(bytes) => Ok(*bytes),
            other => Err(ParamError::KindMismatch {
                slot,
                expected: ParamKind::BufferIn,
                actual: other.kind(),
            }),
        }
    }

    /// Borrow the output buffer in a `BufferOut` slot.
    ///
    /// # Errors
    ///
    /// - [`ParamError::KindMismatch`] if the slot is not `BufferOut`
    /// - [`ParamError::SlotOutOfRange`] if `slot` is not 0-3
    pub fn buffer_out(&mut self, slot: usize) -> Result<&mut OutBuf<'a>, ParamError> {
        match self.slot_mut(slot)? {
            Param::BufferOut(buf) => Ok(buf),
            other => Err(ParamError::KindMismatch {
                slot,
                expected: ParamKind::BufferOut,
                actual: other.kind(),
            }),
        }
    }

    /// Borrow the value pair in a `ValueOut` slot for writing.
    ///
    /// # Errors
    ///
    /// - [`ParamError::KindMismatch`] if the slot is not `ValueOut`
    /// - [`ParamError::SlotOutOfRange`] if `slot` is not 0-3
    pub fn value_out(&mut self, slot: usize) -> Result<&mut Value, ParamError> {
        match self.slot_mut(slot)? {
            Param::ValueOut(value) => Ok(value),
            other => Err(ParamError::KindMismatch {
                slot,
                expected: ParamKind::ValueOut,
                actual: other.kind(),
            }),
        }
    }

    /// Read the value pair in any value-kind slot.
    ///
    /// # Errors
    ///
    /// - [`ParamError::ValueExpected`] if the slot holds no value pair
    /// - [`ParamError::SlotOutOfRange`] if `slot` is not 0-3
    pub fn value(&self, slot: usize) -> Result<Value, ParamError> {
        match self.slot(slot)? {
            Param::ValueIn(value) | Param::ValueOut(value) | Param::ValueInOut(value) => {
                Ok(*value)
            },
            other => Err(ParamError::ValueExpected { slot, actual: other.kind() }),
        }
    }
}
