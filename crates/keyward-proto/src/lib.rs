//! Keyward wire-level types
//!
//! Everything the untrusted caller and the key-handling core agree on at the
//! invocation boundary: command opcodes, the 4-slot parameter descriptor and
//! its packed wire encoding, the tagged parameter slots themselves, and the
//! stable numeric result codes handed back across the enclave boundary.
//!
//! This crate is deliberately free of any dispatch or crypto logic - it only
//! describes invocations. The core (`keyward-core`) consumes these types; the
//! reference collaborators (`keyward-crypto`) produce and fill them.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod opcode;
pub mod params;
pub mod shape;

pub use error::{ParamError, ResultCode, ShapeError};
pub use opcode::Opcode;
pub use params::{OutBuf, Param, Params, Value};
pub use shape::{ParamKind, ParamShape};
