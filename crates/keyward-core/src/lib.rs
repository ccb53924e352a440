//! Keyward command-dispatch core
//!
//! The dispatch and lock-state heart of an enclave-hosted key-handling
//! service for full-disk encryption. An untrusted caller invokes one of six
//! commands; this crate resolves the opcode, validates the invocation's
//! parameter shape slot-by-slot, and routes to the operation - enforcing one
//! monotonic security invariant: once the decrypt lock is set, key decryption
//! is refused for the remainder of the service instance.
//!
//! # Architecture
//!
//! - **Pure dispatch**: no I/O; cryptography and randomness live behind the
//!   [`KeyCipher`] and [`EntropySource`] trait seams
//! - **Instance-owned state**: the decrypt lock belongs to one [`KeyHandler`]
//!   value, so independent instances (and tests) never share globals
//! - **Serialized by construction**: `dispatch` takes `&mut self`; a host
//!   with genuinely concurrent callers adds its own mutual exclusion
//!
//! Reference collaborator implementations live in `keyward-crypto`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod handler;
pub mod lock;
pub mod service;

pub use error::DispatchError;
pub use handler::{DEBUG_LOG_MAX, KeyHandler};
pub use lock::{DecryptLock, LockState};
pub use service::{CipherMode, EntropySource, KeyCipher, ServiceError};
