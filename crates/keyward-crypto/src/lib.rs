//! Keyward reference collaborators
//!
//! Production implementations of the `keyward-core` collaborator seams: an
//! XChaCha20-Poly1305 key sealer standing in for a hardware key wrap, and an
//! OS-backed entropy source. The seal/unseal primitives are pure - callers
//! provide the nonce randomness - so they stay deterministic under test; the
//! service wrappers draw nonces from the OS at seal time.
//!
//! # Security
//!
//! - Sealing key material zeroizes on drop
//! - The caller's key handle is bound as AEAD associated data: unsealing
//!   under a different handle fails authentication
//! - A sealed blob is `nonce ‖ ciphertext+tag`; tampering with any part of
//!   it fails authentication

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod seal;
pub mod service;

pub use seal::{KeySealer, SEAL_KEY_SIZE, SEAL_NONCE_SIZE, SEAL_OVERHEAD, SEAL_TAG_SIZE, SealError};
pub use service::{SealerService, SystemEntropy};
