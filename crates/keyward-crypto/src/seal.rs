//! Key sealing with `XChaCha20-Poly1305`.
//!
//! Pure functions over caller-provided randomness: `seal` takes the nonce as
//! an argument, so the same inputs always produce the same blob. The service
//! wrapper in [`crate::service`] supplies OS randomness in production.

use chacha20poly1305::{
    XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit, Payload},
};
use thiserror::Error;
use zeroize::Zeroize;

/// Size of the sealing key (32 bytes).
pub const SEAL_KEY_SIZE: usize = 32;

/// Size of the `XChaCha20` nonce prefix (24 bytes).
pub const SEAL_NONCE_SIZE: usize = 24;

/// Size of the Poly1305 authentication tag (16 bytes).
pub const SEAL_TAG_SIZE: usize = 16;

/// Bytes a sealed blob adds over its plaintext (nonce + tag).
pub const SEAL_OVERHEAD: usize = SEAL_NONCE_SIZE + SEAL_TAG_SIZE;

/// Errors unsealing a blob.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SealError {
    /// Blob shorter than the fixed nonce + tag framing.
    #[error("sealed blob too short: need at least {needed} bytes, got {actual}")]
    TooShort {
        /// Minimum length of any sealed blob
        needed: usize,
        /// Length actually presented
        actual: usize,
    },

    /// Authentication failed (wrong key, wrong handle, or tampering).
    #[error("sealed blob failed authentication")]
    AuthenticationFailed,
}

/// A sealing key with authenticated seal/unseal operations.
///
/// Key material is zeroized when the sealer is dropped.
pub struct KeySealer {
    key: [u8; SEAL_KEY_SIZE],
}

impl KeySealer {
    /// Wrap a 32-byte sealing key.
    #[must_use]
    pub const fn new(key: [u8; SEAL_KEY_SIZE]) -> Self {
        Self { key }
    }

    /// Seal `plaintext`, binding `handle` as associated data.
    ///
    /// Returns `nonce ‖ ciphertext+tag`. The caller MUST provide
    /// cryptographically secure nonce bytes in production; reuse under the
    /// same key breaks confidentiality.
    #[must_use]
    pub fn seal(
        &self,
        plaintext: &[u8],
        handle: &[u8],
        nonce: [u8; SEAL_NONCE_SIZE],
    ) -> Vec<u8> {
        let cipher = XChaCha20Poly1305::new((&self.key).into());

        let Ok(ciphertext) = cipher.encrypt(
            XNonce::from_slice(&nonce),
            Payload { msg: plaintext, aad: handle },
        ) else {
            unreachable!("XChaCha20-Poly1305 encryption cannot fail with valid inputs");
        };

        let mut sealed = Vec::with_capacity(SEAL_NONCE_SIZE + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        sealed
    }

    /// Unseal a blob produced by [`Self::seal`] under the same handle.
    ///
    /// # Errors
    ///
    /// - [`SealError::TooShort`] if the blob cannot hold nonce + tag
    /// - [`SealError::AuthenticationFailed`] on wrong key, wrong handle, or
    ///   any tampering
    pub fn unseal(&self, sealed: &[u8], handle: &[u8]) -> Result<Vec<u8>, SealError> {
        if sealed.len() < SEAL_OVERHEAD {
            return Err(SealError::TooShort { needed: SEAL_OVERHEAD, actual: sealed.len() });
        }

        let (nonce, ciphertext) = sealed.split_at(SEAL_NONCE_SIZE);
        let cipher = XChaCha20Poly1305::new((&self.key).into());

        cipher
            .decrypt(XNonce::from_slice(nonce), Payload { msg: ciphertext, aad: handle })
            .map_err(|_| SealError::AuthenticationFailed)
    }
}

impl std::fmt::Debug for KeySealer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never render key material.
        f.debug_struct("KeySealer").finish_non_exhaustive()
    }
}

impl Drop for KeySealer {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}
