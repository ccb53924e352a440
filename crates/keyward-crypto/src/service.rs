//! Collaborator service implementations.
//!
//! [`SealerService`] adapts the pure [`KeySealer`] to the `KeyCipher` seam,
//! drawing nonce randomness from the OS at seal time. [`SystemEntropy`]
//! implements the `EntropySource` seam over `getrandom`. RNG failure is
//! surfaced as a backend [`ServiceError`] - this service hands a result code
//! back across the enclave boundary, so it must not panic.

use keyward_core::{CipherMode, EntropySource, KeyCipher, ServiceError};
use keyward_proto::{ParamKind, Params, ParamShape};

use crate::seal::{KeySealer, SEAL_NONCE_SIZE};

/// Shape of both seal and unseal invocations: key blob in, handle in,
/// result out.
const CIPHER_SHAPE: ParamShape = ParamShape::new([
    ParamKind::BufferIn,
    ParamKind::BufferIn,
    ParamKind::BufferOut,
    ParamKind::None,
]);

/// Shape of random invocations: one output buffer.
const RANDOM_SHAPE: ParamShape = ParamShape::new([
    ParamKind::BufferOut,
    ParamKind::None,
    ParamKind::None,
    ParamKind::None,
]);

/// Slot carrying the input key blob (plaintext or sealed).
const SLOT_INPUT: usize = 0;
/// Slot carrying the caller's key handle, bound as associated data.
const SLOT_HANDLE: usize = 1;
/// Slot receiving the transform result.
const SLOT_OUTPUT: usize = 2;

/// `KeyCipher` implementation backed by an AEAD [`KeySealer`].
#[derive(Debug)]
pub struct SealerService {
    sealer: KeySealer,
}

impl SealerService {
    /// Build the service around a sealer.
    #[must_use]
    pub const fn new(sealer: KeySealer) -> Self {
        Self { sealer }
    }
}

impl KeyCipher for SealerService {
    fn required_shape(&self, _mode: CipherMode) -> ParamShape {
        CIPHER_SHAPE
    }

    fn transform(&self, mode: CipherMode, params: &mut Params<'_>) -> Result<(), ServiceError> {
        let input = params.buffer_in(SLOT_INPUT)?.to_vec();
        let handle = params.buffer_in(SLOT_HANDLE)?.to_vec();

        let result = match mode {
            CipherMode::Encrypt => {
                let mut nonce = [0u8; SEAL_NONCE_SIZE];
                getrandom::fill(&mut nonce)
                    .map_err(|err| ServiceError::Backend(err.to_string()))?;
                self.sealer.seal(&input, &handle, nonce)
            },
            CipherMode::Decrypt => self.sealer.unseal(&input, &handle).map_err(|err| {
                tracing::warn!(%err, "unseal rejected");
                ServiceError::InvalidSealedData
            })?,
        };

        params.buffer_out(SLOT_OUTPUT)?.write(&result)?;
        Ok(())
    }
}

/// `EntropySource` implementation over the OS RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEntropy;

impl SystemEntropy {
    /// Build the OS entropy source.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl EntropySource for SystemEntropy {
    fn required_shape(&self) -> ParamShape {
        RANDOM_SHAPE
    }

    fn fill_random(&self, params: &mut Params<'_>) -> Result<(), ServiceError> {
        let out = params.buffer_out(0)?;
        let mut bytes = vec![0u8; out.capacity()];
        getrandom::fill(&mut bytes).map_err(|err| ServiceError::Backend(err.to_string()))?;
        out.write(&bytes)?;
        Ok(())
    }
}
