//! Collaborator seams for cryptography and randomness.
//!
//! The core never performs cryptographic work itself: key sealing/unsealing
//! and entropy generation sit behind these traits, called synchronously
//! during dispatch. Each collaborator also declares the exact parameter
//! shape its invocations must carry, which the dispatcher enforces before
//! delegating. Reference implementations live in `keyward-crypto`; tests use
//! in-module mocks.

use keyward_proto::{ParamError, Params, ParamShape, ResultCode};
use thiserror::Error;

/// Direction of a key transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherMode {
    /// Seal a plaintext key blob.
    Encrypt,
    /// Unseal a sealed key blob.
    Decrypt,
}

/// Errors returned by collaborator services.
///
/// Propagated to the caller verbatim; the core never reinterprets or masks
/// them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Parameter slot access failed inside the collaborator.
    #[error(transparent)]
    Param(#[from] ParamError),

    /// Sealed input was malformed or failed authentication.
    #[error("sealed input rejected")]
    InvalidSealedData,

    /// Backend failure (RNG exhaustion, hardware fault).
    #[error("service backend failure: {0}")]
    Backend(String),
}

impl ServiceError {
    /// Result code reported for this error at the foreign-ABI surface.
    #[must_use]
    pub fn result_code(&self) -> ResultCode {
        match self {
            Self::Param(err) => err.result_code(),
            Self::InvalidSealedData => ResultCode::MAC_INVALID,
            Self::Backend(_) => ResultCode::GENERIC,
        }
    }
}

/// Authenticated encrypt/decrypt of a key blob.
pub trait KeyCipher {
    /// The exact parameter shape invocations must carry in `mode`.
    fn required_shape(&self, mode: CipherMode) -> ParamShape;

    /// Transform the key blob in the given slots.
    ///
    /// Called only after the dispatcher has validated the shape against
    /// [`Self::required_shape`].
    ///
    /// # Errors
    ///
    /// - [`ServiceError::InvalidSealedData`] if decrypt input fails
    ///   authentication
    /// - [`ServiceError::Param`] on slot access or short-buffer failures
    /// - [`ServiceError::Backend`] on backend failures
    fn transform(&self, mode: CipherMode, params: &mut Params<'_>) -> Result<(), ServiceError>;
}

/// Cryptographic random byte generation.
pub trait EntropySource {
    /// The exact parameter shape random invocations must carry.
    fn required_shape(&self) -> ParamShape;

    /// Fill the output slot with random bytes.
    ///
    /// Called only after the dispatcher has validated the shape against
    /// [`Self::required_shape`].
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Param`] on slot access failures
    /// - [`ServiceError::Backend`] if the entropy source fails
    fn fill_random(&self, params: &mut Params<'_>) -> Result<(), ServiceError>;
}
