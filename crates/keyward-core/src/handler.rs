//! Command dispatcher for the key-handling service.
//!
//! One [`KeyHandler`] value corresponds to one service instantiation inside
//! the enclave. Construction is the service-start hook and resets the
//! decrypt lock; session open/close are log-only notifications; drop is
//! teardown.
//!
//! # Dispatch flow
//!
//! 1. Resolve the raw opcode; unknown values fail `UnsupportedCommand`
//! 2. Compare the shape declared by the slots against the command's required
//!    shape, slot-by-slot; any mismatch fails `BadParameters`
//! 3. Branch: lock commands mutate or read the latch directly, crypto
//!    commands delegate to the collaborators - with the decrypt-lock check
//!    ahead of any decrypt delegation
//!
//! Rejected invocations have no observable side effect: the lock is only
//! ever touched by a shape-valid `Lock` command.

use keyward_proto::{Opcode, ParamKind, Params, ParamShape};

use crate::{
    error::DispatchError,
    lock::{DecryptLock, LockState},
    service::{CipherMode, EntropySource, KeyCipher},
};

/// Maximum number of caller bytes forwarded per `Debug` invocation.
pub const DEBUG_LOG_MAX: usize = 1024;

/// Required shape of the `GetLock` command.
const GET_LOCK_SHAPE: ParamShape = ParamShape::new([
    ParamKind::ValueOut,
    ParamKind::None,
    ParamKind::None,
    ParamKind::None,
]);

/// Required shape of the `Debug` command.
const DEBUG_SHAPE: ParamShape = ParamShape::new([
    ParamKind::BufferIn,
    ParamKind::None,
    ParamKind::None,
    ParamKind::None,
]);

/// One service instance: the decrypt lock plus its collaborators.
///
/// `dispatch` takes `&mut self`, so the hosting environment's
/// one-invocation-at-a-time contract is enforced by the borrow checker; a
/// host exposing the handler to concurrent callers wraps it in its own
/// mutual exclusion.
#[derive(Debug)]
pub struct KeyHandler<C, R> {
    lock: DecryptLock,
    cipher: C,
    entropy: R,
}

impl<C, R> KeyHandler<C, R>
where
    C: KeyCipher,
    R: EntropySource,
{
    /// Create a handler with an unlocked decrypt latch (service start).
    pub fn new(cipher: C, entropy: R) -> Self {
        tracing::debug!("key handler created, decrypt lock reset");
        Self { lock: DecryptLock::new(), cipher, entropy }
    }

    /// Session-open notification. Log-only; carries no state.
    pub fn open_session(&self) {
        tracing::debug!("session opened");
    }

    /// Session-close notification. Log-only; carries no state.
    pub fn close_session(&self) {
        tracing::debug!("session closed");
    }

    /// Current lock state. Pure read, equivalent to the `GetLock` command.
    #[must_use]
    pub fn lock_state(&self) -> LockState {
        self.lock.state()
    }

    /// Dispatch one invocation.
    ///
    /// Outputs land in the caller's slots; success carries no payload of its
    /// own.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::UnsupportedCommand`] for opcodes outside the set
    /// - [`DispatchError::BadParameters`] if the declared shape is not
    ///   exactly the command's required shape
    /// - [`DispatchError::AccessDenied`] for `KeyDecrypt` while locked
    /// - [`DispatchError::Service`] propagated verbatim from collaborators
    pub fn dispatch(
        &mut self,
        opcode: u32,
        params: &mut Params<'_>,
    ) -> Result<(), DispatchError> {
        tracing::debug!(opcode, "dispatching command");

        let Some(command) = Opcode::from_u32(opcode) else {
            tracing::warn!(opcode, "unsupported command");
            return Err(DispatchError::UnsupportedCommand(opcode));
        };

        let expected = self.required_shape(command);
        let declared = params.shape();
        if declared != expected {
            tracing::warn!(
                command = ?command,
                %expected,
                %declared,
                "parameter shape mismatch"
            );
            return Err(DispatchError::BadParameters { expected, declared });
        }

        match command {
            Opcode::KeyEncrypt => {
                self.cipher.transform(CipherMode::Encrypt, params)?;
                Ok(())
            },
            Opcode::KeyDecrypt => {
                if self.lock.is_locked() {
                    tracing::warn!("decrypt refused: service is locked");
                    return Err(DispatchError::AccessDenied);
                }
                self.cipher.transform(CipherMode::Decrypt, params)?;
                Ok(())
            },
            Opcode::Lock => {
                tracing::debug!("locking decrypt operations");
                self.lock.set_locked();
                Ok(())
            },
            Opcode::GetLock => {
                let value = params.value_out(0)?;
                value.a = u32::from(self.lock.is_locked());
                Ok(())
            },
            Opcode::GenRandom => {
                self.entropy.fill_random(params)?;
                Ok(())
            },
            Opcode::Debug => {
                let message = debug_payload(params.buffer_in(0)?);
                tracing::debug!(%message, "caller log");
                Ok(())
            },
        }
    }

    fn required_shape(&self, command: Opcode) -> ParamShape {
        match command {
            Opcode::KeyEncrypt => self.cipher.required_shape(CipherMode::Encrypt),
            Opcode::KeyDecrypt => self.cipher.required_shape(CipherMode::Decrypt),
            Opcode::Lock => ParamShape::EMPTY,
            Opcode::GetLock => GET_LOCK_SHAPE,
            Opcode::GenRandom => self.entropy.required_shape(),
            Opcode::Debug => DEBUG_SHAPE,
        }
    }
}

/// Lossy-decode at most [`DEBUG_LOG_MAX`] bytes of a caller's debug buffer.
fn debug_payload(buffer: &[u8]) -> std::borrow::Cow<'_, str> {
    let end = buffer.len().min(DEBUG_LOG_MAX);
    String::from_utf8_lossy(&buffer[..end])
}

impl<C, R> Drop for KeyHandler<C, R> {
    fn drop(&mut self) {
        tracing::debug!("key handler destroyed");
    }
}
