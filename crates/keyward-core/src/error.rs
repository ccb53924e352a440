//! Dispatch error taxonomy.
//!
//! Every failure a caller can observe from `dispatch`, layered over the
//! proto-level errors. All failures are pure rejections: none of them
//! terminates the service or touches the decrypt lock.

use keyward_proto::{ParamError, ParamShape, ResultCode};
use thiserror::Error;

use crate::service::ServiceError;

/// Errors returned by [`crate::KeyHandler::dispatch`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Opcode does not map to a known command.
    #[error("unsupported command opcode {0:#x}")]
    UnsupportedCommand(u32),

    /// Declared parameter shape does not exactly match the command's.
    #[error("bad parameters: expected {expected}, declared {declared}")]
    BadParameters {
        /// Shape the resolved command requires
        expected: ParamShape,
        /// Shape the invocation declared
        declared: ParamShape,
    },

    /// Decrypt attempted while the decrypt lock is set.
    ///
    /// Irrecoverable within the current service instance; this is the
    /// intended security outcome, not a fault.
    #[error("decrypt operations are locked")]
    AccessDenied,

    /// Parameter slot access failed during dispatch.
    #[error(transparent)]
    Param(#[from] ParamError),

    /// Collaborator service failure, propagated verbatim.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl DispatchError {
    /// Result code reported for this error at the foreign-ABI surface.
    #[must_use]
    pub fn result_code(&self) -> ResultCode {
        match self {
            Self::UnsupportedCommand(_) => ResultCode::NOT_SUPPORTED,
            Self::BadParameters { .. } => ResultCode::BAD_PARAMETERS,
            Self::AccessDenied => ResultCode::ACCESS_DENIED,
            Self::Param(err) => err.result_code(),
            Self::Service(err) => err.result_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use keyward_proto::ParamKind;

    use super::*;

    #[test]
    fn result_code_mapping() {
        assert_eq!(
            DispatchError::UnsupportedCommand(0xFFFF).result_code(),
            ResultCode::NOT_SUPPORTED
        );
        assert_eq!(
            DispatchError::BadParameters {
                expected: ParamShape::EMPTY,
                declared: ParamShape::new([
                    ParamKind::ValueOut,
                    ParamKind::None,
                    ParamKind::None,
                    ParamKind::None,
                ]),
            }
            .result_code(),
            ResultCode::BAD_PARAMETERS
        );
        assert_eq!(DispatchError::AccessDenied.result_code(), ResultCode::ACCESS_DENIED);
        assert_eq!(
            DispatchError::Service(ServiceError::InvalidSealedData).result_code(),
            ResultCode::MAC_INVALID
        );
        assert_eq!(
            DispatchError::Param(ParamError::ShortBuffer { needed: 40, available: 8 })
                .result_code(),
            ResultCode::SHORT_BUFFER
        );
    }
}
