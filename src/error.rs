//! # Error Types
//!
//! One error enum for the whole ordering core. Every operation on
//! [`CafeState`](crate::state::CafeState) or [`CafeClient`](crate::clients::CafeClient)
//! returns `Result<_, CafeError>`, so callers can match on the failure kind.
//!
//! | Variant | Raised when |
//! |---------|-------------|
//! | `InvalidArgument` | malformed input to a creation call or an unknown status string |
//! | `InvalidState` | the call is not allowed given current data (empty-cart checkout) |
//! | `NotFound` | the call references an id that does not exist |
//! | `StorageUnavailable` | the key-value store failed or returned garbage |
//! | `ActorClosed` / `ActorDropped` | the state actor task is gone |

use crate::storage::StorageError;
use thiserror::Error;

/// Errors returned by the ordering core.
#[derive(Debug, Error)]
pub enum CafeError {
    /// Missing or malformed input.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation is not valid for the current data.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The referenced entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The persistence collaborator failed. In-memory state is left untouched.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] StorageError),

    #[error("Actor closed")]
    ActorClosed,

    #[error("Actor dropped response channel")]
    ActorDropped,
}

impl CafeError {
    /// True for failures caused by the caller's input or the current data,
    /// as opposed to infrastructure failures worth retrying.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            CafeError::InvalidArgument(_) | CafeError::InvalidState(_) | CafeError::NotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_classification() {
        assert!(CafeError::InvalidState("empty cart".into()).is_rejection());
        assert!(CafeError::NotFound("order_9".into()).is_rejection());
        assert!(!CafeError::ActorClosed.is_rejection());
        assert!(!CafeError::from(StorageError::Backend("disk full".into())).is_rejection());
    }

    #[test]
    fn test_storage_error_message_is_kept() {
        let err = CafeError::from(StorageError::Backend("quota exceeded".into()));
        assert!(err.to_string().contains("quota exceeded"));
    }
}
