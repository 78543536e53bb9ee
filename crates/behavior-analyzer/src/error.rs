//! Errors surfaced by the behavior service.

use thiserror::Error;

/// Clone so one in-flight computation's outcome can be handed to every waiter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BehaviorError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl From<swap_core::Error> for BehaviorError {
    fn from(err: swap_core::Error) -> Self {
        BehaviorError::StorageUnavailable(err.to_string())
    }
}

pub type BehaviorResult<T> = std::result::Result<T, BehaviorError>;
