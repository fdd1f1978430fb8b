use std::time::Duration;

use thiserror::Error;

/// Failure reported by an `AttendanceStore` backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[cfg(test)]
    #[error("store error: {0}")]
    Other(String),
}

/// Everything that can abort a reconciliation run.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("configuration document not found")]
    ConfigurationMissing,

    #[error("configuration document has no active block type")]
    BlockTypeMissing,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("shift {shift} has a malformed time value {value:?}")]
    MalformedTime { shift: String, value: String },

    #[error("reconciliation run exceeded {0:?}")]
    TimedOut(Duration),
}

impl ReconcileError {
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ReconcileError::ConfigurationMissing | ReconcileError::BlockTypeMissing
        )
    }
}
