//! Errors surfaced by measurement requests.

use thiserror::Error;

use crate::store::StoreError;

/// Crate result type.
pub type Result<T> = std::result::Result<T, MeasureError>;

/// Terminal failure of a calculation or history request.
///
/// None of these are retried internally; the caller owns retry policy.
#[derive(Debug, Error)]
pub enum MeasureError {
    /// Input is missing, not a sequence of pairs, or too short.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Area or perimeter came out non-finite.
    #[error("computation failed: {0}")]
    Computation(String),

    /// The store rejected an append or a recent-history read.
    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),
}

impl MeasureError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        MeasureError::Validation(msg.into())
    }

    /// True for caller mistakes (as opposed to server-side faults).
    pub fn is_client_error(&self) -> bool {
        matches!(self, MeasureError::Validation(_))
    }
}
