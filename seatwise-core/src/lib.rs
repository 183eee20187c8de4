pub mod repository;

use seatwise_catalog::GridError;

pub use repository::{PassengerSource, SeatRepository};

/// Failure kinds of the assignment operations
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Seat not found: {0}")]
    SeatNotFound(String),
    #[error("Seat not available: {0}")]
    SeatNotAvailable(String),
    #[error("Assignment not found: {0}")]
    AssignmentNotFound(String),
    #[error("Duplicate assignment: {0}")]
    DuplicateAssignment(String),
    #[error("Invalid seat type: {0}")]
    InvalidSeatType(String),
    #[error("Persistence failure: {0}")]
    PersistenceFailure(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl EngineError {
    pub fn persistence(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        let err = err.into();
        tracing::error!("Persistence collaborator failed: {}", err);
        EngineError::PersistenceFailure(err)
    }

    /// Everything except persistence failures means the caller ignored derived seat status
    pub fn is_precondition(&self) -> bool {
        !matches!(self, EngineError::PersistenceFailure(_))
    }
}

impl From<GridError> for EngineError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::InvalidSeatType(value) => EngineError::InvalidSeatType(value),
            out_of_bounds @ GridError::OutOfBounds { .. } => {
                EngineError::SeatNotFound(out_of_bounds.to_string())
            }
            other => EngineError::SeatNotAvailable(other.to_string()),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
