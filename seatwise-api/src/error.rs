use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use seatwise_core::EngineError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    NotFoundError(String),
    #[error("{0}")]
    ConflictError(String),
    #[error("{0}")]
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "operation failed, try again".to_string())
            },
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::SeatNotFound(_) | EngineError::AssignmentNotFound(_) => {
                AppError::NotFoundError(err.to_string())
            }
            EngineError::SeatNotAvailable(_) | EngineError::DuplicateAssignment(_) => {
                AppError::ConflictError(err.to_string())
            }
            EngineError::InvalidSeatType(_) => AppError::ValidationError(err.to_string()),
            EngineError::PersistenceFailure(_) => AppError::InternalServerError(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_status_codes() {
        let cases = [
            (EngineError::SeatNotFound("x".into()), StatusCode::NOT_FOUND),
            (EngineError::AssignmentNotFound("x".into()), StatusCode::NOT_FOUND),
            (EngineError::SeatNotAvailable("x".into()), StatusCode::CONFLICT),
            (EngineError::DuplicateAssignment("x".into()), StatusCode::CONFLICT),
            (EngineError::InvalidSeatType("x".into()), StatusCode::BAD_REQUEST),
            (EngineError::PersistenceFailure("disk full".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(AppError::from(err).into_response().status(), expected);
        }
    }
}
