use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::ledger::LedgerError;

pub const ALREADY_VOTED: &str = "This account has already voted";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload")]
    MalformedPayload,

    #[error("{0}")]
    Validation(&'static str),

    #[error("Invalid email or password")]
    Authentication,

    #[error("This account has already voted")]
    AlreadyVoted,

    #[error("Internal error: {0}")]
    InternalError(#[from] LedgerError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MalformedPayload | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Authentication => StatusCode::UNAUTHORIZED,
            AppError::AlreadyVoted => StatusCode::CONFLICT,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match self {
            AppError::InternalError(e) => {
                error!("Ledger failure: {e}");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::MalformedPayload.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Validation("Please enter your password").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Authentication.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::AlreadyVoted.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_messages() {
        assert_eq!(AppError::AlreadyVoted.to_string(), ALREADY_VOTED);
        assert_eq!(AppError::Authentication.to_string(), INVALID_CREDENTIALS);
        assert_eq!(
            AppError::Validation("Please enter your email or phone").to_string(),
            "Please enter your email or phone"
        );
    }

    #[test]
    fn test_internal_errors_do_not_leak_details() {
        let corrupt = serde_json::from_str::<u32>("nope").unwrap_err();
        let response = AppError::from(LedgerError::Corrupt(corrupt)).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
