//! Errors surfaced by request handlers.

use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::Request;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] lettings_store::Error),

    /// Admin declarations referring to fields that do not exist.
    #[error("admin misconfigured: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> Status {
        match self {
            Self::Store(err) if err.is_validation() => Status::UnprocessableEntity,
            _ => Status::InternalServerError,
        }
    }
}

/// Logs the error and hands the status to the matching catcher, so the body
/// never carries internal details.
impl<'r> Responder<'r, 'static> for AppError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        if status == Status::InternalServerError {
            tracing::error!(error = %self, uri = %request.uri(), "request failed");
        } else {
            tracing::warn!(error = %self, uri = %request.uri(), "request rejected");
        }
        Err(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lettings_store::prelude::ValidationErrors;

    #[test]
    fn validation_maps_to_unprocessable() {
        let mut errors = ValidationErrors::new();
        errors.add("number", "Ensure this value is less than or equal to 9999.");
        let err = AppError::from(lettings_store::Error::from(errors));
        assert_eq!(err.status(), Status::UnprocessableEntity);
        assert_eq!(
            AppError::Internal("boom".into()).status(),
            Status::InternalServerError
        );
    }
}
