use crate::target::TargetKind;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the vote and comment subsystem.
///
/// Uniqueness races on vote casts are not represented here; they are
/// recovered inside the vote store and never reach the caller.
#[derive(Debug, Error)]
pub enum ForumError {
    #[error("{0} not found.")]
    NotFound(TargetKind),
    #[error("{0}")]
    Validation(String),
    #[error("Authentication required.")]
    Unauthorized,
    #[error("You do not have permission to modify this {0}.")]
    Forbidden(&'static str),
    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),
}

impl ResponseError for ForumError {
    fn status_code(&self) -> StatusCode {
        match self {
            ForumError::NotFound(_) => StatusCode::NOT_FOUND,
            ForumError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ForumError::Unauthorized => StatusCode::UNAUTHORIZED,
            ForumError::Forbidden(_) => StatusCode::FORBIDDEN,
            ForumError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Database details stay in the log, not the response body.
        let message = match self {
            ForumError::Db(err) => {
                log::error!("database error: {}", err);
                "Internal server error.".to_owned()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}
