//! Operation error taxonomy shared by page actions and the REST API.
//!
//! Every fallible domain operation returns `Result<_, OpError>`. Handlers can
//! bubble these up with `?`; the `ResponseError` impl maps each variant to
//! the matching HTTP status and a JSON message body.

use crate::storage::StorageError;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use sea_orm::DbErr;
use serde_json::json;

#[derive(Debug)]
pub enum OpError {
    /// A required field is missing or malformed. Carries the offending field
    /// name so callers can surface a field-tagged message.
    Validation {
        field: &'static str,
        message: String,
    },
    /// The referenced record does not exist.
    NotFound(&'static str),
    /// The acting user is neither the owner nor an admin.
    PermissionDenied(&'static str),
    /// The underlying persistence call failed. No automatic retry.
    Storage(DbErr),
    /// The media store rejected or failed a file write.
    Upload(StorageError),
}

impl OpError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for OpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpError::Validation { field, message } => write!(f, "{}: {}", field, message),
            OpError::NotFound(what) => write!(f, "{} not found.", what),
            OpError::PermissionDenied(what) => {
                write!(f, "You do not have permission to {}.", what)
            }
            OpError::Storage(_) => write!(f, "A storage error occurred."),
            OpError::Upload(_) => write!(f, "A file upload error occurred."),
        }
    }
}

impl std::error::Error for OpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OpError::Storage(e) => Some(e),
            OpError::Upload(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DbErr> for OpError {
    fn from(e: DbErr) -> Self {
        OpError::Storage(e)
    }
}

impl From<StorageError> for OpError {
    fn from(e: StorageError) -> Self {
        OpError::Upload(e)
    }
}

impl ResponseError for OpError {
    fn status_code(&self) -> StatusCode {
        match self {
            OpError::Validation { .. } => StatusCode::BAD_REQUEST,
            OpError::NotFound(_) => StatusCode::NOT_FOUND,
            OpError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            OpError::Storage(_) | OpError::Upload(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            OpError::Storage(e) => log::error!("storage failure: {}", e),
            OpError::Upload(e) => log::error!("upload failure: {}", e),
            _ => {}
        }
        HttpResponse::build(self.status_code()).json(json!({ "message": self.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_field_tagged() {
        let err = OpError::validation("end_date", "End date must be after start date");
        assert_eq!(
            err.to_string(),
            "end_date: End date must be after start date"
        );
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(
            OpError::NotFound("Post").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            OpError::PermissionDenied("delete this post").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            OpError::Storage(DbErr::Custom("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
