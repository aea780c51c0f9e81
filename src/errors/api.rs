use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

use crate::errors::internal::{StoreError, TokenError};
use crate::types::dto::common::ErrorResponse;

/// API-facing error responses shared by every endpoint
#[derive(ApiResponse, Debug)]
pub enum ApiError {
    /// Request is invalid (duplicate username, bad reference)
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),

    /// Authentication is missing or was rejected
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// Authenticated, but the roles do not grant the operation
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// Requested resource does not exist
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    Internal(Json<ErrorResponse>),
}

impl ApiError {
    /// Create an Unauthorized error for requests carrying no credential
    pub fn unauthenticated() -> Self {
        ApiError::Unauthorized(Json(ErrorResponse {
            error: "unauthenticated".to_string(),
            message: "Not authenticated".to_string(),
            status_code: 401,
        }))
    }

    /// Create an Unauthorized error for rejected credentials
    ///
    /// One body for every credential failure: expired, malformed, forged
    /// and unknown-subject tokens (and bad logins) must be
    /// indistinguishable to the caller.
    pub fn invalid_credentials() -> Self {
        ApiError::Unauthorized(Json(ErrorResponse {
            error: "invalid_credentials".to_string(),
            message: "Invalid authentication credentials".to_string(),
            status_code: 401,
        }))
    }

    /// Create a Forbidden error
    pub fn forbidden() -> Self {
        ApiError::Forbidden(Json(ErrorResponse {
            error: "permission_denied".to_string(),
            message: "Permission denied.".to_string(),
            status_code: 403,
        }))
    }

    /// Create a NotFound error, e.g. `not_found("User")`
    pub fn not_found(entity: &str) -> Self {
        ApiError::NotFound(Json(ErrorResponse {
            error: "not_found".to_string(),
            message: format!("{} not found", entity),
            status_code: 404,
        }))
    }

    /// Create a BadRequest error
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(Json(ErrorResponse {
            error: "bad_request".to_string(),
            message: message.into(),
            status_code: 400,
        }))
    }

    /// Create an Internal error
    pub fn internal() -> Self {
        ApiError::Internal(Json(ErrorResponse {
            error: "internal_error".to_string(),
            message: "Internal server error".to_string(),
            status_code: 500,
        }))
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            ApiError::BadRequest(json) => json.0.message.clone(),
            ApiError::Unauthorized(json) => json.0.message.clone(),
            ApiError::Forbidden(json) => json.0.message.clone(),
            ApiError::NotFound(json) => json.0.message.clone(),
            ApiError::Internal(json) => json.0.message.clone(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUsername(_) => ApiError::bad_request("Username already exists"),
            StoreError::UserNotFound(_) => ApiError::not_found("User"),
            StoreError::RoleNotFound(_) => ApiError::not_found("Role"),
            StoreError::ItemNotFound(_) => ApiError::not_found("Item"),
            StoreError::Database { .. }
            | StoreError::UnknownRoleName(_)
            | StoreError::PasswordHash(_) => {
                tracing::error!(error = %err, "internal error while handling request");
                ApiError::internal()
            }
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Encode(_) => {
                tracing::error!(error = %err, "failed to issue token");
                ApiError::internal()
            }
            // Verification failures all collapse into the one generic body.
            TokenError::Expired | TokenError::Invalid(_) => ApiError::invalid_credentials(),
        }
    }
}
