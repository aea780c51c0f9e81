use thiserror::Error;

/// Internal error type for store operations
///
/// Never exposed over HTTP directly; the API layer converts these through
/// `From<StoreError> for ApiError` at the boundary.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database query or operation failed
    #[error("Database error: {operation} failed: {source}")]
    Database {
        operation: String,
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("User not found: {0}")]
    UserNotFound(i32),

    #[error("Role not found: {0}")]
    RoleNotFound(i32),

    #[error("Item not found: {0}")]
    ItemNotFound(i32),

    /// The roles table holds a name the binary does not know. Startup
    /// validation turns this into a hard failure.
    #[error("Unknown role name in database: {0}")]
    UnknownRoleName(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

impl StoreError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> StoreError {
        StoreError::Database {
            operation: operation.to_string(),
            source,
        }
    }
}

/// Internal error type for token issuance and verification
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Failed to encode token: {0}")]
    Encode(String),
}
