use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Request model for token issuance
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username for authentication
    pub username: String,

    /// Password for authentication
    pub password: String,
}

/// Response model containing the issued access token
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Number of seconds until the access token expires
    pub expires_in: i64,
}

/// Response model for whoami endpoint
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct WhoAmIResponse {
    /// Username of the authenticated caller
    pub username: String,

    /// Role names held by the caller
    pub roles: Vec<String>,

    /// Effective permissions granted by those roles, sorted
    pub permissions: Vec<String>,
}
