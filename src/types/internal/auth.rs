use serde::{Deserialize, Serialize};

use crate::auth::permissions::RoleKind;

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Identity resolved by the authentication gate.
///
/// Handlers receive this after the gate has verified the token, resolved
/// the subject and checked the required permissions.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i32,
    pub username: String,
    pub roles: Vec<RoleKind>,
}
