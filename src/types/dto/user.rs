use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Role as exposed over the API
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RoleResponse {
    pub id: i32,

    /// Role name (SYSTEM_ADMIN, LOCATION_ADMIN or LOCATION_OPERATOR)
    pub name: String,
}

/// Request model for creating a user
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,

    /// Plaintext password, hashed before storage
    pub password: String,

    pub age: Option<i32>,

    /// Ids of the roles to assign
    pub role_ids: Vec<i32>,
}

/// Request model for updating a user
///
/// Replaces password, age and role assignments wholesale.
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub password: String,

    pub age: Option<i32>,

    /// Ids of the roles to assign, replacing the current set
    pub role_ids: Vec<i32>,
}

/// User as exposed over the API. Never carries the password hash.
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i32,

    pub username: String,

    pub age: Option<i32>,

    /// Roles assigned to the user
    pub roles: Vec<RoleResponse>,
}

/// Response model for user deletion
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct DeleteUserResponse {
    /// Id of the deleted user
    pub user_id: i32,
}
