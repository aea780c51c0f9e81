use poem_openapi::{
    param::{Path, Query},
    payload::Json,
    OpenApi, Tags,
};
use std::sync::Arc;

use crate::api::auth::BearerAuth;
use crate::auth::{AuthGate, Permission};
use crate::errors::api::ApiError;
use crate::stores::{UserStore, UserWithRoles};
use crate::types::dto::user::{
    CreateUserRequest, DeleteUserResponse, RoleResponse, UpdateUserRequest, UserResponse,
};

// Permissions each endpoint demands, checked before any other work
const CREATE_REQUIRES: &[Permission] = &[Permission::UserCreate];
const READ_REQUIRES: &[Permission] = &[Permission::UserRead];
const UPDATE_REQUIRES: &[Permission] = &[Permission::UserUpdate];
const DELETE_REQUIRES: &[Permission] = &[Permission::UserDelete];

const DEFAULT_LIST_LIMIT: u64 = 100;

/// User management API endpoints
pub struct UsersApi {
    user_store: Arc<UserStore>,
    gate: Arc<AuthGate>,
}

impl UsersApi {
    pub fn new(user_store: Arc<UserStore>, gate: Arc<AuthGate>) -> Self {
        Self { user_store, gate }
    }
}

/// API tags for user management endpoints
#[derive(Tags)]
enum UserTags {
    /// User management endpoints
    Users,
}

fn to_user_response(user: UserWithRoles) -> UserResponse {
    UserResponse {
        id: user.user.id,
        username: user.user.username,
        age: user.user.age,
        roles: user
            .roles
            .into_iter()
            .map(|role| RoleResponse {
                id: role.id,
                name: role.name,
            })
            .collect(),
    }
}

#[OpenApi]
impl UsersApi {
    /// Create a user with role assignments
    #[oai(path = "/users", method = "post", tag = "UserTags::Users")]
    async fn create_user(
        &self,
        auth: BearerAuth,
        body: Json<CreateUserRequest>,
    ) -> Result<Json<UserResponse>, ApiError> {
        self.gate
            .authorize(Some(&auth.0.token), CREATE_REQUIRES)
            .await?;

        let created = self
            .user_store
            .create(&body.username, &body.password, body.age, &body.role_ids)
            .await?;

        Ok(Json(to_user_response(created)))
    }

    /// List users
    #[oai(path = "/users", method = "get", tag = "UserTags::Users")]
    async fn list_users(
        &self,
        auth: BearerAuth,
        skip: Query<Option<u64>>,
        limit: Query<Option<u64>>,
    ) -> Result<Json<Vec<UserResponse>>, ApiError> {
        self.gate
            .authorize(Some(&auth.0.token), READ_REQUIRES)
            .await?;

        let skip = skip.0.unwrap_or(0);
        let limit = limit.0.unwrap_or(DEFAULT_LIST_LIMIT);

        let users = self.user_store.list(skip, limit).await?;

        Ok(Json(users.into_iter().map(to_user_response).collect()))
    }

    /// Fetch a single user
    #[oai(path = "/users/:user_id", method = "get", tag = "UserTags::Users")]
    async fn get_user(
        &self,
        auth: BearerAuth,
        user_id: Path<i32>,
    ) -> Result<Json<UserResponse>, ApiError> {
        self.gate
            .authorize(Some(&auth.0.token), READ_REQUIRES)
            .await?;

        let user = self
            .user_store
            .find_by_id(user_id.0)
            .await?
            .ok_or_else(|| ApiError::not_found("User"))?;

        Ok(Json(to_user_response(user)))
    }

    /// Replace a user's password, age and role assignments
    #[oai(path = "/users/:user_id", method = "put", tag = "UserTags::Users")]
    async fn update_user(
        &self,
        auth: BearerAuth,
        user_id: Path<i32>,
        body: Json<UpdateUserRequest>,
    ) -> Result<Json<UserResponse>, ApiError> {
        self.gate
            .authorize(Some(&auth.0.token), UPDATE_REQUIRES)
            .await?;

        let updated = self
            .user_store
            .update(user_id.0, &body.password, body.age, &body.role_ids)
            .await?;

        Ok(Json(to_user_response(updated)))
    }

    /// Delete a user along with their items and role assignments
    #[oai(path = "/users/:user_id", method = "delete", tag = "UserTags::Users")]
    async fn delete_user(
        &self,
        auth: BearerAuth,
        user_id: Path<i32>,
    ) -> Result<Json<DeleteUserResponse>, ApiError> {
        self.gate
            .authorize(Some(&auth.0.token), DELETE_REQUIRES)
            .await?;

        self.user_store.delete(user_id.0).await?;

        Ok(Json(DeleteUserResponse { user_id: user_id.0 }))
    }
}
