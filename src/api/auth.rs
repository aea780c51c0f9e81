use poem_openapi::{auth::Bearer, payload::Json, OpenApi, SecurityScheme, Tags};
use std::sync::Arc;

use crate::auth::{AuthGate, PermissionRegistry};
use crate::errors::api::ApiError;
use crate::services::{crypto, TokenService};
use crate::stores::UserStore;
use crate::types::dto::auth::{LoginRequest, TokenResponse, WhoAmIResponse};

/// Authentication API endpoints
pub struct AuthApi {
    user_store: Arc<UserStore>,
    token_service: Arc<TokenService>,
    gate: Arc<AuthGate>,
    registry: Arc<PermissionRegistry>,
}

impl AuthApi {
    pub fn new(
        user_store: Arc<UserStore>,
        token_service: Arc<TokenService>,
        gate: Arc<AuthGate>,
        registry: Arc<PermissionRegistry>,
    ) -> Self {
        Self {
            user_store,
            token_service,
            gate,
            registry,
        }
    }
}

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(ty = "bearer", bearer_format = "JWT")]
pub struct BearerAuth(pub Bearer);

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Exchange username and password for a bearer token
    #[oai(path = "/token", method = "post", tag = "AuthTags::Authentication")]
    async fn token(&self, body: Json<LoginRequest>) -> Result<Json<TokenResponse>, ApiError> {
        let user = self
            .user_store
            .find_by_username_with_roles(&body.username)
            .await?
            .ok_or_else(ApiError::invalid_credentials)?;

        // Unknown username and wrong password get the same rejection
        if !crypto::verify_password(&body.password, &user.user.password_hash) {
            return Err(ApiError::invalid_credentials());
        }

        let access_token = self.token_service.issue(&user.user.username)?;

        Ok(Json(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.token_service.expires_in_secs(),
        }))
    }

    /// Report the caller's identity, roles and effective permissions
    #[oai(path = "/whoami", method = "get", tag = "AuthTags::Authentication")]
    async fn whoami(&self, auth: BearerAuth) -> Result<Json<WhoAmIResponse>, ApiError> {
        // Any authenticated user may ask who they are
        let current = self.gate.authorize(Some(&auth.0.token), &[]).await?;

        let mut permissions: Vec<String> = self
            .registry
            .granted_to(&current.roles)
            .into_iter()
            .map(|p| p.to_string())
            .collect();
        permissions.sort();

        let roles: Vec<String> = current.roles.iter().map(|r| r.to_string()).collect();

        Ok(Json(WhoAmIResponse {
            username: current.username,
            roles,
            permissions,
        }))
    }
}
