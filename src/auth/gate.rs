use std::sync::Arc;

use crate::auth::permissions::{Permission, PermissionRegistry};
use crate::errors::api::ApiError;
use crate::services::TokenService;
use crate::stores::UserStore;
use crate::types::internal::auth::CurrentUser;

/// Request authorization gate.
///
/// Every protected handler declares its required permissions as a const
/// slice and calls [`AuthGate::authorize`] as its first statement. The gate
/// walks a fixed ladder, exactly once per request:
///
/// 1. no token presented -> 401
/// 2. token fails verification (malformed, forged, expired, no subject) -> 401
/// 3. subject matches no user -> 401, same body as step 2
/// 4. the user's roles do not grant the required permissions -> 403
/// 5. otherwise the resolved identity is handed to the handler
///
/// Database failures while resolving the subject are infrastructure
/// errors, not authentication outcomes; they surface as 500.
pub struct AuthGate {
    token_service: Arc<TokenService>,
    user_store: Arc<UserStore>,
    registry: Arc<PermissionRegistry>,
}

impl AuthGate {
    pub fn new(
        token_service: Arc<TokenService>,
        user_store: Arc<UserStore>,
        registry: Arc<PermissionRegistry>,
    ) -> Self {
        Self {
            token_service,
            user_store,
            registry,
        }
    }

    pub async fn authorize(
        &self,
        token: Option<&str>,
        required: &[Permission],
    ) -> Result<CurrentUser, ApiError> {
        let token = match token {
            Some(token) => token,
            None => {
                tracing::debug!("request rejected: no bearer token presented");
                return Err(ApiError::unauthenticated());
            }
        };

        let claims = match self.token_service.verify(token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "request rejected: token verification failed");
                return Err(ApiError::invalid_credentials());
            }
        };

        let user = match self
            .user_store
            .find_by_username_with_roles(&claims.sub)
            .await?
        {
            Some(user) => user,
            None => {
                // Same body as a bad token so callers cannot probe which
                // usernames exist.
                tracing::debug!("request rejected: token subject matches no user");
                return Err(ApiError::invalid_credentials());
            }
        };

        let roles = user.role_kinds()?;
        if !self.registry.authorizes(&roles, required) {
            tracing::debug!(
                username = %user.user.username,
                "request rejected: roles do not grant required permissions"
            );
            return Err(ApiError::forbidden());
        }

        Ok(CurrentUser {
            id: user.user.id,
            username: user.user.username,
            roles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::permissions::RoleKind;
    use crate::stores::RoleStore;
    use crate::types::internal::auth::Claims;
    use chrono::Utc;
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    const TEST_SECRET: &str = "test-secret-key-minimum-32-characters-long";

    async fn setup_gate() -> (AuthGate, Arc<UserStore>, Arc<RoleStore>, Arc<TokenService>) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let token_service = Arc::new(TokenService::new(TEST_SECRET.to_string(), 60));
        let role_store = Arc::new(RoleStore::new(db.clone()));
        let user_store = Arc::new(UserStore::new(db.clone(), role_store.clone()));
        let registry = Arc::new(PermissionRegistry::builtin());

        let gate = AuthGate::new(token_service.clone(), user_store.clone(), registry);

        (gate, user_store, role_store, token_service)
    }

    async fn seed_user(
        user_store: &UserStore,
        role_store: &RoleStore,
        username: &str,
        role: RoleKind,
    ) {
        let role_row = role_store
            .find_by_name(role)
            .await
            .expect("Failed to query role")
            .expect("Role not seeded");

        user_store
            .create(username, "password123", None, &[role_row.id])
            .await
            .expect("Failed to create user");
    }

    fn unauthorized_body(err: &ApiError) -> (String, String) {
        match err {
            ApiError::Unauthorized(json) => (json.0.error.clone(), json.0.message.clone()),
            other => panic!("Expected Unauthorized, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_token_is_rejected_with_401() {
        let (gate, _, _, _) = setup_gate().await;

        let result = gate.authorize(None, &[Permission::ItemRead]).await;

        match result {
            Err(ApiError::Unauthorized(_)) => {}
            other => panic!("Expected Unauthorized, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_valid_admin_token_passes_mixed_check() {
        let (gate, user_store, role_store, token_service) = setup_gate().await;
        seed_user(&user_store, &role_store, "admin", RoleKind::SystemAdmin).await;
        let token = token_service.issue("admin").unwrap();

        let current = gate
            .authorize(
                Some(&token),
                &[Permission::UserCreate, Permission::ItemDelete],
            )
            .await
            .expect("admin should pass");

        assert_eq!(current.username, "admin");
        assert_eq!(current.roles, vec![RoleKind::SystemAdmin]);
    }

    #[tokio::test]
    async fn test_operator_gets_403_not_401_for_user_create() {
        let (gate, user_store, role_store, token_service) = setup_gate().await;
        seed_user(&user_store, &role_store, "operator", RoleKind::LocationOperator).await;
        let token = token_service.issue("operator").unwrap();

        let result = gate.authorize(Some(&token), &[Permission::UserCreate]).await;

        match result {
            Err(ApiError::Forbidden(_)) => {}
            other => panic!("Expected Forbidden, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_operator_still_passes_item_checks() {
        let (gate, user_store, role_store, token_service) = setup_gate().await;
        seed_user(&user_store, &role_store, "operator", RoleKind::LocationOperator).await;
        let token = token_service.issue("operator").unwrap();

        let result = gate
            .authorize(Some(&token), &[Permission::ItemCreate, Permission::ItemRead])
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_expired_token_and_forged_token_get_identical_401() {
        let (gate, user_store, role_store, _) = setup_gate().await;
        seed_user(&user_store, &role_store, "admin", RoleKind::SystemAdmin).await;

        // Well-formed, correctly signed, but expired beyond the leeway.
        let now = Utc::now().timestamp();
        let expired_claims = Claims {
            sub: "admin".to_string(),
            exp: now - 3600,
            iat: now - 7200,
        };
        let expired_token = encode(
            &Header::new(Algorithm::HS256),
            &expired_claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        // Signed with a different secret.
        let forged_token = encode(
            &Header::new(Algorithm::HS256),
            &Claims {
                sub: "admin".to_string(),
                exp: now + 3600,
                iat: now,
            },
            &EncodingKey::from_secret(b"wrong-secret-key-minimum-32-chars"),
        )
        .unwrap();

        let expired_err = gate
            .authorize(Some(&expired_token), &[Permission::ItemRead])
            .await
            .unwrap_err();
        let forged_err = gate
            .authorize(Some(&forged_token), &[Permission::ItemRead])
            .await
            .unwrap_err();

        assert_eq!(unauthorized_body(&expired_err), unauthorized_body(&forged_err));
    }

    #[tokio::test]
    async fn test_valid_token_for_unknown_subject_gets_same_401() {
        let (gate, user_store, role_store, token_service) = setup_gate().await;
        seed_user(&user_store, &role_store, "admin", RoleKind::SystemAdmin).await;

        // Correctly signed and unexpired, but nobody by that name exists.
        let ghost_token = token_service.issue("ghost").unwrap();
        let forged_token = "not-even-a-jwt";

        let ghost_err = gate
            .authorize(Some(&ghost_token), &[Permission::ItemRead])
            .await
            .unwrap_err();
        let forged_err = gate
            .authorize(Some(forged_token), &[Permission::ItemRead])
            .await
            .unwrap_err();

        assert_eq!(unauthorized_body(&ghost_err), unauthorized_body(&forged_err));
    }

    #[tokio::test]
    async fn test_empty_required_set_admits_any_authenticated_user() {
        let (gate, user_store, _, token_service) = setup_gate().await;

        // A user with no roles at all still passes a vacuous check.
        user_store
            .create("roleless", "password123", None, &[])
            .await
            .expect("Failed to create user");
        let token = token_service.issue("roleless").unwrap();

        let current = gate.authorize(Some(&token), &[]).await.expect("vacuous pass");

        assert_eq!(current.username, "roleless");
        assert!(current.roles.is_empty());
    }

    #[tokio::test]
    async fn test_roleless_user_fails_any_nonempty_check() {
        let (gate, user_store, _, token_service) = setup_gate().await;
        user_store
            .create("roleless", "password123", None, &[])
            .await
            .expect("Failed to create user");
        let token = token_service.issue("roleless").unwrap();

        let result = gate.authorize(Some(&token), &[Permission::ItemRead]).await;

        match result {
            Err(ApiError::Forbidden(_)) => {}
            other => panic!("Expected Forbidden, got {:?}", other),
        }
    }
}
