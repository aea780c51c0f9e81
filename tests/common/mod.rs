// Common test utilities for integration tests

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use stockroom_backend::auth::{AuthGate, PermissionRegistry, RoleKind};
use stockroom_backend::services::TokenService;
use stockroom_backend::stores::{ItemStore, RoleStore, UserStore};

pub const TEST_SECRET: &str = "test-secret-key-minimum-32-characters-long";

/// Fully wired application state backed by an in-memory database.
pub struct TestApp {
    pub db: DatabaseConnection,
    pub registry: Arc<PermissionRegistry>,
    pub token_service: Arc<TokenService>,
    pub role_store: Arc<RoleStore>,
    pub user_store: Arc<UserStore>,
    pub item_store: Arc<ItemStore>,
    pub gate: Arc<AuthGate>,
}

pub async fn setup_test_app() -> TestApp {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let registry = Arc::new(PermissionRegistry::builtin());
    let token_service = Arc::new(TokenService::new(TEST_SECRET.to_string(), 480));
    let role_store = Arc::new(RoleStore::new(db.clone()));
    let user_store = Arc::new(UserStore::new(db.clone(), role_store.clone()));
    let item_store = Arc::new(ItemStore::new(db.clone()));
    let gate = Arc::new(AuthGate::new(
        token_service.clone(),
        user_store.clone(),
        registry.clone(),
    ));

    TestApp {
        db,
        registry,
        token_service,
        role_store,
        user_store,
        item_store,
        gate,
    }
}

impl TestApp {
    /// Create a user holding the given role; returns their id and a fresh token.
    pub async fn seed_user_with_role(
        &self,
        username: &str,
        password: &str,
        role: RoleKind,
    ) -> (i32, String) {
        let role_row = self
            .role_store
            .find_by_name(role)
            .await
            .expect("Failed to query role")
            .expect("Role not seeded");

        let created = self
            .user_store
            .create(username, password, None, &[role_row.id])
            .await
            .expect("Failed to create user");

        let token = self
            .token_service
            .issue(username)
            .expect("Failed to issue token");

        (created.user.id, token)
    }

    pub async fn role_id(&self, role: RoleKind) -> i32 {
        self.role_store
            .find_by_name(role)
            .await
            .expect("Failed to query role")
            .expect("Role not seeded")
            .id
    }
}
