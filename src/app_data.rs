use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::auth::{AuthGate, PermissionRegistry};
use crate::config::Settings;
use crate::errors::internal::StoreError;
use crate::services::TokenService;
use crate::stores::{ItemStore, RoleStore, UserStore};

/// Centralized application data following the main-owned stores pattern
///
/// All dependencies are created once in main.rs and shared across the API
/// structs. The database must be connected and migrated before `init`.
pub struct AppData {
    pub db: DatabaseConnection,
    pub registry: Arc<PermissionRegistry>,
    pub token_service: Arc<TokenService>,
    pub role_store: Arc<RoleStore>,
    pub user_store: Arc<UserStore>,
    pub item_store: Arc<ItemStore>,
    pub gate: Arc<AuthGate>,
}

impl AppData {
    /// Initialize all application data.
    ///
    /// Validates that every role name in the database parses into a
    /// compiled role kind; a mismatch aborts startup rather than letting
    /// authorization silently mis-resolve later.
    pub async fn init(db: DatabaseConnection, settings: &Settings) -> Result<Self, StoreError> {
        tracing::info!("Initializing AppData...");

        let registry = Arc::new(PermissionRegistry::builtin());

        let token_service = Arc::new(TokenService::new(
            settings.token_secret.clone(),
            settings.token_expire_minutes,
        ));

        tracing::debug!("Creating stores...");
        let role_store = Arc::new(RoleStore::new(db.clone()));
        role_store.validate_role_names().await?;

        let user_store = Arc::new(UserStore::new(db.clone(), role_store.clone()));
        let item_store = Arc::new(ItemStore::new(db.clone()));

        let gate = Arc::new(AuthGate::new(
            token_service.clone(),
            user_store.clone(),
            registry.clone(),
        ));

        tracing::info!("AppData initialization complete");

        Ok(Self {
            db,
            registry,
            token_service,
            role_store,
            user_store,
            item_store,
            gate,
        })
    }
}
