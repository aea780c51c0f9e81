use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::auth::permissions::RoleKind;
use crate::errors::internal::StoreError;
use crate::types::db::role::{self, Entity as Role};

/// Read-only access to the seeded roles table.
///
/// Role rows are created by migration and never written at runtime; this
/// store only resolves them for user assignment and authorization.
pub struct RoleStore {
    db: DatabaseConnection,
}

impl RoleStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// All roles, in id order.
    pub async fn all(&self) -> Result<Vec<role::Model>, StoreError> {
        Role::find()
            .order_by_asc(role::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| StoreError::database("list roles", e))
    }

    /// Resolve role ids into rows, preserving the requested order.
    ///
    /// Fails on the first id with no matching row so a user assignment
    /// never silently drops a role.
    pub async fn find_by_ids(&self, role_ids: &[i32]) -> Result<Vec<role::Model>, StoreError> {
        let mut roles = Vec::with_capacity(role_ids.len());

        for role_id in role_ids {
            let role = Role::find_by_id(*role_id)
                .one(&self.db)
                .await
                .map_err(|e| StoreError::database("find role by id", e))?
                .ok_or(StoreError::RoleNotFound(*role_id))?;
            roles.push(role);
        }

        Ok(roles)
    }

    pub async fn find_by_name(&self, role: RoleKind) -> Result<Option<role::Model>, StoreError> {
        Role::find()
            .filter(role::Column::Name.eq(role.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| StoreError::database("find role by name", e))
    }

    /// Startup check that the roles table and the binary agree.
    ///
    /// A row whose name the binary cannot parse is a hard failure; a known
    /// role missing its row only warns, since no user can reference it.
    pub async fn validate_role_names(&self) -> Result<(), StoreError> {
        let rows = self.all().await?;

        for row in &rows {
            if RoleKind::parse(&row.name).is_none() {
                return Err(StoreError::UnknownRoleName(row.name.clone()));
            }
        }

        for kind in RoleKind::ALL {
            if !rows.iter().any(|row| row.name == kind.as_str()) {
                tracing::warn!(role = %kind, "role missing from roles table, nobody can hold it");
            }
        }

        Ok(())
    }
}
