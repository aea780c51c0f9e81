use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, NotSet,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::auth::permissions::RoleKind;
use crate::errors::internal::StoreError;
use crate::services::crypto;
use crate::stores::RoleStore;
use crate::types::db::item::{self, Entity as Item};
use crate::types::db::role;
use crate::types::db::user::{self, Entity as User};
use crate::types::db::user_role::{self, Entity as UserRole};

/// A user row together with its resolved role rows.
#[derive(Debug, Clone)]
pub struct UserWithRoles {
    pub user: user::Model,
    pub roles: Vec<role::Model>,
}

impl UserWithRoles {
    /// Parse the attached role rows into role kinds.
    ///
    /// Fails if the table holds a name the binary does not know; startup
    /// validation makes that unreachable in a healthy deployment.
    pub fn role_kinds(&self) -> Result<Vec<RoleKind>, StoreError> {
        self.roles
            .iter()
            .map(|role| {
                RoleKind::parse(&role.name)
                    .ok_or_else(|| StoreError::UnknownRoleName(role.name.clone()))
            })
            .collect()
    }
}

/// UserStore manages user accounts and their role assignments.
pub struct UserStore {
    db: DatabaseConnection,
    role_store: Arc<RoleStore>,
}

impl UserStore {
    pub fn new(db: DatabaseConnection, role_store: Arc<RoleStore>) -> Self {
        Self { db, role_store }
    }

    /// Create a user with the given role assignments.
    ///
    /// The password is hashed before storage. The user row and its
    /// user_roles rows are written in one transaction.
    pub async fn create(
        &self,
        username: &str,
        password: &str,
        age: Option<i32>,
        role_ids: &[i32],
    ) -> Result<UserWithRoles, StoreError> {
        let existing = User::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| StoreError::database("check username availability", e))?;

        if existing.is_some() {
            return Err(StoreError::DuplicateUsername(username.to_string()));
        }

        let roles = self.role_store.find_by_ids(role_ids).await?;
        let password_hash = crypto::hash_password(password)?;
        let now = Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| StoreError::database("begin create user transaction", e))?;

        let new_user = user::ActiveModel {
            id: NotSet,
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            age: Set(age),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let user = new_user.insert(&txn).await.map_err(|e| {
            // Races between the availability check and the insert land here
            if e.to_string().contains("UNIQUE") {
                StoreError::DuplicateUsername(username.to_string())
            } else {
                StoreError::database("insert user", e)
            }
        })?;

        for role in &roles {
            user_role::ActiveModel {
                id: NotSet,
                user_id: Set(user.id),
                role_id: Set(role.id),
                created_at: Set(now),
            }
            .insert(&txn)
            .await
            .map_err(|e| StoreError::database("insert user role", e))?;
        }

        txn.commit()
            .await
            .map_err(|e| StoreError::database("commit create user transaction", e))?;

        Ok(UserWithRoles { user, roles })
    }

    /// List users in id order, with their roles.
    pub async fn list(&self, skip: u64, limit: u64) -> Result<Vec<UserWithRoles>, StoreError> {
        let users = User::find()
            .order_by_asc(user::Column::Id)
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| StoreError::database("list users", e))?;

        let mut result = Vec::with_capacity(users.len());
        for user in users {
            let roles = self.roles_of(&user).await?;
            result.push(UserWithRoles { user, roles });
        }

        Ok(result)
    }

    pub async fn find_by_id(&self, user_id: i32) -> Result<Option<UserWithRoles>, StoreError> {
        let user = User::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| StoreError::database("find user by id", e))?;

        match user {
            Some(user) => {
                let roles = self.roles_of(&user).await?;
                Ok(Some(UserWithRoles { user, roles }))
            }
            None => Ok(None),
        }
    }

    /// Look up a user by username, with roles attached.
    ///
    /// This is the lookup the request gate runs for every authenticated
    /// request, so it stays a single indexed query plus the role join.
    pub async fn find_by_username_with_roles(
        &self,
        username: &str,
    ) -> Result<Option<UserWithRoles>, StoreError> {
        let user = User::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| StoreError::database("find user by username", e))?;

        match user {
            Some(user) => {
                let roles = self.roles_of(&user).await?;
                Ok(Some(UserWithRoles { user, roles }))
            }
            None => Ok(None),
        }
    }

    /// Replace a user's password, age and role assignments.
    ///
    /// The role set is replaced wholesale: existing user_roles rows are
    /// deleted and the new set inserted, in one transaction with the
    /// user row update.
    pub async fn update(
        &self,
        user_id: i32,
        password: &str,
        age: Option<i32>,
        role_ids: &[i32],
    ) -> Result<UserWithRoles, StoreError> {
        let user = User::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| StoreError::database("find user by id", e))?
            .ok_or(StoreError::UserNotFound(user_id))?;

        let roles = self.role_store.find_by_ids(role_ids).await?;
        let password_hash = crypto::hash_password(password)?;
        let now = Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| StoreError::database("begin update user transaction", e))?;

        let mut active: user::ActiveModel = user.into();
        active.password_hash = Set(password_hash);
        active.age = Set(age);
        active.updated_at = Set(now);

        let user = active
            .update(&txn)
            .await
            .map_err(|e| StoreError::database("update user", e))?;

        UserRole::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(|e| StoreError::database("clear user roles", e))?;

        for role in &roles {
            user_role::ActiveModel {
                id: NotSet,
                user_id: Set(user_id),
                role_id: Set(role.id),
                created_at: Set(now),
            }
            .insert(&txn)
            .await
            .map_err(|e| StoreError::database("insert user role", e))?;
        }

        txn.commit()
            .await
            .map_err(|e| StoreError::database("commit update user transaction", e))?;

        Ok(UserWithRoles { user, roles })
    }

    /// Delete a user along with their items and role assignments.
    pub async fn delete(&self, user_id: i32) -> Result<(), StoreError> {
        let user = User::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| StoreError::database("find user by id", e))?
            .ok_or(StoreError::UserNotFound(user_id))?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| StoreError::database("begin delete user transaction", e))?;

        Item::delete_many()
            .filter(item::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(|e| StoreError::database("delete user items", e))?;

        UserRole::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(|e| StoreError::database("delete user roles", e))?;

        user.delete(&txn)
            .await
            .map_err(|e| StoreError::database("delete user", e))?;

        txn.commit()
            .await
            .map_err(|e| StoreError::database("commit delete user transaction", e))?;

        Ok(())
    }

    async fn roles_of(&self, user: &user::Model) -> Result<Vec<role::Model>, StoreError> {
        user.find_related(role::Entity)
            .order_by_asc(role::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| StoreError::database("load user roles", e))
    }
}
