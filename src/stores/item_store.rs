use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, NotSet,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::errors::internal::StoreError;
use crate::types::db::item::{self, Entity as Item};

/// ItemStore manages inventory items.
///
/// Every query is scoped to the owning user; an item another user owns
/// is indistinguishable from one that does not exist.
pub struct ItemStore {
    db: DatabaseConnection,
}

impl ItemStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        owner_id: i32,
        title: &str,
        content: &str,
    ) -> Result<item::Model, StoreError> {
        let now = Utc::now().timestamp();

        let new_item = item::ActiveModel {
            id: NotSet,
            user_id: Set(owner_id),
            title: Set(title.to_string()),
            content: Set(content.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        new_item
            .insert(&self.db)
            .await
            .map_err(|e| StoreError::database("insert item", e))
    }

    /// List the owner's items in id order.
    pub async fn list(
        &self,
        owner_id: i32,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<item::Model>, StoreError> {
        Item::find()
            .filter(item::Column::UserId.eq(owner_id))
            .order_by_asc(item::Column::Id)
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| StoreError::database("list items", e))
    }

    pub async fn find(
        &self,
        owner_id: i32,
        item_id: i32,
    ) -> Result<Option<item::Model>, StoreError> {
        Item::find()
            .filter(item::Column::Id.eq(item_id))
            .filter(item::Column::UserId.eq(owner_id))
            .one(&self.db)
            .await
            .map_err(|e| StoreError::database("find item", e))
    }

    pub async fn update(
        &self,
        owner_id: i32,
        item_id: i32,
        title: &str,
        content: &str,
    ) -> Result<item::Model, StoreError> {
        let item = self
            .find(owner_id, item_id)
            .await?
            .ok_or(StoreError::ItemNotFound(item_id))?;

        let mut active: item::ActiveModel = item.into();
        active.title = Set(title.to_string());
        active.content = Set(content.to_string());
        active.updated_at = Set(Utc::now().timestamp());

        active
            .update(&self.db)
            .await
            .map_err(|e| StoreError::database("update item", e))
    }

    pub async fn delete(&self, owner_id: i32, item_id: i32) -> Result<(), StoreError> {
        let item = self
            .find(owner_id, item_id)
            .await?
            .ok_or(StoreError::ItemNotFound(item_id))?;

        item.delete(&self.db)
            .await
            .map_err(|e| StoreError::database("delete item", e))?;

        Ok(())
    }
}
