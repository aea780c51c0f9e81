use poem_openapi::{
    param::{Path, Query},
    payload::Json,
    OpenApi, Tags,
};
use std::sync::Arc;

use crate::api::auth::BearerAuth;
use crate::auth::{AuthGate, Permission};
use crate::errors::api::ApiError;
use crate::stores::ItemStore;
use crate::types::dto::items::{
    CreateItemRequest, DeleteItemResponse, ItemResponse, UpdateItemRequest,
};

// Permissions each endpoint demands, checked before any other work
const CREATE_REQUIRES: &[Permission] = &[Permission::ItemCreate];
const READ_REQUIRES: &[Permission] = &[Permission::ItemRead];
const UPDATE_REQUIRES: &[Permission] = &[Permission::ItemUpdate];
const DELETE_REQUIRES: &[Permission] = &[Permission::ItemDelete];

const DEFAULT_LIST_LIMIT: u64 = 100;

/// Item management API endpoints
///
/// Items are private to their owner. The permission check settles whether
/// the caller may use the endpoint at all; the store's owner scoping
/// settles which rows they can reach.
pub struct ItemsApi {
    item_store: Arc<ItemStore>,
    gate: Arc<AuthGate>,
}

impl ItemsApi {
    pub fn new(item_store: Arc<ItemStore>, gate: Arc<AuthGate>) -> Self {
        Self { item_store, gate }
    }
}

/// API tags for item endpoints
#[derive(Tags)]
enum ItemTags {
    /// Item management endpoints
    Items,
}

#[OpenApi]
impl ItemsApi {
    /// Create an item owned by the caller
    #[oai(path = "/items", method = "post", tag = "ItemTags::Items")]
    async fn create_item(
        &self,
        auth: BearerAuth,
        body: Json<CreateItemRequest>,
    ) -> Result<Json<ItemResponse>, ApiError> {
        let current = self
            .gate
            .authorize(Some(&auth.0.token), CREATE_REQUIRES)
            .await?;

        let item = self
            .item_store
            .create(current.id, &body.title, &body.content)
            .await?;

        Ok(Json(ItemResponse::from(item)))
    }

    /// List the caller's items
    #[oai(path = "/items", method = "get", tag = "ItemTags::Items")]
    async fn list_items(
        &self,
        auth: BearerAuth,
        skip: Query<Option<u64>>,
        limit: Query<Option<u64>>,
    ) -> Result<Json<Vec<ItemResponse>>, ApiError> {
        let current = self
            .gate
            .authorize(Some(&auth.0.token), READ_REQUIRES)
            .await?;

        let skip = skip.0.unwrap_or(0);
        let limit = limit.0.unwrap_or(DEFAULT_LIST_LIMIT);

        let items = self.item_store.list(current.id, skip, limit).await?;

        Ok(Json(items.into_iter().map(ItemResponse::from).collect()))
    }

    /// Fetch one of the caller's items
    #[oai(path = "/items/:item_id", method = "get", tag = "ItemTags::Items")]
    async fn get_item(
        &self,
        auth: BearerAuth,
        item_id: Path<i32>,
    ) -> Result<Json<ItemResponse>, ApiError> {
        let current = self
            .gate
            .authorize(Some(&auth.0.token), READ_REQUIRES)
            .await?;

        let item = self
            .item_store
            .find(current.id, item_id.0)
            .await?
            .ok_or_else(|| ApiError::not_found("Item"))?;

        Ok(Json(ItemResponse::from(item)))
    }

    /// Replace one of the caller's items
    #[oai(path = "/items/:item_id", method = "put", tag = "ItemTags::Items")]
    async fn update_item(
        &self,
        auth: BearerAuth,
        item_id: Path<i32>,
        body: Json<UpdateItemRequest>,
    ) -> Result<Json<ItemResponse>, ApiError> {
        let current = self
            .gate
            .authorize(Some(&auth.0.token), UPDATE_REQUIRES)
            .await?;

        let item = self
            .item_store
            .update(current.id, item_id.0, &body.title, &body.content)
            .await?;

        Ok(Json(ItemResponse::from(item)))
    }

    /// Delete one of the caller's items
    #[oai(path = "/items/:item_id", method = "delete", tag = "ItemTags::Items")]
    async fn delete_item(
        &self,
        auth: BearerAuth,
        item_id: Path<i32>,
    ) -> Result<Json<DeleteItemResponse>, ApiError> {
        let current = self
            .gate
            .authorize(Some(&auth.0.token), DELETE_REQUIRES)
            .await?;

        self.item_store.delete(current.id, item_id.0).await?;

        Ok(Json(DeleteItemResponse { item_id: item_id.0 }))
    }
}
