use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::item;

/// Request model for creating a new item
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreateItemRequest {
    /// Title of the item (1-100 characters)
    #[oai(validator(min_length = 1, max_length = 100))]
    pub title: String,

    /// Free-form content
    pub content: String,
}

/// Request model for updating an item
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UpdateItemRequest {
    /// Title of the item (1-100 characters)
    #[oai(validator(min_length = 1, max_length = 100))]
    pub title: String,

    /// Free-form content
    pub content: String,
}

/// Item as exposed over the API
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ItemResponse {
    pub id: i32,

    pub title: String,

    pub content: String,
}

/// Response model for item deletion
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct DeleteItemResponse {
    /// Id of the deleted item
    pub item_id: i32,
}

impl From<item::Model> for ItemResponse {
    fn from(item: item::Model) -> Self {
        Self {
            id: item.id,
            title: item.title,
            content: item.content,
        }
    }
}
