// Stores layer - Data access and repository pattern
pub mod item_store;
pub mod role_store;
pub mod user_store;

pub use item_store::ItemStore;
pub use role_store::RoleStore;
pub use user_store::{UserStore, UserWithRoles};
