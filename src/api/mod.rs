// API layer - HTTP endpoints
pub mod auth;
pub mod health;
pub mod items;
pub mod users;

pub use auth::{AuthApi, BearerAuth};
pub use health::HealthApi;
pub use items::ItemsApi;
pub use users::UsersApi;
