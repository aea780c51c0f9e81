// Database entities - SeaORM models
pub mod item;
pub mod role;
pub mod user;
pub mod user_role;
