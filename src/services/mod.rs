// Services layer - Business logic and orchestration
pub mod crypto;
pub mod token_service;

pub use token_service::TokenService;
