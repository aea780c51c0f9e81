// Internal types never exposed over the API
pub mod auth;
