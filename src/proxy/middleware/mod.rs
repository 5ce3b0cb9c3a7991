// Middleware module - Axum middleware

pub mod auth;
pub mod cors;

pub use auth::{auth_middleware, SessionClaims, SessionManager};
pub use cors::cors_layer;
