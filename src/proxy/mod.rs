// proxy module - Openverse gateway service

pub mod config;
pub mod handlers; // API endpoint handlers
pub mod middleware; // Axum middleware
pub mod server;
pub mod token_manager;
pub mod upstream; // Upstream client

pub use config::{OpenverseConfig, ProxyConfig};
pub use server::{AppState, AxumServer};
pub use token_manager::TokenManager;
