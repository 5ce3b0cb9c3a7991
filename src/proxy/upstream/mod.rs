// Upstream module - Openverse API client

pub mod client;

pub use client::OpenverseClient;
