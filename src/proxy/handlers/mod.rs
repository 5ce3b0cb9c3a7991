pub mod auth;
pub mod openverse;
pub mod users;
