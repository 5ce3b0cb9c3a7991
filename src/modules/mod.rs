pub mod config;
pub mod logger;
pub mod oauth;
pub mod users;

pub use config::load_app_config;
pub use logger::init_logger;
pub use users::UserStore;
