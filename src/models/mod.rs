pub mod config;
pub mod media;
pub mod search;
pub mod user;

pub use config::AppConfig;
pub use media::{Audio, Image, MediaKind, MediaRecord, Paginated};
pub use search::{AudioSearchParams, ImageCategory, ImageSearchParams, License, MediaQuery};
pub use user::{
    LoginRequest, NewSavedSearch, RegisterRequest, SavedSearch, User, UserProfile,
};
