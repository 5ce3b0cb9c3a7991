use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{LoginRequest, NewSavedSearch, RegisterRequest, SavedSearch, User};

pub const USERS_FILE: &str = "users.json";

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Account store keyed by user id.
///
/// Backed by a JSON file when `path` is set; every mutation rewrites the file
/// (temp file + rename) while the write lock is held.
pub struct UserStore {
    users: RwLock<HashMap<String, User>>,
    path: Option<PathBuf>,
    hash_cost: u32,
}

impl UserStore {
    /// Store that lives only as long as the process
    pub fn in_memory(hash_cost: u32) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            path: None,
            hash_cost,
        }
    }

    /// Load accounts from `path`, starting empty if it does not exist yet
    pub fn open(path: PathBuf, hash_cost: u32) -> AppResult<Self> {
        let users = if path.exists() {
            let content = fs::read_to_string(&path)?;
            let list: Vec<User> = serde_json::from_str(&content)?;
            tracing::info!("Loaded {} accounts from {:?}", list.len(), path);
            list.into_iter().map(|u| (u.id.clone(), u)).collect()
        } else {
            tracing::info!("No account file at {:?}, starting empty", path);
            HashMap::new()
        };

        Ok(Self {
            users: RwLock::new(users),
            path: Some(path),
            hash_cost,
        })
    }

    fn persist(&self, users: &HashMap<String, User>) -> AppResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let mut list: Vec<&User> = users.values().collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        let content = serde_json::to_string_pretty(&list)?;

        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// Register a new account. Emails are unique.
    pub async fn create(&self, request: RegisterRequest) -> AppResult<User> {
        request.validate()?;
        let password_hash = bcrypt::hash(&request.password, self.hash_cost)?;

        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == request.email) {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            password_hash,
            saved_searches: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        users.insert(user.id.clone(), user.clone());
        self.persist(&users)?;

        tracing::info!("Registered account {}", user.id);
        Ok(user)
    }

    /// Check an email/password pair. Every failure reads the same to the caller.
    pub async fn authenticate(&self, request: &LoginRequest) -> AppResult<User> {
        let user = {
            let users = self.users.read().await;
            users.values().find(|u| u.email == request.email).cloned()
        };

        let Some(user) = user else {
            tracing::debug!("Login failed: unknown email");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        match bcrypt::verify(&request.password, &user.password_hash) {
            Ok(true) => Ok(user),
            Ok(false) => {
                tracing::debug!("Login failed for {}: wrong password", user.id);
                Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))
            }
            Err(e) => {
                tracing::error!("Login failed for {}: {}", user.id, e);
                Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))
            }
        }
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<User> {
        self.users
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(user_not_found)
    }

    /// Append a saved search; returns the user's full list
    pub async fn add_saved_search(
        &self,
        user_id: &str,
        search: NewSavedSearch,
    ) -> AppResult<Vec<SavedSearch>> {
        search.validate()?;

        let mut users = self.users.write().await;
        let user = users.get_mut(user_id).ok_or_else(user_not_found)?;

        let now = Utc::now();
        user.saved_searches.push(search.into_saved(now));
        user.updated_at = now;
        let searches = user.saved_searches.clone();

        self.persist(&users)?;
        Ok(searches)
    }

    pub async fn saved_searches(&self, user_id: &str) -> AppResult<Vec<SavedSearch>> {
        Ok(self.find_by_id(user_id).await?.saved_searches)
    }

    /// Remove the saved search at `index`; returns the remaining list
    pub async fn delete_saved_search(
        &self,
        user_id: &str,
        index: i64,
    ) -> AppResult<Vec<SavedSearch>> {
        let mut users = self.users.write().await;
        let user = users.get_mut(user_id).ok_or_else(user_not_found)?;

        let position = usize::try_from(index)
            .ok()
            .filter(|i| *i < user.saved_searches.len())
            .ok_or_else(|| AppError::NotFound("Saved search not found".to_string()))?;

        user.saved_searches.remove(position);
        user.updated_at = Utc::now();
        let searches = user.saved_searches.clone();

        self.persist(&users)?;
        Ok(searches)
    }
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}
