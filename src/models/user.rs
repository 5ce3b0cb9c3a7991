use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};
use crate::models::MediaKind;

const MIN_PASSWORD_LEN: usize = 6;

/// A search a user bookmarked for later
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSearch {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Map<String, Value>>,
    pub created_at: DateTime<Utc>,
}

/// Body of a save-search request
#[derive(Debug, Clone, Deserialize)]
pub struct NewSavedSearch {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub query: String,
    #[serde(default)]
    pub filters: Option<Map<String, Value>>,
}

impl NewSavedSearch {
    pub fn validate(&self) -> AppResult<()> {
        if self.query.trim().is_empty() {
            return Err(AppError::InvalidRequest("query should not be empty".to_string()));
        }
        Ok(())
    }

    pub fn into_saved(self, created_at: DateTime<Utc>) -> SavedSearch {
        SavedSearch {
            kind: self.kind,
            query: self.query,
            filters: self.filters,
            created_at,
        }
    }
}

/// Stored account, including the password hash
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub saved_searches: Vec<SavedSearch>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            saved_searches: self.saved_searches.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Account as shown to its owner; never carries the password hash
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub saved_searches: Vec<SavedSearch>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> AppResult<()> {
        let invalid = |msg: &str| Err(AppError::InvalidRequest(msg.to_string()));

        if self.first_name.trim().is_empty() {
            return invalid("firstName should not be empty");
        }
        if self.last_name.trim().is_empty() {
            return invalid("lastName should not be empty");
        }
        if !is_email(&self.email) {
            return invalid("email must be an email");
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return invalid("password must be longer than or equal to 6 characters");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> AppResult<()> {
        if !is_email(&self.email) {
            return Err(AppError::InvalidRequest("email must be an email".to_string()));
        }
        if self.password.is_empty() {
            return Err(AppError::InvalidRequest("password should not be empty".to_string()));
        }
        Ok(())
    }
}

/// `local@domain.tld` with no whitespace
fn is_email(raw: &str) -> bool {
    if raw.chars().any(char::is_whitespace) {
        return false;
    }
    match raw.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .map(|(host, tld)| !host.is_empty() && !tld.is_empty())
                    .unwrap_or(false)
        }
        None => false,
    }
}
