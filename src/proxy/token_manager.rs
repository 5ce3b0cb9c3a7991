use chrono::{DateTime, Utc};
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::RwLock;
use url::Url;

use crate::error::{AppError, AppResult};
use crate::modules::oauth;

/// Lifetime assumed when the token endpoint omits `expires_in`
pub const DEFAULT_EXPIRES_IN_SECS: i64 = 86_400;

#[derive(Debug, Clone)]
pub struct CachedCredential {
    pub bearer_token: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedCredential {
    /// Build a credential acquired at `now`. A missing or zero `expires_in`
    /// falls back to [`DEFAULT_EXPIRES_IN_SECS`].
    pub fn issue(bearer_token: String, expires_in: Option<i64>, now: DateTime<Utc>) -> Self {
        let expires_in = expires_in
            .filter(|secs| *secs != 0)
            .unwrap_or(DEFAULT_EXPIRES_IN_SECS);

        let expires_at = chrono::Duration::try_seconds(expires_in)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            bearer_token,
            expires_at,
        }
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Owns the single Openverse credential of one client instance.
///
/// The slot lock is held only to read or replace the credential, never
/// across the token exchange. Callers that find the slot empty or expired
/// at the same moment each run their own exchange and the last write wins.
pub struct TokenManager {
    http_client: Client,
    token_url: Url,
    client_id: Option<String>,
    client_secret: Option<String>,
    credential: Arc<RwLock<Option<CachedCredential>>>,
}

impl TokenManager {
    pub fn new(
        http_client: Client,
        token_url: Url,
        client_id: Option<String>,
        client_secret: Option<String>,
    ) -> Self {
        Self {
            http_client,
            token_url,
            client_id,
            client_secret,
            credential: Arc::new(RwLock::new(None)),
        }
    }

    /// Return the cached bearer token, or run the client-credentials
    /// exchange when there is none or it has expired
    pub async fn get_token(&self) -> AppResult<String> {
        if let Some(token) = self.cached_token(Utc::now()).await {
            return Ok(token);
        }

        let (client_id, client_secret) = self.client_credentials()?;

        let response = oauth::exchange_client_credentials(
            &self.http_client,
            &self.token_url,
            client_id,
            client_secret,
        )
        .await
        .inspect_err(|e| tracing::error!("Authentication error: {}", e))?;

        let credential =
            CachedCredential::issue(response.access_token, response.expires_in, Utc::now());
        let token = credential.bearer_token.clone();

        tracing::debug!("Openverse token cached until {}", credential.expires_at);
        *self.credential.write().await = Some(credential);

        Ok(token)
    }

    async fn cached_token(&self, now: DateTime<Utc>) -> Option<String> {
        let slot = self.credential.read().await;
        slot.as_ref()
            .filter(|credential| credential.is_valid_at(now))
            .map(|credential| credential.bearer_token.clone())
    }

    fn client_credentials(&self) -> AppResult<(&str, &str)> {
        let client_id = self.client_id.as_deref().filter(|v| !v.trim().is_empty());
        let client_secret = self
            .client_secret
            .as_deref()
            .filter(|v| !v.trim().is_empty());

        match (client_id, client_secret) {
            (Some(id), Some(secret)) => Ok((id, secret)),
            _ => {
                tracing::error!("Openverse API credentials not configured");
                Err(AppError::Config(
                    "Openverse API credentials not configured".to_string(),
                ))
            }
        }
    }

    /// Current credential, if any
    pub async fn credential(&self) -> Option<CachedCredential> {
        self.credential.read().await.clone()
    }

    /// Move the cached credential's expiry into the past
    #[cfg(test)]
    pub async fn expire_credential(&self) {
        if let Some(credential) = self.credential.write().await.as_mut() {
            credential.expires_at = Utc::now() - chrono::Duration::seconds(1);
        }
    }
}
