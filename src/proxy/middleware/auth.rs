// Session guard middleware
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::proxy::server::AppState;

/// Claims carried by an end-user session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Issues and verifies HS256 session tokens
pub struct SessionManager {
    keys: Option<SessionKeys>,
    validation: Validation,
    ttl_secs: i64,
}

impl SessionManager {
    pub fn new(secret: Option<&str>, ttl_secs: i64) -> Self {
        let keys = secret
            .filter(|s| !s.trim().is_empty())
            .map(|s| SessionKeys {
                encoding: EncodingKey::from_secret(s.as_bytes()),
                decoding: DecodingKey::from_secret(s.as_bytes()),
            });

        if keys.is_none() {
            tracing::warn!("JWT_SECRET is not configured, sessions can be neither issued nor verified");
        }

        Self {
            keys,
            validation: Validation::new(Algorithm::HS256),
            ttl_secs,
        }
    }

    pub fn issue(&self, user: &User) -> AppResult<String> {
        let keys = self
            .keys
            .as_ref()
            .ok_or_else(|| AppError::Config("JWT_SECRET is not configured".to_string()))?;

        let now = chrono::Utc::now().timestamp();
        let claims = SessionClaims {
            sub: user.id.clone(),
            email: user.email.clone(),
            iat: now,
            exp: now.saturating_add(self.ttl_secs),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)?)
    }

    pub fn verify(&self, token: &str) -> AppResult<SessionClaims> {
        let keys = self.keys.as_ref().ok_or_else(unauthorized)?;

        decode::<SessionClaims>(token, &keys.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Session token rejected: {}", e);
                unauthorized()
            })
    }
}

fn unauthorized() -> AppError {
    AppError::Unauthorized("Unauthorized".to_string())
}

/// Rejects requests without a valid `Authorization: Bearer <jwt>` whose
/// subject is a known account; exposes the account's `UserProfile` as a
/// request extension
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    tracing::info!("Request: {} {}", request.method(), request.uri());

    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or_else(unauthorized)?;

    let claims = state.session.verify(token)?;
    let user = state.users.find_by_id(&claims.sub).await.map_err(|_| {
        tracing::debug!("Session for unknown account {}", claims.sub);
        unauthorized()
    })?;

    request.extensions_mut().insert(user.profile());

    Ok(next.run(request).await)
}
