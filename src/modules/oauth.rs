use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, AppResult};

pub const AUTH_FAILED_MESSAGE: &str = "Failed to authenticate with Openverse API";

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub scope: String,
}

#[derive(Debug, Serialize)]
struct ClientCredentialsRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'a str,
}

/// Exchange client id/secret for an access token (client-credentials grant)
pub async fn exchange_client_credentials(
    client: &Client,
    token_url: &Url,
    client_id: &str,
    client_secret: &str,
) -> AppResult<TokenResponse> {
    let body = ClientCredentialsRequest {
        client_id,
        client_secret,
        grant_type: "client_credentials",
    };

    tracing::info!("Requesting Openverse access token...");

    let response = client
        .post(token_url.clone())
        .json(&body)
        .send()
        .await
        .map_err(|e| {
            tracing::error!("Failed to authenticate with Openverse API: {:?}", e);
            AppError::UpstreamAuth(AUTH_FAILED_MESSAGE.to_string())
        })?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        tracing::error!(
            "Failed to authenticate with Openverse API: {} {}",
            status,
            error_text
        );
        return Err(AppError::UpstreamAuth(AUTH_FAILED_MESSAGE.to_string()));
    }

    let token = response.json::<TokenResponse>().await.map_err(|e| {
        tracing::error!("Token parsing failed: {:?}", e);
        AppError::UpstreamAuth(AUTH_FAILED_MESSAGE.to_string())
    })?;

    tracing::info!(
        "Token exchange successful! access_token: {}..., expires in: {:?}",
        token.access_token.chars().take(8).collect::<String>(),
        token.expires_in
    );

    Ok(token)
}
