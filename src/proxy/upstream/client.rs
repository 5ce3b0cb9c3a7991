// Openverse upstream client
// Hides the client-credentials handshake and maps upstream failures into AppError

use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use url::Url;

use crate::error::{AppError, AppResult};
use crate::models::{MediaKind, MediaQuery, MediaRecord, Paginated};
use crate::proxy::config::{OpenverseConfig, UpstreamProxyConfig};
use crate::proxy::token_manager::TokenManager;

/// Error body returned by the upstream API
#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    detail: Option<String>,
}

pub struct OpenverseClient {
    http_client: Client,
    base_url: Url,
    token_manager: TokenManager,
}

impl OpenverseClient {
    pub fn new(
        config: &OpenverseConfig,
        proxy_config: Option<UpstreamProxyConfig>,
    ) -> AppResult<Self> {
        let http_client = crate::utils::http::create_client_with_proxy(
            config.request_timeout,
            config.max_redirects,
            proxy_config,
        );

        let base_url = Self::parse_base_url(&config.base_url)?;
        let token_url = Self::build_url(&base_url, &["auth_tokens", "token"])?;

        let token_manager = TokenManager::new(
            http_client.clone(),
            token_url,
            config.client_id.clone(),
            config.client_secret.clone(),
        );

        Ok(Self {
            http_client,
            base_url,
            token_manager,
        })
    }

    fn parse_base_url(raw: &str) -> AppResult<Url> {
        let url = Url::parse(raw)
            .map_err(|e| AppError::Config(format!("Invalid Openverse base URL {}: {}", raw, e)))?;
        if url.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "Invalid Openverse base URL {}: cannot be a base",
                raw
            )));
        }
        Ok(url)
    }

    /// Build `{base}/{segments...}/`. Every segment is percent-encoded as a
    /// single path component and the URL always ends with a slash.
    fn build_url(base: &Url, segments: &[&str]) -> AppResult<Url> {
        let mut url = base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| AppError::Config("Openverse base URL cannot be a base".to_string()))?;
            path.pop_if_empty();
            path.extend(segments);
            path.push("");
        }
        Ok(url)
    }

    /// Bearer token for upstream calls, cached until it expires
    pub async fn authenticate(&self) -> AppResult<String> {
        self.token_manager.get_token().await
    }

    /// Search one upstream collection. The upstream listing is returned as-is.
    pub async fn search<Q: MediaQuery>(&self, params: &Q) -> AppResult<Paginated<Q::Item>> {
        let kind = params.kind();
        params.validate()?;

        let result = self.fetch_search(kind, params).await;
        if let Err(e) = &result {
            tracing::error!("{} search error: {}", kind.noun(), e);
        }
        result
    }

    async fn fetch_search<Q: MediaQuery>(
        &self,
        kind: MediaKind,
        params: &Q,
    ) -> AppResult<Paginated<Q::Item>> {
        let token = self.authenticate().await?;
        let url = Self::build_url(&self.base_url, &[kind.collection()])?;

        let response = self
            .http_client
            .get(url)
            .bearer_auth(&token)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("{}: {:?}", kind.search_failed_message(), e);
                AppError::UpstreamRequest {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: kind.search_failed_message(),
                }
            })?;

        if !response.status().is_success() {
            return Err(Self::search_error(kind, response).await);
        }

        response.json::<Paginated<Q::Item>>().await.map_err(|e| {
            tracing::error!("{}: undecodable listing: {:?}", kind.search_failed_message(), e);
            AppError::UpstreamRequest {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: kind.search_failed_message(),
            }
        })
    }

    /// Non-2xx search response: keep the upstream status, prefer its `detail`
    async fn search_error(kind: MediaKind, response: Response) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::error!("{}: {} {}", kind.search_failed_message(), status, body);

        let message = serde_json::from_str::<UpstreamErrorBody>(&body)
            .ok()
            .and_then(|b| b.detail)
            .filter(|detail| !detail.is_empty())
            .unwrap_or_else(|| kind.search_failed_message());

        AppError::UpstreamRequest { status, message }
    }

    /// Fetch a single record by its upstream id
    pub async fn get_by_id<T: MediaRecord>(&self, id: &str) -> AppResult<T> {
        let result = self.fetch_item::<T>(id).await;
        if let Err(e) = &result {
            tracing::error!("Get {} error: {}", T::KIND.noun(), e);
        }
        result
    }

    async fn fetch_item<T: MediaRecord>(&self, id: &str) -> AppResult<T> {
        let kind = T::KIND;
        let token = self.authenticate().await?;
        let url = Self::build_url(&self.base_url, &[kind.collection(), id])?;

        let request_failed = || AppError::UpstreamRequest {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: kind.get_failed_message(),
        };

        let response = self
            .http_client
            .get(url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("{}: {:?}", kind.get_failed_message(), e);
                request_failed()
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(kind.not_found_message()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("{}: {} {}", kind.get_failed_message(), status, body);
            return Err(request_failed());
        }

        response.json::<T>().await.map_err(|e| {
            tracing::error!("{}: undecodable record: {:?}", kind.get_failed_message(), e);
            request_failed()
        })
    }

    #[cfg(test)]
    pub(crate) fn token_manager(&self) -> &TokenManager {
        &self.token_manager
    }
}
