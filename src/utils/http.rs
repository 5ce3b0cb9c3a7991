use crate::proxy::config::UpstreamProxyConfig;
use reqwest::{redirect, Client, Proxy};
use std::time::Duration;

/// Create an HTTP client with a request timeout, a bounded redirect policy
/// and the optional upstream proxy
pub fn create_client_with_proxy(
    timeout_secs: u64,
    max_redirects: usize,
    proxy_config: Option<UpstreamProxyConfig>,
) -> Client {
    let mut builder = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .redirect(redirect::Policy::limited(max_redirects))
        .user_agent(concat!("openverse-gateway/", env!("CARGO_PKG_VERSION")));

    if let Some(config) = proxy_config {
        if config.enabled && !config.url.is_empty() {
            match Proxy::all(&config.url) {
                Ok(proxy) => {
                    builder = builder.proxy(proxy);
                    tracing::info!("HTTP client upstream proxy enabled: {}", config.url);
                }
                Err(e) => {
                    tracing::error!("Invalid proxy address: {}, error: {}", config.url, e);
                }
            }
        }
    }

    builder.build().unwrap_or_else(|e| {
        tracing::error!("Failed to build HTTP client, falling back to defaults: {}", e);
        Client::new()
    })
}
