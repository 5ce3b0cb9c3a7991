use serde::{Deserialize, Serialize};

pub const DEFAULT_OPENVERSE_BASE_URL: &str = "https://api.openverse.org/v1";

/// Gateway server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Whether to accept connections from the LAN
    /// - false: local only, 127.0.0.1 (default)
    /// - true: all interfaces, 0.0.0.0
    #[serde(default)]
    pub allow_lan_access: bool,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// HS256 secret used to verify end-user session tokens
    #[serde(default)]
    pub jwt_secret: Option<String>,

    /// Lifetime of issued session tokens (seconds)
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: i64,

    /// Upstream proxy configuration
    #[serde(default)]
    pub upstream_proxy: UpstreamProxyConfig,
}

/// Upstream proxy configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpstreamProxyConfig {
    /// Whether enabled
    pub enabled: bool,
    /// Proxy address (http://, https://, socks5://)
    pub url: String,
}

/// Openverse API access
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenverseConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default)]
    pub client_secret: Option<String>,

    /// Timeout applied to every outbound call (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            allow_lan_access: false,
            port: default_port(),
            jwt_secret: None,
            session_ttl_secs: default_session_ttl(),
            upstream_proxy: UpstreamProxyConfig::default(),
        }
    }
}

impl Default for OpenverseConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            client_id: None,
            client_secret: None,
            request_timeout: default_request_timeout(),
            max_redirects: default_max_redirects(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

fn default_session_ttl() -> i64 {
    86_400
}

fn default_base_url() -> String {
    DEFAULT_OPENVERSE_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    5
}

fn default_max_redirects() -> usize {
    5
}

impl ProxyConfig {
    /// Get the actual listen address
    pub fn get_bind_address(&self) -> &str {
        if self.allow_lan_access {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        }
    }
}
