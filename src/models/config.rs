use crate::proxy::config::{OpenverseConfig, ProxyConfig};
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub proxy: ProxyConfig,
    #[serde(default)]
    pub openverse: OpenverseConfig,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }
}
