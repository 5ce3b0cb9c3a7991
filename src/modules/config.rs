use std::env;
use std::fs;
use std::path::PathBuf;

use crate::models::AppConfig;

const DATA_DIR: &str = ".openverse_gateway";
const CONFIG_FILE: &str = "gateway_config.json";
const CONFIG_PATH_ENV: &str = "OPENVERSE_GATEWAY_CONFIG";

/// Get data directory path
pub fn get_data_dir() -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or("Failed to get user home directory")?;
    let data_dir = home.join(DATA_DIR);

    if !data_dir.exists() {
        fs::create_dir_all(&data_dir)
            .map_err(|e| format!("Failed to create data directory: {}", e))?;
    }

    Ok(data_dir)
}

fn config_path() -> Result<PathBuf, String> {
    match env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => Ok(PathBuf::from(path)),
        _ => Ok(get_data_dir()?.join(CONFIG_FILE)),
    }
}

/// Load application config: file first, then environment overrides
pub fn load_app_config() -> Result<AppConfig, String> {
    let config_path = config_path()?;

    let mut config = if config_path.exists() {
        let content = fs::read_to_string(&config_path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?
    } else {
        tracing::info!("No config file at {:?}, using defaults", config_path);
        AppConfig::new()
    };

    apply_env_overrides(&mut config, |key| env::var(key).ok())?;
    Ok(config)
}

/// Overlay environment variables on top of the file config.
/// Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), String>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(id) = var("OPENVERSE_CLIENT_ID") {
        config.openverse.client_id = Some(id);
    }
    if let Some(secret) = var("OPENVERSE_CLIENT_SECRET") {
        config.openverse.client_secret = Some(secret);
    }
    if let Some(base_url) = var("OPENVERSE_BASE_URL") {
        config.openverse.base_url = base_url;
    }
    if let Some(secret) = var("JWT_SECRET") {
        config.proxy.jwt_secret = Some(secret);
    }
    if let Some(ttl) = var("JWT_EXPIRES_IN") {
        config.proxy.session_ttl_secs = ttl
            .trim()
            .parse()
            .map_err(|e| format!("Invalid JWT_EXPIRES_IN value {}: {}", ttl, e))?;
    }
    if let Some(port) = var("PORT") {
        config.proxy.port = port
            .trim()
            .parse()
            .map_err(|e| format!("Invalid PORT value {}: {}", port, e))?;
    }

    Ok(())
}
