pub mod error;
pub mod models;
pub mod modules;
pub mod proxy; // Gateway service module
mod utils;

#[cfg(test)]
mod test_utils;

use std::sync::Arc;
use tracing::info;

use modules::UserStore;
use proxy::middleware::SessionManager;
use proxy::upstream::OpenverseClient;
use proxy::{AppState, AxumServer};

/// Load config, start the gateway and serve until Ctrl-C
pub async fn run() -> anyhow::Result<()> {
    modules::init_logger();

    let config = modules::load_app_config().map_err(anyhow::Error::msg)?;

    // Credentials are checked on first upstream call, not here
    if config.openverse.client_id.is_none() || config.openverse.client_secret.is_none() {
        tracing::warn!("Openverse client credentials are not configured");
    }

    let openverse = OpenverseClient::new(
        &config.openverse,
        Some(config.proxy.upstream_proxy.clone()),
    )?;
    let data_dir = modules::config::get_data_dir().map_err(anyhow::Error::msg)?;
    let users = UserStore::open(data_dir.join(modules::users::USERS_FILE), bcrypt::DEFAULT_COST)?;

    let state = AppState {
        openverse: Arc::new(openverse),
        session: Arc::new(SessionManager::new(
            config.proxy.jwt_secret.as_deref(),
            config.proxy.session_ttl_secs,
        )),
        users: Arc::new(users),
    };

    let (server, handle) =
        AxumServer::start(config.proxy.get_bind_address(), config.proxy.port, state).await?;

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    server.stop();
    handle.await?;
    Ok(())
}
