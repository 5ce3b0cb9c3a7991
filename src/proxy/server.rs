use crate::error::AppResult;
use crate::modules::UserStore;
use crate::proxy::middleware::SessionManager;
use crate::proxy::upstream::OpenverseClient;
use axum::{
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

/// Axum application state
#[derive(Clone)]
pub struct AppState {
    /// One client per process; its credential cache is shared by every request
    pub openverse: Arc<OpenverseClient>,
    pub session: Arc<SessionManager>,
    pub users: Arc<UserStore>,
}

/// Build the gateway router
pub fn build_router(state: AppState) -> Router {
    use crate::proxy::handlers;

    let openverse_routes = Router::new()
        .route("/images", get(handlers::openverse::handle_search_images))
        .route("/images/:id", get(handlers::openverse::handle_get_image))
        .route("/audio", get(handlers::openverse::handle_search_audio))
        .route("/audio/:id", get(handlers::openverse::handle_get_audio));

    let user_routes = Router::new()
        .route("/profile", get(handlers::users::handle_profile))
        .route(
            "/saved-searches",
            get(handlers::users::handle_list_saved_searches)
                .post(handlers::users::handle_add_saved_search),
        )
        .route(
            "/saved-searches/:index",
            delete(handlers::users::handle_delete_saved_search),
        );

    // Everything here requires a session
    let guarded = Router::new()
        .nest("/openverse", openverse_routes)
        .nest("/users", user_routes)
        .route("/auth/verify-token", get(handlers::auth::handle_verify_token))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::proxy::middleware::auth_middleware,
        ));

    let api = Router::new()
        .route("/auth/register", post(handlers::auth::handle_register))
        .route("/auth/login", post(handlers::auth::handle_login))
        .merge(guarded);

    Router::new()
        .nest("/api", api)
        .route("/healthz", get(health_check_handler))
        .layer(TraceLayer::new_for_http())
        .layer(crate::proxy::middleware::cors_layer())
        .with_state(state)
}

/// Axum server instance
pub struct AxumServer {
    shutdown_tx: Option<oneshot::Sender<()>>,
    local_addr: SocketAddr,
}

impl AxumServer {
    /// Start Axum server
    pub async fn start(
        host: &str,
        port: u16,
        state: AppState,
    ) -> AppResult<(Self, tokio::task::JoinHandle<()>)> {
        let app = build_router(state);

        // Bind address
        let addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
            error!("Failed to bind address {}: {}", addr, e);
            e
        })?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Openverse gateway started at http://{}", local_addr);

        // Create shutdown channel
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let server_instance = Self {
            shutdown_tx: Some(shutdown_tx),
            local_addr,
        };

        // Start server in new task
        let handle = tokio::spawn(async move {
            use hyper::server::conn::http1;
            use hyper_util::rt::TokioIo;
            use hyper_util::service::TowerToHyperService;

            loop {
                tokio::select! {
                    res = listener.accept() => {
                        match res {
                            Ok((stream, _)) => {
                                let io = TokioIo::new(stream);
                                let service = TowerToHyperService::new(app.clone());

                                tokio::task::spawn(async move {
                                    if let Err(err) = http1::Builder::new()
                                        .serve_connection(io, service)
                                        .await
                                    {
                                        debug!("Connection handling finished or errored: {:?}", err);
                                    }
                                });
                            }
                            Err(e) => {
                                error!("Failed to accept connection: {:?}", e);
                            }
                        }
                    }
                    _ = &mut shutdown_rx => {
                        tracing::info!("Openverse gateway stopped listening");
                        break;
                    }
                }
            }
        });

        Ok((server_instance, handle))
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop server
    pub fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Health check handler
async fn health_check_handler() -> Response {
    Json(serde_json::json!({
        "status": "ok"
    }))
    .into_response()
}
