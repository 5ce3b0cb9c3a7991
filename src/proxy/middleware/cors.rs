// CORS middleware
use axum::http::{header, HeaderName, Method};
use tower_http::cors::{Any, CorsLayer};

/// Any origin; browser clients send their session token in `Authorization`
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .expose_headers([HeaderName::from_static("content-disposition")])
}
