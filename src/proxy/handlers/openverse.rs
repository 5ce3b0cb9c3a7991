// Openverse Handler
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::Json,
    Extension,
};

use crate::error::{AppError, AppResult};
use crate::models::{Audio, AudioSearchParams, Image, ImageSearchParams, Paginated, UserProfile};
use crate::proxy::server::AppState;

fn parse_query<T>(query: Result<Query<T>, QueryRejection>) -> AppResult<T> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))
}

/// GET /api/openverse/images
pub async fn handle_search_images(
    State(state): State<AppState>,
    Extension(user): Extension<UserProfile>,
    query: Result<Query<ImageSearchParams>, QueryRejection>,
) -> AppResult<Json<Paginated<Image>>> {
    let params = parse_query(query)?;
    tracing::info!("Image search \"{}\" by user {}", params.q, user.id);

    let result = state.openverse.search(&params).await?;
    Ok(Json(result))
}

/// GET /api/openverse/images/:id
pub async fn handle_get_image(
    State(state): State<AppState>,
    Extension(user): Extension<UserProfile>,
    Path(id): Path<String>,
) -> AppResult<Json<Image>> {
    tracing::info!("Image {} requested by user {}", id, user.id);

    let image = state.openverse.get_by_id::<Image>(&id).await?;
    Ok(Json(image))
}

/// GET /api/openverse/audio
pub async fn handle_search_audio(
    State(state): State<AppState>,
    Extension(user): Extension<UserProfile>,
    query: Result<Query<AudioSearchParams>, QueryRejection>,
) -> AppResult<Json<Paginated<Audio>>> {
    let params = parse_query(query)?;
    tracing::info!("Audio search \"{}\" by user {}", params.q, user.id);

    let result = state.openverse.search(&params).await?;
    Ok(Json(result))
}

/// GET /api/openverse/audio/:id
pub async fn handle_get_audio(
    State(state): State<AppState>,
    Extension(user): Extension<UserProfile>,
    Path(id): Path<String>,
) -> AppResult<Json<Audio>> {
    tracing::info!("Audio {} requested by user {}", id, user.id);

    let audio = state.openverse.get_by_id::<Audio>(&id).await?;
    Ok(Json(audio))
}
