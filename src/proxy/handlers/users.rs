// User Handler: profile and saved searches
use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};

use crate::error::{AppError, AppResult};
use crate::models::{NewSavedSearch, SavedSearch, UserProfile};
use crate::proxy::handlers::auth::parse_body;
use crate::proxy::server::AppState;

/// GET /api/users/profile
pub async fn handle_profile(Extension(user): Extension<UserProfile>) -> Json<UserProfile> {
    Json(user)
}

/// GET /api/users/saved-searches
pub async fn handle_list_saved_searches(
    State(state): State<AppState>,
    Extension(user): Extension<UserProfile>,
) -> AppResult<Json<Vec<SavedSearch>>> {
    let searches = state.users.saved_searches(&user.id).await?;
    Ok(Json(searches))
}

/// POST /api/users/saved-searches
pub async fn handle_add_saved_search(
    State(state): State<AppState>,
    Extension(user): Extension<UserProfile>,
    body: Result<Json<NewSavedSearch>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Vec<SavedSearch>>)> {
    let search = parse_body(body)?;
    tracing::info!("User {} saved a {} search", user.id, search.kind.noun());

    let searches = state.users.add_saved_search(&user.id, search).await?;
    Ok((StatusCode::CREATED, Json(searches)))
}

/// DELETE /api/users/saved-searches/:index
pub async fn handle_delete_saved_search(
    State(state): State<AppState>,
    Extension(user): Extension<UserProfile>,
    index: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<Vec<SavedSearch>>> {
    let Path(index) = index.map_err(|_| {
        AppError::InvalidRequest("Validation failed (numeric string is expected)".to_string())
    })?;

    let searches = state.users.delete_saved_search(&user.id, index).await?;
    Ok(Json(searches))
}
