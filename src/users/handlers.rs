use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use super::{
    dto::{AddUserRequest, UpdateUserRequest, USER_ADDED, USER_DELETED, USER_UPDATED},
    extractors::RequestUrl,
    repo_types::{User, UserId},
};
use crate::{error::ApiError, state::AppState};

/// Wrong-method hits on a known path get the same 404 as unknown paths.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(add_user).fallback(not_found))
        .route("/users", get(list_users).fallback(not_found))
        .route("/user/:id", get(get_user).fallback(not_found))
        .route("/update", post(update_user).fallback(not_found))
        .route("/delete/:id", get(delete_user).fallback(not_found))
}

#[instrument(skip(state, body))]
pub async fn add_user(
    State(state): State<AppState>,
    RequestUrl(url): RequestUrl,
    body: Result<Json<AddUserRequest>, JsonRejection>,
) -> Result<Json<&'static str>, ApiError> {
    let Json(payload) = read_body(body, &url)?;
    state
        .users
        .create_user(payload)
        .await
        .map_err(|e| ApiError::from_service(e, &url))?;
    Ok(Json(USER_ADDED))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    RequestUrl(url): RequestUrl,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = state
        .users
        .list_users()
        .await
        .map_err(|e| ApiError::from_service(e, &url))?;
    Ok(Json(users))
}

/// Unknown ids answer `null` with 200, not 404.
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    RequestUrl(url): RequestUrl,
    Path(raw_id): Path<String>,
) -> Result<Json<Option<User>>, ApiError> {
    let id = parse_id(&raw_id, &url)?;
    let user = state
        .users
        .get_user(id)
        .await
        .map_err(|e| ApiError::from_service(e, &url))?;
    Ok(Json(user))
}

#[instrument(skip(state, body))]
pub async fn update_user(
    State(state): State<AppState>,
    RequestUrl(url): RequestUrl,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<&'static str>, ApiError> {
    let Json(payload) = read_body(body, &url)?;
    state
        .users
        .update_user(payload)
        .await
        .map_err(|e| ApiError::from_service(e, &url))?;
    Ok(Json(USER_UPDATED))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    RequestUrl(url): RequestUrl,
    Path(raw_id): Path<String>,
) -> Result<Json<&'static str>, ApiError> {
    let id = parse_id(&raw_id, &url)?;
    state
        .users
        .delete_user(id)
        .await
        .map_err(|e| ApiError::from_service(e, &url))?;
    Ok(Json(USER_DELETED))
}

pub async fn not_found(RequestUrl(url): RequestUrl) -> ApiError {
    ApiError::not_found(url)
}

fn read_body<T>(body: Result<Json<T>, JsonRejection>, url: &str) -> Result<Json<T>, ApiError> {
    body.map_err(|e| {
        warn!(error = %e, %url, "unreadable request body");
        ApiError::not_found(url)
    })
}

// non-numeric ids never matched the route in the first place
fn parse_id(raw: &str, url: &str) -> Result<UserId, ApiError> {
    raw.parse::<UserId>().map_err(|e| {
        warn!(error = %e, %url, "unroutable id");
        ApiError::not_found(url)
    })
}
