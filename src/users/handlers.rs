use axum::{
    extract::{Path, State},
    routing::{get, patch, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    state::AppState,
    users::{
        dto::{
            ChangePasswordRequest, CreateUserRequest, Envelope, PublicUser, UpdateUserRequest,
            CHANGE_PASSWORD_MESSAGE, CREATE_MESSAGE, DELETE_MESSAGE, SEARCH_MESSAGE,
            UPDATE_MESSAGE,
        },
        error::{UserError, UserResult},
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create))
        .route(
            "/users/:username",
            get(search).delete(delete).patch(update),
        )
        .route("/users/:username/password", patch(change_password))
}

pub fn ping_routes() -> Router<AppState> {
    Router::new().route("/ping", get(ping))
}

async fn ping() -> Json<&'static str> {
    Json("pong")
}

fn require_username(username: &str) -> UserResult<&str> {
    let username = username.trim();
    if username.is_empty() {
        return Err(UserError::EmptyQueryParam);
    }
    Ok(username)
}

#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> UserResult<Json<Envelope<PublicUser>>> {
    let user = state.users.create(payload).await?;
    Ok(Json(Envelope::success(CREATE_MESSAGE, user.into())))
}

#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> UserResult<Json<Envelope<PublicUser>>> {
    let username = require_username(&username)?;
    let user = state.users.search(username).await?;
    Ok(Json(Envelope::success(SEARCH_MESSAGE, user.into())))
}

#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> UserResult<Json<Envelope<()>>> {
    let username = require_username(&username)?;
    state.users.delete(username).await?;
    Ok(Json(Envelope::message(DELETE_MESSAGE)))
}

#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> UserResult<Json<Envelope<PublicUser>>> {
    let username = require_username(&username)?;
    let user = state.users.update(username, payload.into()).await?;
    Ok(Json(Envelope::success(UPDATE_MESSAGE, user.into())))
}

#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(payload): Json<ChangePasswordRequest>,
) -> UserResult<Json<Envelope<()>>> {
    let username = require_username(&username)?;
    state
        .users
        .change_password(username, &payload.password)
        .await?;
    Ok(Json(Envelope::message(CHANGE_PASSWORD_MESSAGE)))
}
