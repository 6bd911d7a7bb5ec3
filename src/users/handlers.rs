use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    db::DbSession,
    error::ApiError,
    state::AppState,
    users::{
        dto::{MessageResponse, UserCreate, UserResponse},
        extractors::{UserId, ValidJson},
        repo::User,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/", get(list_users).post(create_user))
        .route(
            "/users/:user_id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[instrument(skip(session))]
pub async fn get_user(
    mut session: DbSession,
    UserId(user_id): UserId,
) -> Result<Json<UserResponse>, ApiError> {
    let user = User::find_by_id(&mut session, user_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(user.into()))
}

#[instrument(skip(session))]
pub async fn list_users(mut session: DbSession) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = User::list_all(&mut session).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// POST /users/ — 200 with the stored user; a taken email yields the
/// configured duplicate status.
#[instrument(skip(state, session, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    mut session: DbSession,
    ValidJson(payload): ValidJson<UserCreate>,
) -> Result<Json<UserResponse>, ApiError> {
    let duplicate = state.config.duplicate_email;

    if User::find_by_email(&mut session, &payload.email)
        .await?
        .is_some()
    {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::DuplicateEmail(duplicate.status()));
    }

    // The unique index still decides when two creates race past the check above.
    let user = User::insert(&mut session, &payload.into())
        .await
        .map_err(|e| {
            warn!(error = %e, "insert user rejected");
            ApiError::from_repo(e, duplicate)
        })?;

    info!(user_id = user.id, email = %user.email, "user created");
    Ok(Json(user.into()))
}

#[instrument(skip(state, session, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    mut session: DbSession,
    UserId(user_id): UserId,
    ValidJson(payload): ValidJson<UserCreate>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = User::update(&mut session, user_id, &payload.into())
        .await
        .map_err(|e| {
            warn!(error = %e, user_id, "update user rejected");
            ApiError::from_repo(e, state.config.duplicate_email)
        })?
        .ok_or(ApiError::NotFound)?;

    info!(user_id = user.id, "user updated");
    Ok(Json(user.into()))
}

#[instrument(skip(session))]
pub async fn delete_user(
    mut session: DbSession,
    UserId(user_id): UserId,
) -> Result<Json<MessageResponse>, ApiError> {
    if !User::delete(&mut session, user_id).await? {
        return Err(ApiError::NotFound);
    }
    info!(user_id, "user deleted");
    Ok(Json(MessageResponse {
        message: "User deleted successfully",
    }))
}
