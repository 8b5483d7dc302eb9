use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use potluck_core::identity::{Identity, MaybeIdentity};
use potluck_core::pagination::LimitOffset;

use crate::domain::types::UserView;
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::user::{
    DeleteAvatarUseCase, GetMeUseCase, GetUserUseCase, ListUsersUseCase, RegisterUserInput,
    RegisterUserUseCase, SetAvatarUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

/// Viewer-relative user projection shared across the user, recipe and
/// subscription endpoints.
#[derive(Serialize)]
pub struct UserResponse {
    pub email: String,
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    pub avatar: Option<String>,
}

impl From<UserView> for UserResponse {
    fn from(view: UserView) -> Self {
        Self {
            email: view.user.email,
            id: view.user.id,
            username: view.user.username,
            first_name: view.user.first_name,
            last_name: view.user.last_name,
            is_subscribed: view.is_subscribed,
            avatar: view.user.avatar,
        }
    }
}

// ── POST /api/users ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Serialize)]
pub struct RegisteredUserResponse {
    pub email: String,
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisteredUserResponse>), ApiError> {
    let usecase = RegisterUserUseCase {
        users: state.user_repo(),
    };
    let user = usecase
        .execute(RegisterUserInput {
            email: body.email,
            username: body.username,
            first_name: body.first_name,
            last_name: body.last_name,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisteredUserResponse {
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }),
    ))
}

// ── GET /api/users ───────────────────────────────────────────────────────────

pub async fn list_users(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Query(page): Query<LimitOffset>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let usecase = ListUsersUseCase {
        users: state.user_repo(),
        subscriptions: state.subscription_repo(),
    };
    let views = usecase.execute(identity.user_id(), page).await?;
    Ok(Json(views.into_iter().map(UserResponse::from).collect()))
}

// ── GET /api/users/me ────────────────────────────────────────────────────────

pub async fn get_me(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let usecase = GetMeUseCase {
        users: state.user_repo(),
    };
    let view = usecase.execute(identity.user_id).await?;
    Ok(Json(view.into()))
}

// ── GET /api/users/{id} ──────────────────────────────────────────────────────

pub async fn get_user(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let usecase = GetUserUseCase {
        users: state.user_repo(),
        subscriptions: state.subscription_repo(),
    };
    let view = usecase.execute(identity.user_id(), id).await?;
    Ok(Json(view.into()))
}

// ── PUT /api/users/{id}/avatar ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AvatarRequest {
    pub avatar: Option<String>,
}

#[derive(Serialize)]
pub struct AvatarResponse {
    pub avatar: String,
}

/// The path id is accepted for URL compatibility; the avatar always
/// belongs to the caller.
pub async fn put_avatar(
    identity: Identity,
    State(state): State<AppState>,
    Path(_id): Path<Uuid>,
    Json(body): Json<AvatarRequest>,
) -> Result<Json<AvatarResponse>, ApiError> {
    let data_url = body
        .avatar
        .filter(|avatar| !avatar.is_empty())
        .ok_or_else(|| ApiError::Validation("avatar is required".into()))?;
    let usecase = SetAvatarUseCase {
        users: state.user_repo(),
        images: state.image_store(),
    };
    let avatar = usecase.execute(identity.user_id, &data_url).await?;
    Ok(Json(AvatarResponse { avatar }))
}

// ── DELETE /api/users/{id}/avatar ────────────────────────────────────────────

pub async fn delete_avatar(
    identity: Identity,
    State(state): State<AppState>,
    Path(_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let usecase = DeleteAvatarUseCase {
        users: state.user_repo(),
        images: state.image_store(),
    };
    usecase.execute(identity.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
