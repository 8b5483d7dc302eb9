use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use potluck_core::identity::Identity;
use potluck_core::pagination::LimitOffset;

use crate::domain::types::{SubscribedAuthor, UserView};
use crate::error::ApiError;
use crate::handlers::recipe::RecipeCardResponse;
use crate::handlers::user::UserResponse;
use crate::state::AppState;
use crate::usecase::subscription::{
    ListSubscriptionsUseCase, SubscribeUseCase, UnsubscribeUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

/// Author projection with their recipe cards; `is_subscribed` is true by
/// construction on every subscription endpoint.
#[derive(Serialize)]
pub struct SubscribedAuthorResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub recipes: Vec<RecipeCardResponse>,
    pub recipes_count: u64,
}

impl From<SubscribedAuthor> for SubscribedAuthorResponse {
    fn from(author: SubscribedAuthor) -> Self {
        Self {
            user: UserView {
                user: author.user,
                is_subscribed: true,
            }
            .into(),
            recipes: author
                .recipes
                .into_iter()
                .map(RecipeCardResponse::from)
                .collect(),
            recipes_count: author.recipes_count,
        }
    }
}

// ── POST /api/users/{id}/subscribe ───────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct SubscribeQuery {
    pub recipes_limit: Option<u32>,
}

pub async fn subscribe(
    identity: Identity,
    State(state): State<AppState>,
    Path(author_id): Path<Uuid>,
    Query(query): Query<SubscribeQuery>,
) -> Result<(StatusCode, Json<SubscribedAuthorResponse>), ApiError> {
    let usecase = SubscribeUseCase {
        subscriptions: state.subscription_repo(),
        users: state.user_repo(),
        recipes: state.recipe_repo(),
    };
    let author = usecase
        .execute(identity.user_id, author_id, query.recipes_limit)
        .await?;
    Ok((StatusCode::CREATED, Json(author.into())))
}

// ── DELETE /api/users/{id}/subscribe ─────────────────────────────────────────

pub async fn unsubscribe(
    identity: Identity,
    State(state): State<AppState>,
    Path(author_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let usecase = UnsubscribeUseCase {
        subscriptions: state.subscription_repo(),
        users: state.user_repo(),
    };
    usecase.execute(identity.user_id, author_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /api/users/subscriptions ─────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct SubscriptionListQuery {
    pub limit: Option<u32>,
    pub offset: Option<u64>,
    pub recipes_limit: Option<u32>,
}

pub async fn list_subscriptions(
    identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<SubscriptionListQuery>,
) -> Result<Json<Vec<SubscribedAuthorResponse>>, ApiError> {
    let page = LimitOffset {
        limit: query.limit,
        offset: query.offset.unwrap_or(0),
    };
    let usecase = ListSubscriptionsUseCase {
        subscriptions: state.subscription_repo(),
        recipes: state.recipe_repo(),
    };
    let authors = usecase
        .execute(identity.user_id, page, query.recipes_limit)
        .await?;
    Ok(Json(
        authors
            .into_iter()
            .map(SubscribedAuthorResponse::from)
            .collect(),
    ))
}
