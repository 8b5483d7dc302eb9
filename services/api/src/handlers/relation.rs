use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use potluck_core::identity::Identity;

use crate::domain::types::RelationKind;
use crate::error::ApiError;
use crate::handlers::recipe::RecipeCardResponse;
use crate::state::AppState;
use crate::usecase::relation::{AddRelationUseCase, RemoveRelationUseCase};
use crate::usecase::shopping_list::DownloadShoppingListUseCase;

async fn add_relation(
    state: AppState,
    kind: RelationKind,
    user_id: uuid::Uuid,
    recipe_id: i32,
) -> Result<(StatusCode, Json<RecipeCardResponse>), ApiError> {
    let usecase = AddRelationUseCase {
        relations: state.relation_repo(),
        recipes: state.recipe_repo(),
        users: state.user_repo(),
    };
    let recipe = usecase.execute(kind, user_id, recipe_id).await?;
    Ok((StatusCode::CREATED, Json(recipe.into())))
}

async fn remove_relation(
    state: AppState,
    kind: RelationKind,
    user_id: uuid::Uuid,
    recipe_id: i32,
) -> Result<StatusCode, ApiError> {
    let usecase = RemoveRelationUseCase {
        relations: state.relation_repo(),
    };
    usecase.execute(kind, user_id, recipe_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /api/recipes/{id}/favorite ──────────────────────────────────────────

pub async fn add_favorite(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<RecipeCardResponse>), ApiError> {
    add_relation(state, RelationKind::Favorite, identity.user_id, id).await
}

// ── DELETE /api/recipes/{id}/favorite ────────────────────────────────────────

pub async fn remove_favorite(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    remove_relation(state, RelationKind::Favorite, identity.user_id, id).await
}

// ── POST /api/recipes/{id}/shopping_cart ─────────────────────────────────────

pub async fn add_to_cart(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<RecipeCardResponse>), ApiError> {
    add_relation(state, RelationKind::ShoppingCart, identity.user_id, id).await
}

// ── DELETE /api/recipes/{id}/shopping_cart ───────────────────────────────────

pub async fn remove_from_cart(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    remove_relation(state, RelationKind::ShoppingCart, identity.user_id, id).await
}

// ── GET /api/recipes/download_shopping_cart ──────────────────────────────────

fn shopping_list_attachment(text: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"shopping_list.txt\"",
            ),
        ],
        text,
    )
        .into_response()
}

pub async fn download_shopping_cart(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let usecase = DownloadShoppingListUseCase {
        relations: state.relation_repo(),
    };
    let text = usecase.execute(identity.user_id).await?;
    Ok(shopping_list_attachment(text))
}
