use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use potluck_core::identity::{Identity, MaybeIdentity};
use potluck_core::pagination::PageRequest;

use crate::domain::types::{IngredientAmount, IngredientLine, Recipe, RecipeFilter, RecipeView};
use crate::error::ApiError;
use crate::handlers::user::UserResponse;
use crate::state::AppState;
use crate::usecase::recipe::{
    CreateRecipeInput, CreateRecipeUseCase, DeleteRecipeUseCase, GetRecipeUseCase,
    ListRecipesUseCase, UpdateRecipeInput, UpdateRecipeUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct IngredientLineResponse {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

impl From<IngredientLine> for IngredientLineResponse {
    fn from(line: IngredientLine) -> Self {
        Self {
            id: line.id,
            name: line.name,
            measurement_unit: line.measurement_unit,
            amount: line.amount,
        }
    }
}

/// Full viewer-relative recipe projection.
#[derive(Serialize)]
pub struct RecipeResponse {
    pub id: i32,
    pub author: UserResponse,
    pub ingredients: Vec<IngredientLineResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
}

impl From<RecipeView> for RecipeResponse {
    fn from(view: RecipeView) -> Self {
        Self {
            id: view.recipe.id,
            author: view.author.into(),
            ingredients: view
                .ingredients
                .into_iter()
                .map(IngredientLineResponse::from)
                .collect(),
            is_favorited: view.is_favorited,
            is_in_shopping_cart: view.is_in_shopping_cart,
            name: view.recipe.name,
            image: view.recipe.image,
            text: view.recipe.text,
            cooking_time: view.recipe.cooking_time,
        }
    }
}

/// Short projection used by the relation and subscription endpoints.
#[derive(Serialize)]
pub struct RecipeCardResponse {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl From<Recipe> for RecipeCardResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name,
            image: recipe.image,
            cooking_time: recipe.cooking_time,
        }
    }
}

// ── Request types ────────────────────────────────────────────────────────────

/// Ingredient reference in a recipe body: `{"id": …, "amount": …}`.
#[derive(Deserialize)]
pub struct IngredientAmountRequest {
    pub id: i32,
    pub amount: i32,
}

fn amounts_from_request(items: Vec<IngredientAmountRequest>) -> Vec<IngredientAmount> {
    items
        .into_iter()
        .map(|item| IngredientAmount {
            ingredient_id: item.id,
            amount: item.amount,
        })
        .collect()
}

// ── POST /api/recipes ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateRecipeRequest {
    pub name: String,
    pub text: String,
    pub image: String,
    pub cooking_time: i32,
    pub ingredients: Vec<IngredientAmountRequest>,
}

pub async fn create_recipe(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), ApiError> {
    let usecase = CreateRecipeUseCase {
        recipes: state.recipe_repo(),
        ingredients: state.ingredient_repo(),
        images: state.image_store(),
    };
    let recipe = usecase
        .execute(
            identity.user_id,
            CreateRecipeInput {
                name: body.name,
                text: body.text,
                image: body.image,
                cooking_time: body.cooking_time,
                ingredients: amounts_from_request(body.ingredients),
            },
        )
        .await?;

    let view = projection(&state)
        .execute(Some(identity.user_id), recipe.id)
        .await?;
    Ok((StatusCode::CREATED, Json(view.into())))
}

// ── GET /api/recipes ─────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct RecipeListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub author: Option<Uuid>,
    pub is_favorited: Option<u8>,
    pub is_in_shopping_cart: Option<u8>,
}

pub async fn list_recipes(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Query(query): Query<RecipeListQuery>,
) -> Result<Json<Vec<RecipeResponse>>, ApiError> {
    let viewer = identity.user_id();
    // The viewer-relative filters only mean something for a signed-in
    // viewer; anonymous requests ignore them.
    let filter = RecipeFilter {
        author_id: query.author,
        favorited_by: viewer.filter(|_| query.is_favorited == Some(1)),
        in_cart_of: viewer.filter(|_| query.is_in_shopping_cart == Some(1)),
    };
    let page = PageRequest {
        limit: query.limit.unwrap_or(6),
        page: query.page.unwrap_or(1),
    };

    let usecase = ListRecipesUseCase {
        recipes: state.recipe_repo(),
        users: state.user_repo(),
        relations: state.relation_repo(),
        subscriptions: state.subscription_repo(),
    };
    let views = usecase.execute(viewer, filter, page).await?;
    Ok(Json(views.into_iter().map(RecipeResponse::from).collect()))
}

// ── GET /api/recipes/{id} ────────────────────────────────────────────────────

pub async fn get_recipe(
    identity: MaybeIdentity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let view = projection(&state).execute(identity.user_id(), id).await?;
    Ok(Json(view.into()))
}

// ── PATCH /api/recipes/{id} ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateRecipeRequest {
    pub name: Option<String>,
    pub text: Option<String>,
    pub image: Option<String>,
    pub cooking_time: Option<i32>,
    pub ingredients: Option<Vec<IngredientAmountRequest>>,
}

pub async fn update_recipe(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateRecipeRequest>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let usecase = UpdateRecipeUseCase {
        recipes: state.recipe_repo(),
        ingredients: state.ingredient_repo(),
        images: state.image_store(),
    };
    usecase
        .execute(
            identity.user_id,
            id,
            UpdateRecipeInput {
                name: body.name,
                text: body.text,
                image: body.image,
                cooking_time: body.cooking_time,
                ingredients: body.ingredients.map(amounts_from_request),
            },
        )
        .await?;

    let view = projection(&state)
        .execute(Some(identity.user_id), id)
        .await?;
    Ok(Json(view.into()))
}

// ── DELETE /api/recipes/{id} ─────────────────────────────────────────────────

pub async fn delete_recipe(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let usecase = DeleteRecipeUseCase {
        recipes: state.recipe_repo(),
    };
    usecase.execute(identity.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The read-side usecase wired to the live repositories; shared by every
/// handler that responds with the full projection.
pub(crate) fn projection(
    state: &AppState,
) -> GetRecipeUseCase<
    crate::infra::db::DbRecipeRepository,
    crate::infra::db::DbUserRepository,
    crate::infra::db::DbRelationRepository,
    crate::infra::db::DbSubscriptionRepository,
> {
    GetRecipeUseCase {
        recipes: state.recipe_repo(),
        users: state.user_repo(),
        relations: state.relation_repo(),
        subscriptions: state.subscription_repo(),
    }
}
