use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::domain::types::Ingredient;
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::ingredient::{GetIngredientUseCase, ListIngredientsUseCase};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct IngredientResponse {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

// ── GET /api/ingredients ─────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct IngredientListQuery {
    pub name: Option<String>,
}

pub async fn list_ingredients(
    State(state): State<AppState>,
    Query(query): Query<IngredientListQuery>,
) -> Result<Json<Vec<IngredientResponse>>, ApiError> {
    let usecase = ListIngredientsUseCase {
        repo: state.ingredient_repo(),
    };
    let ingredients = usecase.execute(query.name.as_deref()).await?;
    Ok(Json(
        ingredients.into_iter().map(IngredientResponse::from).collect(),
    ))
}

// ── GET /api/ingredients/{id} ────────────────────────────────────────────────

pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<IngredientResponse>, ApiError> {
    let usecase = GetIngredientUseCase {
        repo: state.ingredient_repo(),
    };
    let ingredient = usecase.execute(id).await?;
    Ok(Json(ingredient.into()))
}
