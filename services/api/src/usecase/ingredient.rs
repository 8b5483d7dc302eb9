use crate::domain::repository::IngredientRepository;
use crate::domain::types::Ingredient;
use crate::error::ApiError;

// ── ListIngredients ──────────────────────────────────────────────────────────

pub struct ListIngredientsUseCase<R: IngredientRepository> {
    pub repo: R,
}

impl<R: IngredientRepository> ListIngredientsUseCase<R> {
    pub async fn execute(&self, name_prefix: Option<&str>) -> Result<Vec<Ingredient>, ApiError> {
        self.repo.list(name_prefix).await
    }
}

// ── GetIngredient ────────────────────────────────────────────────────────────

pub struct GetIngredientUseCase<R: IngredientRepository> {
    pub repo: R,
}

impl<R: IngredientRepository> GetIngredientUseCase<R> {
    pub async fn execute(&self, id: i32) -> Result<Ingredient, ApiError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ApiError::IngredientNotFound)
    }
}
