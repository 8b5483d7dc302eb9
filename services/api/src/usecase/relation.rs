use uuid::Uuid;

use crate::domain::repository::{RecipeRepository, RelationRepository, UserRepository};
use crate::domain::types::{Recipe, RelationKind};
use crate::error::ApiError;

// ── AddRelation (favorite / shopping cart) ───────────────────────────────────

pub struct AddRelationUseCase<RL: RelationRepository, R: RecipeRepository, U: UserRepository> {
    pub relations: RL,
    pub recipes: R,
    pub users: U,
}

impl<RL: RelationRepository, R: RecipeRepository, U: UserRepository> AddRelationUseCase<RL, R, U> {
    /// The insert itself is the uniqueness check: zero rows affected means
    /// the pair already existed, and only then is the username fetched for
    /// the conflict message.
    pub async fn execute(
        &self,
        kind: RelationKind,
        user_id: Uuid,
        recipe_id: i32,
    ) -> Result<Recipe, ApiError> {
        let recipe = self
            .recipes
            .find_by_id(recipe_id)
            .await?
            .ok_or(ApiError::RecipeNotFound)?;

        let inserted = self.relations.insert(kind, user_id, recipe_id).await?;
        if !inserted {
            let username = self
                .users
                .find_by_id(user_id)
                .await?
                .map(|user| user.username)
                .unwrap_or_default();
            return Err(ApiError::RelationExists {
                relation: kind.label(),
                username,
                recipe: recipe.name,
            });
        }
        Ok(recipe)
    }
}

// ── RemoveRelation ───────────────────────────────────────────────────────────

pub struct RemoveRelationUseCase<RL: RelationRepository> {
    pub relations: RL,
}

impl<RL: RelationRepository> RemoveRelationUseCase<RL> {
    pub async fn execute(
        &self,
        kind: RelationKind,
        user_id: Uuid,
        recipe_id: i32,
    ) -> Result<(), ApiError> {
        let removed = self.relations.delete(kind, user_id, recipe_id).await?;
        if !removed {
            return Err(match kind {
                RelationKind::Favorite => ApiError::NotInFavorites,
                RelationKind::ShoppingCart => ApiError::NotInShoppingCart,
            });
        }
        Ok(())
    }
}
