#![allow(async_fn_in_trait)]

use uuid::Uuid;

use potluck_core::pagination::{LimitOffset, PageRequest};

use crate::domain::types::{
    CartTotal, Ingredient, IngredientLine, NewRecipe, Recipe, RecipeChanges, RecipeFilter,
    RelationKind, User,
};
use crate::error::ApiError;

/// Repository for user profiles.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError>;
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, ApiError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError>;
    /// List users ordered by username.
    async fn list(&self, page: LimitOffset) -> Result<Vec<User>, ApiError>;
    async fn create(&self, user: &User) -> Result<(), ApiError>;
    /// Set or clear the avatar reference. `None` clears.
    async fn set_avatar(&self, id: Uuid, avatar: Option<&str>) -> Result<(), ApiError>;
}

/// Repository for the read-only ingredient catalog.
pub trait IngredientRepository: Send + Sync {
    /// List ingredients, optionally filtered by case-insensitive name
    /// prefix, ordered by name descending.
    async fn list(&self, name_prefix: Option<&str>) -> Result<Vec<Ingredient>, ApiError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Ingredient>, ApiError>;
    /// Which of the given ids exist in the catalog.
    async fn find_existing_ids(&self, ids: &[i32]) -> Result<Vec<i32>, ApiError>;
}

/// Repository for recipes and their ingredient lines.
pub trait RecipeRepository: Send + Sync {
    /// Insert the recipe and all its lines in one transaction.
    async fn create(&self, new: &NewRecipe) -> Result<Recipe, ApiError>;
    /// Apply changes; the line set is replaced in the same transaction.
    async fn update(&self, id: i32, changes: &RecipeChanges) -> Result<(), ApiError>;
    async fn delete(&self, id: i32) -> Result<(), ApiError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Recipe>, ApiError>;
    /// List newest-first with the given filters.
    async fn list(&self, filter: &RecipeFilter, page: PageRequest) -> Result<Vec<Recipe>, ApiError>;
    /// An author's recipes newest-first, truncated to `limit` when given.
    async fn list_by_author(
        &self,
        author_id: Uuid,
        limit: Option<u32>,
    ) -> Result<Vec<Recipe>, ApiError>;
    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, ApiError>;
    /// Ingredient lines for a batch of recipes, keyed by recipe id.
    async fn ingredient_lines(
        &self,
        recipe_ids: &[i32],
    ) -> Result<Vec<(i32, IngredientLine)>, ApiError>;
}

/// Repository for the favorite and shopping-cart pair tables, selected by
/// `RelationKind`.
pub trait RelationRepository: Send + Sync {
    /// Atomic constraint-backed insert. Returns `false` when the pair
    /// already existed (no row written).
    async fn insert(
        &self,
        kind: RelationKind,
        user_id: Uuid,
        recipe_id: i32,
    ) -> Result<bool, ApiError>;
    /// Delete the pair. Returns `false` when no row existed.
    async fn delete(
        &self,
        kind: RelationKind,
        user_id: Uuid,
        recipe_id: i32,
    ) -> Result<bool, ApiError>;
    /// Which of the given recipes are in the relation for this user.
    async fn filter_present(
        &self,
        kind: RelationKind,
        user_id: Uuid,
        recipe_ids: &[i32],
    ) -> Result<Vec<i32>, ApiError>;
    /// Shopping-cart aggregation: amounts summed per `(name, unit)`,
    /// ordered by name then unit.
    async fn cart_totals(&self, user_id: Uuid) -> Result<Vec<CartTotal>, ApiError>;
}

/// Repository for user-follows-user pairs.
pub trait SubscriptionRepository: Send + Sync {
    /// Atomic constraint-backed insert. Returns `false` when already
    /// subscribed.
    async fn insert(&self, subscriber_id: Uuid, author_id: Uuid) -> Result<bool, ApiError>;
    /// Delete the pair. Returns `false` when no subscription existed.
    async fn delete(&self, subscriber_id: Uuid, author_id: Uuid) -> Result<bool, ApiError>;
    /// Which of the given authors the subscriber follows.
    async fn filter_subscribed(
        &self,
        subscriber_id: Uuid,
        author_ids: &[Uuid],
    ) -> Result<Vec<Uuid>, ApiError>;
    /// Followed authors ordered by username.
    async fn authors_of(
        &self,
        subscriber_id: Uuid,
        page: LimitOffset,
    ) -> Result<Vec<User>, ApiError>;
}

/// Port for storing uploaded images delivered as base64 data URLs.
pub trait ImageStore: Send + Sync {
    /// Decode and persist; returns the stored file reference.
    async fn save(&self, data_url: &str) -> Result<String, ApiError>;
    /// Best-effort removal of a stored file.
    async fn remove(&self, reference: &str) -> Result<(), ApiError>;
}
