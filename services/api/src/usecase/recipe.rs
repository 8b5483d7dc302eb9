use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use potluck_core::pagination::PageRequest;

use crate::domain::repository::{
    ImageStore, IngredientRepository, RecipeRepository, RelationRepository,
    SubscriptionRepository, UserRepository,
};
use crate::domain::types::{
    IngredientAmount, IngredientLine, NewRecipe, RECIPE_NAME_MAX_LEN, Recipe, RecipeChanges,
    RecipeFilter, RecipeView, RelationKind, User, UserView,
};
use crate::error::ApiError;

fn validate_name(name: &str) -> Result<(), ApiError> {
    let len = name.chars().count();
    if len == 0 || len > RECIPE_NAME_MAX_LEN {
        return Err(ApiError::Validation(format!(
            "name must be 1-{RECIPE_NAME_MAX_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_cooking_time(cooking_time: i32) -> Result<(), ApiError> {
    if cooking_time < 1 {
        return Err(ApiError::Validation(
            "cooking_time must be at least 1".into(),
        ));
    }
    Ok(())
}

fn validate_ingredient_list(ingredients: &[IngredientAmount]) -> Result<(), ApiError> {
    if ingredients.is_empty() {
        return Err(ApiError::Validation("ingredients must not be empty".into()));
    }
    let mut seen = HashSet::new();
    for item in ingredients {
        if !seen.insert(item.ingredient_id) {
            return Err(ApiError::Validation("ingredients must not repeat".into()));
        }
        if item.amount < 1 {
            return Err(ApiError::Validation(
                "ingredient amount must be at least 1".into(),
            ));
        }
    }
    Ok(())
}

/// All referenced catalog ids must exist; a dangling id is a validation
/// error, not a 404 (the recipe is the resource here, not the ingredient).
async fn check_ingredients_exist<I: IngredientRepository>(
    repo: &I,
    ingredients: &[IngredientAmount],
) -> Result<(), ApiError> {
    let ids: Vec<i32> = ingredients.iter().map(|i| i.ingredient_id).collect();
    let existing: HashSet<i32> = repo.find_existing_ids(&ids).await?.into_iter().collect();
    for id in ids {
        if !existing.contains(&id) {
            return Err(ApiError::Validation(format!(
                "ingredient {id} does not exist"
            )));
        }
    }
    Ok(())
}

// ── CreateRecipe ─────────────────────────────────────────────────────────────

pub struct CreateRecipeInput {
    pub name: String,
    pub text: String,
    /// Base64 data URL as submitted by the client.
    pub image: String,
    pub cooking_time: i32,
    pub ingredients: Vec<IngredientAmount>,
}

pub struct CreateRecipeUseCase<R: RecipeRepository, I: IngredientRepository, S: ImageStore> {
    pub recipes: R,
    pub ingredients: I,
    pub images: S,
}

impl<R: RecipeRepository, I: IngredientRepository, S: ImageStore> CreateRecipeUseCase<R, I, S> {
    /// Validation runs in full before the image is stored or any row is
    /// written.
    pub async fn execute(
        &self,
        author_id: Uuid,
        input: CreateRecipeInput,
    ) -> Result<Recipe, ApiError> {
        validate_name(&input.name)?;
        if input.text.is_empty() {
            return Err(ApiError::Validation("text must not be empty".into()));
        }
        validate_cooking_time(input.cooking_time)?;
        validate_ingredient_list(&input.ingredients)?;
        check_ingredients_exist(&self.ingredients, &input.ingredients).await?;

        let image = self.images.save(&input.image).await?;
        self.recipes
            .create(&NewRecipe {
                author_id,
                name: input.name,
                image,
                text: input.text,
                cooking_time: input.cooking_time,
                ingredients: input.ingredients,
            })
            .await
    }
}

// ── UpdateRecipe ─────────────────────────────────────────────────────────────

pub struct UpdateRecipeInput {
    pub name: Option<String>,
    pub text: Option<String>,
    pub image: Option<String>,
    pub cooking_time: Option<i32>,
    /// Required; the submitted set replaces the stored one wholesale.
    pub ingredients: Option<Vec<IngredientAmount>>,
}

pub struct UpdateRecipeUseCase<R: RecipeRepository, I: IngredientRepository, S: ImageStore> {
    pub recipes: R,
    pub ingredients: I,
    pub images: S,
}

impl<R: RecipeRepository, I: IngredientRepository, S: ImageStore> UpdateRecipeUseCase<R, I, S> {
    pub async fn execute(
        &self,
        viewer_id: Uuid,
        recipe_id: i32,
        input: UpdateRecipeInput,
    ) -> Result<(), ApiError> {
        let recipe = self
            .recipes
            .find_by_id(recipe_id)
            .await?
            .ok_or(ApiError::RecipeNotFound)?;
        if recipe.author_id != viewer_id {
            return Err(ApiError::NotRecipeAuthor);
        }

        let ingredients = input
            .ingredients
            .ok_or_else(|| ApiError::Validation("ingredients are required".into()))?;
        validate_ingredient_list(&ingredients)?;
        check_ingredients_exist(&self.ingredients, &ingredients).await?;

        if let Some(name) = &input.name {
            validate_name(name)?;
        }
        if let Some(text) = &input.text {
            if text.is_empty() {
                return Err(ApiError::Validation("text must not be empty".into()));
            }
        }
        if let Some(cooking_time) = input.cooking_time {
            validate_cooking_time(cooking_time)?;
        }

        let image = match &input.image {
            Some(data_url) => Some(self.images.save(data_url).await?),
            None => None,
        };

        self.recipes
            .update(
                recipe_id,
                &RecipeChanges {
                    name: input.name,
                    image,
                    text: input.text,
                    cooking_time: input.cooking_time,
                    ingredients,
                },
            )
            .await
    }
}

// ── DeleteRecipe ─────────────────────────────────────────────────────────────

pub struct DeleteRecipeUseCase<R: RecipeRepository> {
    pub recipes: R,
}

impl<R: RecipeRepository> DeleteRecipeUseCase<R> {
    pub async fn execute(&self, viewer_id: Uuid, recipe_id: i32) -> Result<(), ApiError> {
        let recipe = self
            .recipes
            .find_by_id(recipe_id)
            .await?
            .ok_or(ApiError::RecipeNotFound)?;
        if recipe.author_id != viewer_id {
            return Err(ApiError::NotRecipeAuthor);
        }
        self.recipes.delete(recipe_id).await
    }
}

// ── GetRecipe ────────────────────────────────────────────────────────────────

pub struct GetRecipeUseCase<
    R: RecipeRepository,
    U: UserRepository,
    RL: RelationRepository,
    S: SubscriptionRepository,
> {
    pub recipes: R,
    pub users: U,
    pub relations: RL,
    pub subscriptions: S,
}

impl<R, U, RL, S> GetRecipeUseCase<R, U, RL, S>
where
    R: RecipeRepository,
    U: UserRepository,
    RL: RelationRepository,
    S: SubscriptionRepository,
{
    pub async fn execute(&self, viewer: Option<Uuid>, id: i32) -> Result<RecipeView, ApiError> {
        let recipe = self
            .recipes
            .find_by_id(id)
            .await?
            .ok_or(ApiError::RecipeNotFound)?;
        let mut views = assemble_views(
            &self.recipes,
            &self.users,
            &self.relations,
            &self.subscriptions,
            viewer,
            vec![recipe],
        )
        .await?;
        views
            .pop()
            .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("projection lost recipe {id}")))
    }
}

// ── ListRecipes ──────────────────────────────────────────────────────────────

pub struct ListRecipesUseCase<
    R: RecipeRepository,
    U: UserRepository,
    RL: RelationRepository,
    S: SubscriptionRepository,
> {
    pub recipes: R,
    pub users: U,
    pub relations: RL,
    pub subscriptions: S,
}

impl<R, U, RL, S> ListRecipesUseCase<R, U, RL, S>
where
    R: RecipeRepository,
    U: UserRepository,
    RL: RelationRepository,
    S: SubscriptionRepository,
{
    pub async fn execute(
        &self,
        viewer: Option<Uuid>,
        filter: RecipeFilter,
        page: PageRequest,
    ) -> Result<Vec<RecipeView>, ApiError> {
        let recipes = self.recipes.list(&filter, page).await?;
        assemble_views(
            &self.recipes,
            &self.users,
            &self.relations,
            &self.subscriptions,
            viewer,
            recipes,
        )
        .await
    }
}

/// Resolve authors, ingredient lines, and the three viewer-relative flags
/// for a batch of recipes. One repository round-trip per concern, never per
/// recipe.
async fn assemble_views<R, U, RL, S>(
    recipes_repo: &R,
    users: &U,
    relations: &RL,
    subscriptions: &S,
    viewer: Option<Uuid>,
    recipes: Vec<Recipe>,
) -> Result<Vec<RecipeView>, ApiError>
where
    R: RecipeRepository,
    U: UserRepository,
    RL: RelationRepository,
    S: SubscriptionRepository,
{
    if recipes.is_empty() {
        return Ok(Vec::new());
    }
    let recipe_ids: Vec<i32> = recipes.iter().map(|r| r.id).collect();
    let mut author_ids: Vec<Uuid> = recipes.iter().map(|r| r.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let mut lines_by_recipe: HashMap<i32, Vec<IngredientLine>> = HashMap::new();
    for (recipe_id, line) in recipes_repo.ingredient_lines(&recipe_ids).await? {
        lines_by_recipe.entry(recipe_id).or_default().push(line);
    }

    let authors: HashMap<Uuid, User> = users
        .find_by_ids(&author_ids)
        .await?
        .into_iter()
        .map(|user| (user.id, user))
        .collect();

    let (favorited, in_cart, subscribed): (HashSet<i32>, HashSet<i32>, HashSet<Uuid>) =
        match viewer {
            Some(viewer_id) => (
                relations
                    .filter_present(RelationKind::Favorite, viewer_id, &recipe_ids)
                    .await?
                    .into_iter()
                    .collect(),
                relations
                    .filter_present(RelationKind::ShoppingCart, viewer_id, &recipe_ids)
                    .await?
                    .into_iter()
                    .collect(),
                subscriptions
                    .filter_subscribed(viewer_id, &author_ids)
                    .await?
                    .into_iter()
                    .collect(),
            ),
            None => Default::default(),
        };

    let mut views = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        let author = authors.get(&recipe.author_id).cloned().ok_or_else(|| {
            anyhow::anyhow!("author {} missing for recipe {}", recipe.author_id, recipe.id)
        })?;
        let is_subscribed = subscribed.contains(&author.id);
        views.push(RecipeView {
            is_favorited: favorited.contains(&recipe.id),
            is_in_shopping_cart: in_cart.contains(&recipe.id),
            ingredients: lines_by_recipe.remove(&recipe.id).unwrap_or_default(),
            author: UserView {
                user: author,
                is_subscribed,
            },
            recipe,
        });
    }
    Ok(views)
}
