use chrono::{DateTime, Utc};
use uuid::Uuid;

pub const EMAIL_MAX_LEN: usize = 254;
pub const USERNAME_MAX_LEN: usize = 150;
pub const PERSON_NAME_MAX_LEN: usize = 150;
pub const RECIPE_NAME_MAX_LEN: usize = 256;

/// Registered user. Credentials live behind the gateway, so there is no
/// password here.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Catalog ingredient, read-only reference data.
#[derive(Debug, Clone)]
pub struct Ingredient {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

/// Published recipe.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub id: i32,
    pub author_id: Uuid,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub created_at: DateTime<Utc>,
}

/// One ingredient line of a recipe, joined with the catalog row.
#[derive(Debug, Clone)]
pub struct IngredientLine {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Ingredient reference + amount as submitted by a recipe author.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmount {
    pub ingredient_id: i32,
    pub amount: i32,
}

/// Everything needed to insert a recipe with its ingredient lines.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub author_id: Uuid,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub ingredients: Vec<IngredientAmount>,
}

/// Partial recipe update. `ingredients` is always authoritative: the old
/// line set is replaced wholesale.
#[derive(Debug, Clone)]
pub struct RecipeChanges {
    pub name: Option<String>,
    pub image: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
    pub ingredients: Vec<IngredientAmount>,
}

/// Filters for the recipe list. The viewer-relative filters carry the
/// viewer id they were resolved against.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecipeFilter {
    pub author_id: Option<Uuid>,
    pub favorited_by: Option<Uuid>,
    pub in_cart_of: Option<Uuid>,
}

/// The two user-recipe relations share one storage shape and one
/// repository, distinguished by this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    Favorite,
    ShoppingCart,
}

impl RelationKind {
    /// Human label used in conflict messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Favorite => "favorites",
            Self::ShoppingCart => "the shopping cart",
        }
    }
}

/// One aggregated line of the shopping-cart export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartTotal {
    pub name: String,
    pub measurement_unit: String,
    pub total: i64,
}

/// User as seen by a specific viewer.
#[derive(Debug, Clone)]
pub struct UserView {
    pub user: User,
    pub is_subscribed: bool,
}

/// Recipe as seen by a specific viewer, with author and ingredient lines
/// resolved. The flags are recomputed on every request.
#[derive(Debug, Clone)]
pub struct RecipeView {
    pub recipe: Recipe,
    pub author: UserView,
    pub ingredients: Vec<IngredientLine>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Subscribed author with their latest recipes, as returned by the
/// subscription endpoints.
#[derive(Debug, Clone)]
pub struct SubscribedAuthor {
    pub user: User,
    pub recipes: Vec<Recipe>,
    pub recipes_count: u64,
}

/// Validate a username: 1-150 chars, letters/digits plus `. @ + - _`.
pub fn validate_username(username: &str) -> bool {
    let len = username.chars().count();
    if len == 0 || len > USERNAME_MAX_LEN {
        return false;
    }
    username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '.' | '@' | '+' | '-' | '_'))
}

/// Validate an email address: single `@`, non-empty local part, dotted
/// domain, no whitespace, at most 254 bytes.
pub fn validate_email(email: &str) -> bool {
    if email.is_empty() || email.len() > EMAIL_MAX_LEN {
        return false;
    }
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    domain.split('.').count() >= 2 && domain.split('.').all(|part| !part.is_empty())
}
