use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// API error variants. The relation and subscription conflicts are 400, not
/// 409, to match the contract the frontend was built against.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("a user with this email already exists")]
    EmailTaken,
    #[error("a user with this username already exists")]
    UsernameTaken,
    #[error("cannot subscribe to yourself")]
    SelfSubscription,
    #[error("recipe \"{recipe}\" is already in {relation} of user {username}")]
    RelationExists {
        relation: &'static str,
        username: String,
        recipe: String,
    },
    #[error("already subscribed to {username}")]
    AlreadySubscribed { username: String },
    #[error("recipe is not in favorites")]
    NotInFavorites,
    #[error("recipe is not in the shopping cart")]
    NotInShoppingCart,
    #[error("you are not subscribed to {username}")]
    NotSubscribed { username: String },
    #[error("user not found")]
    UserNotFound,
    #[error("recipe not found")]
    RecipeNotFound,
    #[error("ingredient not found")]
    IngredientNotFound,
    #[error("unauthorized")]
    Unauthorized,
    #[error("only the author can modify a recipe")]
    NotRecipeAuthor,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::SelfSubscription => "SELF_SUBSCRIPTION",
            Self::RelationExists { .. } => "RELATION_EXISTS",
            Self::AlreadySubscribed { .. } => "ALREADY_SUBSCRIBED",
            Self::NotInFavorites => "NOT_IN_FAVORITES",
            Self::NotInShoppingCart => "NOT_IN_SHOPPING_CART",
            Self::NotSubscribed { .. } => "NOT_SUBSCRIBED",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::RecipeNotFound => "RECIPE_NOT_FOUND",
            Self::IngredientNotFound => "INGREDIENT_NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::NotRecipeAuthor => "NOT_RECIPE_AUTHOR",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_)
            | Self::EmailTaken
            | Self::UsernameTaken
            | Self::SelfSubscription
            | Self::RelationExists { .. }
            | Self::AlreadySubscribed { .. }
            | Self::NotInFavorites
            | Self::NotInShoppingCart
            | Self::NotSubscribed { .. } => StatusCode::BAD_REQUEST,
            Self::UserNotFound | Self::RecipeNotFound | Self::IngredientNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotRecipeAuthor => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
