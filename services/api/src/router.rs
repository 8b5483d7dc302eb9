use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use potluck_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    health::{healthz, readyz},
    ingredient::{get_ingredient, list_ingredients},
    recipe::{create_recipe, delete_recipe, get_recipe, list_recipes, update_recipe},
    relation::{
        add_favorite, add_to_cart, download_shopping_cart, remove_favorite, remove_from_cart,
    },
    shortlink::{get_recipe_link, resolve_short_link},
    subscription::{list_subscriptions, subscribe, unsubscribe},
    user::{delete_avatar, get_me, get_user, list_users, put_avatar, register},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Users
        .route("/api/users", post(register))
        .route("/api/users", get(list_users))
        .route("/api/users/me", get(get_me))
        .route("/api/users/subscriptions", get(list_subscriptions))
        .route("/api/users/{id}", get(get_user))
        .route("/api/users/{id}/avatar", put(put_avatar))
        .route("/api/users/{id}/avatar", delete(delete_avatar))
        .route("/api/users/{id}/subscribe", post(subscribe))
        .route("/api/users/{id}/subscribe", delete(unsubscribe))
        // Ingredients
        .route("/api/ingredients", get(list_ingredients))
        .route("/api/ingredients/{id}", get(get_ingredient))
        // Recipes
        .route("/api/recipes", post(create_recipe))
        .route("/api/recipes", get(list_recipes))
        .route(
            "/api/recipes/download_shopping_cart",
            get(download_shopping_cart),
        )
        .route("/api/recipes/{id}", get(get_recipe))
        .route("/api/recipes/{id}", patch(update_recipe))
        .route("/api/recipes/{id}", delete(delete_recipe))
        // Favorites / shopping cart
        .route("/api/recipes/{id}/favorite", post(add_favorite))
        .route("/api/recipes/{id}/favorite", delete(remove_favorite))
        .route("/api/recipes/{id}/shopping_cart", post(add_to_cart))
        .route("/api/recipes/{id}/shopping_cart", delete(remove_from_cart))
        // Short links
        .route("/api/recipes/{id}/get-link", get(get_recipe_link))
        .route("/s/{id}", get(resolve_short_link))
        // Top of the builder is outermost: the id is stamped before the
        // trace span opens, and echoed onto the response innermost.
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}
