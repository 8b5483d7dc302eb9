//! sea-orm entities for the potluck database.
//!
//! Table shapes live here; behavior belongs in the service crate.

pub mod favorites;
pub mod ingredients;
pub mod recipe_ingredients;
pub mod recipes;
pub mod shopping_carts;
pub mod subscriptions;
pub mod users;
