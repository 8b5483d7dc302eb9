use std::path::PathBuf;

use sea_orm::DatabaseConnection;

use crate::infra::db::{
    DbIngredientRepository, DbRecipeRepository, DbRelationRepository, DbSubscriptionRepository,
    DbUserRepository,
};
use crate::infra::image::FsImageStore;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub media_root: PathBuf,
    /// Host used for short links when the request carries no Host header.
    pub public_host: String,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn ingredient_repo(&self) -> DbIngredientRepository {
        DbIngredientRepository {
            db: self.db.clone(),
        }
    }

    pub fn recipe_repo(&self) -> DbRecipeRepository {
        DbRecipeRepository {
            db: self.db.clone(),
        }
    }

    pub fn relation_repo(&self) -> DbRelationRepository {
        DbRelationRepository {
            db: self.db.clone(),
        }
    }

    pub fn subscription_repo(&self) -> DbSubscriptionRepository {
        DbSubscriptionRepository {
            db: self.db.clone(),
        }
    }

    pub fn image_store(&self) -> FsImageStore {
        FsImageStore {
            root: self.media_root.clone(),
        }
    }
}
