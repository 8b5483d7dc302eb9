use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    sea_query::{Expr, OnConflict, extension::postgres::PgExpr as _},
};
use uuid::Uuid;

use potluck_api_schema::{
    favorites, ingredients, recipe_ingredients, recipes, shopping_carts, subscriptions, users,
};
use potluck_core::pagination::{LimitOffset, PageRequest};

use crate::domain::repository::{
    IngredientRepository, RecipeRepository, RelationRepository, SubscriptionRepository,
    UserRepository,
};
use crate::domain::types::{
    CartTotal, Ingredient, IngredientLine, NewRecipe, Recipe, RecipeChanges, RecipeFilter,
    RelationKind, User,
};
use crate::error::ApiError;

/// Escape `%`, `_` and `\` so user input stays literal inside a LIKE
/// pattern.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, ApiError> {
        let models = users::Entity::find()
            .filter(users::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .context("find users by ids")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find user by username")?;
        Ok(model.map(user_from_model))
    }

    async fn list(&self, page: LimitOffset) -> Result<Vec<User>, ApiError> {
        let LimitOffset { limit, offset } = page.clamped();
        let mut query = users::Entity::find()
            .order_by_asc(users::Column::Username)
            .offset(offset);
        if let Some(limit) = limit {
            query = query.limit(u64::from(limit));
        }
        let models = query.all(&self.db).await.context("list users")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            username: Set(user.username.clone()),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            avatar: Set(user.avatar.clone()),
            created_at: Set(user.created_at),
        }
        .insert(&self.db)
        .await
        .context("create user")?;
        Ok(())
    }

    async fn set_avatar(&self, id: Uuid, avatar: Option<&str>) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(id),
            avatar: Set(avatar.map(ToOwned::to_owned)),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("set user avatar")?;
        Ok(())
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        username: model.username,
        first_name: model.first_name,
        last_name: model.last_name,
        avatar: model.avatar,
        created_at: model.created_at,
    }
}

// ── Ingredient repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbIngredientRepository {
    pub db: DatabaseConnection,
}

impl IngredientRepository for DbIngredientRepository {
    async fn list(&self, name_prefix: Option<&str>) -> Result<Vec<Ingredient>, ApiError> {
        let mut query = ingredients::Entity::find();
        if let Some(prefix) = name_prefix {
            let pattern = format!("{}%", escape_like(prefix));
            query = query.filter(Expr::col(ingredients::Column::Name).ilike(pattern));
        }
        let models = query
            .order_by_desc(ingredients::Column::Name)
            .order_by_asc(ingredients::Column::Id)
            .all(&self.db)
            .await
            .context("list ingredients")?;
        Ok(models.into_iter().map(ingredient_from_model).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Ingredient>, ApiError> {
        let model = ingredients::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find ingredient by id")?;
        Ok(model.map(ingredient_from_model))
    }

    async fn find_existing_ids(&self, ids: &[i32]) -> Result<Vec<i32>, ApiError> {
        let models = ingredients::Entity::find()
            .filter(ingredients::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .context("filter existing ingredient ids")?;
        Ok(models.into_iter().map(|model| model.id).collect())
    }
}

fn ingredient_from_model(model: ingredients::Model) -> Ingredient {
    Ingredient {
        id: model.id,
        name: model.name,
        measurement_unit: model.measurement_unit,
    }
}

// ── Recipe repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRecipeRepository {
    pub db: DatabaseConnection,
}

impl RecipeRepository for DbRecipeRepository {
    async fn create(&self, new: &NewRecipe) -> Result<Recipe, ApiError> {
        let new = new.clone();
        let model = self
            .db
            .transaction::<_, recipes::Model, sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    let recipe = recipes::ActiveModel {
                        author_id: Set(new.author_id),
                        name: Set(new.name.clone()),
                        image: Set(new.image.clone()),
                        text: Set(new.text.clone()),
                        cooking_time: Set(new.cooking_time),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;

                    for item in &new.ingredients {
                        recipe_ingredients::ActiveModel {
                            recipe_id: Set(recipe.id),
                            ingredient_id: Set(item.ingredient_id),
                            amount: Set(item.amount),
                        }
                        .insert(txn)
                        .await?;
                    }
                    Ok(recipe)
                })
            })
            .await
            .context("create recipe")?;
        Ok(recipe_from_model(model))
    }

    async fn update(&self, id: i32, changes: &RecipeChanges) -> Result<(), ApiError> {
        let changes = changes.clone();
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    let scalar_change = changes.name.is_some()
                        || changes.image.is_some()
                        || changes.text.is_some()
                        || changes.cooking_time.is_some();
                    if scalar_change {
                        let mut recipe = recipes::ActiveModel {
                            id: Set(id),
                            ..Default::default()
                        };
                        if let Some(name) = &changes.name {
                            recipe.name = Set(name.clone());
                        }
                        if let Some(image) = &changes.image {
                            recipe.image = Set(image.clone());
                        }
                        if let Some(text) = &changes.text {
                            recipe.text = Set(text.clone());
                        }
                        if let Some(cooking_time) = changes.cooking_time {
                            recipe.cooking_time = Set(cooking_time);
                        }
                        recipe.update(txn).await?;
                    }

                    // The line set is always authoritative: drop and rewrite.
                    recipe_ingredients::Entity::delete_many()
                        .filter(recipe_ingredients::Column::RecipeId.eq(id))
                        .exec(txn)
                        .await?;
                    for item in &changes.ingredients {
                        recipe_ingredients::ActiveModel {
                            recipe_id: Set(id),
                            ingredient_id: Set(item.ingredient_id),
                            amount: Set(item.amount),
                        }
                        .insert(txn)
                        .await?;
                    }
                    Ok(())
                })
            })
            .await
            .context("update recipe")?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<(), ApiError> {
        recipes::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete recipe")?;
        Ok(())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Recipe>, ApiError> {
        let model = recipes::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find recipe by id")?;
        Ok(model.map(recipe_from_model))
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Vec<Recipe>, ApiError> {
        let PageRequest { limit, page } = page.clamped();
        let mut query = recipes::Entity::find();
        if let Some(author_id) = filter.author_id {
            query = query.filter(recipes::Column::AuthorId.eq(author_id));
        }
        if let Some(user_id) = filter.favorited_by {
            query = query.filter(
                recipes::Column::Id.in_subquery(
                    sea_orm::sea_query::Query::select()
                        .column(favorites::Column::RecipeId)
                        .from(favorites::Entity)
                        .and_where(Expr::col(favorites::Column::UserId).eq(user_id))
                        .to_owned(),
                ),
            );
        }
        if let Some(user_id) = filter.in_cart_of {
            query = query.filter(
                recipes::Column::Id.in_subquery(
                    sea_orm::sea_query::Query::select()
                        .column(shopping_carts::Column::RecipeId)
                        .from(shopping_carts::Entity)
                        .and_where(Expr::col(shopping_carts::Column::UserId).eq(user_id))
                        .to_owned(),
                ),
            );
        }
        let models = query
            .order_by_desc(recipes::Column::CreatedAt)
            .order_by_desc(recipes::Column::Id)
            .offset(u64::from(page - 1) * u64::from(limit))
            .limit(u64::from(limit))
            .all(&self.db)
            .await
            .context("list recipes")?;
        Ok(models.into_iter().map(recipe_from_model).collect())
    }

    async fn list_by_author(
        &self,
        author_id: Uuid,
        limit: Option<u32>,
    ) -> Result<Vec<Recipe>, ApiError> {
        let mut query = recipes::Entity::find()
            .filter(recipes::Column::AuthorId.eq(author_id))
            .order_by_desc(recipes::Column::CreatedAt)
            .order_by_desc(recipes::Column::Id);
        if let Some(limit) = limit {
            query = query.limit(u64::from(limit));
        }
        let models = query.all(&self.db).await.context("list recipes by author")?;
        Ok(models.into_iter().map(recipe_from_model).collect())
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, ApiError> {
        let count = recipes::Entity::find()
            .filter(recipes::Column::AuthorId.eq(author_id))
            .count(&self.db)
            .await
            .context("count recipes by author")?;
        Ok(count)
    }

    async fn ingredient_lines(
        &self,
        recipe_ids: &[i32],
    ) -> Result<Vec<(i32, IngredientLine)>, ApiError> {
        let rows = recipe_ingredients::Entity::find()
            .filter(recipe_ingredients::Column::RecipeId.is_in(recipe_ids.iter().copied()))
            .find_also_related(ingredients::Entity)
            .order_by_asc(recipe_ingredients::Column::RecipeId)
            .order_by_asc(recipe_ingredients::Column::IngredientId)
            .all(&self.db)
            .await
            .context("list recipe ingredient lines")?;

        let mut lines = Vec::with_capacity(rows.len());
        for (line, ingredient) in rows {
            let ingredient = ingredient.ok_or_else(|| {
                anyhow::anyhow!(
                    "ingredient {} missing for recipe {}",
                    line.ingredient_id,
                    line.recipe_id
                )
            })?;
            lines.push((
                line.recipe_id,
                IngredientLine {
                    id: ingredient.id,
                    name: ingredient.name,
                    measurement_unit: ingredient.measurement_unit,
                    amount: line.amount,
                },
            ));
        }
        Ok(lines)
    }
}

fn recipe_from_model(model: recipes::Model) -> Recipe {
    Recipe {
        id: model.id,
        author_id: model.author_id,
        name: model.name,
        image: model.image,
        text: model.text,
        cooking_time: model.cooking_time,
        created_at: model.created_at,
    }
}

// ── Relation repository ──────────────────────────────────────────────────────

/// Favorites and shopping-cart rows share one shape; the kind picks the
/// table.
#[derive(Clone)]
pub struct DbRelationRepository {
    pub db: DatabaseConnection,
}

impl RelationRepository for DbRelationRepository {
    async fn insert(
        &self,
        kind: RelationKind,
        user_id: Uuid,
        recipe_id: i32,
    ) -> Result<bool, ApiError> {
        let rows = match kind {
            RelationKind::Favorite => favorites::Entity::insert(favorites::ActiveModel {
                user_id: Set(user_id),
                recipe_id: Set(recipe_id),
            })
            .on_conflict(
                OnConflict::columns([favorites::Column::UserId, favorites::Column::RecipeId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("insert favorite")?,
            RelationKind::ShoppingCart => {
                shopping_carts::Entity::insert(shopping_carts::ActiveModel {
                    user_id: Set(user_id),
                    recipe_id: Set(recipe_id),
                })
                .on_conflict(
                    OnConflict::columns([
                        shopping_carts::Column::UserId,
                        shopping_carts::Column::RecipeId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(&self.db)
                .await
                .context("insert shopping cart row")?
            }
        };
        Ok(rows > 0)
    }

    async fn delete(
        &self,
        kind: RelationKind,
        user_id: Uuid,
        recipe_id: i32,
    ) -> Result<bool, ApiError> {
        let result = match kind {
            RelationKind::Favorite => favorites::Entity::delete_many()
                .filter(favorites::Column::UserId.eq(user_id))
                .filter(favorites::Column::RecipeId.eq(recipe_id))
                .exec(&self.db)
                .await
                .context("delete favorite")?,
            RelationKind::ShoppingCart => shopping_carts::Entity::delete_many()
                .filter(shopping_carts::Column::UserId.eq(user_id))
                .filter(shopping_carts::Column::RecipeId.eq(recipe_id))
                .exec(&self.db)
                .await
                .context("delete shopping cart row")?,
        };
        Ok(result.rows_affected > 0)
    }

    async fn filter_present(
        &self,
        kind: RelationKind,
        user_id: Uuid,
        recipe_ids: &[i32],
    ) -> Result<Vec<i32>, ApiError> {
        match kind {
            RelationKind::Favorite => {
                let models = favorites::Entity::find()
                    .filter(favorites::Column::UserId.eq(user_id))
                    .filter(favorites::Column::RecipeId.is_in(recipe_ids.iter().copied()))
                    .all(&self.db)
                    .await
                    .context("filter favorites")?;
                Ok(models.into_iter().map(|model| model.recipe_id).collect())
            }
            RelationKind::ShoppingCart => {
                let models = shopping_carts::Entity::find()
                    .filter(shopping_carts::Column::UserId.eq(user_id))
                    .filter(shopping_carts::Column::RecipeId.is_in(recipe_ids.iter().copied()))
                    .all(&self.db)
                    .await
                    .context("filter shopping cart rows")?;
                Ok(models.into_iter().map(|model| model.recipe_id).collect())
            }
        }
    }

    async fn cart_totals(&self, user_id: Uuid) -> Result<Vec<CartTotal>, ApiError> {
        use sea_orm::{ConnectionTrait, FromQueryResult, Statement};

        let sql = r#"
            SELECT i.name AS name, i.measurement_unit AS measurement_unit,
                   SUM(ri.amount) AS total
            FROM shopping_carts sc
            JOIN recipe_ingredients ri ON ri.recipe_id = sc.recipe_id
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE sc.user_id = $1
            GROUP BY i.name, i.measurement_unit
            ORDER BY i.name, i.measurement_unit
        "#;

        #[derive(Debug, FromQueryResult)]
        struct TotalRow {
            name: String,
            measurement_unit: String,
            total: i64,
        }

        let rows = TotalRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            sql,
            [user_id.into()],
        ))
        .all(&self.db)
        .await
        .context("aggregate shopping cart totals")?;

        Ok(rows
            .into_iter()
            .map(|row| CartTotal {
                name: row.name,
                measurement_unit: row.measurement_unit,
                total: row.total,
            })
            .collect())
    }
}

// ── Subscription repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSubscriptionRepository {
    pub db: DatabaseConnection,
}

impl SubscriptionRepository for DbSubscriptionRepository {
    async fn insert(&self, subscriber_id: Uuid, author_id: Uuid) -> Result<bool, ApiError> {
        let rows = subscriptions::Entity::insert(subscriptions::ActiveModel {
            subscriber_id: Set(subscriber_id),
            author_id: Set(author_id),
        })
        .on_conflict(
            OnConflict::columns([
                subscriptions::Column::SubscriberId,
                subscriptions::Column::AuthorId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("insert subscription")?;
        Ok(rows > 0)
    }

    async fn delete(&self, subscriber_id: Uuid, author_id: Uuid) -> Result<bool, ApiError> {
        let result = subscriptions::Entity::delete_many()
            .filter(subscriptions::Column::SubscriberId.eq(subscriber_id))
            .filter(subscriptions::Column::AuthorId.eq(author_id))
            .exec(&self.db)
            .await
            .context("delete subscription")?;
        Ok(result.rows_affected > 0)
    }

    async fn filter_subscribed(
        &self,
        subscriber_id: Uuid,
        author_ids: &[Uuid],
    ) -> Result<Vec<Uuid>, ApiError> {
        let models = subscriptions::Entity::find()
            .filter(subscriptions::Column::SubscriberId.eq(subscriber_id))
            .filter(subscriptions::Column::AuthorId.is_in(author_ids.iter().copied()))
            .all(&self.db)
            .await
            .context("filter subscriptions")?;
        Ok(models.into_iter().map(|model| model.author_id).collect())
    }

    async fn authors_of(
        &self,
        subscriber_id: Uuid,
        page: LimitOffset,
    ) -> Result<Vec<User>, ApiError> {
        let LimitOffset { limit, offset } = page.clamped();
        let mut query = users::Entity::find()
            .filter(
                users::Column::Id.in_subquery(
                    sea_orm::sea_query::Query::select()
                        .column(subscriptions::Column::AuthorId)
                        .from(subscriptions::Entity)
                        .and_where(
                            Expr::col(subscriptions::Column::SubscriberId).eq(subscriber_id),
                        )
                        .to_owned(),
                ),
            )
            .order_by_asc(users::Column::Username)
            .offset(offset);
        if let Some(limit) = limit {
            query = query.limit(u64::from(limit));
        }
        let models = query.all(&self.db).await.context("list subscribed authors")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }
}
