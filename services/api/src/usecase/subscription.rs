use uuid::Uuid;

use potluck_core::pagination::LimitOffset;

use crate::domain::repository::{RecipeRepository, SubscriptionRepository, UserRepository};
use crate::domain::types::SubscribedAuthor;
use crate::error::ApiError;

// ── Subscribe ────────────────────────────────────────────────────────────────

pub struct SubscribeUseCase<S: SubscriptionRepository, U: UserRepository, R: RecipeRepository> {
    pub subscriptions: S,
    pub users: U,
    pub recipes: R,
}

impl<S: SubscriptionRepository, U: UserRepository, R: RecipeRepository> SubscribeUseCase<S, U, R> {
    pub async fn execute(
        &self,
        subscriber_id: Uuid,
        author_id: Uuid,
        recipes_limit: Option<u32>,
    ) -> Result<SubscribedAuthor, ApiError> {
        if subscriber_id == author_id {
            return Err(ApiError::SelfSubscription);
        }
        let author = self
            .users
            .find_by_id(author_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        let inserted = self.subscriptions.insert(subscriber_id, author_id).await?;
        if !inserted {
            return Err(ApiError::AlreadySubscribed {
                username: author.username,
            });
        }

        let recipes = self.recipes.list_by_author(author_id, recipes_limit).await?;
        let recipes_count = self.recipes.count_by_author(author_id).await?;
        Ok(SubscribedAuthor {
            user: author,
            recipes,
            recipes_count,
        })
    }
}

// ── Unsubscribe ──────────────────────────────────────────────────────────────

pub struct UnsubscribeUseCase<S: SubscriptionRepository, U: UserRepository> {
    pub subscriptions: S,
    pub users: U,
}

impl<S: SubscriptionRepository, U: UserRepository> UnsubscribeUseCase<S, U> {
    pub async fn execute(&self, subscriber_id: Uuid, author_id: Uuid) -> Result<(), ApiError> {
        let author = self
            .users
            .find_by_id(author_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        let removed = self.subscriptions.delete(subscriber_id, author_id).await?;
        if !removed {
            return Err(ApiError::NotSubscribed {
                username: author.username,
            });
        }
        Ok(())
    }
}

// ── ListSubscriptions ────────────────────────────────────────────────────────

pub struct ListSubscriptionsUseCase<S: SubscriptionRepository, R: RecipeRepository> {
    pub subscriptions: S,
    pub recipes: R,
}

impl<S: SubscriptionRepository, R: RecipeRepository> ListSubscriptionsUseCase<S, R> {
    pub async fn execute(
        &self,
        subscriber_id: Uuid,
        page: LimitOffset,
        recipes_limit: Option<u32>,
    ) -> Result<Vec<SubscribedAuthor>, ApiError> {
        let authors = self.subscriptions.authors_of(subscriber_id, page).await?;
        let mut items = Vec::with_capacity(authors.len());
        for author in authors {
            let recipes = self.recipes.list_by_author(author.id, recipes_limit).await?;
            let recipes_count = self.recipes.count_by_author(author.id).await?;
            items.push(SubscribedAuthor {
                user: author,
                recipes,
                recipes_count,
            });
        }
        Ok(items)
    }
}
