use chrono::Utc;
use uuid::Uuid;

use potluck_core::pagination::LimitOffset;

use crate::domain::repository::{ImageStore, SubscriptionRepository, UserRepository};
use crate::domain::types::{
    PERSON_NAME_MAX_LEN, User, UserView, validate_email, validate_username,
};
use crate::error::ApiError;

// ── RegisterUser ─────────────────────────────────────────────────────────────

pub struct RegisterUserInput {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

pub struct RegisterUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> RegisterUserUseCase<U> {
    pub async fn execute(&self, input: RegisterUserInput) -> Result<User, ApiError> {
        if !validate_email(&input.email) {
            return Err(ApiError::Validation("invalid email address".into()));
        }
        if !validate_username(&input.username) {
            return Err(ApiError::Validation("invalid username".into()));
        }
        for (field, value) in [
            ("first_name", &input.first_name),
            ("last_name", &input.last_name),
        ] {
            let len = value.chars().count();
            if len == 0 || len > PERSON_NAME_MAX_LEN {
                return Err(ApiError::Validation(format!(
                    "{field} must be 1-{PERSON_NAME_MAX_LEN} characters"
                )));
            }
        }
        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(ApiError::EmailTaken);
        }
        if self.users.find_by_username(&input.username).await?.is_some() {
            return Err(ApiError::UsernameTaken);
        }
        let user = User {
            id: Uuid::now_v7(),
            email: input.email,
            username: input.username,
            first_name: input.first_name,
            last_name: input.last_name,
            avatar: None,
            created_at: Utc::now(),
        };
        self.users.create(&user).await?;
        Ok(user)
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<U: UserRepository, S: SubscriptionRepository> {
    pub users: U,
    pub subscriptions: S,
}

impl<U: UserRepository, S: SubscriptionRepository> GetUserUseCase<U, S> {
    pub async fn execute(&self, viewer: Option<Uuid>, id: Uuid) -> Result<UserView, ApiError> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        let is_subscribed = match viewer {
            Some(viewer_id) => !self
                .subscriptions
                .filter_subscribed(viewer_id, &[id])
                .await?
                .is_empty(),
            None => false,
        };
        Ok(UserView {
            user,
            is_subscribed,
        })
    }
}

// ── GetMe ────────────────────────────────────────────────────────────────────

pub struct GetMeUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> GetMeUseCase<U> {
    pub async fn execute(&self, viewer_id: Uuid) -> Result<UserView, ApiError> {
        let user = self
            .users
            .find_by_id(viewer_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        // Self-subscription never exists.
        Ok(UserView {
            user,
            is_subscribed: false,
        })
    }
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<U: UserRepository, S: SubscriptionRepository> {
    pub users: U,
    pub subscriptions: S,
}

impl<U: UserRepository, S: SubscriptionRepository> ListUsersUseCase<U, S> {
    pub async fn execute(
        &self,
        viewer: Option<Uuid>,
        page: LimitOffset,
    ) -> Result<Vec<UserView>, ApiError> {
        let users = self.users.list(page).await?;
        let subscribed: std::collections::HashSet<Uuid> = match viewer {
            Some(viewer_id) => {
                let ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();
                self.subscriptions
                    .filter_subscribed(viewer_id, &ids)
                    .await?
                    .into_iter()
                    .collect()
            }
            None => Default::default(),
        };
        Ok(users
            .into_iter()
            .map(|user| UserView {
                is_subscribed: subscribed.contains(&user.id),
                user,
            })
            .collect())
    }
}

// ── SetAvatar ────────────────────────────────────────────────────────────────

pub struct SetAvatarUseCase<U: UserRepository, I: ImageStore> {
    pub users: U,
    pub images: I,
}

impl<U: UserRepository, I: ImageStore> SetAvatarUseCase<U, I> {
    /// Stores the payload and points the viewer's profile at it. The
    /// previous file, if any, is left in place.
    pub async fn execute(&self, viewer_id: Uuid, data_url: &str) -> Result<String, ApiError> {
        self.users
            .find_by_id(viewer_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        let reference = self.images.save(data_url).await?;
        self.users.set_avatar(viewer_id, Some(&reference)).await?;
        Ok(reference)
    }
}

// ── DeleteAvatar ─────────────────────────────────────────────────────────────

pub struct DeleteAvatarUseCase<U: UserRepository, I: ImageStore> {
    pub users: U,
    pub images: I,
}

impl<U: UserRepository, I: ImageStore> DeleteAvatarUseCase<U, I> {
    pub async fn execute(&self, viewer_id: Uuid) -> Result<(), ApiError> {
        let user = self
            .users
            .find_by_id(viewer_id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        if let Some(reference) = &user.avatar {
            self.images.remove(reference).await?;
        }
        self.users.set_avatar(viewer_id, None).await
    }
}
