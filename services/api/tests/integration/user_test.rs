use uuid::Uuid;

use potluck_api::error::ApiError;
use potluck_api::usecase::user::{
    DeleteAvatarUseCase, GetMeUseCase, ListUsersUseCase, RegisterUserInput, RegisterUserUseCase,
    SetAvatarUseCase,
};
use potluck_core::pagination::LimitOffset;
use potluck_testing::fixture::PNG_1X1_DATA_URL;

use crate::helpers::{MockImageStore, MockSubscriptionRepo, MockUserRepo, test_user};

fn register_input(username: &str) -> RegisterUserInput {
    RegisterUserInput {
        email: format!("{username}@example.com"),
        username: username.to_owned(),
        first_name: "Test".to_owned(),
        last_name: "User".to_owned(),
    }
}

#[tokio::test]
async fn should_register_then_fetch_me() {
    let users = MockUserRepo::empty();
    let register = RegisterUserUseCase {
        users: users.clone(),
    };
    let user = register.execute(register_input("alice")).await.unwrap();

    let me = GetMeUseCase {
        users: users.clone(),
    };
    let view = me.execute(user.id).await.unwrap();

    assert_eq!(view.user.email, "alice@example.com");
    assert_eq!(view.user.username, "alice");
    assert!(!view.is_subscribed);
    assert!(view.user.avatar.is_none());
}

#[tokio::test]
async fn should_reject_duplicate_email_then_duplicate_username() {
    let users = MockUserRepo::empty();
    let register = RegisterUserUseCase {
        users: users.clone(),
    };
    register.execute(register_input("alice")).await.unwrap();

    let result = register
        .execute(RegisterUserInput {
            username: "alice2".to_owned(),
            ..register_input("alice")
        })
        .await;
    assert!(
        matches!(result, Err(ApiError::EmailTaken)),
        "expected EmailTaken, got {result:?}"
    );

    let result = register
        .execute(RegisterUserInput {
            email: "other@example.com".to_owned(),
            ..register_input("alice")
        })
        .await;
    assert!(
        matches!(result, Err(ApiError::UsernameTaken)),
        "expected UsernameTaken, got {result:?}"
    );

    let stored = users.users_handle();
    assert_eq!(stored.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_list_users_in_username_order_with_offset() {
    let users = MockUserRepo::empty();
    let register = RegisterUserUseCase {
        users: users.clone(),
    };
    for name in ["carol", "alice", "bob"] {
        register.execute(register_input(name)).await.unwrap();
    }

    let list = ListUsersUseCase {
        users: users.clone(),
        subscriptions: MockSubscriptionRepo::empty(),
    };
    let views = list
        .execute(
            Some(Uuid::now_v7()),
            LimitOffset {
                limit: Some(2),
                offset: 1,
            },
        )
        .await
        .unwrap();

    let names: Vec<&str> = views.iter().map(|v| v.user.username.as_str()).collect();
    assert_eq!(names, vec!["bob", "carol"]);
}

#[tokio::test]
async fn should_flag_subscribed_authors_in_listing() {
    let users = MockUserRepo::empty();
    let register = RegisterUserUseCase {
        users: users.clone(),
    };
    register.execute(register_input("alice")).await.unwrap();
    let bob = register.execute(register_input("bob")).await.unwrap();

    let viewer = Uuid::now_v7();
    let subscriptions = MockSubscriptionRepo::empty();
    subscriptions.add(viewer, bob.id);

    let list = ListUsersUseCase {
        users: users.clone(),
        subscriptions: subscriptions.clone(),
    };
    let views = list
        .execute(Some(viewer), LimitOffset::default())
        .await
        .unwrap();

    let flags: Vec<(&str, bool)> = views
        .iter()
        .map(|v| (v.user.username.as_str(), v.is_subscribed))
        .collect();
    assert_eq!(flags, vec![("alice", false), ("bob", true)]);
}

#[tokio::test]
async fn should_set_then_delete_avatar() {
    let me = test_user("alice");
    let users = MockUserRepo::new(vec![me.clone()]);
    let images = MockImageStore::new();
    let saved = images.saved_handle();
    let removed = images.removed_handle();

    let set = SetAvatarUseCase {
        users: users.clone(),
        images: images.clone(),
    };
    let reference = set.execute(me.id, PNG_1X1_DATA_URL).await.unwrap();
    assert_eq!(reference, "media/mock-1.png");

    let stored = users.users_handle();
    assert_eq!(
        stored.lock().unwrap()[0].avatar.as_deref(),
        Some("media/mock-1.png")
    );
    assert_eq!(*saved.lock().unwrap(), vec![PNG_1X1_DATA_URL.to_owned()]);

    let delete = DeleteAvatarUseCase {
        users: users.clone(),
        images: images.clone(),
    };
    delete.execute(me.id).await.unwrap();

    assert!(stored.lock().unwrap()[0].avatar.is_none());
    assert_eq!(*removed.lock().unwrap(), vec!["media/mock-1.png".to_owned()]);
}
