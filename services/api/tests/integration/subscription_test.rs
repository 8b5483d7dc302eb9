use uuid::Uuid;

use potluck_api::error::ApiError;
use potluck_api::usecase::subscription::{
    ListSubscriptionsUseCase, SubscribeUseCase, UnsubscribeUseCase,
};
use potluck_core::pagination::LimitOffset;

use crate::helpers::{
    MockRecipeRepo, MockSubscriptionRepo, MockUserRepo, test_catalog, test_recipe, test_user,
};

#[tokio::test]
async fn should_subscribe_then_appear_in_listing() {
    let author = test_user("alice");
    let subscriber = Uuid::now_v7();
    let subscriptions = MockSubscriptionRepo::new(vec![author.clone()]);
    let recipes = MockRecipeRepo::new(test_catalog());
    recipes.seed(test_recipe(1, author.id, "Borscht"), vec![]);
    recipes.seed(test_recipe(2, author.id, "Brine"), vec![]);

    let subscribe = SubscribeUseCase {
        subscriptions: subscriptions.clone(),
        users: MockUserRepo::new(vec![author.clone()]),
        recipes: recipes.clone(),
    };
    let subscribed = subscribe.execute(subscriber, author.id, None).await.unwrap();
    assert_eq!(subscribed.user.username, "alice");
    assert_eq!(subscribed.recipes_count, 2);

    let list = ListSubscriptionsUseCase {
        subscriptions: subscriptions.clone(),
        recipes: recipes.clone(),
    };
    let items = list
        .execute(subscriber, LimitOffset::default(), None)
        .await
        .unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].user.username, "alice");
    assert_eq!(items[0].recipes.len(), 2);
    assert_eq!(items[0].recipes_count, 2);
}

#[tokio::test]
async fn should_unsubscribe_then_disappear_from_listing() {
    let author = test_user("alice");
    let subscriber = Uuid::now_v7();
    let subscriptions = MockSubscriptionRepo::new(vec![author.clone()]);
    subscriptions.add(subscriber, author.id);

    let unsubscribe = UnsubscribeUseCase {
        subscriptions: subscriptions.clone(),
        users: MockUserRepo::new(vec![author.clone()]),
    };
    unsubscribe.execute(subscriber, author.id).await.unwrap();

    let pairs = subscriptions.pairs_handle();
    assert!(pairs.lock().unwrap().is_empty());

    let list = ListSubscriptionsUseCase {
        subscriptions: subscriptions.clone(),
        recipes: MockRecipeRepo::new(test_catalog()),
    };
    let items = list
        .execute(subscriber, LimitOffset::default(), None)
        .await
        .unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn should_reject_second_subscription_to_same_author() {
    let author = test_user("alice");
    let subscriber = Uuid::now_v7();
    let subscribe = SubscribeUseCase {
        subscriptions: MockSubscriptionRepo::new(vec![author.clone()]),
        users: MockUserRepo::new(vec![author.clone()]),
        recipes: MockRecipeRepo::new(test_catalog()),
    };

    subscribe.execute(subscriber, author.id, None).await.unwrap();
    let result = subscribe.execute(subscriber, author.id, None).await;

    match result {
        Err(ApiError::AlreadySubscribed { username }) => assert_eq!(username, "alice"),
        other => panic!("expected AlreadySubscribed, got {other:?}"),
    }
}

#[tokio::test]
async fn should_order_listed_authors_by_username_with_paging() {
    let alice = test_user("alice");
    let bob = test_user("bob");
    let carol = test_user("carol");
    let subscriber = Uuid::now_v7();
    let subscriptions =
        MockSubscriptionRepo::new(vec![carol.clone(), alice.clone(), bob.clone()]);
    for author in [&carol, &alice, &bob] {
        subscriptions.add(subscriber, author.id);
    }

    let list = ListSubscriptionsUseCase {
        subscriptions: subscriptions.clone(),
        recipes: MockRecipeRepo::new(test_catalog()),
    };

    let first_page = list
        .execute(
            subscriber,
            LimitOffset {
                limit: Some(2),
                offset: 0,
            },
            None,
        )
        .await
        .unwrap();
    let names: Vec<&str> = first_page.iter().map(|i| i.user.username.as_str()).collect();
    assert_eq!(names, vec!["alice", "bob"]);

    let second_page = list
        .execute(
            subscriber,
            LimitOffset {
                limit: Some(2),
                offset: 2,
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].user.username, "carol");
}

#[tokio::test]
async fn should_truncate_recipes_per_author_but_count_all() {
    let author = test_user("alice");
    let subscriber = Uuid::now_v7();
    let subscriptions = MockSubscriptionRepo::new(vec![author.clone()]);
    subscriptions.add(subscriber, author.id);

    let recipes = MockRecipeRepo::new(test_catalog());
    for id in 1..=3 {
        recipes.seed(test_recipe(id, author.id, &format!("Recipe {id}")), vec![]);
    }

    let list = ListSubscriptionsUseCase {
        subscriptions: subscriptions.clone(),
        recipes: recipes.clone(),
    };
    let items = list
        .execute(subscriber, LimitOffset::default(), Some(1))
        .await
        .unwrap();

    assert_eq!(items[0].recipes.len(), 1);
    assert_eq!(items[0].recipes_count, 3);
}
