use uuid::Uuid;

use potluck_api::domain::types::RelationKind;
use potluck_api::error::ApiError;
use potluck_api::usecase::relation::{AddRelationUseCase, RemoveRelationUseCase};

use crate::helpers::{MockRecipeRepo, MockRelationRepo, MockUserRepo, test_catalog, test_recipe, test_user};

fn seeded_recipes(recipe_id: i32, author_id: Uuid) -> MockRecipeRepo {
    let recipes = MockRecipeRepo::new(test_catalog());
    recipes.seed(test_recipe(recipe_id, author_id, "Borscht"), vec![]);
    recipes
}

#[tokio::test]
async fn should_add_favorite_and_return_the_recipe() {
    let user = test_user("alice");
    let relations = MockRelationRepo::empty();
    let usecase = AddRelationUseCase {
        relations: relations.clone(),
        recipes: seeded_recipes(7, Uuid::now_v7()),
        users: MockUserRepo::new(vec![user.clone()]),
    };

    let recipe = usecase
        .execute(RelationKind::Favorite, user.id, 7)
        .await
        .unwrap();

    assert_eq!(recipe.name, "Borscht");
    let pairs = relations.pairs_handle();
    assert!(pairs.lock().unwrap().contains(&(RelationKind::Favorite, user.id, 7)));
}

#[tokio::test]
async fn should_add_same_recipe_to_both_relations_independently() {
    let user = test_user("alice");
    let relations = MockRelationRepo::empty();
    let usecase = AddRelationUseCase {
        relations: relations.clone(),
        recipes: seeded_recipes(7, Uuid::now_v7()),
        users: MockUserRepo::new(vec![user.clone()]),
    };

    usecase
        .execute(RelationKind::Favorite, user.id, 7)
        .await
        .unwrap();
    usecase
        .execute(RelationKind::ShoppingCart, user.id, 7)
        .await
        .unwrap();

    let pairs = relations.pairs_handle();
    assert_eq!(pairs.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn should_report_conflict_on_second_add() {
    let user = test_user("alice");
    let usecase = AddRelationUseCase {
        relations: MockRelationRepo::empty(),
        recipes: seeded_recipes(7, Uuid::now_v7()),
        users: MockUserRepo::new(vec![user.clone()]),
    };

    usecase
        .execute(RelationKind::Favorite, user.id, 7)
        .await
        .unwrap();
    let result = usecase.execute(RelationKind::Favorite, user.id, 7).await;

    match result {
        Err(ApiError::RelationExists {
            relation,
            username,
            recipe,
        }) => {
            assert_eq!(relation, "favorites");
            assert_eq!(username, "alice");
            assert_eq!(recipe, "Borscht");
        }
        other => panic!("expected RelationExists, got {other:?}"),
    }
}

#[tokio::test]
async fn should_remove_favorite_then_reject_second_removal() {
    let user = test_user("alice");
    let relations = MockRelationRepo::empty();
    let add = AddRelationUseCase {
        relations: relations.clone(),
        recipes: seeded_recipes(7, Uuid::now_v7()),
        users: MockUserRepo::new(vec![user.clone()]),
    };
    add.execute(RelationKind::Favorite, user.id, 7)
        .await
        .unwrap();

    let remove = RemoveRelationUseCase {
        relations: relations.clone(),
    };
    remove
        .execute(RelationKind::Favorite, user.id, 7)
        .await
        .unwrap();
    let result = remove.execute(RelationKind::Favorite, user.id, 7).await;

    assert!(
        matches!(result, Err(ApiError::NotInFavorites)),
        "expected NotInFavorites, got {result:?}"
    );
    let pairs = relations.pairs_handle();
    assert!(pairs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_remove_cart_entry_then_reject_second_removal() {
    let user = test_user("alice");
    let relations = MockRelationRepo::empty();
    relations.add(RelationKind::ShoppingCart, user.id, 7);

    let remove = RemoveRelationUseCase {
        relations: relations.clone(),
    };
    remove
        .execute(RelationKind::ShoppingCart, user.id, 7)
        .await
        .unwrap();
    let result = remove.execute(RelationKind::ShoppingCart, user.id, 7).await;

    assert!(
        matches!(result, Err(ApiError::NotInShoppingCart)),
        "expected NotInShoppingCart, got {result:?}"
    );
}
