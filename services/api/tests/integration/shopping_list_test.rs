use uuid::Uuid;

use potluck_api::domain::types::{IngredientAmount, RelationKind};
use potluck_api::usecase::recipe::{CreateRecipeInput, CreateRecipeUseCase};
use potluck_api::usecase::relation::AddRelationUseCase;
use potluck_api::usecase::shopping_list::DownloadShoppingListUseCase;
use potluck_testing::fixture::PNG_1X1_DATA_URL;

use crate::helpers::{
    MockImageStore, MockIngredientRepo, MockRecipeRepo, MockRelationRepo, MockUserRepo, line,
    test_catalog, test_recipe, test_user,
};

fn recipe_input(name: &str, ingredients: &[(i32, i32)]) -> CreateRecipeInput {
    CreateRecipeInput {
        name: name.to_owned(),
        text: "Combine and cook.".to_owned(),
        image: PNG_1X1_DATA_URL.to_owned(),
        cooking_time: 20,
        ingredients: ingredients
            .iter()
            .map(|&(ingredient_id, amount)| IngredientAmount {
                ingredient_id,
                amount,
            })
            .collect(),
    }
}

#[tokio::test]
async fn should_sum_shared_ingredients_across_cart_recipes() {
    let cook = test_user("alice");
    let recipes = MockRecipeRepo::new(test_catalog());
    let relations = MockRelationRepo::with_lines(recipes.lines_handle());

    let create = CreateRecipeUseCase {
        recipes: recipes.clone(),
        ingredients: MockIngredientRepo::new(test_catalog()),
        images: MockImageStore::new(),
    };
    let soup = create
        .execute(cook.id, recipe_input("Soup", &[(1, 5), (2, 2)]))
        .await
        .unwrap();
    let brine = create
        .execute(cook.id, recipe_input("Brine", &[(1, 8), (3, 500)]))
        .await
        .unwrap();

    let add = AddRelationUseCase {
        relations: relations.clone(),
        recipes: recipes.clone(),
        users: MockUserRepo::new(vec![cook.clone()]),
    };
    add.execute(RelationKind::ShoppingCart, cook.id, soup.id)
        .await
        .unwrap();
    add.execute(RelationKind::ShoppingCart, cook.id, brine.id)
        .await
        .unwrap();

    let download = DownloadShoppingListUseCase {
        relations: relations.clone(),
    };
    let text = download.execute(cook.id).await.unwrap();

    assert_eq!(text, "Beet - 2 (pcs)\nSalt - 13 (g)\nWater - 500 (ml)");
}

#[tokio::test]
async fn should_export_empty_cart_as_empty_text() {
    let download = DownloadShoppingListUseCase {
        relations: MockRelationRepo::empty(),
    };
    let text = download.execute(Uuid::now_v7()).await.unwrap();
    assert_eq!(text, "");
}

#[tokio::test]
async fn should_ignore_favorites_in_cart_export() {
    let cook = test_user("alice");
    let catalog = test_catalog();
    let recipes = MockRecipeRepo::new(test_catalog());
    recipes.seed(test_recipe(7, cook.id, "Soup"), vec![line(&catalog[0], 5)]);

    let relations = MockRelationRepo::with_lines(recipes.lines_handle());
    relations.add(RelationKind::Favorite, cook.id, 7);

    let download = DownloadShoppingListUseCase {
        relations: relations.clone(),
    };
    let text = download.execute(cook.id).await.unwrap();
    assert_eq!(text, "", "favorited recipes must not reach the export");
}

#[tokio::test]
async fn should_scope_export_to_the_requesting_user() {
    let alice = test_user("alice");
    let bob = test_user("bob");
    let catalog = test_catalog();
    let recipes = MockRecipeRepo::new(test_catalog());
    recipes.seed(test_recipe(1, alice.id, "Soup"), vec![line(&catalog[0], 5)]);
    recipes.seed(test_recipe(2, bob.id, "Brine"), vec![line(&catalog[2], 300)]);

    let relations = MockRelationRepo::with_lines(recipes.lines_handle());
    relations.add(RelationKind::ShoppingCart, alice.id, 1);
    relations.add(RelationKind::ShoppingCart, bob.id, 2);

    let download = DownloadShoppingListUseCase {
        relations: relations.clone(),
    };
    assert_eq!(download.execute(alice.id).await.unwrap(), "Salt - 5 (g)");
    assert_eq!(download.execute(bob.id).await.unwrap(), "Water - 300 (ml)");
}
