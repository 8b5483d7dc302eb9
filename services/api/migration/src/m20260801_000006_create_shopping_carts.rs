use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ShoppingCarts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ShoppingCarts::UserId).uuid().not_null())
                    .col(ColumnDef::new(ShoppingCarts::RecipeId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(ShoppingCarts::UserId)
                            .col(ShoppingCarts::RecipeId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ShoppingCarts::Table, ShoppingCarts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ShoppingCarts::Table, ShoppingCarts::RecipeId)
                            .to(Recipes::Table, Recipes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(ShoppingCarts::Table)
                    .col(ShoppingCarts::RecipeId)
                    .name("idx_shopping_carts_recipe_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ShoppingCarts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ShoppingCarts {
    Table,
    UserId,
    RecipeId,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Recipes {
    Table,
    Id,
}
