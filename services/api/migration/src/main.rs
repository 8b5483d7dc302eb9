use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    cli::run_cli(potluck_api_migration::Migrator).await;
}
