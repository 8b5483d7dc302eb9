pub mod health;
pub mod ingredient;
pub mod recipe;
pub mod relation;
pub mod shortlink;
pub mod subscription;
pub mod user;
