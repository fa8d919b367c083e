use std::sync::Arc;

use common::context::{Context, Handler};
use common::logging;

use crate::config::AppConfig;
use crate::database::{Group, User};
use crate::global::GlobalState;

/// The database url the database-backed tests run against. Tests that need a
/// database skip themselves when it is not set.
pub fn database_url() -> Option<String> {
    dotenvy::dotenv().ok();

    std::env::var("DATABASE_URL").ok()
}

pub async fn mock_global_state(config: AppConfig) -> (Arc<GlobalState>, Handler) {
    let (ctx, handler) = Context::new();

    dotenvy::dotenv().ok();

    logging::init(&config.logging.level, config.logging.mode).expect("failed to initialize logging");

    let url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://postgres@localhost:5432/blog_test".to_string());

    // Lazy so that tests which never touch the database can run without one.
    let db = Arc::new(
        sqlx::postgres::PgPoolOptions::new()
            .connect_lazy(&url)
            .expect("failed to create database pool"),
    );

    let global = Arc::new(GlobalState::new(config, db, ctx));

    (global, handler)
}

/// Brings the schema up to date and clears every table.
pub async fn setup_database(global: &Arc<GlobalState>) {
    crate::migration::run_migrations(global)
        .await
        .expect("failed to run migrations");

    sqlx::query("DELETE FROM comments")
        .execute(global.db.as_ref())
        .await
        .expect("failed to clear comments");
    sqlx::query("DELETE FROM posts")
        .execute(global.db.as_ref())
        .await
        .expect("failed to clear posts");
    sqlx::query("DELETE FROM groups")
        .execute(global.db.as_ref())
        .await
        .expect("failed to clear groups");
    sqlx::query("DELETE FROM users")
        .execute(global.db.as_ref())
        .await
        .expect("failed to clear users");
}

pub async fn create_user(db: &sqlx::PgPool, username: &str) -> User {
    sqlx::query_as("INSERT INTO users (username) VALUES ($1) RETURNING *")
        .bind(username)
        .fetch_one(db)
        .await
        .expect("failed to insert user")
}

pub async fn create_group(db: &sqlx::PgPool, title: &str, slug: &str) -> Group {
    sqlx::query_as("INSERT INTO groups (title, slug, description) VALUES ($1, $2, $3) RETURNING *")
        .bind(title)
        .bind(slug)
        .bind(format!("all about {title}"))
        .fetch_one(db)
        .await
        .expect("failed to insert group")
}
