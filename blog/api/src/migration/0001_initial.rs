use sqlx::{Postgres, Transaction};

use super::Migration;

pub struct InitialMigration;

#[async_trait::async_trait]
impl Migration for InitialMigration {
    fn name(&self) -> &'static str {
        "InitialMigration"
    }

    fn version(&self) -> i32 {
        1
    }

    async fn up(&self, tx: &mut Transaction<'_, Postgres>) -> anyhow::Result<()> {
        sqlx::query(
            "CREATE TABLE users (
                id BIGSERIAL PRIMARY KEY,
                username VARCHAR(150) NOT NULL UNIQUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            );",
        )
        .execute(&mut **tx)
        .await?;

        sqlx::query(
            "CREATE TABLE posts (
                id BIGSERIAL PRIMARY KEY,
                text TEXT NOT NULL,
                pub_date TIMESTAMPTZ NOT NULL DEFAULT now(),
                author_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE
            );",
        )
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    async fn down(&self, tx: &mut Transaction<'_, Postgres>) -> anyhow::Result<()> {
        sqlx::query("DROP TABLE posts;").execute(&mut **tx).await?;
        sqlx::query("DROP TABLE users;").execute(&mut **tx).await?;

        Ok(())
    }
}
