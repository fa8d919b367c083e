use sqlx::{Postgres, Transaction};

use super::Migration;

pub struct CommentsMigration;

#[async_trait::async_trait]
impl Migration for CommentsMigration {
    fn name(&self) -> &'static str {
        "CommentsMigration"
    }

    fn version(&self) -> i32 {
        3
    }

    async fn up(&self, tx: &mut Transaction<'_, Postgres>) -> anyhow::Result<()> {
        sqlx::query(
            "CREATE TABLE comments (
                id BIGSERIAL PRIMARY KEY,
                post_id BIGINT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
                author_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                text TEXT NOT NULL,
                created TIMESTAMPTZ NOT NULL DEFAULT now()
            );",
        )
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    async fn down(&self, tx: &mut Transaction<'_, Postgres>) -> anyhow::Result<()> {
        sqlx::query("DROP TABLE comments;").execute(&mut **tx).await?;

        Ok(())
    }
}
