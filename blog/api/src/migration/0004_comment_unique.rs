use sqlx::{Postgres, Transaction};

use super::Migration;

pub struct CommentUniqueMigration;

#[async_trait::async_trait]
impl Migration for CommentUniqueMigration {
    fn name(&self) -> &'static str {
        "CommentUniqueMigration"
    }

    fn version(&self) -> i32 {
        4
    }

    // One comment per author per post. The constraint keeps its historical
    // name so existing databases line up.
    async fn up(&self, tx: &mut Transaction<'_, Postgres>) -> anyhow::Result<()> {
        sqlx::query(
            "ALTER TABLE comments ADD CONSTRAINT unique_together UNIQUE (post_id, author_id);",
        )
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    async fn down(&self, tx: &mut Transaction<'_, Postgres>) -> anyhow::Result<()> {
        sqlx::query("ALTER TABLE comments DROP CONSTRAINT unique_together;")
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}
