use sqlx::{Postgres, Transaction};

use super::Migration;

pub struct GroupsMigration;

#[async_trait::async_trait]
impl Migration for GroupsMigration {
    fn name(&self) -> &'static str {
        "GroupsMigration"
    }

    fn version(&self) -> i32 {
        2
    }

    async fn up(&self, tx: &mut Transaction<'_, Postgres>) -> anyhow::Result<()> {
        sqlx::query(
            "CREATE TABLE groups (
                id BIGSERIAL PRIMARY KEY,
                title VARCHAR(200) NOT NULL,
                slug VARCHAR(200) NOT NULL UNIQUE,
                description TEXT NOT NULL
            );",
        )
        .execute(&mut **tx)
        .await?;

        sqlx::query(
            "ALTER TABLE posts ADD COLUMN group_id BIGINT REFERENCES groups(id) ON DELETE CASCADE;",
        )
        .execute(&mut **tx)
        .await?;

        sqlx::query("CREATE INDEX posts_pub_date_index ON posts (pub_date DESC, id DESC);")
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    async fn down(&self, tx: &mut Transaction<'_, Postgres>) -> anyhow::Result<()> {
        sqlx::query("DROP INDEX posts_pub_date_index;")
            .execute(&mut **tx)
            .await?;
        sqlx::query("ALTER TABLE posts DROP COLUMN group_id;")
            .execute(&mut **tx)
            .await?;
        sqlx::query("DROP TABLE groups;").execute(&mut **tx).await?;

        Ok(())
    }
}
