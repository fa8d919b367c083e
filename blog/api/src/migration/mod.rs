use std::sync::Arc;

use anyhow::Context;
use sqlx::{Postgres, Transaction};

use crate::global::BlogGlobal;

#[path = "0001_initial.rs"]
mod initial;

#[path = "0002_groups.rs"]
mod groups;

#[path = "0003_comments.rs"]
mod comments;

#[path = "0004_comment_unique.rs"]
mod comment_unique;

#[async_trait::async_trait]
pub(crate) trait Migration {
    fn name(&self) -> &'static str;
    fn version(&self) -> i32;

    async fn up(&self, tx: &mut Transaction<'_, Postgres>) -> anyhow::Result<()>;
    async fn down(&self, tx: &mut Transaction<'_, Postgres>) -> anyhow::Result<()>;
}

pub(crate) const fn migrations() -> &'static [&'static dyn Migration] {
    &[
        &initial::InitialMigration,
        &groups::GroupsMigration,
        &comments::CommentsMigration,
        &comment_unique::CommentUniqueMigration,
    ]
}

#[tracing::instrument(skip(global))]
async fn get_migrations<G: BlogGlobal>(
    global: &Arc<G>,
) -> anyhow::Result<Vec<&'static dyn Migration>> {
    let migrations = migrations();

    let version = match sqlx::query_scalar::<_, Option<i32>>(
        "SELECT MAX(version) FROM blog_migrations",
    )
    .fetch_one(global.db().as_ref())
    .await
    {
        Ok(version) => version.unwrap_or(0) as usize,
        Err(err) => {
            tracing::info!("initializing database: {}", err);
            sqlx::query(
                "CREATE TABLE blog_migrations (
                    version INT PRIMARY KEY,
                    name TEXT NOT NULL UNIQUE,
                    applied_at TIMESTAMPTZ NOT NULL DEFAULT now()
                );",
            )
            .execute(global.db().as_ref())
            .await
            .context("failed to create migration table")?;

            0
        }
    };

    if version > migrations.len() {
        anyhow::bail!(
            "database is at version {}, but only {} migrations are available",
            version,
            migrations.len()
        );
    }

    Ok(migrations.iter().skip(version).copied().collect())
}

#[tracing::instrument(skip(global, migration), fields(name = migration.name(), version = migration.version()))]
async fn run_migration<G: BlogGlobal>(
    global: &Arc<G>,
    migration: &'static dyn Migration,
) -> anyhow::Result<()> {
    tracing::info!("applying migration");

    let mut tx = global
        .db()
        .begin()
        .await
        .context("failed to start transaction")?;

    migration
        .up(&mut tx)
        .await
        .context("failed to apply migration")?;

    sqlx::query("INSERT INTO blog_migrations (version, name) VALUES ($1, $2)")
        .bind(migration.version())
        .bind(migration.name())
        .execute(&mut *tx)
        .await
        .context("failed to record migration")?;

    tx.commit().await.context("failed to commit transaction")?;

    tracing::info!("migration applied");

    Ok(())
}

/// Brings the database schema up to date. Each pending step runs in its own
/// transaction together with its bookkeeping row.
#[tracing::instrument(skip(global))]
pub async fn run_migrations<G: BlogGlobal>(global: &Arc<G>) -> anyhow::Result<()> {
    let migrations = get_migrations(global).await?;

    for migration in migrations {
        run_migration(global, migration).await?;
    }

    Ok(())
}
