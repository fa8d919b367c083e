#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct Group {
    /// The unique identifier for the group.
    pub id: i64,
    /// The display title of the group.
    pub title: String,
    /// The unique URL slug of the group.
    pub slug: String,
    /// A free-form description of the group.
    pub description: String,
}

impl Group {
    pub async fn get(db: &sqlx::PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM groups WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn get_by_slug(db: &sqlx::PgPool, slug: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM groups WHERE slug = $1")
            .bind(slug)
            .fetch_optional(db)
            .await
    }
}
