use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct User {
    /// The unique identifier for the user.
    pub id: i64,
    /// The unique username of the user.
    pub username: String,
    /// The time the user was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    pub async fn get(db: &sqlx::PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn get_by_username(
        db: &sqlx::PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(db)
            .await
    }
}
