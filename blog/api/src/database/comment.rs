use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct Comment {
    /// The unique identifier for the comment.
    pub id: i64,
    /// The post the comment belongs to.
    pub post_id: i64,
    /// The user that authored the comment.
    pub author_id: i64,
    /// The body text of the comment.
    pub text: String,
    /// The time the comment was created. Assigned by the database on insert.
    pub created: DateTime<Utc>,
}

impl Comment {
    /// Inserts a comment. A second comment by the same author on the same
    /// post violates the `unique_together` constraint and surfaces as the
    /// database error, the caller does not recover from it.
    pub async fn create(
        db: &sqlx::PgPool,
        post_id: i64,
        author_id: i64,
        text: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r#"
            INSERT INTO comments (post_id, author_id, text)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(post_id)
        .bind(author_id)
        .bind(text)
        .fetch_one(db)
        .await
    }

    pub async fn for_post(db: &sqlx::PgPool, post_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM comments
            WHERE post_id = $1
            ORDER BY created ASC, id ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(db)
        .await
    }
}
