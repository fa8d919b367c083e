use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};

use crate::pagination::{Page, Paginator};

#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct Post {
    /// The unique identifier for the post.
    pub id: i64,
    /// The body text of the post.
    pub text: String,
    /// The time the post was published. Assigned by the database on insert,
    /// never by callers, and immutable afterwards.
    pub pub_date: DateTime<Utc>,
    /// The user that authored the post.
    pub author_id: i64,
    /// The group the post belongs to, if any.
    pub group_id: Option<i64>,
}

/// Which subset of posts a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Group(i64),
    Author(i64),
}

impl PostFilter {
    fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Self::All => {}
            Self::Group(group_id) => {
                qb.push(" WHERE group_id = ").push_bind(*group_id);
            }
            Self::Author(author_id) => {
                qb.push(" WHERE author_id = ").push_bind(*author_id);
            }
        }
    }
}

impl Post {
    pub async fn create(
        db: &sqlx::PgPool,
        author_id: i64,
        text: &str,
        group_id: Option<i64>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r#"
            INSERT INTO posts (text, author_id, group_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(text)
        .bind(author_id)
        .bind(group_id)
        .fetch_one(db)
        .await
    }

    /// Updates the text and group of a post. The author and publish date stay
    /// as they were written.
    pub async fn update(
        db: &sqlx::PgPool,
        id: i64,
        text: &str,
        group_id: Option<i64>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r#"
            UPDATE posts
            SET text = $2, group_id = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(text)
        .bind(group_id)
        .fetch_one(db)
        .await
    }

    pub async fn get(db: &sqlx::PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn count(db: &sqlx::PgPool, filter: PostFilter) -> Result<i64, sqlx::Error> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM posts");
        filter.push_where(&mut qb);

        let (count,): (i64,) = qb.build_query_as().fetch_one(db).await?;

        Ok(count)
    }

    /// Fetches one page of the newest-first feed selected by `filter`.
    pub async fn paginate(
        db: &sqlx::PgPool,
        filter: PostFilter,
        paginator: &Paginator,
        page: i64,
    ) -> Result<Page<Self>, sqlx::Error> {
        let total_items = Self::count(db, filter).await?;

        let mut qb = QueryBuilder::new("SELECT * FROM posts");
        filter.push_where(&mut qb);
        qb.push(" ORDER BY pub_date DESC, id DESC");
        qb.push(" LIMIT ").push_bind(paginator.page_size);
        qb.push(" OFFSET ").push_bind(paginator.offset(page));

        let items = qb.build_query_as().fetch_all(db).await?;

        Ok(paginator.page(items, page, total_items))
    }
}
