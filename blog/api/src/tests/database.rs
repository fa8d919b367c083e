use chrono::{DateTime, Duration, Utc};
use serial_test::serial;
use sqlx::error::DatabaseError;

use crate::config::AppConfig;
use crate::database::{Comment, Post, PostFilter};
use crate::pagination::Paginator;
use crate::tests::global::{
    create_group, create_user, database_url, mock_global_state, setup_database,
};

async fn create_post_at(
    db: &sqlx::PgPool,
    author_id: i64,
    text: &str,
    group_id: Option<i64>,
    pub_date: DateTime<Utc>,
) -> Post {
    sqlx::query_as(
        "INSERT INTO posts (text, author_id, group_id, pub_date) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(text)
    .bind(author_id)
    .bind(group_id)
    .bind(pub_date)
    .fetch_one(db)
    .await
    .expect("failed to insert post")
}

async fn create_comment_at(
    db: &sqlx::PgPool,
    post_id: i64,
    author_id: i64,
    text: &str,
    created: DateTime<Utc>,
) -> Comment {
    sqlx::query_as(
        "INSERT INTO comments (post_id, author_id, text, created) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(post_id)
    .bind(author_id)
    .bind(text)
    .bind(created)
    .fetch_one(db)
    .await
    .expect("failed to insert comment")
}

#[serial]
#[tokio::test]
async fn test_serial_post_create() {
    if database_url().is_none() {
        eprintln!("skipping test_serial_post_create, DATABASE_URL is not set");
        return;
    }

    let (global, handler) = mock_global_state(AppConfig::default()).await;
    setup_database(&global).await;

    let user = create_user(global.db.as_ref(), "leo").await;

    let post = Post::create(global.db.as_ref(), user.id, "hello world", None)
        .await
        .expect("failed to create post");

    assert_eq!(post.text, "hello world");
    assert_eq!(post.author_id, user.id);
    assert_eq!(post.group_id, None);
    // The publish date comes from the database, not the caller.
    assert!(Utc::now() - post.pub_date < Duration::seconds(60));

    drop(global);
    handler.cancel().await;
}

#[serial]
#[tokio::test]
async fn test_serial_post_update_keeps_pub_date() {
    if database_url().is_none() {
        eprintln!("skipping test_serial_post_update_keeps_pub_date, DATABASE_URL is not set");
        return;
    }

    let (global, handler) = mock_global_state(AppConfig::default()).await;
    setup_database(&global).await;

    let user = create_user(global.db.as_ref(), "leo").await;
    let group = create_group(global.db.as_ref(), "Rust", "rust").await;

    let post = Post::create(global.db.as_ref(), user.id, "first draft", None)
        .await
        .expect("failed to create post");

    let updated = Post::update(global.db.as_ref(), post.id, "final text", Some(group.id))
        .await
        .expect("failed to update post");

    assert_eq!(updated.id, post.id);
    assert_eq!(updated.text, "final text");
    assert_eq!(updated.group_id, Some(group.id));
    assert_eq!(updated.author_id, post.author_id);
    assert_eq!(updated.pub_date, post.pub_date);

    drop(global);
    handler.cancel().await;
}

#[serial]
#[tokio::test]
async fn test_serial_post_ordering() {
    if database_url().is_none() {
        eprintln!("skipping test_serial_post_ordering, DATABASE_URL is not set");
        return;
    }

    let (global, handler) = mock_global_state(AppConfig::default()).await;
    setup_database(&global).await;

    let user = create_user(global.db.as_ref(), "leo").await;
    let now = Utc::now();

    let oldest = create_post_at(global.db.as_ref(), user.id, "oldest", None, now - Duration::minutes(2)).await;
    let older = create_post_at(global.db.as_ref(), user.id, "older", None, now - Duration::minutes(1)).await;
    // Two posts sharing a publish date fall back to newest id first.
    let tied_a = create_post_at(global.db.as_ref(), user.id, "tied a", None, now).await;
    let tied_b = create_post_at(global.db.as_ref(), user.id, "tied b", None, now).await;

    let page = Post::paginate(global.db.as_ref(), PostFilter::All, &Paginator::new(10), 1)
        .await
        .expect("failed to paginate posts");

    let ids: Vec<_> = page.items.iter().map(|post| post.id).collect();
    assert_eq!(ids, vec![tied_b.id, tied_a.id, older.id, oldest.id]);

    drop(global);
    handler.cancel().await;
}

#[serial]
#[tokio::test]
async fn test_serial_post_filters() {
    if database_url().is_none() {
        eprintln!("skipping test_serial_post_filters, DATABASE_URL is not set");
        return;
    }

    let (global, handler) = mock_global_state(AppConfig::default()).await;
    setup_database(&global).await;

    let leo = create_user(global.db.as_ref(), "leo").await;
    let mia = create_user(global.db.as_ref(), "mia").await;
    let group = create_group(global.db.as_ref(), "Rust", "rust").await;

    Post::create(global.db.as_ref(), leo.id, "grouped", Some(group.id))
        .await
        .expect("failed to create post");
    Post::create(global.db.as_ref(), leo.id, "groupless", None)
        .await
        .expect("failed to create post");
    Post::create(global.db.as_ref(), mia.id, "by mia", Some(group.id))
        .await
        .expect("failed to create post");

    assert_eq!(
        Post::count(global.db.as_ref(), PostFilter::All).await.unwrap(),
        3
    );
    assert_eq!(
        Post::count(global.db.as_ref(), PostFilter::Group(group.id)).await.unwrap(),
        2
    );
    assert_eq!(
        Post::count(global.db.as_ref(), PostFilter::Author(leo.id)).await.unwrap(),
        2
    );

    let page = Post::paginate(
        global.db.as_ref(),
        PostFilter::Author(mia.id),
        &Paginator::new(10),
        1,
    )
    .await
    .expect("failed to paginate posts");

    assert_eq!(page.total_items, 1);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].text, "by mia");

    drop(global);
    handler.cancel().await;
}

#[serial]
#[tokio::test]
async fn test_serial_post_pagination() {
    if database_url().is_none() {
        eprintln!("skipping test_serial_post_pagination, DATABASE_URL is not set");
        return;
    }

    let (global, handler) = mock_global_state(AppConfig::default()).await;
    setup_database(&global).await;

    let user = create_user(global.db.as_ref(), "leo").await;
    let now = Utc::now();

    for idx in 0..13 {
        create_post_at(
            global.db.as_ref(),
            user.id,
            &format!("post {idx}"),
            None,
            now - Duration::minutes(idx),
        )
        .await;
    }

    let paginator = Paginator::new(10);

    let page = Post::paginate(global.db.as_ref(), PostFilter::All, &paginator, 1)
        .await
        .expect("failed to paginate posts");
    assert_eq!(page.items.len(), 10);
    assert_eq!(page.total_items, 13);
    assert_eq!(page.total_pages(), 2);
    assert_eq!(page.items[0].text, "post 0");
    assert!(page.has_next());
    assert!(!page.has_previous());

    let page = Post::paginate(global.db.as_ref(), PostFilter::All, &paginator, 2)
        .await
        .expect("failed to paginate posts");
    assert_eq!(page.items.len(), 3);
    assert_eq!(page.items[2].text, "post 12");
    assert!(!page.has_next());
    assert!(page.has_previous());

    // Beyond the last page is empty, not an error.
    let page = Post::paginate(global.db.as_ref(), PostFilter::All, &paginator, 5)
        .await
        .expect("failed to paginate posts");
    assert!(page.items.is_empty());
    assert_eq!(page.total_items, 13);

    drop(global);
    handler.cancel().await;
}

#[serial]
#[tokio::test]
async fn test_serial_comment_unique_per_author() {
    if database_url().is_none() {
        eprintln!("skipping test_serial_comment_unique_per_author, DATABASE_URL is not set");
        return;
    }

    let (global, handler) = mock_global_state(AppConfig::default()).await;
    setup_database(&global).await;

    let leo = create_user(global.db.as_ref(), "leo").await;
    let mia = create_user(global.db.as_ref(), "mia").await;

    let post = Post::create(global.db.as_ref(), leo.id, "hello", None)
        .await
        .expect("failed to create post");

    Comment::create(global.db.as_ref(), post.id, mia.id, "first!")
        .await
        .expect("failed to create comment");

    let err = Comment::create(global.db.as_ref(), post.id, mia.id, "second!")
        .await
        .expect_err("duplicate comment must fail");

    match err {
        sqlx::Error::Database(err) => {
            assert!(matches!(err.kind(), sqlx::error::ErrorKind::UniqueViolation));
            assert_eq!(err.constraint(), Some("unique_together"));
        }
        err => panic!("unexpected error: {err}"),
    }

    // A different author can still comment.
    Comment::create(global.db.as_ref(), post.id, leo.id, "thanks!")
        .await
        .expect("failed to create comment");

    drop(global);
    handler.cancel().await;
}

#[serial]
#[tokio::test]
async fn test_serial_comment_ordering() {
    if database_url().is_none() {
        eprintln!("skipping test_serial_comment_ordering, DATABASE_URL is not set");
        return;
    }

    let (global, handler) = mock_global_state(AppConfig::default()).await;
    setup_database(&global).await;

    let leo = create_user(global.db.as_ref(), "leo").await;
    let mia = create_user(global.db.as_ref(), "mia").await;
    let ida = create_user(global.db.as_ref(), "ida").await;

    let post = Post::create(global.db.as_ref(), leo.id, "hello", None)
        .await
        .expect("failed to create post");

    let now = Utc::now();

    // Inserted out of creation order on purpose.
    let last = create_comment_at(global.db.as_ref(), post.id, mia.id, "late", now + Duration::minutes(1)).await;
    let first = create_comment_at(global.db.as_ref(), post.id, ida.id, "early", now - Duration::minutes(1)).await;
    let middle = create_comment_at(global.db.as_ref(), post.id, leo.id, "middle", now).await;

    let comments = Comment::for_post(global.db.as_ref(), post.id)
        .await
        .expect("failed to fetch comments");

    let ids: Vec<_> = comments.iter().map(|comment| comment.id).collect();
    assert_eq!(ids, vec![first.id, middle.id, last.id]);

    drop(global);
    handler.cancel().await;
}

#[serial]
#[tokio::test]
async fn test_serial_cascade_deletes() {
    if database_url().is_none() {
        eprintln!("skipping test_serial_cascade_deletes, DATABASE_URL is not set");
        return;
    }

    let (global, handler) = mock_global_state(AppConfig::default()).await;
    setup_database(&global).await;

    let leo = create_user(global.db.as_ref(), "leo").await;
    let group = create_group(global.db.as_ref(), "Rust", "rust").await;

    let grouped = Post::create(global.db.as_ref(), leo.id, "grouped", Some(group.id))
        .await
        .expect("failed to create post");
    let groupless = Post::create(global.db.as_ref(), leo.id, "groupless", None)
        .await
        .expect("failed to create post");

    sqlx::query("DELETE FROM groups WHERE id = $1")
        .bind(group.id)
        .execute(global.db.as_ref())
        .await
        .expect("failed to delete group");

    assert!(Post::get(global.db.as_ref(), grouped.id)
        .await
        .expect("failed to fetch post")
        .is_none());
    assert!(Post::get(global.db.as_ref(), groupless.id)
        .await
        .expect("failed to fetch post")
        .is_some());

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(leo.id)
        .execute(global.db.as_ref())
        .await
        .expect("failed to delete user");

    assert_eq!(
        Post::count(global.db.as_ref(), PostFilter::All).await.unwrap(),
        0
    );

    drop(global);
    handler.cancel().await;
}
