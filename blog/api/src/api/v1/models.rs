use chrono::{DateTime, Utc};

use crate::database::{Comment, Group, Post, User};
use crate::forms::FormDefinition;
use crate::pagination::Page;

#[derive(Debug, Clone, serde::Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct GroupResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl From<Group> for GroupResponse {
    fn from(group: Group) -> Self {
        Self {
            id: group.id,
            title: group.title,
            slug: group.slug,
            description: group.description,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct PostResponse {
    pub id: i64,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: i64,
    pub group_id: Option<i64>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            text: post.text,
            pub_date: post.pub_date,
            author_id: post.author_id,
            group_id: post.group_id,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct CommentResponse {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub text: String,
    pub created: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            author_id: comment.author_id,
            text: comment.text,
            created: comment.created,
        }
    }
}

/// One page of posts with its pagination envelope.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FeedResponse {
    pub items: Vec<PostResponse>,
    pub page: i64,
    pub page_size: i64,
    pub total_items: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl From<Page<Post>> for FeedResponse {
    fn from(page: Page<Post>) -> Self {
        let total_pages = page.total_pages();
        let has_next = page.has_next();
        let has_previous = page.has_previous();

        Self {
            items: page.items.into_iter().map(Into::into).collect(),
            page: page.number,
            page_size: page.page_size,
            total_items: page.total_items,
            total_pages,
            has_next,
            has_previous,
        }
    }
}

/// The group feed carries the group itself next to the page of posts.
#[derive(Debug, Clone, serde::Serialize)]
pub struct GroupFeedResponse {
    pub group: GroupResponse,
    #[serde(flatten)]
    pub feed: FeedResponse,
}

/// The profile feed carries the author next to the page of posts.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AuthorFeedResponse {
    pub author: UserResponse,
    #[serde(flatten)]
    pub feed: FeedResponse,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub author: UserResponse,
    pub group: Option<GroupResponse>,
    pub comments: Vec<CommentResponse>,
    pub comment_form: FormDefinition,
}
