use std::sync::Arc;

use common::http::ext::*;
use common::http::RouteError;
use common::make_response;
use hyper::http::header;
use hyper::{Body, Request, Response, StatusCode};
use routerify::prelude::RequestExt;
use routerify::Router;
use serde_json::json;

use super::models::{CommentResponse, FeedResponse, PostDetailResponse, PostResponse};
use crate::api::error::{ApiError, Result};
use crate::api::request_context::RequestContext;
use crate::config::ApiConfig;
use crate::database::{Comment, Group, Post, PostFilter, User};
use crate::forms::{self, CommentData, CommentForm, FormDefinition, FormErrors, PostData, PostForm, INVALID_CHOICE_ERROR};
use crate::global::BlogGlobal;
use crate::pagination::{page_number, Paginator};

/// The authenticated user of the request, or 401 when the request carried no
/// identity.
async fn auth_user(req: &Request<Body>) -> Result<User> {
    let context = req
        .context::<RequestContext>()
        .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "request context not set"))?;

    context
        .user()
        .await
        .map_err_route((StatusCode::UNAUTHORIZED, "identity required"))
}

/// 302 with the entity as body. Browsers follow `Location`, API clients can
/// read the body directly.
fn redirect(location: String, body: serde_json::Value) -> Response<Body> {
    hyper::Response::builder()
        .status(StatusCode::FOUND)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::LOCATION, location)
        .body(Body::from(body.to_string()))
        .expect("failed to build response")
}

/// 400 that re-presents the form: the definition, the submitted values and
/// the per-field errors.
fn invalid_form<D: serde::Serialize>(
    data: &D,
    form: &FormDefinition,
    errors: &FormErrors,
) -> RouteError<ApiError> {
    make_response!(
        StatusCode::BAD_REQUEST,
        json!({
            "form": form,
            "data": data,
            "errors": errors,
            "success": false
        })
    )
    .into()
}

/// Validates a post submission. A group id that does not name an existing
/// group fails with the invalid-choice error, same as an unparseable one.
async fn validate_post_form<G: BlogGlobal>(global: &Arc<G>, data: &PostData) -> Result<PostForm> {
    let mut result = data.validate();

    if let Ok(form) = &result {
        if let Some(group_id) = form.group {
            let group = Group::get(global.db(), group_id)
                .await
                .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch group"))?;

            if group.is_none() {
                let mut errors = FormErrors::new();
                errors
                    .entry("group")
                    .or_default()
                    .push(INVALID_CHOICE_ERROR.to_string());
                result = Err(errors);
            }
        }
    }

    result.map_err(|errors| invalid_form(data, &PostForm::definition(), &errors))
}

async fn feed<G: BlogGlobal>(req: Request<Body>) -> Result<Response<Body>> {
    let global = req.get_global::<G>()?;

    let page = page_number(super::query_param(&req, "page").as_deref());
    let paginator = Paginator::new(global.config::<ApiConfig>().page_size);

    let feed = Post::paginate(global.db(), PostFilter::All, &paginator, page)
        .await
        .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch posts"))?;

    Ok(make_response!(StatusCode::OK, json!(FeedResponse::from(feed))))
}

async fn new_form(_: Request<Body>) -> Result<Response<Body>> {
    Ok(make_response!(
        StatusCode::OK,
        json!({ "form": PostForm::definition() })
    ))
}

async fn create<G: BlogGlobal>(req: Request<Body>) -> Result<Response<Body>> {
    let global = req.get_global::<G>()?;
    let user = auth_user(&req).await?;

    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    let body = hyper::body::to_bytes(req.into_body())
        .await
        .map_err_route((StatusCode::BAD_REQUEST, "failed to read request body"))?;

    let pairs = forms::parse_pairs(content_type.as_deref(), &body)
        .map_err_route((StatusCode::BAD_REQUEST, "invalid request body"))?;

    let data = PostData::from_pairs(pairs);
    let form = validate_post_form(&global, &data).await?;

    let post = Post::create(global.db(), user.id, &form.text, form.group)
        .await
        .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to create post"))?;

    Ok(redirect(
        format!("/v1/users/{}/posts", user.username),
        json!(PostResponse::from(post)),
    ))
}

async fn detail<G: BlogGlobal>(req: Request<Body>) -> Result<Response<Body>> {
    let global = req.get_global::<G>()?;

    let id = req
        .param("id")
        .unwrap()
        .parse::<i64>()
        .map_err(|_| (StatusCode::NOT_FOUND, "post not found"))?;

    let post = Post::get(global.db(), id)
        .await
        .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch post"))?
        .map_err_route((StatusCode::NOT_FOUND, "post not found"))?;

    let author = User::get(global.db(), post.author_id)
        .await
        .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch author"))?
        .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "post author missing"))?;

    let group = match post.group_id {
        Some(group_id) => Group::get(global.db(), group_id)
            .await
            .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch group"))?,
        None => None,
    };

    let comments = Comment::for_post(global.db(), id)
        .await
        .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch comments"))?;

    let response = PostDetailResponse {
        post: post.into(),
        author: author.into(),
        group: group.map(Into::into),
        comments: comments.into_iter().map(Into::into).collect(),
        comment_form: CommentForm::definition(),
    };

    Ok(make_response!(StatusCode::OK, json!(response)))
}

async fn edit_form<G: BlogGlobal>(req: Request<Body>) -> Result<Response<Body>> {
    let global = req.get_global::<G>()?;
    let user = auth_user(&req).await?;

    let id = req
        .param("id")
        .unwrap()
        .parse::<i64>()
        .map_err(|_| (StatusCode::NOT_FOUND, "post not found"))?;

    let post = Post::get(global.db(), id)
        .await
        .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch post"))?
        .map_err_route((StatusCode::NOT_FOUND, "post not found"))?;

    if post.author_id != user.id {
        return Err((StatusCode::FORBIDDEN, "only the author can edit a post").into());
    }

    Ok(make_response!(
        StatusCode::OK,
        json!({
            "form": PostForm::definition(),
            "post": PostResponse::from(post)
        })
    ))
}

async fn edit<G: BlogGlobal>(req: Request<Body>) -> Result<Response<Body>> {
    let global = req.get_global::<G>()?;
    let user = auth_user(&req).await?;

    let id = req
        .param("id")
        .unwrap()
        .parse::<i64>()
        .map_err(|_| (StatusCode::NOT_FOUND, "post not found"))?;

    let post = Post::get(global.db(), id)
        .await
        .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch post"))?
        .map_err_route((StatusCode::NOT_FOUND, "post not found"))?;

    // The permission check runs before the body is even read, the update is
    // never reached for a non-author.
    if post.author_id != user.id {
        return Err((StatusCode::FORBIDDEN, "only the author can edit a post").into());
    }

    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    let body = hyper::body::to_bytes(req.into_body())
        .await
        .map_err_route((StatusCode::BAD_REQUEST, "failed to read request body"))?;

    let pairs = forms::parse_pairs(content_type.as_deref(), &body)
        .map_err_route((StatusCode::BAD_REQUEST, "invalid request body"))?;

    let data = PostData::from_pairs(pairs);
    let form = validate_post_form(&global, &data).await?;

    let post = Post::update(global.db(), post.id, &form.text, form.group)
        .await
        .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to update post"))?;

    Ok(redirect(
        format!("/v1/posts/{}", post.id),
        json!(PostResponse::from(post)),
    ))
}

async fn add_comment<G: BlogGlobal>(req: Request<Body>) -> Result<Response<Body>> {
    let global = req.get_global::<G>()?;
    let user = auth_user(&req).await?;

    let id = req
        .param("id")
        .unwrap()
        .parse::<i64>()
        .map_err(|_| (StatusCode::NOT_FOUND, "post not found"))?;

    let post = Post::get(global.db(), id)
        .await
        .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch post"))?
        .map_err_route((StatusCode::NOT_FOUND, "post not found"))?;

    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    let body = hyper::body::to_bytes(req.into_body())
        .await
        .map_err_route((StatusCode::BAD_REQUEST, "failed to read request body"))?;

    let pairs = forms::parse_pairs(content_type.as_deref(), &body)
        .map_err_route((StatusCode::BAD_REQUEST, "invalid request body"))?;

    let data = CommentData::from_pairs(pairs);
    let form = data
        .validate()
        .map_err(|errors| invalid_form(&data, &CommentForm::definition(), &errors))?;

    // A duplicate (post, author) comment trips the unique constraint and
    // surfaces as the store error.
    let comment = Comment::create(global.db(), post.id, user.id, &form.text)
        .await
        .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to create comment"))?;

    Ok(redirect(
        format!("/v1/posts/{}", post.id),
        json!(CommentResponse::from(comment)),
    ))
}

pub fn routes<G: BlogGlobal>(_: &Arc<G>) -> Router<Body, RouteError<ApiError>> {
    Router::builder()
        .get("/", feed::<G>)
        .post("/", create::<G>)
        .get("/new", new_form)
        .get("/:id", detail::<G>)
        .get("/:id/edit", edit_form::<G>)
        .post("/:id/edit", edit::<G>)
        .post("/:id/comments", add_comment::<G>)
        .build()
        .expect("failed to build router")
}
