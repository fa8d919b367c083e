use std::sync::Arc;

use common::http::ext::*;
use common::http::RouteError;
use common::make_response;
use hyper::{Body, Request, Response, StatusCode};
use routerify::prelude::RequestExt;
use routerify::Router;
use serde_json::json;

use super::models::AuthorFeedResponse;
use crate::api::error::{ApiError, Result};
use crate::config::ApiConfig;
use crate::database::{Post, PostFilter, User};
use crate::global::BlogGlobal;
use crate::pagination::{page_number, Paginator};

async fn user_posts<G: BlogGlobal>(req: Request<Body>) -> Result<Response<Body>> {
    let global = req.get_global::<G>()?;

    let username = req.param("username").unwrap();

    let user = User::get_by_username(global.db(), username)
        .await
        .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch user"))?
        .map_err_route((StatusCode::NOT_FOUND, "user not found"))?;

    let page = page_number(super::query_param(&req, "page").as_deref());
    let paginator = Paginator::new(global.config::<ApiConfig>().page_size);

    let feed = Post::paginate(global.db(), PostFilter::Author(user.id), &paginator, page)
        .await
        .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch posts"))?;

    let response = AuthorFeedResponse {
        author: user.into(),
        feed: feed.into(),
    };

    Ok(make_response!(StatusCode::OK, json!(response)))
}

pub fn routes<G: BlogGlobal>(_: &Arc<G>) -> Router<Body, RouteError<ApiError>> {
    Router::builder()
        .get("/:username/posts", user_posts::<G>)
        .build()
        .expect("failed to build router")
}
