use std::sync::Arc;

use common::http::ext::*;
use common::http::RouteError;
use common::make_response;
use hyper::{Body, Request, Response, StatusCode};
use routerify::prelude::RequestExt;
use routerify::Router;
use serde_json::json;

use super::models::GroupFeedResponse;
use crate::api::error::{ApiError, Result};
use crate::config::ApiConfig;
use crate::database::{Group, Post, PostFilter};
use crate::global::BlogGlobal;
use crate::pagination::{page_number, Paginator};

async fn group_posts<G: BlogGlobal>(req: Request<Body>) -> Result<Response<Body>> {
    let global = req.get_global::<G>()?;

    let slug = req.param("slug").unwrap();

    let group = Group::get_by_slug(global.db(), slug)
        .await
        .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch group"))?
        .map_err_route((StatusCode::NOT_FOUND, "group not found"))?;

    let page = page_number(super::query_param(&req, "page").as_deref());
    let paginator = Paginator::new(global.config::<ApiConfig>().page_size);

    let feed = Post::paginate(global.db(), PostFilter::Group(group.id), &paginator, page)
        .await
        .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch posts"))?;

    let response = GroupFeedResponse {
        group: group.into(),
        feed: feed.into(),
    };

    Ok(make_response!(StatusCode::OK, json!(response)))
}

pub fn routes<G: BlogGlobal>(_: &Arc<G>) -> Router<Body, RouteError<ApiError>> {
    Router::builder()
        .get("/:slug/posts", group_posts::<G>)
        .build()
        .expect("failed to build router")
}
