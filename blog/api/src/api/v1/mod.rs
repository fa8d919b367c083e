use std::sync::Arc;

use common::http::RouteError;
use hyper::{Body, Request};
use routerify::Router;

use super::error::ApiError;
use crate::global::BlogGlobal;

pub mod groups;
pub mod health;
pub mod models;
pub mod posts;
pub mod users;

pub fn routes<G: BlogGlobal>(global: &Arc<G>) -> Router<Body, RouteError<ApiError>> {
    Router::builder()
        .scope("/health", health::routes(global))
        .scope("/posts", posts::routes(global))
        .scope("/groups", groups::routes(global))
        .scope("/users", users::routes(global))
        .build()
        .expect("failed to build router")
}

fn query_param(req: &Request<Body>, name: &str) -> Option<String> {
    req.uri().query().and_then(|v| {
        url::form_urlencoded::parse(v.as_bytes()).find_map(|(k, v)| {
            if k == name {
                Some(v.to_string())
            } else {
                None
            }
        })
    })
}
