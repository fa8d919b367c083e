use std::sync::Arc;

use common::http::ext::*;
use common::http::RouteError;
use hyper::{Body, StatusCode};
use routerify::prelude::RequestExt;
use routerify::Middleware;

use crate::api::error::ApiError;
use crate::api::request_context::RequestContext;
use crate::database::User;
use crate::global::BlogGlobal;

/// The header a trusted upstream proxy uses to forward the authenticated
/// username. Requests without it are anonymous.
pub const IDENTITY_HEADER: &str = "x-identity";

#[derive(thiserror::Error, Debug, Clone)]
pub enum AuthError {
    #[error("identity must be ascii only")]
    HeaderToStr,
    #[error("unknown identity")]
    UnknownIdentity,
}

pub fn auth_middleware<G: BlogGlobal>(_: &Arc<G>) -> Middleware<Body, RouteError<ApiError>> {
    Middleware::pre(|req| async move {
        let context = RequestContext::default();
        req.set_context(context.clone());

        let Some(identity) = req.headers().get(IDENTITY_HEADER) else {
            // No identity header
            return Ok(req);
        };

        let global = req.get_global::<G>()?;

        let username = identity
            .to_str()
            .map_err(|_| (StatusCode::BAD_REQUEST, "invalid identity header", AuthError::HeaderToStr))?;

        let user = User::get_by_username(global.db(), username)
            .await
            .map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch user"))?
            .map_err_route((StatusCode::UNAUTHORIZED, "unknown identity", AuthError::UnknownIdentity))?;

        context.set_user(user).await;

        Ok(req)
    })
}
