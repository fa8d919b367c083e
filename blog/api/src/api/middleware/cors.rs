use std::sync::Arc;
use std::time::Duration;

use common::http::RouteError;
use hyper::http::header;
use hyper::Body;
use routerify::Middleware;

use crate::api::error::ApiError;
use crate::global::BlogGlobal;

pub fn cors_middleware<G: BlogGlobal>(_: &Arc<G>) -> Middleware<Body, RouteError<ApiError>> {
    Middleware::post(|mut resp| async move {
        resp.headers_mut()
            .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*".parse().unwrap());
        resp.headers_mut()
            .insert(header::ACCESS_CONTROL_ALLOW_METHODS, "*".parse().unwrap());
        resp.headers_mut()
            .insert(header::ACCESS_CONTROL_ALLOW_HEADERS, "*".parse().unwrap());
        resp.headers_mut()
            .insert(header::ACCESS_CONTROL_EXPOSE_HEADERS, "Date".parse().unwrap());
        resp.headers_mut().insert(
            header::ACCESS_CONTROL_MAX_AGE,
            Duration::from_secs(86400).as_secs().to_string().parse().unwrap(),
        );

        Ok(resp)
    })
}
