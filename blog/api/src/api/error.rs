use common::http::RouteError;

use super::middleware::auth::AuthError;

pub type Result<T, E = RouteError<ApiError>> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("failed to parse http body: {0}")]
    ParseHttpBody(#[from] hyper::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("json error: {0}")]
    ParseJson(#[from] serde_json::Error),
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),
}
