use std::sync::Arc;

use common::http::RouteError;
use common::make_response;
use hyper::server::conn::Http;
use hyper::{Body, Request, Response, StatusCode};
use routerify::{RequestServiceBuilder, Router};
use serde_json::json;
use tokio::net::TcpSocket;
use tokio::select;

use crate::config::ApiConfig;
use crate::global::BlogGlobal;

mod error;
mod middleware;
mod request_context;

pub mod v1;

pub use error::ApiError;

use self::error::Result;

async fn not_found(_: Request<Body>) -> Result<Response<Body>> {
    Ok(make_response!(
        StatusCode::NOT_FOUND,
        json!({ "message": "Not Found", "success": false })
    ))
}

pub fn routes<G: BlogGlobal>(global: &Arc<G>) -> Router<Body, RouteError<ApiError>> {
    let weak = Arc::downgrade(global);
    Router::builder()
        .data(weak)
        .err_handler_with_info(common::http::error_handler::<ApiError>)
        // The CORS middleware adds the CORS headers to the response
        .middleware(middleware::cors::cors_middleware(global))
        // The auth middleware resolves the forwarded identity header into a
        // user and stores it on the request context. It does not fail the
        // request when the header is absent.
        .middleware(middleware::auth::auth_middleware(global))
        .scope("/v1", v1::routes(global))
        .any(not_found)
        .build()
        .expect("failed to build router")
}

pub async fn run<G: BlogGlobal>(global: Arc<G>) -> anyhow::Result<()> {
    let config = global.config::<ApiConfig>();
    tracing::info!("listening on {}", config.bind_address);
    let socket = if config.bind_address.is_ipv6() {
        TcpSocket::new_v6()?
    } else {
        TcpSocket::new_v4()?
    };

    socket.set_reuseaddr(true)?;
    socket.set_reuseport(true)?;
    socket.bind(config.bind_address)?;
    let listener = socket.listen(1024)?;

    // The request service holds a Weak reference to the global state, so an
    // open keep-alive connection cannot pin the global state alive and stall
    // the shutdown.
    let request_service = RequestServiceBuilder::new(routes(&global)).expect("failed to build request service");

    loop {
        select! {
            _ = global.ctx().done() => {
                return Ok(());
            },
            r = listener.accept() => {
                let (socket, addr) = r?;

                let service = request_service.build(addr);

                tracing::debug!("accepted connection from {}", addr);

                tokio::spawn(async move {
                    Http::new().serve_connection(socket, service).with_upgrades().await.ok();
                });
            },
        }
    }
}
