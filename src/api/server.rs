use crate::api::routes;
use crate::config::SharedConfig;
use crate::upstream::DynUpstream;
use axum::Router;
use std::future::Future;

#[derive(Clone)]
pub(super) struct AppState {
    pub config: SharedConfig,
    pub upstream: DynUpstream,
}

/// The full API router, without binding a listener.
pub fn router(config: SharedConfig, upstream: DynUpstream) -> Router {
    routes::new(AppState { config, upstream })
}

/// Bind the configured address and serve the API until the listener fails or `shutdown`
/// resolves. On shutdown, in-flight requests are allowed to finish.
pub fn new(
    config: SharedConfig,
    upstream: DynUpstream,
    shutdown: impl Future<Output = ()>,
) -> impl Future<Output = hyper::Result<()>> {
    axum::Server::bind(&config.api_bind_addr)
        .serve(router(config.clone(), upstream).into_make_service())
        .with_graceful_shutdown(shutdown)
}
