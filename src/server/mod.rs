mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{delete, get, post, put},
    Router,
};

use crate::api::{DynSession, SessionAPI};
use crate::error::{unexpected_error, Error};
use crate::server::handlers::{bookings, destination, search, session};

pub fn router(api: DynSession) -> Router {
    Router::new()
        .route("/session", get(session::find))
        .route("/session/authorization", post(session::authorization))
        .route("/session/location/refresh", post(session::refresh_location))
        .route("/session/source", put(session::set_source))
        .route("/session/alert/dismiss", post(session::dismiss_alert))
        .route("/session/retry", post(session::retry))
        .route(
            "/session/destination",
            put(destination::set).delete(destination::clear),
        )
        .route("/session/map/tap", post(destination::tap))
        .route("/session/search", post(search::open).delete(search::close))
        .route("/session/search/query", put(search::query))
        .route(
            "/session/search/candidates/:id/select",
            post(search::select),
        )
        .route("/session/bookings", post(bookings::create))
        .route("/session/bookings/:id", delete(bookings::cancel))
        .layer(Extension(api))
}

pub async fn serve<T: SessionAPI + Sync + Send + 'static>(
    api: T,
    addr: SocketAddr,
) -> Result<(), Error> {
    let api = Arc::new(api) as DynSession;
    let app = router(api);

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .map_err(|err| {
            tracing::error!("server error: {:?}", err);
            unexpected_error()
        })
}
