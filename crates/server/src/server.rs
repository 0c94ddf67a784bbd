use std::{future::Future, sync::Arc};

use axum::{
    Json, Router,
    extract::Request,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, put},
};

use crate::{transactions, types::Status};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Rewrites error bodies produced by [`crate::ServerError`] so they name the
/// request path.
async fn error_path(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let response = next.run(request).await;

    match response.extensions().get::<Status>().cloned() {
        Some(body) => (response.status(), Json(body.with_path(path))).into_response(),
        None => response,
    }
}

/// Builds the `/transactionservice` routes on top of `state`.
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route(
            "/transactionservice/transaction/{id}",
            put(transactions::put_transaction).get(transactions::get_transaction),
        )
        .route(
            "/transactionservice/types/{type}",
            get(transactions::get_ids_by_type),
        )
        .route("/transactionservice/sum/{id}", get(transactions::get_sum))
        .route_layer(middleware::from_fn(error_path))
        .with_state(state)
}

/// Serves the API on `listener` until `shutdown` resolves.
pub async fn run_with_listener(
    engine: Arc<Engine>,
    listener: tokio::net::TcpListener,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(
        "Server listening on {} with {} sums",
        addr,
        engine.strategy().as_str()
    );

    let state = ServerState { engine };

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Serves the API on a background task and returns the bound address.
pub fn spawn_with_listener(
    engine: Arc<Engine>,
    listener: tokio::net::TcpListener,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener, shutdown).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
