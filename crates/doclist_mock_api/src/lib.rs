//! In-memory stand-in for the documents REST API, used for local runs and
//! end-to-end tests of the client.

mod handlers;
mod store;

use std::future::Future;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tokio::net::TcpListener;

pub use store::{DocumentStore, StoredDocument};

/// Address used when `DOCLIST_MOCK_ADDR` is unset.
pub const DEFAULT_ADDR: &str = "127.0.0.1:4000";
/// Environment variable overriding the bind address.
pub const ADDR_ENV: &str = "DOCLIST_MOCK_ADDR";
/// Request body limit, above the client's own upload cap.
pub const MAX_REQUEST_BYTES: usize = 16 * 1024 * 1024;

pub fn router(store: DocumentStore) -> Router {
    Router::new()
        .route("/documents", get(handlers::list_documents))
        .route("/documents/:id", delete(handlers::delete_document))
        .route("/document", post(handlers::upload_document))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
        .with_state(store)
}

/// Serves the API on `listener` until `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    store: DocumentStore,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown)
        .await
}
