//! Request handlers for the mock documents API.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use doclist_logging::{doclist_debug, doclist_info, doclist_warn};
use serde::Deserialize;
use serde_json::json;

use crate::DocumentStore;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub name: Option<String>,
}

/// `GET /documents[?name=...]`
pub async fn list_documents(
    State(store): State<DocumentStore>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let documents = store.list(params.name.as_deref()).await;
    doclist_debug!(
        "List name={:?} -> {} documents",
        params.name,
        documents.len()
    );
    Json(documents)
}

/// `DELETE /documents/:id`. Unknown ids still answer 200.
pub async fn delete_document(
    State(store): State<DocumentStore>,
    Path(id): Path<String>,
) -> StatusCode {
    let removed = store.delete(&id).await;
    doclist_info!("Delete id={} removed={}", id, removed);
    StatusCode::OK
}

/// `POST /document` with a multipart `file` field.
pub async fn upload_document(
    State(store): State<DocumentStore>,
    mut multipart: Multipart,
) -> Response {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                doclist_warn!("Malformed multipart upload: {}", err);
                return error_response(StatusCode::BAD_REQUEST, "malformed multipart body");
            }
        };
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("unnamed").to_string();
        let data = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => {
                doclist_warn!("Failed to read upload {}: {}", file_name, err);
                return error_response(StatusCode::BAD_REQUEST, "could not read file");
            }
        };

        let document = store.insert(file_name, data.len()).await;
        doclist_info!(
            "Stored upload id={} name={} size={}kb",
            document.id,
            document.name,
            document.size
        );
        return Json(document).into_response();
    }

    error_response(StatusCode::UNPROCESSABLE_ENTITY, "missing file field")
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
