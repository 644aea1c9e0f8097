use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use cadastro_infra::StoreError;

/// Build an `{info}` JSON response with the given status.
pub fn json_info(status: StatusCode, info: impl Into<String>) -> axum::response::Response {
    (status, Json(json!({ "info": info.into() }))).into_response()
}

/// 404 body shared by every id-scoped route.
pub fn not_found() -> axum::response::Response {
    json_info(StatusCode::NOT_FOUND, "not found")
}

/// Map a store fault to 500 with a generic body. The underlying cause is
/// logged for operators, never exposed verbatim to the caller.
pub fn internal_error(err: StoreError) -> axum::response::Response {
    tracing::error!(error = %err, "store operation failed");
    json_info(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
}
