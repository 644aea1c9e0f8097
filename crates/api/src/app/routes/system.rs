use axum::http::StatusCode;
use axum::response::IntoResponse;

/// `GET /` — static availability check, no store interaction.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "Ok - servidor disponivel")
}
