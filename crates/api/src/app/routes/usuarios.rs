use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Extension, Path},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use cadastro_infra::StoreError;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_usuarios).post(create_usuario))
        .route(
            "/:id",
            get(get_usuario).put(update_usuario).delete(delete_usuario),
        )
}

/// `GET /usuarios` — all rows, id ascending.
pub async fn list_usuarios(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let started = Instant::now();
    match services.store().list().await {
        Ok(usuarios) => {
            tracing::debug!(
                rows = usuarios.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "listed usuarios"
            );
            (StatusCode::OK, Json(usuarios)).into_response()
        }
        Err(e) => errors::internal_error(e),
    }
}

/// `GET /usuarios/:id` — one row, or 404.
pub async fn get_usuario(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    // The id space is integers; a non-integer id cannot name a row.
    let Ok(id) = id.parse::<i32>() else {
        return errors::not_found();
    };

    match services.store().get(id).await {
        Ok(Some(usuario)) => (StatusCode::OK, Json(usuario)).into_response(),
        Ok(None) => errors::not_found(),
        Err(e) => errors::internal_error(e),
    }
}

/// `POST /usuarios` — validate, insert, 201 with `Location` header.
pub async fn create_usuario(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::UsuarioBody>,
) -> axum::response::Response {
    // Required-field validation happens before any store interaction.
    let draft = match body.into_draft() {
        Ok(d) => d,
        Err(e) => {
            tracing::debug!(error = %e, "create rejected");
            return errors::json_info(StatusCode::BAD_REQUEST, "required fields missing");
        }
    };

    match services.store().insert(draft).await {
        Ok(usuario) => {
            tracing::info!(id = usuario.id, "usuario created");
            (
                StatusCode::CREATED,
                [(header::LOCATION, format!("/usuarios/{}", usuario.id))],
                Json(usuario),
            )
                .into_response()
        }
        Err(StoreError::DuplicateEmail) => {
            errors::json_info(StatusCode::CONFLICT, "email already registered")
        }
        Err(e) => errors::internal_error(e),
    }
}

/// `PUT /usuarios/:id` — full replacement of the mutable fields.
pub async fn update_usuario(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UsuarioBody>,
) -> axum::response::Response {
    let Ok(id) = id.parse::<i32>() else {
        return errors::not_found();
    };

    match services.store().update(id, body.into_update()).await {
        Ok(Some(usuario)) => {
            tracing::info!(id = usuario.id, "usuario updated");
            (StatusCode::OK, Json(usuario)).into_response()
        }
        Ok(None) => errors::not_found(),
        Err(StoreError::DuplicateEmail) => errors::json_info(
            StatusCode::CONFLICT,
            "email already registered to another user",
        ),
        Err(e) => errors::internal_error(e),
    }
}

/// `DELETE /usuarios/:id` — 200 confirmation including the id, or 404.
pub async fn delete_usuario(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let Ok(id) = id.parse::<i32>() else {
        return errors::not_found();
    };

    match services.store().delete(id).await {
        Ok(true) => {
            tracing::info!(id, "usuario deleted");
            errors::json_info(StatusCode::OK, format!("usuario {id} deleted"))
        }
        Ok(false) => errors::not_found(),
        Err(e) => errors::internal_error(e),
    }
}
