use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::models::ApiResponse;

pub mod contact;
pub mod health;
pub mod portfolio;

pub fn internal_server_error(err: impl Into<anyhow::Error>) -> Response {
    let err = err.into();
    tracing::error!("internal server error: {err:#}");
    error(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong!")
}

pub fn error(code: StatusCode, message: &'static str) -> Response {
    response(code, ApiResponse::error(message))
}

pub fn response<E: Serialize>(code: StatusCode, body: ApiResponse<E>) -> Response {
    (code, Json(body)).into_response()
}

pub async fn api_not_found() -> Response {
    error(StatusCode::NOT_FOUND, "API route not found")
}
