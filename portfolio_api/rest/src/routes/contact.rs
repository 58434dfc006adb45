use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Response,
    routing, Json, Router,
};
use portfolio_core_contact_contracts::{ContactFeatureService, ContactSubmitError};
use portfolio_utils::Apply;
use tracing::debug;

use super::{error, response};
use crate::{
    middlewares::rate_limit,
    models::{
        contact::{ApiContactMessage, ApiFieldError},
        ApiResponse,
    },
    RestServerRateLimit,
};

pub const SUCCESS_MESSAGE: &str = "Message received! I'll get back to you soon.";
pub const FAILURE_MESSAGE: &str = "Failed to send message. Please try again later.";

pub fn router(
    service: Arc<impl ContactFeatureService>,
    rate_limit: RestServerRateLimit,
) -> Router<()> {
    Router::new()
        .route("/contact", routing::post(submit_message))
        .with_state(service)
        .apply(rate_limit::add_to_routes(
            rate_limit,
            "Too many contact form submissions, please try again later.",
        ))
}

async fn submit_message(
    service: State<Arc<impl ContactFeatureService>>,
    message: Result<Json<ApiContactMessage>, JsonRejection>,
) -> Response {
    let Json(message) = match message {
        Ok(message) => message,
        Err(rejection) => {
            debug!("rejected contact form body: {rejection}");
            return error(StatusCode::BAD_REQUEST, "Invalid request body");
        }
    };

    match service.submit_message(message.into()).await {
        Ok(delivery) => {
            debug!(?delivery, "contact message accepted");
            response(StatusCode::OK, ApiResponse::ok(SUCCESS_MESSAGE))
        }
        Err(ContactSubmitError::Validation(violations)) => response(
            StatusCode::BAD_REQUEST,
            ApiResponse {
                success: false,
                message: "Validation failed",
                errors: Some(
                    violations
                        .into_iter()
                        .map(ApiFieldError::from)
                        .collect::<Vec<_>>(),
                ),
            },
        ),
        Err(ContactSubmitError::Send) => {
            tracing::error!("email transport rejected the admin notification");
            error(StatusCode::INTERNAL_SERVER_ERROR, FAILURE_MESSAGE)
        }
        Err(ContactSubmitError::Other(err)) => {
            tracing::error!("Failed to send contact message: {err:#}");
            error(StatusCode::INTERNAL_SERVER_ERROR, FAILURE_MESSAGE)
        }
    }
}
