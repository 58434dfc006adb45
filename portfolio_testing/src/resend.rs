use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

pub const EMAILS_ROUTE: &str = "/emails";

pub async fn start_server(host: IpAddr, port: u16, api_key: String) -> anyhow::Result<()> {
    info!("Starting resend testing server on {host}:{port}");
    info!("Emails endpoint: http://{host}:{port}{EMAILS_ROUTE}");
    info!("API key: {api_key:?}");
    info!("Received emails can be listed with GET http://{host}:{port}{EMAILS_ROUTE}");

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;
    axum::serve(listener, router(api_key))
        .await
        .context("Failed to start HTTP server")
}

/// Start the server on a random local port in the background and return its
/// address.
pub async fn spawn_server(api_key: String) -> anyhow::Result<SocketAddr> {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .await
        .context("Failed to bind to a local port")?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move { axum::serve(listener, router(api_key)).await });
    Ok(addr)
}

pub fn router(api_key: String) -> Router<()> {
    Router::new()
        .route(EMAILS_ROUTE, routing::post(send_email).get(list_emails))
        .with_state(Arc::new(StateInner {
            api_key,
            emails: Default::default(),
        }))
}

type AppState = State<Arc<StateInner>>;
struct StateInner {
    api_key: String,
    emails: RwLock<Vec<ReceivedEmail>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceivedEmail {
    pub id: Uuid,
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: Option<String>,
    pub text: Option<String>,
    pub reply_to: Option<String>,
}

#[derive(Deserialize)]
struct SendEmailRequest {
    from: String,
    to: Vec<String>,
    subject: String,
    html: Option<String>,
    text: Option<String>,
    reply_to: Option<String>,
}

#[derive(Serialize)]
struct SendEmailResponse {
    id: Uuid,
}

#[derive(Serialize)]
struct ErrorResponse {
    #[serde(rename = "statusCode")]
    status_code: u16,
    name: &'static str,
    message: &'static str,
}

async fn send_email(
    state: AppState,
    headers: HeaderMap,
    Json(request): Json<SendEmailRequest>,
) -> Response {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match token {
        None => {
            return error(
                StatusCode::UNAUTHORIZED,
                "missing_api_key",
                "Missing API key in the authorization header",
            )
        }
        Some(token) if token != state.api_key => {
            return error(StatusCode::FORBIDDEN, "invalid_api_key", "API key is invalid")
        }
        Some(_) => {}
    }

    if request.from.is_empty()
        || request.to.is_empty()
        || request.subject.is_empty()
        || (request.html.is_none() && request.text.is_none())
    {
        return error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "validation_error",
            "from, to, subject and one of html or text are required",
        );
    }

    let id = Uuid::new_v4();
    state.emails.write().await.push(ReceivedEmail {
        id,
        from: request.from,
        to: request.to,
        subject: request.subject,
        html: request.html,
        text: request.text,
        reply_to: request.reply_to,
    });

    Json(SendEmailResponse { id }).into_response()
}

async fn list_emails(state: AppState) -> Json<Vec<ReceivedEmail>> {
    Json(state.emails.read().await.clone())
}

fn error(status: StatusCode, name: &'static str, message: &'static str) -> Response {
    (
        status,
        Json(ErrorResponse {
            status_code: status.as_u16(),
            name,
            message,
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn spawn(api_key: &str) -> String {
        let addr = spawn_server(api_key.into()).await.unwrap();
        format!("http://{addr}{EMAILS_ROUTE}")
    }

    #[tokio::test]
    async fn records_sent_emails() {
        let url = spawn("re_key").await;
        let client = reqwest::Client::new();

        let response = client
            .post(&url)
            .bearer_auth("re_key")
            .json(&serde_json::json!({
                "from": "Portfolio Contact <onboarding@resend.dev>",
                "to": ["owner@example.com"],
                "subject": "Hello",
                "html": "<p>Hi</p>",
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let emails = client
            .get(&url)
            .send()
            .await
            .unwrap()
            .json::<Vec<ReceivedEmail>>()
            .await
            .unwrap();
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].to, ["owner@example.com"]);
        assert_eq!(emails[0].html.as_deref(), Some("<p>Hi</p>"));
    }

    #[tokio::test]
    async fn rejects_wrong_api_key() {
        let url = spawn("re_key").await;

        let response = reqwest::Client::new()
            .post(&url)
            .bearer_auth("re_other")
            .json(&serde_json::json!({
                "from": "a@example.com",
                "to": ["b@example.com"],
                "subject": "Hello",
                "text": "Hi",
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::FORBIDDEN);
    }
}
