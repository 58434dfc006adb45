use std::sync::Arc;

use portfolio_extern_contracts::resend::{
    ResendApiService, ResendEmail, ResendEmailBody, ResendEmailId,
};
use portfolio_models::Sensitive;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::http::HttpClient;

pub const EMAILS_ENDPOINT: &str = "https://api.resend.com/emails";

#[derive(Debug, Clone)]
pub struct ResendApiServiceImpl {
    config: ResendApiServiceConfig,
    client: HttpClient,
}

#[derive(Debug, Clone)]
pub struct ResendApiServiceConfig {
    emails_endpoint: Arc<Url>,
    api_key: Sensitive<Arc<str>>,
}

impl ResendApiServiceConfig {
    pub fn new(api_key: &str, emails_endpoint_override: Option<Url>) -> Self {
        Self {
            emails_endpoint: emails_endpoint_override
                .unwrap_or_else(|| EMAILS_ENDPOINT.parse().unwrap())
                .into(),
            api_key: Sensitive(api_key.into()),
        }
    }
}

impl ResendApiServiceImpl {
    pub fn new(config: ResendApiServiceConfig) -> anyhow::Result<Self> {
        Ok(Self {
            config,
            client: HttpClient::new()?,
        })
    }
}

impl ResendApiService for ResendApiServiceImpl {
    async fn send_email(&self, email: ResendEmail) -> anyhow::Result<ResendEmailId> {
        let (html, text) = match &email.body {
            ResendEmailBody::Html(html) => (Some(html.as_str()), None),
            ResendEmailBody::Text(text) => (None, Some(text.as_str())),
        };

        let response = self
            .client
            .post((*self.config.emails_endpoint).clone())
            .bearer_auth(&**self.config.api_key)
            .json(&SendEmailRequest {
                from: &email.from,
                to: &email.to,
                subject: &email.subject,
                html,
                text,
                reply_to: email.reply_to.as_deref(),
            })
            .send()
            .await?
            .error_for_status()?
            .json::<SendEmailResponse>()
            .await?;

        debug!(id = %response.id, "resend accepted email");

        Ok(ResendEmailId(response.id))
    }
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

#[derive(Deserialize)]
struct SendEmailResponse {
    id: String,
}
