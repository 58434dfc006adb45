use anyhow::anyhow;
use lettre::{
    message::{header, MessageBuilder},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use portfolio_email_contracts::{ContentType, Email, EmailService, Transport};
use portfolio_extern_contracts::resend::{ResendApiService, ResendEmail, ResendEmailBody};
use portfolio_extern_impl::resend::{ResendApiServiceConfig, ResendApiServiceImpl};
use portfolio_models::{email_address::EmailAddressWithName, Sensitive};
use portfolio_utils::{trace_instrument, Apply};
use tracing::{debug, info};
use url::Url;

pub use transport::{SmtpTransportConfig, TransactionalApiTransportConfig, TransportConfig};

mod transport;

#[derive(Debug, Clone)]
pub struct EmailServiceImpl {
    inner: Inner,
}

#[derive(Debug, Clone)]
enum Inner {
    Smtp {
        from: EmailAddressWithName,
        transport: AsyncSmtpTransport<Tokio1Executor>,
    },
    TransactionalApi {
        from: String,
        api: ResendApiServiceImpl,
    },
    None,
}

impl EmailServiceImpl {
    pub fn new(config: TransportConfig) -> anyhow::Result<Self> {
        let inner = match config {
            TransportConfig::Smtp(SmtpTransportConfig {
                host,
                port,
                username,
                password,
                secure,
                from,
            }) => {
                let builder = if secure {
                    AsyncSmtpTransport::<Tokio1Executor>::relay(&host)?
                } else {
                    AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host)?
                };
                let transport = builder
                    .port(port)
                    .credentials(Credentials::new(username, password.0))
                    .build();
                info!(%host, port, secure, "using smtp email transport");
                Inner::Smtp { from, transport }
            }
            TransportConfig::TransactionalApi(TransactionalApiTransportConfig {
                api_key,
                from,
                endpoint_override,
            }) => {
                let api = ResendApiServiceImpl::new(ResendApiServiceConfig::new(
                    &api_key.0,
                    endpoint_override,
                ))?;
                info!("using transactional api email transport");
                Inner::TransactionalApi { from, api }
            }
            TransportConfig::None => {
                info!("no email transport configured, emails will only be logged");
                Inner::None
            }
        };

        Ok(Self { inner })
    }

    /// Convenience constructor for a transactional api transport pointing at
    /// a custom endpoint.
    pub fn transactional_api(api_key: &str, from: String, endpoint: Url) -> anyhow::Result<Self> {
        Self::new(TransportConfig::TransactionalApi(
            TransactionalApiTransportConfig {
                api_key: Sensitive(api_key.into()),
                from,
                endpoint_override: Some(endpoint),
            },
        ))
    }
}

impl EmailService for EmailServiceImpl {
    fn transport(&self) -> Transport {
        match self.inner {
            Inner::Smtp { .. } => Transport::Smtp,
            Inner::TransactionalApi { .. } => Transport::TransactionalApi,
            Inner::None => Transport::None,
        }
    }

    #[trace_instrument(skip(self, email), fields(recipient = %email.recipient))]
    async fn send(&self, email: Email) -> anyhow::Result<bool> {
        match &self.inner {
            Inner::Smtp { from, transport } => {
                let message = Message::builder()
                    .from(from.0.clone())
                    .to(email.recipient.0.into())
                    .apply_map(email.reply_to.map(|x| x.0.into()), MessageBuilder::reply_to)
                    .subject(email.subject)
                    .header(match email.content_type {
                        ContentType::Text => header::ContentType::TEXT_PLAIN,
                        ContentType::Html => header::ContentType::TEXT_HTML,
                    })
                    .body(email.body)?;

                transport
                    .send(message)
                    .await
                    .map(|response| response.is_positive())
                    .map_err(Into::into)
            }
            Inner::TransactionalApi { from, api } => {
                let id = api
                    .send_email(ResendEmail {
                        from: from.clone(),
                        to: vec![email.recipient.to_string()],
                        subject: email.subject,
                        body: match email.content_type {
                            ContentType::Text => ResendEmailBody::Text(email.body),
                            ContentType::Html => ResendEmailBody::Html(email.body),
                        },
                        reply_to: email.reply_to.map(|x| x.to_string()),
                    })
                    .await?;
                debug!(id = %id.0, "email accepted by transactional api");
                Ok(true)
            }
            Inner::None => Err(anyhow!("No email transport configured")),
        }
    }

    async fn ping(&self) -> anyhow::Result<()> {
        match &self.inner {
            Inner::Smtp { transport, .. } => transport
                .test_connection()
                .await?
                .then_some(())
                .ok_or_else(|| anyhow!("Failed to ping smtp server")),
            Inner::TransactionalApi { .. } | Inner::None => Ok(()),
        }
    }
}
