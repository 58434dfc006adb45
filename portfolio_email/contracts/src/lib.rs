use std::future::Future;

use portfolio_models::email_address::EmailAddress;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait EmailService: Send + Sync + 'static {
    /// Returns the transport this service delivers emails through.
    fn transport(&self) -> Transport;

    /// Send an email. Returns `Ok(false)` if the transport rejected the
    /// message.
    fn send(&self, email: Email) -> impl Future<Output = anyhow::Result<bool>> + Send;

    fn ping(&self) -> impl Future<Output = anyhow::Result<()>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub recipient: EmailAddress,
    pub subject: String,
    pub body: String,
    pub content_type: ContentType,
    pub reply_to: Option<EmailAddress>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Text,
    Html,
}

/// The mechanism used to deliver outgoing emails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Direct SMTP relay.
    Smtp,
    /// Hosted transactional email API.
    TransactionalApi,
    /// No transport configured, emails cannot be delivered.
    None,
}

impl Transport {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Smtp => "smtp",
            Self::TransactionalApi => "transactional-api",
            Self::None => "none",
        }
    }
}

#[cfg(feature = "mock")]
impl MockEmailService {
    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.expect_transport().once().return_const(transport);
        self
    }

    pub fn with_send(mut self, email: Email, result: bool) -> Self {
        self.expect_send()
            .once()
            .with(mockall::predicate::eq(email))
            .return_once(move |_| Box::pin(std::future::ready(Ok(result))));
        self
    }

    pub fn with_send_error(mut self, email: Email, error: &'static str) -> Self {
        self.expect_send()
            .once()
            .with(mockall::predicate::eq(email))
            .return_once(move |_| Box::pin(std::future::ready(Err(anyhow::anyhow!(error)))));
        self
    }

    pub fn with_ping(mut self, result: Result<(), &'static str>) -> Self {
        self.expect_ping().once().return_once(move || {
            Box::pin(std::future::ready(result.map_err(|err| anyhow::anyhow!(err))))
        });
        self
    }
}
