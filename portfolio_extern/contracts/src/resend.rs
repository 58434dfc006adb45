use std::future::Future;

/// Client for the Resend transactional email API.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ResendApiService: Send + Sync + 'static {
    /// Submit an email for delivery and return the id assigned by the
    /// provider.
    fn send_email(
        &self,
        email: ResendEmail,
    ) -> impl Future<Output = anyhow::Result<ResendEmailId>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResendEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: ResendEmailBody,
    pub reply_to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResendEmailBody {
    Html(String),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResendEmailId(pub String);

#[cfg(feature = "mock")]
impl MockResendApiService {
    pub fn with_send_email(mut self, email: ResendEmail, result: ResendEmailId) -> Self {
        self.expect_send_email()
            .once()
            .with(mockall::predicate::eq(email))
            .return_once(move |_| Box::pin(std::future::ready(Ok(result))));
        self
    }
}
