use std::future::Future;

use portfolio_models::contact::{ContactSubmissionInput, FieldViolation};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactFeatureService: Send + Sync + 'static {
    /// Validate a contact form submission and deliver it to the site owner
    /// through the configured email transport.
    ///
    /// Validation happens before any email is sent. Only the admin
    /// notification is required to succeed, a failed sender acknowledgment
    /// is logged and otherwise ignored.
    fn submit_message(
        &self,
        input: ContactSubmissionInput,
    ) -> impl Future<Output = Result<ContactDelivery, ContactSubmitError>> + Send;
}

/// How an accepted submission was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactDelivery {
    /// Admin notification sent via SMTP, followed by an attempt to send the
    /// sender acknowledgment.
    Smtp { acknowledged: bool },
    /// Admin notification sent via the transactional api. No acknowledgment
    /// is sent on this path.
    TransactionalApi,
    /// No transport configured, the submission was only logged.
    LoggedOnly,
}

#[derive(Debug, Error)]
pub enum ContactSubmitError {
    #[error("Validation failed")]
    Validation(Vec<FieldViolation>),
    #[error("Failed to send message.")]
    Send,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockContactFeatureService {
    pub fn with_submit_message(
        mut self,
        input: ContactSubmissionInput,
        result: Result<ContactDelivery, ContactSubmitError>,
    ) -> Self {
        self.expect_submit_message()
            .once()
            .with(mockall::predicate::eq(input))
            .return_once(|_| Box::pin(std::future::ready(result)));
        self
    }
}
