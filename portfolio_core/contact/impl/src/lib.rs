use std::sync::Arc;

use chrono::{DateTime, Utc};
use portfolio_core_contact_contracts::{
    ContactDelivery, ContactFeatureService, ContactSubmitError,
};
use portfolio_di::Build;
use portfolio_email_contracts::{ContentType, Email, EmailService, Transport};
use portfolio_models::{
    contact::{ContactSubmission, ContactSubmissionInput},
    email_address::EmailAddress,
};
use portfolio_shared_contracts::time::TimeService;
use portfolio_templates_contracts::{Profile, TemplateService};
use portfolio_utils::trace_instrument;
use tracing::{debug, info, warn};

pub mod compose;

#[derive(Debug, Clone, Build)]
pub struct ContactFeatureServiceImpl<Time, Email, Template> {
    time: Time,
    email: Email,
    template: Template,
    config: ContactFeatureConfig,
}

#[derive(Debug, Clone)]
pub struct ContactFeatureConfig {
    /// Receives the admin notification for every submission.
    pub recipient: Arc<EmailAddress>,
    pub profile: Arc<Profile>,
}

impl<Time, EmailS, Template> ContactFeatureService
    for ContactFeatureServiceImpl<Time, EmailS, Template>
where
    Time: TimeService,
    EmailS: EmailService,
    Template: TemplateService,
{
    #[trace_instrument(skip(self, input))]
    async fn submit_message(
        &self,
        input: ContactSubmissionInput,
    ) -> Result<ContactDelivery, ContactSubmitError> {
        let submission =
            ContactSubmission::validate(input).map_err(ContactSubmitError::Validation)?;

        let transport = self.email.transport();
        if transport == Transport::None {
            info!(
                name = %*submission.name,
                email = %submission.email,
                subject = %*submission.subject,
                content = %*submission.message,
                "No email transport configured. Message received but not sent via email."
            );
            return Ok(ContactDelivery::LoggedOnly);
        }

        let now = self.time.now();

        self.send_admin_notification(&submission, now).await?;
        info!(transport = transport.as_str(), "admin notification sent");

        if transport != Transport::Smtp {
            debug!("sender acknowledgment is only sent via smtp");
            return Ok(ContactDelivery::TransactionalApi);
        }

        let acknowledged = match self.send_sender_acknowledgment(&submission, now).await {
            Ok(true) => true,
            Ok(false) => {
                warn!("sender acknowledgment was rejected by the smtp server");
                false
            }
            Err(err) => {
                warn!("Failed to send sender acknowledgment: {err:#}");
                false
            }
        };

        Ok(ContactDelivery::Smtp { acknowledged })
    }
}

impl<Time, EmailS, Template> ContactFeatureServiceImpl<Time, EmailS, Template>
where
    Time: TimeService,
    EmailS: EmailService,
    Template: TemplateService,
{
    async fn send_admin_notification(
        &self,
        submission: &ContactSubmission,
        now: DateTime<Utc>,
    ) -> Result<(), ContactSubmitError> {
        let body = self
            .template
            .render(&compose::admin_notification(submission, now))?;

        let email = Email {
            recipient: (*self.config.recipient).clone(),
            subject: compose::admin_subject(submission),
            body,
            content_type: ContentType::Html,
            reply_to: Some(submission.email.clone()),
        };

        if !self.email.send(email).await? {
            return Err(ContactSubmitError::Send);
        }

        Ok(())
    }

    async fn send_sender_acknowledgment(
        &self,
        submission: &ContactSubmission,
        now: DateTime<Utc>,
    ) -> anyhow::Result<bool> {
        let body = self.template.render(&compose::sender_acknowledgment(
            submission,
            now,
            &self.config.recipient,
            &self.config.profile,
        ))?;

        self.email
            .send(Email {
                recipient: submission.email.clone(),
                subject: compose::acknowledgment_subject(submission),
                body,
                content_type: ContentType::Html,
                reply_to: Some((*self.config.recipient).clone()),
            })
            .await
    }
}
