//! Builds the outgoing contact emails from a validated submission.

use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use portfolio_models::{contact::ContactSubmission, email_address::EmailAddress};
use portfolio_templates_contracts::{
    AdminNotificationTemplate, Profile, SenderAcknowledgmentTemplate,
};

/// Characters left alone by `encodeURIComponent`, which is what mail clients
/// expect in a `mailto:` query.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn admin_subject(submission: &ContactSubmission) -> String {
    format!("Portfolio Contact: {}", *submission.subject)
}

pub fn acknowledgment_subject(submission: &ContactSubmission) -> String {
    format!("Thank you for contacting me - {}", *submission.subject)
}

pub fn admin_notification(
    submission: &ContactSubmission,
    received_at: DateTime<Utc>,
) -> AdminNotificationTemplate {
    AdminNotificationTemplate {
        name: submission.name.to_string(),
        email: submission.email.to_string(),
        subject: submission.subject.to_string(),
        message: submission.message.to_string(),
        received_at: received_at
            .format("%A, %B %-d, %Y at %I:%M:%S %p UTC")
            .to_string(),
        reply_url: reply_url(&submission.email, &submission.subject),
    }
}

pub fn sender_acknowledgment(
    submission: &ContactSubmission,
    received_at: DateTime<Utc>,
    contact_email: &EmailAddress,
    profile: &Profile,
) -> SenderAcknowledgmentTemplate {
    SenderAcknowledgmentTemplate {
        subject: submission.subject.to_string(),
        message: submission.message.to_string(),
        received_at: received_at
            .format("%A, %B %-d, %Y at %I:%M %p UTC")
            .to_string(),
        contact_email: contact_email.to_string(),
        profile: profile.clone(),
    }
}

/// `mailto:` link that opens a reply to `email` with a `Re: ` subject.
pub fn reply_url(email: &EmailAddress, subject: &str) -> String {
    let subject = format!("Re: {subject}");
    format!(
        "mailto:{email}?subject={}",
        utf8_percent_encode(&subject, URI_COMPONENT)
    )
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use portfolio_models::contact::ContactSubmissionInput;
    use pretty_assertions::assert_eq;

    use super::*;

    fn submission() -> ContactSubmission {
        ContactSubmission::validate(ContactSubmissionInput {
            name: "Max Mustermann".into(),
            email: "max@example.com".into(),
            subject: "Job offer & more?".into(),
            message: "Hello there\nHow are you?".into(),
        })
        .unwrap()
    }

    #[test]
    fn subjects() {
        assert_eq!(
            admin_subject(&submission()),
            "Portfolio Contact: Job offer & more?"
        );
        assert_eq!(
            acknowledgment_subject(&submission()),
            "Thank you for contacting me - Job offer & more?"
        );
    }

    #[test]
    fn reply_url_encodes_subject() {
        assert_eq!(
            reply_url(&"max@example.com".parse().unwrap(), "Job offer & more?"),
            "mailto:max@example.com?subject=Re%3A%20Job%20offer%20%26%20more%3F"
        );
    }

    #[test]
    fn admin_notification_fields() {
        // Arrange
        let received_at = Utc.with_ymd_and_hms(2025, 1, 3, 14, 4, 5).unwrap();

        // Act
        let template = admin_notification(&submission(), received_at);

        // Assert
        assert_eq!(
            template,
            AdminNotificationTemplate {
                name: "Max Mustermann".into(),
                email: "max@example.com".into(),
                subject: "Job offer & more?".into(),
                message: "Hello there\nHow are you?".into(),
                received_at: "Friday, January 3, 2025 at 02:04:05 PM UTC".into(),
                reply_url: "mailto:max@example.com?subject=Re%3A%20Job%20offer%20%26%20more%3F"
                    .into(),
            }
        );
    }

    #[test]
    fn sender_acknowledgment_fields() {
        // Arrange
        let received_at = Utc.with_ymd_and_hms(2025, 1, 3, 9, 30, 0).unwrap();
        let profile = Profile {
            name: "Subash S".into(),
            title: "Full Stack Developer".into(),
            location: "Chennai, India".into(),
            website: "https://subash.zeabur.app/".into(),
            github: "https://github.com/Subash-S-66".into(),
            linkedin: "https://www.linkedin.com/in/subash-s-514aa9373".into(),
        };

        // Act
        let template = sender_acknowledgment(
            &submission(),
            received_at,
            &"owner@example.com".parse().unwrap(),
            &profile,
        );

        // Assert
        assert_eq!(
            template,
            SenderAcknowledgmentTemplate {
                subject: "Job offer & more?".into(),
                message: "Hello there\nHow are you?".into(),
                received_at: "Friday, January 3, 2025 at 09:30 AM UTC".into(),
                contact_email: "owner@example.com".into(),
                profile,
            }
        );
    }
}
