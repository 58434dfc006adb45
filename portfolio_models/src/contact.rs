//! Contact form submissions and their validation rules.
//!
//! Raw input is trimmed before any length check. Validation either accepts
//! all four fields or rejects the submission with one [`FieldViolation`] per
//! offending field.

use nutype::nutype;

use crate::email_address::EmailAddress;

/// A validated and normalized contact form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: ContactName,
    pub email: EmailAddress,
    pub subject: ContactSubject,
    pub message: ContactMessageContent,
}

/// Unvalidated contact form fields as received from the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSubmissionInput {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[nutype(
    sanitize(trim),
    validate(len_char_min = 2, len_char_max = 50),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactName(String);

#[nutype(
    sanitize(trim),
    validate(len_char_min = 2, len_char_max = 100),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactSubject(String);

#[nutype(
    sanitize(trim),
    validate(len_char_min = 5, len_char_max = 1000),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactMessageContent(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    Name,
    Email,
    Subject,
    Message,
}

impl ContactField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Subject => "subject",
            Self::Message => "message",
        }
    }

    /// User facing description of the rule this field has to satisfy.
    pub fn requirement(self) -> &'static str {
        match self {
            Self::Name => "Name must be between 2 and 50 characters",
            Self::Email => "Please provide a valid email address",
            Self::Subject => "Subject must be between 2 and 100 characters",
            Self::Message => "Message must be between 5 and 1000 characters",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    TooShort,
    TooLong,
    InvalidFormat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: ContactField,
    pub constraint: Constraint,
    /// The offending value, after trimming.
    pub value: String,
}

impl FieldViolation {
    pub fn message(&self) -> &'static str {
        self.field.requirement()
    }
}

impl ContactSubmission {
    /// Validate and normalize the raw contact form fields.
    ///
    /// All fields are checked, so the error contains every violation and not
    /// only the first one.
    pub fn validate(input: ContactSubmissionInput) -> Result<Self, Vec<FieldViolation>> {
        let ContactSubmissionInput {
            name,
            email,
            subject,
            message,
        } = input;

        let mut violations = Vec::new();

        let name = ContactName::try_new(name.as_str()).map_err(|err| {
            let constraint = match err {
                ContactNameError::LenCharMinViolated => Constraint::TooShort,
                ContactNameError::LenCharMaxViolated => Constraint::TooLong,
            };
            violation(ContactField::Name, constraint, &name)
        });

        let email = normalize_email(&email)
            .parse::<EmailAddress>()
            .ok()
            .filter(|address| has_public_domain(address.0.domain()))
            .ok_or_else(|| violation(ContactField::Email, Constraint::InvalidFormat, &email));

        let subject = ContactSubject::try_new(subject.as_str()).map_err(|err| {
            let constraint = match err {
                ContactSubjectError::LenCharMinViolated => Constraint::TooShort,
                ContactSubjectError::LenCharMaxViolated => Constraint::TooLong,
            };
            violation(ContactField::Subject, constraint, &subject)
        });

        let message = ContactMessageContent::try_new(message.as_str()).map_err(|err| {
            let constraint = match err {
                ContactMessageContentError::LenCharMinViolated => Constraint::TooShort,
                ContactMessageContentError::LenCharMaxViolated => Constraint::TooLong,
            };
            violation(ContactField::Message, constraint, &message)
        });

        let name = name.map_err(|v| violations.push(v));
        let email = email.map_err(|v| violations.push(v));
        let subject = subject.map_err(|v| violations.push(v));
        let message = message.map_err(|v| violations.push(v));

        match (name, email, subject, message) {
            (Ok(name), Ok(email), Ok(subject), Ok(message)) => Ok(Self {
                name,
                email,
                subject,
                message,
            }),
            _ => Err(violations),
        }
    }
}

/// Normalize an email address for comparison and delivery.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Reply addresses need a dotted domain ending in an alphabetic top level
/// label. Address literals and single label hosts are rejected.
fn has_public_domain(domain: &str) -> bool {
    let Some((_, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !domain.starts_with('[')
        && domain.split('.').all(|label| !label.is_empty())
        && (tld.starts_with("xn--")
            || tld.len() >= 2 && tld.chars().all(|c| c.is_alphabetic()))
}

fn violation(field: ContactField, constraint: Constraint, value: &str) -> FieldViolation {
    FieldViolation {
        field,
        constraint,
        value: value.trim().into(),
    }
}

#[cfg(test)]
mod tests {
    use portfolio_utils::assert_matches;
    use pretty_assertions::assert_eq;

    use super::*;

    fn input(name: &str, email: &str, subject: &str, message: &str) -> ContactSubmissionInput {
        ContactSubmissionInput {
            name: name.into(),
            email: email.into(),
            subject: subject.into(),
            message: message.into(),
        }
    }

    #[test]
    fn ok() {
        // Act
        let result = ContactSubmission::validate(input("Al", "a@b.com", "Hi", "Hello there"));

        // Assert
        let submission = result.unwrap();
        assert_eq!(*submission.name, "Al");
        assert_eq!(submission.email.as_str(), "a@b.com");
        assert_eq!(*submission.subject, "Hi");
        assert_eq!(*submission.message, "Hello there");
    }

    #[test]
    fn trims_and_normalizes() {
        // Act
        let result = ContactSubmission::validate(input(
            "  Max Mustermann \n",
            "  Max.Mustermann@Example.DE ",
            "\tQuestion ",
            "\n Line one\nLine two \n",
        ));

        // Assert
        let submission = result.unwrap();
        assert_eq!(*submission.name, "Max Mustermann");
        assert_eq!(submission.email.as_str(), "max.mustermann@example.de");
        assert_eq!(*submission.subject, "Question");
        assert_eq!(*submission.message, "Line one\nLine two");
    }

    #[test]
    fn trimming_is_idempotent() {
        let first =
            ContactSubmission::validate(input("  Al  ", " a@b.com ", " Hi ", " Hello there "))
                .unwrap();

        let second = ContactSubmission::validate(input(
            &first.name,
            first.email.as_str(),
            &first.subject,
            &first.message,
        ))
        .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn reports_every_violation() {
        // Act
        let result = ContactSubmission::validate(input("A", "bad", "", ""));

        // Assert
        let violations = result.unwrap_err();
        assert_eq!(
            violations,
            [
                FieldViolation {
                    field: ContactField::Name,
                    constraint: Constraint::TooShort,
                    value: "A".into(),
                },
                FieldViolation {
                    field: ContactField::Email,
                    constraint: Constraint::InvalidFormat,
                    value: "bad".into(),
                },
                FieldViolation {
                    field: ContactField::Subject,
                    constraint: Constraint::TooShort,
                    value: "".into(),
                },
                FieldViolation {
                    field: ContactField::Message,
                    constraint: Constraint::TooShort,
                    value: "".into(),
                },
            ]
        );
    }

    #[test]
    fn email_needs_public_domain() {
        for email in [
            "a@b",
            "a@localhost",
            "a@[127.0.0.1]",
            "a@1.2.3.4",
            "a@example.c",
            "a@example.",
        ] {
            let violations =
                ContactSubmission::validate(input("Al", email, "Hi", "Hello there")).unwrap_err();
            assert_eq!(
                violations,
                [FieldViolation {
                    field: ContactField::Email,
                    constraint: Constraint::InvalidFormat,
                    value: email.into(),
                }],
                "{email}"
            );
        }

        for email in ["a@sub.example.co.uk", "a@example.xn--p1ai"] {
            let submission =
                ContactSubmission::validate(input("Al", email, "Hi", "Hello there")).unwrap();
            assert_eq!(submission.email.as_str(), email);
        }
    }

    #[test]
    fn whitespace_only_is_too_short() {
        let violations =
            ContactSubmission::validate(input("Al", "a@b.com", "Hi", "       ")).unwrap_err();

        assert_matches!(
            violations.as_slice(),
            [FieldViolation {
                field: ContactField::Message,
                constraint: Constraint::TooShort,
                ..
            }]
        );
    }

    #[test]
    fn length_bounds() {
        let name = "x".repeat(50);
        let subject = "x".repeat(100);
        let message = "x".repeat(1000);
        ContactSubmission::validate(input(&name, "a@b.com", &subject, &message)).unwrap();

        let name = "x".repeat(51);
        let subject = "x".repeat(101);
        let message = "x".repeat(1001);
        let violations =
            ContactSubmission::validate(input(&name, "a@b.com", &subject, &message)).unwrap_err();

        assert_eq!(
            violations
                .iter()
                .map(|v| (v.field, v.constraint))
                .collect::<Vec<_>>(),
            [
                (ContactField::Name, Constraint::TooLong),
                (ContactField::Subject, Constraint::TooLong),
                (ContactField::Message, Constraint::TooLong),
            ]
        );
    }

    #[test]
    fn counts_characters_not_bytes() {
        // 2 characters, 6 bytes
        let result = ContactSubmission::validate(input("王明", "a@b.com", "Hi", "Hello there"));
        result.unwrap();
    }

    #[test]
    fn messages_match_enforced_bounds() {
        assert_eq!(
            ContactField::Message.requirement(),
            "Message must be between 5 and 1000 characters"
        );
        assert_eq!(
            ContactField::Subject.requirement(),
            "Subject must be between 2 and 100 characters"
        );
    }
}
