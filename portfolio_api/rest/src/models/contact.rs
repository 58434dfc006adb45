use portfolio_models::contact::{ContactSubmissionInput, FieldViolation};
use serde::{Deserialize, Serialize};

/// Raw contact form. Missing fields are empty so that they are reported as
/// validation errors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl From<ApiContactMessage> for ContactSubmissionInput {
    fn from(value: ApiContactMessage) -> Self {
        Self {
            name: value.name,
            email: value.email,
            subject: value.subject,
            message: value.message,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiFieldError {
    pub field: &'static str,
    pub message: &'static str,
    pub value: String,
}

impl From<FieldViolation> for ApiFieldError {
    fn from(value: FieldViolation) -> Self {
        Self {
            field: value.field.as_str(),
            message: value.message(),
            value: value.value,
        }
    }
}
