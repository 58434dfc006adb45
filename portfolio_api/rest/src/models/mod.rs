use serde::Serialize;

pub mod contact;

/// Body of every non-json-document api response.
#[derive(Debug, Serialize)]
pub struct ApiResponse<E = ()> {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<E>,
}

impl ApiResponse {
    pub fn ok(message: &'static str) -> Self {
        Self {
            success: true,
            message,
            errors: None,
        }
    }

    pub fn error(message: &'static str) -> Self {
        Self {
            success: false,
            message,
            errors: None,
        }
    }
}
