//! Stand-ins for external services, used for local development and tests.

pub mod resend;
