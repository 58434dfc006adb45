pub mod http;
pub mod resend;
