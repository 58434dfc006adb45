use portfolio_models::{email_address::EmailAddressWithName, Sensitive};
use url::Url;

/// The email transport to use, selected once from the configured credentials.
#[derive(Debug, Clone)]
pub enum TransportConfig {
    Smtp(SmtpTransportConfig),
    TransactionalApi(TransactionalApiTransportConfig),
    None,
}

#[derive(Debug, Clone)]
pub struct SmtpTransportConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: Sensitive<String>,
    /// Use implicit TLS instead of STARTTLS.
    pub secure: bool,
    pub from: EmailAddressWithName,
}

#[derive(Debug, Clone)]
pub struct TransactionalApiTransportConfig {
    pub api_key: Sensitive<String>,
    pub from: String,
    pub endpoint_override: Option<Url>,
}

impl TransportConfig {
    /// SMTP takes precedence over the transactional api if both are
    /// available.
    pub fn select(
        smtp: Option<SmtpTransportConfig>,
        transactional_api: Option<TransactionalApiTransportConfig>,
    ) -> Self {
        match (smtp, transactional_api) {
            (Some(smtp), _) => Self::Smtp(smtp),
            (None, Some(api)) => Self::TransactionalApi(api),
            (None, None) => Self::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use portfolio_utils::assert_matches;

    use super::*;

    fn smtp() -> SmtpTransportConfig {
        SmtpTransportConfig {
            host: "smtp.example.com".into(),
            port: 587,
            username: "user@example.com".into(),
            password: Sensitive("secret".into()),
            secure: false,
            from: "user@example.com".parse().unwrap(),
        }
    }

    fn api() -> TransactionalApiTransportConfig {
        TransactionalApiTransportConfig {
            api_key: Sensitive("re_key".into()),
            from: "Portfolio Contact <onboarding@resend.dev>".into(),
            endpoint_override: None,
        }
    }

    #[test]
    fn smtp_wins_over_api() {
        assert_matches!(
            TransportConfig::select(Some(smtp()), Some(api())),
            TransportConfig::Smtp(_)
        );
    }

    #[test]
    fn smtp_only() {
        assert_matches!(
            TransportConfig::select(Some(smtp()), None),
            TransportConfig::Smtp(_)
        );
    }

    #[test]
    fn api_only() {
        assert_matches!(
            TransportConfig::select(None, Some(api())),
            TransportConfig::TransactionalApi(_)
        );
    }

    #[test]
    fn nothing_configured() {
        assert_matches!(TransportConfig::select(None, None), TransportConfig::None);
    }
}
