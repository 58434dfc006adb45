use anyhow::Context;
use portfolio_config::{EmailConfig, SmtpConfig, TransactionalApiConfig};
use portfolio_email_impl::{
    EmailServiceImpl, SmtpTransportConfig, TransactionalApiTransportConfig, TransportConfig,
};
use portfolio_models::{email_address::EmailAddressWithName, Sensitive};

/// Create the email service for the transport selected by the configured
/// credentials.
pub fn connect(config: &EmailConfig) -> anyhow::Result<EmailServiceImpl> {
    EmailServiceImpl::new(transport_config(config)?)
        .context("Failed to initialize the email transport")
}

pub fn transport_config(config: &EmailConfig) -> anyhow::Result<TransportConfig> {
    let smtp = config
        .smtp
        .is_configured()
        .then(|| smtp_transport_config(&config.smtp))
        .transpose()?;
    let transactional_api = transactional_api_transport_config(&config.transactional_api);

    Ok(TransportConfig::select(smtp, transactional_api))
}

fn smtp_transport_config(config: &SmtpConfig) -> anyhow::Result<SmtpTransportConfig> {
    let (Some(host), Some(username), Some(password)) = (
        config.host.clone(),
        config.username.clone(),
        config.password.clone(),
    ) else {
        anyhow::bail!("Incomplete smtp configuration");
    };

    let from = config
        .from()
        .unwrap_or(username.as_str())
        .parse::<EmailAddressWithName>()
        .context("Invalid smtp sender address")?;

    Ok(SmtpTransportConfig {
        host,
        port: config.port(),
        username,
        password: Sensitive(password),
        secure: config.secure(),
        from,
    })
}

fn transactional_api_transport_config(
    config: &TransactionalApiConfig,
) -> Option<TransactionalApiTransportConfig> {
    config
        .api_key()
        .map(|api_key| TransactionalApiTransportConfig {
            api_key: Sensitive(api_key.into()),
            from: config.from().into(),
            endpoint_override: config.endpoint_override.clone(),
        })
}
