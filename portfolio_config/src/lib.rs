use std::{
    collections::HashMap,
    net::IpAddr,
    path::{Path, PathBuf},
};

use anyhow::Context;
use config::{Environment, File, FileFormat};
use serde::Deserialize;
use url::Url;

pub use duration::Duration;

mod duration;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");

/// Colon separated list of additional config files, read by the cli.
pub const CONFIG_PATHS_VAR: &str = "PORTFOLIO_CONFIG";

/// Prefix of environment variables overriding single config keys, e.g.
/// `PORTFOLIO__EMAIL__SMTP__HOST`.
pub const ENV_PREFIX: &str = "PORTFOLIO";

pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const IMPLICIT_TLS_SMTP_PORT: u16 = 465;
pub const DEFAULT_TRANSACTIONAL_API_FROM: &str = "Portfolio Contact <onboarding@resend.dev>";
pub const DEFAULT_NOTIFICATION_RECIPIENT: &str = "subash.93450@gmail.com";

/// Plain environment variables used by existing deployments and the keys they
/// map to. `PORTFOLIO__*` variables take precedence over these.
const DEPLOYMENT_ENV_VARS: &[(&str, &str)] = &[
    ("PORT", "http.port"),
    ("EMAIL_HOST", "email.smtp.host"),
    ("EMAIL_PORT", "email.smtp.port"),
    ("EMAIL_USER", "email.smtp.username"),
    ("EMAIL_PASSWORD", "email.smtp.password"),
    ("EMAIL_FROM", "email.smtp.from"),
    ("RESEND_API_KEY", "email.transactional_api.api_key"),
    ("EMAIL_TO", "contact.email_to"),
    ("NOTIFICATION_EMAIL", "contact.notification_email"),
];

/// Load the bundled defaults, then `extra_paths` in order, then environment
/// overrides.
pub fn load(extra_paths: &[PathBuf]) -> anyhow::Result<Config> {
    let paths = std::iter::once(Path::new(DEFAULT_CONFIG_PATH))
        .chain(extra_paths.iter().map(PathBuf::as_path))
        .collect::<Vec<_>>();

    load_from(&paths, std::env::vars().collect())
}

pub fn load_from(
    paths: &[impl AsRef<Path>],
    env: HashMap<String, String>,
) -> anyhow::Result<Config> {
    let builder = paths
        .iter()
        .try_fold(config::Config::builder(), |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })?;

    let deployment_env = DEPLOYMENT_ENV_VARS
        .iter()
        .filter_map(|&(var, key)| {
            let value = env.get(var).filter(|value| !value.is_empty())?;
            Some((key.replace('.', "__").to_uppercase(), value.clone()))
        })
        .collect::<HashMap<_, _>>();

    builder
        .add_source(
            Environment::default()
                .separator("__")
                .source(Some(deployment_env)),
        )
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .source(Some(env)),
        )
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub contact: ContactConfig,
    pub health: HealthConfig,
    pub rate_limit: RateLimitConfig,
    pub profile: ProfileConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
    pub real_ip: Option<RealIpConfig>,
    #[serde(default, deserialize_with = "comma_separated")]
    pub allowed_origins: Vec<String>,
    /// Built frontend, served at `/` and `/projects`.
    pub static_dir: Option<PathBuf>,
    /// Downloadable files, served at `/apk` and `/projects/apk`.
    pub downloads_dir: Option<PathBuf>,
    pub content_security_policy: Option<String>,
}

/// Accepts either a list or a single comma separated string, as set from the
/// environment.
fn comma_separated<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListOrCsv {
        List(Vec<String>),
        Csv(String),
    }

    Ok(match ListOrCsv::deserialize(deserializer)? {
        ListOrCsv::List(list) => list,
        ListOrCsv::Csv(csv) => csv
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(Into::into)
            .collect(),
    })
}

#[derive(Debug, Deserialize)]
pub struct RealIpConfig {
    pub header: String,
    pub set_from: IpAddr,
}

#[derive(Debug, Default, Deserialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub transactional_api: TransactionalApiConfig,
}

#[derive(Default, Deserialize)]
pub struct SmtpConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: Option<String>,
}

impl SmtpConfig {
    /// SMTP is only used if host, username and password are all set.
    pub fn is_configured(&self) -> bool {
        [&self.host, &self.username, &self.password]
            .into_iter()
            .all(|value| value.as_deref().is_some_and(|value| !value.is_empty()))
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_SMTP_PORT)
    }

    /// Implicit TLS on the conventional port, STARTTLS otherwise.
    pub fn secure(&self) -> bool {
        self.port() == IMPLICIT_TLS_SMTP_PORT
    }

    /// The sender address, falling back to the username.
    pub fn from(&self) -> Option<&str> {
        self.from
            .as_deref()
            .filter(|from| !from.is_empty())
            .or(self.username.as_deref())
    }
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[sensitive]"))
            .field("from", &self.from)
            .finish()
    }
}

#[derive(Default, Deserialize)]
pub struct TransactionalApiConfig {
    pub api_key: Option<String>,
    pub from: Option<String>,
    pub endpoint_override: Option<Url>,
}

impl TransactionalApiConfig {
    /// The api key, if one is set.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }

    pub fn from(&self) -> &str {
        self.from
            .as_deref()
            .filter(|from| !from.is_empty())
            .unwrap_or(DEFAULT_TRANSACTIONAL_API_FROM)
    }
}

impl std::fmt::Debug for TransactionalApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionalApiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[sensitive]"))
            .field("from", &self.from)
            .field("endpoint_override", &self.endpoint_override)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactConfig {
    pub email_to: Option<String>,
    pub notification_email: Option<String>,
}

impl ContactConfig {
    /// The address receiving admin notifications: `email_to`, then
    /// `notification_email`, then the built-in default.
    pub fn notification_recipient(&self) -> &str {
        [&self.email_to, &self.notification_email]
            .into_iter()
            .find_map(|value| value.as_deref().filter(|value| !value.is_empty()))
            .unwrap_or(DEFAULT_NOTIFICATION_RECIPIENT)
    }
}

#[derive(Debug, Deserialize)]
pub struct HealthConfig {
    pub cache_ttl: Duration,
}

#[derive(Debug, Deserialize)]
pub struct RateLimitConfig {
    pub api: RateLimitQuota,
    pub contact: RateLimitQuota,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RateLimitQuota {
    pub max_requests: u32,
    pub window: Duration,
}

#[derive(Debug, Deserialize)]
pub struct ProfileConfig {
    pub name: String,
    pub title: String,
    pub location: String,
    pub website: String,
    pub github: String,
    pub linkedin: String,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn load_with_env(env: &[(&str, &str)]) -> Config {
        let env = env
            .iter()
            .map(|&(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        load_from(&[Path::new(DEFAULT_CONFIG_PATH)], env).unwrap()
    }

    #[test]
    fn load_default_config() {
        let config = load_with_env(&[]);

        assert!(!config.email.smtp.is_configured());
        assert_eq!(config.email.transactional_api.api_key(), None);
        assert_eq!(
            config.contact.notification_recipient(),
            DEFAULT_NOTIFICATION_RECIPIENT
        );
        assert_eq!(config.rate_limit.api.max_requests, 100);
        assert_eq!(config.rate_limit.contact.max_requests, 5);
        assert_eq!(config.rate_limit.contact.window.as_secs(), 15 * 60);
    }

    #[test]
    fn prefixed_env_overrides() {
        let config = load_with_env(&[
            ("PORTFOLIO__EMAIL__SMTP__HOST", "smtp.example.com"),
            ("PORTFOLIO__EMAIL__SMTP__PORT", "465"),
            ("PORTFOLIO__EMAIL__SMTP__USERNAME", "user@example.com"),
            ("PORTFOLIO__EMAIL__SMTP__PASSWORD", "secret"),
            ("PORTFOLIO__HTTP__PORT", "8080"),
            (
                "PORTFOLIO__HTTP__ALLOWED_ORIGINS",
                "https://a.example.com,https://b.example.com",
            ),
        ]);

        assert!(config.email.smtp.is_configured());
        assert!(config.email.smtp.secure());
        assert_eq!(config.email.smtp.from(), Some("user@example.com"));
        assert_eq!(config.http.port, 8080);
        assert_eq!(
            config.http.allowed_origins,
            ["https://a.example.com", "https://b.example.com"]
        );
    }

    #[test]
    fn deployment_env_vars() {
        let config = load_with_env(&[
            ("PORT", "5001"),
            ("EMAIL_HOST", "smtp.example.com"),
            ("EMAIL_USER", "user@example.com"),
            ("EMAIL_PASSWORD", "secret"),
            ("EMAIL_FROM", "Me <me@example.com>"),
            ("RESEND_API_KEY", "re_123"),
            ("NOTIFICATION_EMAIL", "notify@example.com"),
        ]);

        assert_eq!(config.http.port, 5001);
        assert!(config.email.smtp.is_configured());
        assert_eq!(config.email.smtp.port(), DEFAULT_SMTP_PORT);
        assert!(!config.email.smtp.secure());
        assert_eq!(config.email.smtp.from(), Some("Me <me@example.com>"));
        assert_eq!(config.email.transactional_api.api_key(), Some("re_123"));
        assert_eq!(
            config.contact.notification_recipient(),
            "notify@example.com"
        );
    }

    #[test]
    fn numeric_looking_secrets_stay_strings() {
        let config = load_with_env(&[
            ("EMAIL_PASSWORD", "0123456"),
            ("PORTFOLIO__EMAIL__TRANSACTIONAL_API__API_KEY", "00042"),
            ("PORTFOLIO__CONTACT__EMAIL_TO", "1e3"),
        ]);

        assert_eq!(config.email.smtp.password.as_deref(), Some("0123456"));
        assert_eq!(config.email.transactional_api.api_key(), Some("00042"));
        assert_eq!(config.contact.notification_recipient(), "1e3");
    }

    #[test]
    fn single_allowed_origin_from_env() {
        let config = load_with_env(&[(
            "PORTFOLIO__HTTP__ALLOWED_ORIGINS",
            " https://a.example.com ,",
        )]);

        assert_eq!(config.http.allowed_origins, ["https://a.example.com"]);
    }

    #[test]
    fn prefixed_env_beats_deployment_env() {
        let config = load_with_env(&[
            ("EMAIL_TO", "old@example.com"),
            ("PORTFOLIO__CONTACT__EMAIL_TO", "new@example.com"),
        ]);

        assert_eq!(config.contact.notification_recipient(), "new@example.com");
    }

    #[test]
    fn empty_values_are_ignored() {
        let config = load_with_env(&[
            ("EMAIL_HOST", "smtp.example.com"),
            ("EMAIL_USER", "user@example.com"),
            ("EMAIL_PASSWORD", ""),
            ("RESEND_API_KEY", ""),
            ("EMAIL_TO", ""),
        ]);

        assert!(!config.email.smtp.is_configured());
        assert_eq!(config.email.transactional_api.api_key(), None);
        assert_eq!(
            config.contact.notification_recipient(),
            DEFAULT_NOTIFICATION_RECIPIENT
        );
    }

    #[test]
    fn recipient_fallback_order() {
        let contact = ContactConfig {
            email_to: Some("to@example.com".into()),
            notification_email: Some("notify@example.com".into()),
        };
        assert_eq!(contact.notification_recipient(), "to@example.com");

        let contact = ContactConfig {
            email_to: None,
            notification_email: Some("notify@example.com".into()),
        };
        assert_eq!(contact.notification_recipient(), "notify@example.com");
    }

    #[test]
    fn smtp_requires_host_username_and_password() {
        let smtp = SmtpConfig {
            host: Some("smtp.example.com".into()),
            username: Some("user@example.com".into()),
            ..Default::default()
        };
        assert!(!smtp.is_configured());
    }

    #[test]
    fn secrets_are_not_printed() {
        let smtp = SmtpConfig {
            password: Some("hunter2".into()),
            ..Default::default()
        };
        let api = TransactionalApiConfig {
            api_key: Some("re_123".into()),
            ..Default::default()
        };

        assert!(!format!("{smtp:?}").contains("hunter2"));
        assert!(!format!("{api:?}").contains("re_123"));
    }
}
