use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use portfolio_api_rest::{RestServerConfig, RestServerRateLimit, RestServerRealIpConfig};
use portfolio_config::{Config, RateLimitQuota};
use portfolio_core_contact_impl::ContactFeatureConfig;
use portfolio_core_health_impl::HealthFeatureConfig;
use portfolio_di::provider;
use portfolio_models::email_address::EmailAddress;
use portfolio_templates_contracts::Profile;
use types::Email;

pub mod types;

provider! {
    /// The default provider, capable of providing all the dependencies
    pub Provider {
        email: Email,
        ..config: ConfigProvider {
            // API
            RestServerConfig,

            // Core
            ContactFeatureConfig,
            HealthFeatureConfig,
        }
    }
}

impl Provider {
    pub fn new(config: ConfigProvider, email: Email) -> Self {
        Self {
            _cache: Default::default(),
            email,
            config,
        }
    }
}

provider! {
    /// Reduced provider, capable of providing services that only depend on the configuration
    pub ConfigProvider {
        // API
        rest_server_config: RestServerConfig,

        // Core
        contact_feature_config: ContactFeatureConfig,
        health_feature_config: HealthFeatureConfig,
    }
}

impl ConfigProvider {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        // API
        let rest_server_config = RestServerConfig {
            addr: SocketAddr::new(config.http.host, config.http.port),
            real_ip_config: config.http.real_ip.as_ref().map(|real_ip_config| {
                Arc::new(RestServerRealIpConfig {
                    header: real_ip_config.header.clone(),
                    set_from: real_ip_config.set_from,
                })
            }),
            allowed_origins: config.http.allowed_origins.clone().into(),
            content_security_policy: config
                .http
                .content_security_policy
                .as_deref()
                .filter(|csp| !csp.is_empty())
                .map(Into::into),
            static_dir: config.http.static_dir.clone().map(Arc::new),
            downloads_dir: config.http.downloads_dir.clone().map(Arc::new),
            api_rate_limit: rate_limit(config.rate_limit.api),
            contact_rate_limit: rate_limit(config.rate_limit.contact),
        };

        // Core
        let recipient = config
            .contact
            .notification_recipient()
            .parse::<EmailAddress>()
            .context("Invalid contact notification recipient")?;
        let profile = &config.profile;
        let contact_feature_config = ContactFeatureConfig {
            recipient: recipient.into(),
            profile: Profile {
                name: profile.name.clone(),
                title: profile.title.clone(),
                location: profile.location.clone(),
                website: profile.website.clone(),
                github: profile.github.clone(),
                linkedin: profile.linkedin.clone(),
            }
            .into(),
        };

        let health_feature_config = HealthFeatureConfig {
            cache_ttl: config.health.cache_ttl.into(),
        };

        Ok(Self {
            _cache: Default::default(),

            // API
            rest_server_config,

            // Core
            contact_feature_config,
            health_feature_config,
        })
    }
}

fn rate_limit(quota: RateLimitQuota) -> RestServerRateLimit {
    RestServerRateLimit {
        max_requests: quota.max_requests,
        window: quota.window.into(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use portfolio_config::DEFAULT_CONFIG_PATH;
    use portfolio_di::Provides;
    use portfolio_email_impl::{EmailServiceImpl, TransportConfig};
    use pretty_assertions::assert_eq;
    use types::RestServer;

    use super::*;

    fn config(env: &[(&str, &str)]) -> Config {
        let env = env
            .iter()
            .map(|&(k, v)| (k.to_owned(), v.to_owned()))
            .collect::<HashMap<_, _>>();
        portfolio_config::load_from(&[DEFAULT_CONFIG_PATH], env).unwrap()
    }

    #[test]
    fn provide_rest_server() {
        let config_provider = ConfigProvider::new(&config(&[])).unwrap();
        let email = EmailServiceImpl::new(TransportConfig::None).unwrap();

        let mut provider = Provider::new(config_provider, email);
        let _: RestServer = provider.provide();
    }

    #[test]
    fn contact_recipient() {
        let config_provider =
            ConfigProvider::new(&config(&[("EMAIL_TO", "Owner@Example.com")])).unwrap();

        assert_eq!(
            config_provider.contact_feature_config.recipient.as_str(),
            "Owner@Example.com"
        );
        assert_eq!(
            config_provider.contact_feature_config.profile.name,
            "Subash S"
        );
    }

    #[test]
    fn invalid_contact_recipient() {
        let result = ConfigProvider::new(&config(&[("EMAIL_TO", "not an address")]));

        assert!(result.is_err());
    }
}
