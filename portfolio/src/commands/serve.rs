use portfolio_config::Config;
use portfolio_di::Provides;
use portfolio_email_contracts::EmailService;
use tracing::{info, warn};

use crate::{
    email,
    environment::{types::RestServer, ConfigProvider, Provider},
};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    let email = email::connect(&config.email)?;

    info!(transport = email.transport().as_str(), "Checking email transport");
    match email.ping().await {
        Ok(()) => info!("Email transport is ready"),
        // submissions are still accepted and reported as failures
        Err(err) => warn!("Email transport is not reachable: {err:#}"),
    }

    let config_provider = ConfigProvider::new(&config)?;
    let mut provider = Provider::new(config_provider, email);
    let server: RestServer = provider.provide();
    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve().await
}
