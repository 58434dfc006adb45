use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

use axum::Router;
use portfolio_core_contact_contracts::ContactFeatureService;
use portfolio_core_health_contracts::HealthFeatureService;
use portfolio_di::Build;
use portfolio_utils::Apply;
use tokio::net::TcpListener;
use tracing::info;

mod middlewares;
mod models;
mod routes;
mod static_files;


#[derive(Debug, Clone, Build)]
pub struct RestServer<Health, Contact> {
    health: Health,
    contact: Contact,
    config: RestServerConfig,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    pub addr: SocketAddr,
    pub real_ip_config: Option<Arc<RestServerRealIpConfig>>,
    pub allowed_origins: Arc<[String]>,
    pub content_security_policy: Option<Arc<str>>,
    pub static_dir: Option<Arc<PathBuf>>,
    pub downloads_dir: Option<Arc<PathBuf>>,
    pub api_rate_limit: RestServerRateLimit,
    pub contact_rate_limit: RestServerRateLimit,
}

#[derive(Debug)]
pub struct RestServerRealIpConfig {
    pub header: String,
    pub set_from: IpAddr,
}

/// Fixed window quota per client ip.
#[derive(Debug, Clone, Copy)]
pub struct RestServerRateLimit {
    pub max_requests: u32,
    pub window: Duration,
}

impl<Health, Contact> RestServer<Health, Contact>
where
    Health: HealthFeatureService,
    Contact: ContactFeatureService,
{
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = self.config.addr;
        let router = self.router();

        let listener = TcpListener::bind(addr).await?;
        info!("Listening on {}", listener.local_addr()?);

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .map_err(Into::into)
    }

    fn router(self) -> Router<()> {
        let config = self.config;

        let api = Router::new()
            .merge(routes::health::router(self.health.into()))
            .merge(routes::contact::router(
                self.contact.into(),
                config.contact_rate_limit,
            ))
            .merge(routes::portfolio::router())
            .fallback(routes::api_not_found)
            .apply(middlewares::rate_limit::add(
                config.api_rate_limit,
                "Too many requests from this IP, please try again later.",
            ));

        Router::new()
            .nest("/api", api)
            .apply(static_files::add(
                config.static_dir.as_deref().map(|x| x.as_path()),
                config.downloads_dir.as_deref().map(|x| x.as_path()),
            ))
            .apply(middlewares::panic_handler::add)
            .apply(middlewares::security_headers::add(
                config.content_security_policy.as_deref(),
            ))
            .apply(middlewares::cors::add(&config.allowed_origins))
            .apply(middlewares::trace::add)
            .apply(middlewares::request_id::add)
            .apply(middlewares::client_ip::add(config.real_ip_config))
    }
}
