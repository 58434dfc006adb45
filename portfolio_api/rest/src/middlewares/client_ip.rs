use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use axum::{
    extract::{ConnectInfo, Request},
    http::HeaderMap,
    middleware::{from_fn, Next},
    Router,
};
use tracing::{debug, error, warn};

use crate::RestServerRealIpConfig;

pub fn add<S: Clone + Send + Sync + 'static>(
    real_ip_config: Option<Arc<RestServerRealIpConfig>>,
) -> impl FnOnce(Router<S>) -> Router<S> {
    |router| {
        router.layer(from_fn(
            move |connect_info: Option<ConnectInfo<SocketAddr>>,
                  mut request: Request,
                  next: Next| {
                let client_ip = match connect_info {
                    Some(ConnectInfo(peer)) => Some(ClientIp::resolve(
                        peer.ip(),
                        request.headers(),
                        real_ip_config.as_deref(),
                    )),
                    None => {
                        error!("connect info missing, cannot determine client ip");
                        None
                    }
                };
                if let Some(client_ip) = client_ip {
                    request.extensions_mut().insert(client_ip);
                }
                next.run(request)
            },
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientIp(pub IpAddr);

impl ClientIp {
    fn resolve(
        peer: IpAddr,
        headers: &HeaderMap,
        real_ip_config: Option<&RestServerRealIpConfig>,
    ) -> Self {
        let Some(RestServerRealIpConfig { header, set_from }) = real_ip_config else {
            return Self(peer);
        };

        let header_value = headers.get(header);

        if *set_from != peer {
            if let Some(header_value) = header_value {
                debug!(client_ip = %peer, ?header_value, "ignoring real ip header value from untrusted source");
            }
            return Self(peer);
        }

        let Some(header_value) = header_value else {
            warn!(client_ip = %peer, "real ip header not found");
            return Self(peer);
        };

        // forwarding proxies append to the list, the last entry was added by
        // the trusted one
        let Some(real_ip) = header_value
            .to_str()
            .ok()
            .and_then(|value| value.rsplit(',').next())
            .and_then(|real_ip| real_ip.trim().parse().ok())
        else {
            error!(client_ip = %peer, ?header_value, "failed to parse real ip header value");
            return Self(peer);
        };

        Self(real_ip)
    }
}
