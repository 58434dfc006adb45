//! Fixed window request quotas per client ip.

use std::{
    collections::HashMap,
    net::IpAddr,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header::RETRY_AFTER, StatusCode},
    middleware::{from_fn_with_state, Next},
    response::{IntoResponse, Response},
    Router,
};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::client_ip::ClientIp;
use crate::{routes::error, RestServerRateLimit};

/// Number of tracked clients above which expired windows are dropped.
const PRUNE_THRESHOLD: usize = 4096;

/// Limit every route and the fallback of `router`.
pub fn add<S: Clone + Send + Sync + 'static>(
    quota: RestServerRateLimit,
    message: &'static str,
) -> impl FnOnce(Router<S>) -> Router<S> {
    move |router| router.layer(from_fn_with_state(RateLimiter::new(quota, message), middleware))
}

/// Limit only the routes registered on `router` so far.
pub fn add_to_routes<S: Clone + Send + Sync + 'static>(
    quota: RestServerRateLimit,
    message: &'static str,
) -> impl FnOnce(Router<S>) -> Router<S> {
    move |router| {
        router.route_layer(from_fn_with_state(RateLimiter::new(quota, message), middleware))
    }
}

#[derive(Debug, Clone)]
struct RateLimiter {
    quota: RestServerRateLimit,
    message: &'static str,
    windows: Arc<Mutex<HashMap<IpAddr, Window>>>,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    start: Instant,
    count: u32,
}

impl RateLimiter {
    fn new(quota: RestServerRateLimit, message: &'static str) -> Self {
        Self {
            quota,
            message,
            windows: Default::default(),
        }
    }

    /// Count a request of `ip` at `now`. Returns the time until the current
    /// window ends if the quota is exhausted.
    async fn check(&self, ip: IpAddr, now: Instant) -> Result<(), Duration> {
        let mut windows = self.windows.lock().await;

        if windows.len() > PRUNE_THRESHOLD {
            windows.retain(|_, window| now < window.start + self.quota.window);
        }

        let window = windows
            .entry(ip)
            .and_modify(|window| {
                if now >= window.start + self.quota.window {
                    *window = Window {
                        start: now,
                        count: 0,
                    };
                }
            })
            .or_insert(Window {
                start: now,
                count: 0,
            });

        if window.count >= self.quota.max_requests {
            return Err(window.start + self.quota.window - now);
        }

        window.count += 1;
        Ok(())
    }
}

async fn middleware(State(limiter): State<RateLimiter>, request: Request, next: Next) -> Response {
    let Some(&ClientIp(ip)) = request.extensions().get::<ClientIp>() else {
        debug!("client ip unknown, skipping rate limit");
        return next.run(request).await;
    };

    match limiter.check(ip, Instant::now()).await {
        Ok(()) => next.run(request).await,
        Err(retry_after) => {
            warn!(%ip, ?retry_after, "rate limit exceeded");
            let retry_after = retry_after.as_secs().max(1);
            (
                [(RETRY_AFTER, retry_after.to_string())],
                error(StatusCode::TOO_MANY_REQUESTS, limiter.message),
            )
                .into_response()
        }
    }
}
