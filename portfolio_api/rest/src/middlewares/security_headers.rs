//! Conservative default response headers for the api and the static frontend.

use axum::{
    http::{header, HeaderName, HeaderValue},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::warn;

pub fn add<S: Clone + Send + Sync + 'static>(
    content_security_policy: Option<&str>,
) -> impl FnOnce(Router<S>) -> Router<S> {
    let csp = content_security_policy.and_then(|csp| {
        HeaderValue::from_str(csp)
            .inspect_err(|err| warn!("ignoring invalid content security policy: {err}"))
            .ok()
    });

    move |router| {
        let router = router
            .layer(header_layer(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(header_layer(
                header::X_FRAME_OPTIONS,
                HeaderValue::from_static("SAMEORIGIN"),
            ))
            .layer(header_layer(
                header::REFERRER_POLICY,
                HeaderValue::from_static("no-referrer"),
            ))
            .layer(header_layer(
                HeaderName::from_static("cross-origin-opener-policy"),
                HeaderValue::from_static("same-origin"),
            ));

        match csp {
            Some(csp) => router.layer(header_layer(header::CONTENT_SECURITY_POLICY, csp)),
            None => router,
        }
    }
}

fn header_layer(name: HeaderName, value: HeaderValue) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(name, value)
}
