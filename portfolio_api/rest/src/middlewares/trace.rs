use std::time::Duration;

use axum::{extract::Request, response::Response, Router};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn, Span};

use super::{client_ip::ClientIp, request_id::RequestId};

pub fn add<S: Clone + Send + Sync + 'static>(router: Router<S>) -> Router<S> {
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(make_span)
            .on_request(())
            .on_response(on_response)
            .on_body_chunk(())
            .on_eos(())
            .on_failure(()),
    )
}

fn make_span(request: &Request) -> Span {
    let method = request.method();
    let path = request.uri().path();
    let client_ip = request.extensions().get::<ClientIp>().map(|ip| ip.0);
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(ToString::to_string);

    tracing::info_span!("http-request", %method, %path, ?client_ip, ?request_id)
}

/// Server errors and rejected api calls are logged above debug level, static
/// files and successful calls only at debug.
fn on_response(response: &Response, latency: Duration, _span: &Span) {
    let status = response.status();
    if status.is_server_error() {
        warn!(?latency, %status, "request failed");
    } else if status.is_client_error() && status.as_u16() != 404 {
        info!(?latency, %status, "request rejected");
    } else {
        debug!(?latency, %status, "finished processing request");
    }
}
