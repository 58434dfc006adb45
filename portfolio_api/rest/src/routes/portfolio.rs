use axum::{
    http::header::CONTENT_TYPE,
    response::IntoResponse,
    routing, Router,
};
use portfolio_assets::PORTFOLIO_JSON;

pub fn router() -> Router<()> {
    Router::new().route("/portfolio", routing::get(portfolio))
}

async fn portfolio() -> impl IntoResponse {
    ([(CONTENT_TYPE, "application/json")], PORTFOLIO_JSON)
}
