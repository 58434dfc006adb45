//! Static files compiled into the binary.

/// Public profile data returned by `GET /api/portfolio`.
pub const PORTFOLIO_JSON: &str = include_str!("../assets/portfolio.json");
