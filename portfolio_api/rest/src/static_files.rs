//! Serves the built frontend and downloadable files.
//!
//! Everything is available both at `/` and below `/projects` because the site
//! is also deployed with that prefix. Unknown paths fall back to `index.html`
//! so that client side routes can be reloaded.

use std::path::Path;

use axum::{http::StatusCode, Router};
use tower_http::services::{ServeDir, ServeFile};
use tracing::debug;

pub fn add(
    static_dir: Option<&Path>,
    downloads_dir: Option<&Path>,
) -> impl FnOnce(Router<()>) -> Router<()> {
    let mut site = Router::new();

    if let Some(dir) = downloads_dir {
        debug!(dir = %dir.display(), "serving downloads");
        site = site.nest_service("/apk", ServeDir::new(dir));
    }

    let site = match static_dir {
        Some(dir) => {
            debug!(dir = %dir.display(), "serving frontend");
            site.fallback_service(
                ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
            )
        }
        None => site.fallback(|| async { StatusCode::NOT_FOUND }),
    };

    move |router| router.nest("/projects", site.clone()).merge(site)
}
