// src/core/scanner/homepage_scanner.rs

use color_eyre::eyre::{Result, WrapErr};
use tracing::{debug, info};

use crate::core::context::ScanContext;
use crate::core::models::Homepage;

/// Fetches the site's homepage.
///
/// The body and headers are kept whatever the status code is, since error pages
/// still carry server headers and markup worth analyzing.
///
/// # Arguments
/// * `ctx` - Scan context holding the HTTP client and site origin.
/// * `host` - The scanned host.
///
/// # Returns
/// The HTML body and response headers.
pub async fn run_homepage_fetch(ctx: &ScanContext, host: &str) -> Result<Homepage> {
    let url = ctx.config.site_origin_for(host);
    info!(target = %host, url = %url, "Fetching homepage.");

    let response = ctx
        .http
        .get(&url)
        .send()
        .await
        .wrap_err_with(|| format!("GET {url} failed"))?;
    info!(status = %response.status(), "Received homepage response.");

    let headers = response.headers().clone();
    let html = response.text().await.wrap_err("Failed to read homepage body")?;
    debug!(bytes = html.len(), headers = headers.len(), "Read homepage body.");

    Ok(Homepage { html, headers })
}
