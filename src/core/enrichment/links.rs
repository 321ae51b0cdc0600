// src/core/enrichment/links.rs

use std::collections::HashSet;

use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};
use url::Url;

use crate::core::context::ScanContext;
use crate::core::models::BrokenLink;

static RE_ANCHOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<a [^>]*href=['"]([^'">]+)['"][^>]*>"#).unwrap());

/// Every distinct anchor `href` in the page, in document order.
pub fn extract_links(html: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    RE_ANCHOR
        .captures_iter(html)
        .map(|caps| caps[1].trim().to_string())
        .filter(|href| !href.is_empty() && seen.insert(href.clone()))
        .collect()
}

/// Checks every link on the homepage with a HEAD request.
///
/// Links are resolved against the site origin. An href that cannot be resolved is
/// reported immediately with status 0 and "Invalid URL"; non-HTTP schemes such as
/// `mailto:` are skipped. Checks run concurrently up to the configured bound, and
/// results keep document order.
///
/// # Arguments
/// * `ctx` - Scan context holding the HTTP client, origin and link budget.
/// * `host` - The scanned host.
/// * `html` - The homepage body.
///
/// # Returns
/// One entry per link that did not answer with a success status.
pub async fn find_broken_links(ctx: &ScanContext, host: &str, html: &str) -> Vec<BrokenLink> {
    let links = extract_links(html);
    if links.is_empty() {
        debug!(target = %host, "No links to check.");
        return Vec::new();
    }

    let origin = ctx.config.site_origin_for(host);
    let base = match Url::parse(&origin) {
        Ok(base) => base,
        Err(e) => {
            warn!(origin = %origin, error = %e, "Invalid site origin, skipping link checks.");
            return Vec::new();
        }
    };
    info!(target = %host, links = links.len(), "Checking homepage links.");

    let broken: Vec<BrokenLink> = stream::iter(links)
        .map(|href| check_link(ctx, &base, href))
        .buffered(ctx.config.link_concurrency.max(1))
        .filter_map(|outcome| async move { outcome })
        .collect()
        .await;

    info!(target = %host, broken = broken.len(), "Link check finished.");
    broken
}

async fn check_link(ctx: &ScanContext, base: &Url, href: String) -> Option<BrokenLink> {
    let url = match base.join(&href) {
        Ok(url) => url,
        Err(e) => {
            debug!(href = %href, error = %e, "Unresolvable link.");
            return Some(BrokenLink {
                url: href,
                status: 0,
                status_text: "Invalid URL".to_string(),
            });
        }
    };
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }

    match ctx
        .http
        .head(url.as_str())
        .timeout(ctx.config.timeouts.link_check)
        .send()
        .await
    {
        Ok(response) if response.status().is_success() => None,
        Ok(response) => {
            let status = response.status();
            debug!(url = %url, status = %status, "Broken link.");
            Some(BrokenLink {
                url: url.to_string(),
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            })
        }
        Err(e) => {
            debug!(url = %url, error = %e, "Link check failed.");
            Some(BrokenLink {
                url: url.to_string(),
                status: 0,
                status_text: "Failed to fetch".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_anchor_targets_in_order() {
        let html = r#"<p><a href="/about">About</a> <A class="x" HREF='https://other.example/'>x</A>
            <a name="top">no href</a> <a href="/about">again</a><link href="/style.css"></p>"#;
        assert_eq!(extract_links(html), vec!["/about", "https://other.example/"]);
    }

    #[test]
    fn page_without_anchors_has_no_links() {
        assert!(extract_links("<html><body>plain</body></html>").is_empty());
    }
}
