// src/core/scanner/threat_scanner.rs

use color_eyre::eyre::{Result, WrapErr};
use serde_json::Value;
use tracing::{debug, info};

use crate::core::context::ScanContext;
use crate::core::models::Threats;

/// Looks the host up in the URLhaus database.
///
/// A successful URLhaus answer is passed through untouched; an error status is a failure.
pub async fn run_threat_scan(ctx: &ScanContext, domain: &str) -> Result<Threats> {
    let url = format!("{}/{}/", ctx.config.endpoints.urlhaus.trim_end_matches('/'), domain);
    info!(target = %domain, "Querying URLhaus.");

    let body: Value = ctx
        .http
        .get(&url)
        .send()
        .await
        .wrap_err("URLhaus request failed")?
        .error_for_status()
        .wrap_err("URLhaus returned an error status")?
        .json()
        .await
        .wrap_err("URLhaus response was not valid JSON")?;
    debug!(target = %domain, "URLhaus answered.");

    Ok(Threats { urlhaus: Some(body) })
}

/// Searches Vulners for documents mentioning the domain.
///
/// # Returns
/// The `data.search` array of the response, or an empty list when it is missing.
pub async fn run_vulnerability_scan(ctx: &ScanContext, domain: &str) -> Result<Vec<Value>> {
    info!(target = %domain, "Querying Vulners.");
    let body: Value = ctx
        .http
        .get(&ctx.config.endpoints.vulners)
        .query(&[("query", format!("domain:{domain}"))])
        .send()
        .await
        .wrap_err("Vulners request failed")?
        .error_for_status()
        .wrap_err("Vulners returned an error status")?
        .json()
        .await
        .wrap_err("Vulners response was not valid JSON")?;

    let results = search_results(body);
    info!(target = %domain, count = results.len(), "Vulners search finished.");
    Ok(results)
}

fn search_results(mut body: Value) -> Vec<Value> {
    match body.pointer_mut("/data/search").map(Value::take) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}
