// src/core/dns/doh.rs

use color_eyre::eyre::{Result, WrapErr};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::RecordType;
use crate::core::context::ScanContext;

/// JSON body of a DNS-over-HTTPS answer. Only `Answer[].data` is used.
#[derive(Debug, Deserialize)]
struct DohResponse {
    #[serde(rename = "Answer", default)]
    answer: Vec<DohAnswer>,
}

#[derive(Debug, Deserialize)]
struct DohAnswer {
    data: Value,
}

/// Issues one DNS-over-HTTPS JSON query.
///
/// # Arguments
/// * `ctx` - Scan context holding the HTTP client and the DoH endpoint.
/// * `domain` - Name to resolve.
/// * `record_type` - Record type, sent by name in the `type` parameter.
///
/// # Returns
/// The `data` field of every answer, in response order.
pub async fn query_doh(ctx: &ScanContext, domain: &str, record_type: RecordType) -> Result<Vec<Value>> {
    debug!(domain, %record_type, url = %ctx.config.endpoints.doh, "Querying DNS-over-HTTPS.");
    let response: DohResponse = ctx
        .http
        .get(&ctx.config.endpoints.doh)
        .query(&[("name", domain), ("type", record_type.as_ref())])
        .header(reqwest::header::ACCEPT, "application/dns-json")
        .send()
        .await
        .wrap_err("DoH request failed")?
        .error_for_status()
        .wrap_err("DoH server returned an error status")?
        .json()
        .await
        .wrap_err("DoH response was not valid JSON")?;

    Ok(response.answer.into_iter().map(|answer| answer.data).collect())
}
