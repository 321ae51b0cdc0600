// src/core/scanner/subdomain_scanner.rs

use std::collections::BTreeSet;

use color_eyre::eyre::{Result, WrapErr};
use serde::Deserialize;
use tracing::{debug, info};

use crate::core::context::ScanContext;

/// One certificate entry from the crt.sh JSON output.
#[derive(Debug, Deserialize)]
struct CrtShEntry {
    #[serde(default)]
    name_value: String,
}

/// Enumerates subdomains from certificate transparency logs.
///
/// # Arguments
/// * `ctx` - Scan context holding the HTTP client and crt.sh endpoint.
/// * `domain` - The domain whose subdomains are wanted.
///
/// # Returns
/// Sorted, deduplicated proper subdomains of `domain`.
pub async fn run_subdomain_scan(ctx: &ScanContext, domain: &str) -> Result<Vec<String>> {
    info!(target = %domain, "Querying certificate transparency logs.");
    let entries: Vec<CrtShEntry> = ctx
        .http
        .get(&ctx.config.endpoints.crtsh)
        .query(&[("q", format!("%.{domain}")), ("output", "json".to_string())])
        .send()
        .await
        .wrap_err("crt.sh request failed")?
        .error_for_status()
        .wrap_err("crt.sh returned an error status")?
        .json()
        .await
        .wrap_err("crt.sh response was not valid JSON")?;
    debug!(entries = entries.len(), "Received certificate entries.");

    let names = entries.iter().map(|entry| entry.name_value.as_str());
    let subdomains = extract_subdomains(names, domain);
    info!(target = %domain, count = subdomains.len(), "Subdomain enumeration finished.");
    Ok(subdomains)
}

/// Splits newline-separated `name_value` fields, strips wildcard prefixes and keeps
/// proper subdomains of `domain`, sorted and deduplicated.
pub fn extract_subdomains<'a, I>(name_values: I, domain: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let domain = domain.to_ascii_lowercase();
    let suffix = format!(".{domain}");

    name_values
        .into_iter()
        .flat_map(str::lines)
        .map(|name| {
            let name = name.trim().to_ascii_lowercase();
            name.strip_prefix("*.").map(str::to_string).unwrap_or(name)
        })
        .filter(|name| name.ends_with(&suffix))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcards_are_stripped_and_names_sorted() {
        let subdomains = extract_subdomains(["*.api.example.com\nwww.example.com"], "example.com");
        assert_eq!(subdomains, vec!["api.example.com", "www.example.com"]);
    }

    #[test]
    fn apex_foreign_and_lookalike_names_are_dropped() {
        let subdomains = extract_subdomains(
            [
                "example.com\n*.example.com",
                "www.example.org",
                "badexample.com",
                "MAIL.Example.com",
                "mail.example.com",
            ],
            "example.com",
        );
        assert_eq!(subdomains, vec!["mail.example.com"]);
    }
}
