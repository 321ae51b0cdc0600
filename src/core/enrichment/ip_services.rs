// src/core/enrichment/ip_services.rs

use std::net::{IpAddr, Ipv4Addr};

use color_eyre::eyre::{Result, WrapErr};
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use tracing::{debug, info};

use crate::core::bounded::run_bounded;
use crate::core::context::ScanContext;
use crate::core::dns::RecordType;
use crate::core::models::{DnsRecords, IpService, ServiceInfo};

/// Host summary returned by Shodan InternetDB.
#[derive(Debug, Default, Deserialize)]
struct InternetDbHost {
    #[serde(default)]
    ports: Vec<u16>,
    #[serde(default)]
    cpes: Vec<String>,
}

/// Enriches every IPv4 address from the A records.
///
/// Addresses are processed in record order with at most `ip_concurrency` in
/// flight. No reverse lookups or host-intel requests are made when there are no
/// A records.
pub async fn enrich_ips(ctx: &ScanContext, raw_dns: &DnsRecords) -> Vec<IpService> {
    let ips: Vec<Ipv4Addr> = raw_dns
        .get(&RecordType::A)
        .map(|records| {
            records
                .strings()
                .into_iter()
                .filter_map(|s| s.parse().ok())
                .collect()
        })
        .unwrap_or_default();
    if ips.is_empty() {
        debug!("No A records, skipping IP enrichment.");
        return Vec::new();
    }

    info!(ips = ips.len(), concurrency = ctx.config.ip_concurrency, "Enriching IP addresses.");
    stream::iter(ips)
        .map(|ip| enrich_ip(ctx, ip))
        .buffered(ctx.config.ip_concurrency.max(1))
        .collect()
        .await
}

/// Reverse DNS plus open services for one address.
///
/// Both halves run under their own budget; a failure of either leaves its part
/// of the record empty.
pub async fn enrich_ip(ctx: &ScanContext, ip: Ipv4Addr) -> IpService {
    let budgets = &ctx.config.timeouts;
    let (hostnames, host) = tokio::join!(
        run_bounded("reverse_dns", budgets.reverse_dns, Vec::new(), ctx.dns.reverse(IpAddr::V4(ip))),
        run_bounded("host_intel", budgets.host_intel, InternetDbHost::default(), lookup_host(ctx, ip)),
    );
    let host = host.into_inner();

    IpService {
        ip: ip.to_string(),
        hostnames: hostnames.into_inner(),
        services: label_services(host.ports, &host.cpes),
    }
}

async fn lookup_host(ctx: &ScanContext, ip: Ipv4Addr) -> Result<InternetDbHost> {
    let url = format!("{}/{}", ctx.config.endpoints.internetdb.trim_end_matches('/'), ip);
    debug!(url = %url, "Querying InternetDB.");
    let response = ctx.http.get(&url).send().await.wrap_err("InternetDB request failed")?;

    // InternetDB answers 404 for addresses it has never seen.
    if response.status() == reqwest::StatusCode::NOT_FOUND {
        return Ok(InternetDbHost::default());
    }
    response
        .error_for_status()
        .wrap_err("InternetDB returned an error status")?
        .json()
        .await
        .wrap_err("InternetDB response was not valid JSON")
}

/// Pairs each port with the CPE at the same position, or "unknown".
fn label_services(ports: Vec<u16>, cpes: &[String]) -> Vec<ServiceInfo> {
    ports
        .into_iter()
        .enumerate()
        .map(|(i, port)| ServiceInfo {
            port,
            service: cpes.get(i).cloned().unwrap_or_else(|| "unknown".to_string()),
        })
        .collect()
}
