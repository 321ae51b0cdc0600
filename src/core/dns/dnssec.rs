// src/core/dns/dnssec.rs

use tracing::{debug, info};

use super::{RecordType, ResolverEndpoint};
use crate::core::context::ScanContext;
use crate::core::models::DnssecStatus;

/// Probes for DNSKEY records through the dedicated DNSSEC resolver.
///
/// Any lookup failure, or an empty answer, means DNSSEC is not configured; this is
/// reported as a status, not an error.
pub async fn check_dnssec(ctx: &ScanContext, domain: &str) -> DnssecStatus {
    let resolver = ResolverEndpoint::Address(ctx.config.dnssec_resolver);
    debug!(target = %domain, %resolver, "Checking DNSSEC.");

    match ctx.dns.query(&resolver, domain, RecordType::DNSKEY).await {
        Ok(keys) if !keys.is_empty() => {
            info!(target = %domain, keys = keys.len(), "DNSSEC enabled.");
            DnssecStatus::enabled(keys)
        }
        Ok(_) => DnssecStatus::not_configured(),
        Err(e) => {
            debug!(target = %domain, error = %e, "DNSKEY lookup failed.");
            DnssecStatus::not_configured()
        }
    }
}
