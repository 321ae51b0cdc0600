// src/core/dns/fallback.rs

use futures::future::join_all;
use strum::IntoEnumIterator;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::{query_doh, RawRecordSet, RecordType};
use crate::core::bounded::run_bounded;
use crate::core::context::ScanContext;
use crate::core::models::DnsRecords;

/// Resolves one record type across every configured resolver.
///
/// Resolvers are queried one after another in priority order and all of them are
/// always attempted. Each query is cut off after `resolver_query`, and a failing
/// or silent resolver is logged and skipped. Values are merged into one
/// deduplicated set. Only when the merged set is empty is a single DNS-over-HTTPS
/// query issued.
pub async fn resolve_record(ctx: &ScanContext, domain: &str, record_type: RecordType) -> RawRecordSet {
    let mut records = RawRecordSet::new();

    let per_query = ctx.config.timeouts.resolver_query;

    for resolver in &ctx.config.resolvers {
        match timeout(per_query, ctx.dns.query(resolver, domain, record_type)).await {
            Ok(Ok(values)) => {
                debug!(%resolver, %record_type, count = values.len(), "Resolver answered.");
                records.extend(values);
            }
            Ok(Err(e)) => {
                warn!(%resolver, %record_type, error = %e, "Resolver query failed, skipping.");
            }
            Err(_) => {
                warn!(%resolver, %record_type, timeout = ?per_query, "Resolver did not answer in time, skipping.");
            }
        }
    }

    if records.is_empty() {
        debug!(domain, %record_type, "No records from any resolver, falling back to DoH.");
        match query_doh(ctx, domain, record_type).await {
            Ok(values) => records.extend(values),
            Err(e) => warn!(domain, %record_type, error = %e, "DoH fallback failed."),
        }
    }

    records
}

/// Runs [`resolve_record`] for every record type concurrently, each under the DNS budget.
pub async fn resolve_all(ctx: &ScanContext, domain: &str) -> DnsRecords {
    info!(target = %domain, "Starting DNS lookups.");
    let budget = ctx.config.timeouts.dns_record;

    let lookups = RecordType::iter().map(|record_type| async move {
        let outcome = run_bounded(
            "dns",
            budget,
            RawRecordSet::new(),
            async { Ok::<_, std::convert::Infallible>(resolve_record(ctx, domain, record_type).await) },
        )
        .await;
        if outcome.is_timed_out() {
            warn!(target = %domain, %record_type, "DNS lookup exceeded its budget.");
        }
        (record_type, outcome.into_inner())
    });

    let records: DnsRecords = join_all(lookups).await.into_iter().collect();
    let total: usize = records.values().map(RawRecordSet::len).sum();
    info!(target = %domain, records = total, "DNS lookups finished.");
    records
}
