// src/core/enrichment/mod.rs

// Second-phase tasks. Both depend on first-phase output, so they only start once
// phase one has fully settled, and run concurrently with each other.
pub mod ip_services;
pub mod links;

use tracing::info;

use crate::core::context::ScanContext;
use crate::core::models::{PhaseOneResults, PhaseTwoResults};
use self::ip_services::enrich_ips;
use self::links::find_broken_links;

/// Runs the broken-link crawl over the homepage HTML and the per-IP enrichment over
/// the resolved A records.
pub async fn run_phase_two(ctx: &ScanContext, host: &str, phase_one: &PhaseOneResults) -> PhaseTwoResults {
    info!(target = %host, "Starting second phase.");
    let (broken_links, ip_services) = tokio::join!(
        find_broken_links(ctx, host, &phase_one.homepage.html),
        enrich_ips(ctx, &phase_one.raw_dns),
    );
    info!(
        target = %host,
        broken_links = broken_links.len(),
        ips = ip_services.len(),
        "Second phase finished."
    );
    PhaseTwoResults {
        broken_links,
        ip_services,
    }
}
