// src/core/report.rs

use std::time::Instant;

use tracing::info;

use crate::core::analysis::analyze;
use crate::core::context::ScanContext;
use crate::core::domain::{parse_domain_details, ScanRequest};
use crate::core::enrichment::run_phase_two;
use crate::core::models::{DerivedAnalysis, DnsRecords, DomainDetails, PhaseOneResults, PhaseTwoResults, ScanReport};
use crate::core::scanner::run_phase_one;

/// Executes a complete scan and assembles the report.
///
/// Phase one fans out to every independent source; the analyzers then run over
/// its results, and phase two (which needs the homepage HTML and the A records)
/// starts only once phase one has settled.
///
/// # Arguments
/// * `ctx` - Shared scan context.
/// * `request` - The validated scan target.
///
/// # Returns
/// The assembled `ScanReport`. Every section is present; failed sources show up
/// as empty or neutral values.
pub async fn run_full_scan(ctx: ScanContext, request: ScanRequest) -> ScanReport {
    let started = Instant::now();
    let host = request.host();
    info!(target = %host, "Starting full scan.");

    let domain_details = parse_domain_details(host);
    let phase_one = run_phase_one(&ctx, host).await;
    let analysis = analyze(&phase_one);
    let phase_two = run_phase_two(&ctx, host, &phase_one).await;

    let report = assemble(domain_details, phase_one, analysis, phase_two);
    info!(target = %host, elapsed_ms = started.elapsed().as_millis() as u64, "Full scan finished.");
    report
}

/// Merges every phase into the final report.
pub fn assemble(
    domain_details: DomainDetails,
    phase_one: PhaseOneResults,
    analysis: DerivedAnalysis,
    phase_two: PhaseTwoResults,
) -> ScanReport {
    ScanReport {
        domain_details,
        whois: phase_one.whois,
        dns: dns_summary(&phase_one.raw_dns),
        raw_dns: phase_one.raw_dns,
        dnssec: phase_one.dnssec,
        ssl: phase_one.ssl,
        security: analysis.security,
        tech_stack: analysis.tech_stack,
        subdomains: phase_one.subdomains,
        threats: phase_one.threats,
        vulnerabilities: phase_one.vulnerabilities,
        broken_links: phase_two.broken_links,
        ip_services: phase_two.ip_services,
        emails: analysis.emails,
    }
}

/// Projection of the raw records onto the summary record types.
pub fn dns_summary(raw_dns: &DnsRecords) -> DnsRecords {
    raw_dns
        .iter()
        .filter(|(record_type, _)| record_type.is_summary())
        .map(|(record_type, records)| (*record_type, records.clone()))
        .collect()
}
