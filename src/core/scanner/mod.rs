// src/core/scanner/mod.rs

// First-phase source fetchers. Each one performs a single kind of I/O against one
// external source; the orchestrator below wraps every one of them in a bounded task.
pub mod homepage_scanner;
pub mod ssl_scanner;
pub mod subdomain_scanner;
pub mod threat_scanner;
pub mod whois_scanner;

use std::convert::Infallible;

use tracing::info;

use crate::core::bounded::run_bounded;
use crate::core::context::ScanContext;
use crate::core::dns::{check_dnssec, resolve_all};
use crate::core::models::{Homepage, PhaseOneResults, SslInfo, Threats, WhoisRecord};
use self::homepage_scanner::run_homepage_fetch;
use self::ssl_scanner::run_ssl_scan;
use self::subdomain_scanner::run_subdomain_scan;
use self::threat_scanner::{run_threat_scan, run_vulnerability_scan};
use self::whois_scanner::run_whois_scan;

/// Runs every first-phase source concurrently and waits for all of them to settle.
///
/// Each source runs under its own budget with its own fallback, so a slow or
/// failing source never delays or breaks the others, and total latency is bounded
/// by the largest budget rather than the sum.
///
/// # Arguments
/// * `ctx` - Shared scan context.
/// * `host` - The validated host to scan.
///
/// # Returns
/// A `PhaseOneResults` where every field holds either the source's answer or its fallback.
pub async fn run_phase_one(ctx: &ScanContext, host: &str) -> PhaseOneResults {
    info!(target = %host, "Starting first phase.");
    let budgets = &ctx.config.timeouts;

    let (whois, raw_dns, dnssec, ssl, homepage, subdomains, threats, vulnerabilities) = tokio::join!(
        run_bounded("whois", budgets.whois, WhoisRecord::new(), run_whois_scan(ctx, host)),
        resolve_all(ctx, host),
        run_bounded("dnssec", budgets.dnssec, None, async {
            Ok::<_, Infallible>(Some(check_dnssec(ctx, host).await))
        }),
        run_bounded("ssl", budgets.ssl, SslInfo::failed("SSL timeout"), async {
            Ok::<_, Infallible>(run_ssl_scan(ctx, host).await)
        }),
        run_bounded("homepage", budgets.homepage, Homepage::default(), run_homepage_fetch(ctx, host)),
        run_bounded("subdomains", budgets.subdomains, Vec::new(), run_subdomain_scan(ctx, host)),
        run_bounded("threats", budgets.threats, Threats::default(), run_threat_scan(ctx, host)),
        run_bounded(
            "vulnerabilities",
            budgets.vulnerabilities,
            Vec::new(),
            run_vulnerability_scan(ctx, host)
        ),
    );

    let results = PhaseOneResults {
        whois: whois.into_inner(),
        raw_dns,
        dnssec: dnssec.into_inner(),
        ssl: ssl.into_inner(),
        homepage: homepage.into_inner(),
        subdomains: subdomains.into_inner(),
        threats: threats.into_inner(),
        vulnerabilities: vulnerabilities.into_inner(),
    };
    info!(target = %host, "First phase finished.");
    results
}
