// src/core/mod.rs

/// Contains all data structures that make up the scan report, such as
/// `ScanReport`, `SslInfo` and `IpService`.
pub mod models;

/// The deadline-plus-fallback combinator every external source runs under.
pub mod bounded;

/// Input validation and public-suffix details for the scanned host.
pub mod domain;

/// Shared, immutable per-process handles (configuration, HTTP client, DNS backend).
pub mod context;

/// Multi-resolver DNS lookups with a DNS-over-HTTPS fallback, plus the DNSSEC probe.
pub mod dns;

/// First-phase source fetchers and the orchestrator that runs them concurrently.
pub mod scanner;

/// Pure analyzers over first-phase results (headers, TLS strength, tech stack, emails).
pub mod analysis;

/// Second-phase tasks that depend on first-phase output (broken links, per-IP services).
pub mod enrichment;

/// Merges every phase into the final report.
pub mod report;
