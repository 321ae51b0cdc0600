// src/core/analysis/mod.rs

//! Pure analyzers over first-phase results. None of them perform I/O and all of
//! them are total: missing inputs simply produce empty or "absent" findings.

pub mod emails;
pub mod headers;
pub mod protocols;
pub mod tech_stack;

use tracing::debug;

use crate::core::models::{DerivedAnalysis, PhaseOneResults, SecurityReport};
use self::emails::extract_emails;
use self::headers::analyze_security_headers;
use self::protocols::analyze_protocols;
use self::tech_stack::detect_tech_stack;

/// Runs every analyzer over the settled first-phase results.
pub fn analyze(results: &PhaseOneResults) -> DerivedAnalysis {
    let security = SecurityReport {
        headers: analyze_security_headers(&results.homepage.headers),
        protocols: analyze_protocols(results.ssl.protocol.as_deref(), &results.ssl.ciphers),
    };
    let tech_stack = detect_tech_stack(&results.homepage.headers, &results.homepage.html);
    let emails = extract_emails(&results.whois, &results.raw_dns, &results.homepage.html);

    debug!(
        present_headers = security.headers.values().filter(|status| status.present).count(),
        emails = emails.len(),
        "Derived analysis complete."
    );
    DerivedAnalysis {
        security,
        tech_stack,
        emails,
    }
}
