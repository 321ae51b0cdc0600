// src/lib.rs

//! Domain reconnaissance aggregator.
//!
//! Given a domain name, the scanner fans out to WHOIS, DNS (multi-resolver with a
//! DNS-over-HTTPS fallback), TLS, the homepage, certificate transparency logs and
//! several threat-intelligence sources, then runs a second enrichment phase over
//! the first phase's results and assembles everything into one [`ScanReport`].

pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod server;

pub use crate::config::ScanConfig;
pub use crate::core::context::ScanContext;
pub use crate::core::models::ScanReport;
pub use crate::core::report::run_full_scan;
pub use crate::error::ScanError;
