// src/core/dns/mod.rs

use std::fmt;
use std::net::IpAddr;

mod backend;
mod dnssec;
mod doh;
mod fallback;
mod record_set;
mod record_type;

pub use self::backend::{rdata_to_json, DnsBackend, HickoryBackend};
pub use self::dnssec::check_dnssec;
pub use self::doh::query_doh;
pub use self::fallback::{resolve_all, resolve_record};
pub use self::record_set::RawRecordSet;
pub use self::record_type::{RecordType, SUMMARY_TYPES};

/// Upstream a classic DNS query is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolverEndpoint {
    /// Whatever the host's resolver configuration points at.
    SystemDefault,
    Address(IpAddr),
}

impl fmt::Display for ResolverEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolverEndpoint::SystemDefault => f.write_str("system"),
            ResolverEndpoint::Address(ip) => write!(f, "{ip}"),
        }
    }
}
