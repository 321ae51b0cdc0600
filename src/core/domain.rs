// src/core/domain.rs

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use url::{Host, Url};

use crate::core::models::DomainDetails;
use crate::error::ScanError;

static LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?$").unwrap());

const MAX_HOST_LEN: usize = 253;

/// A validated domain name: lower-case host only, no scheme, port or path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    host: String,
}

impl ScanRequest {
    /// Normalizes user input into a scan target.
    ///
    /// Accepts bare hosts (`example.com`), URLs (`https://example.com/path`) and
    /// fully-qualified names with a trailing dot. IP literals are rejected since
    /// most sources are keyed by domain name.
    pub fn parse(input: &str) -> Result<Self, ScanError> {
        let raw = input.trim();
        if raw.is_empty() {
            return Err(ScanError::MissingDomain);
        }

        let with_scheme = if raw.contains("://") {
            raw.to_string()
        } else {
            format!("https://{raw}")
        };
        let url = Url::parse(&with_scheme).map_err(|e| ScanError::invalid(raw, e.to_string()))?;

        let host = match url.host() {
            Some(Host::Domain(domain)) => domain.trim_end_matches('.').to_ascii_lowercase(),
            Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => {
                return Err(ScanError::invalid(raw, "IP addresses are not supported"));
            }
            None => return Err(ScanError::invalid(raw, "no host component")),
        };

        if host.len() > MAX_HOST_LEN {
            return Err(ScanError::invalid(raw, "host name is too long"));
        }
        if !host.contains('.') {
            return Err(ScanError::invalid(raw, "expected a fully qualified domain name"));
        }
        if let Some(label) = host.split('.').find(|label| !LABEL_RE.is_match(label)) {
            return Err(ScanError::invalid(raw, format!("invalid label '{label}'")));
        }

        debug!(input = raw, host = %host, "Normalized scan target.");
        Ok(Self { host })
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

/// Splits the host at its public suffix.
pub fn parse_domain_details(host: &str) -> DomainDetails {
    let suffix = psl::suffix(host.as_bytes());
    let public_suffix = suffix
        .map(|s| String::from_utf8_lossy(s.as_bytes()).into_owned())
        .unwrap_or_default();
    let (is_icann, is_private) = match suffix.and_then(|s| s.typ()) {
        Some(psl::Type::Icann) => (true, false),
        Some(psl::Type::Private) => (false, true),
        None => (false, false),
    };

    let domain = psl::domain(host.as_bytes())
        .map(|d| String::from_utf8_lossy(d.as_bytes()).into_owned())
        .unwrap_or_else(|| host.to_string());

    let subdomain = host
        .strip_suffix(domain.as_str())
        .map(|prefix| prefix.trim_end_matches('.').to_string())
        .unwrap_or_default();

    DomainDetails {
        domain,
        subdomain,
        top_level_domain: public_suffix.clone(),
        public_suffix,
        is_icann,
        is_private,
        hostname: host.to_string(),
    }
}
