// src/config.rs

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::builder::TypedValueParser;
use clap::Parser;

use crate::core::dns::ResolverEndpoint;

// Per-source budgets for the first phase.
pub const DNS_RECORD_TIMEOUT: Duration = Duration::from_millis(2500);
pub const WHOIS_TIMEOUT: Duration = Duration::from_millis(3500);
pub const DNSSEC_TIMEOUT: Duration = Duration::from_millis(2000);
pub const SSL_TIMEOUT: Duration = Duration::from_millis(3500);
pub const HOMEPAGE_TIMEOUT: Duration = Duration::from_millis(3500);
pub const SUBDOMAINS_TIMEOUT: Duration = Duration::from_millis(3500);
pub const THREATS_TIMEOUT: Duration = Duration::from_millis(2500);
pub const VULNERABILITIES_TIMEOUT: Duration = Duration::from_millis(3500);

// Second phase.
pub const REVERSE_DNS_TIMEOUT: Duration = Duration::from_millis(2000);
pub const HOST_INTEL_TIMEOUT: Duration = Duration::from_millis(2000);
pub const LINK_CHECK_TIMEOUT: Duration = Duration::from_millis(3500);

/// Deadline for a single query against one resolver.
///
/// Every resolver plus the DNS-over-HTTPS fallback must fit in `DNS_RECORD_TIMEOUT`.
pub const RESOLVER_QUERY_TIMEOUT: Duration = Duration::from_millis(400);

/// Public resolvers queried after the system default, in priority order.
pub const PUBLIC_RESOLVERS: [Ipv4Addr; 3] = [
    Ipv4Addr::new(8, 8, 8, 8), // Google
    Ipv4Addr::new(1, 1, 1, 1), // Cloudflare
    Ipv4Addr::new(9, 9, 9, 9), // Quad9
];

/// Resolver used for the DNSKEY probe.
pub const DNSSEC_RESOLVER: Ipv4Addr = Ipv4Addr::new(1, 1, 1, 1);

pub const WHOIS_ROOT_SERVER: &str = "whois.iana.org";
pub const WHOIS_PORT: u16 = 43;
/// Maximum number of referrals followed after the root WHOIS server.
pub const MAX_WHOIS_REFERRALS: usize = 3;

pub const TLS_PORT: u16 = 443;

pub const DOH_URL: &str = "https://dns.google/resolve";
pub const CRTSH_URL: &str = "https://crt.sh/";
pub const URLHAUS_HOST_URL: &str = "https://urlhaus-api.abuse.ch/v1/host";
pub const VULNERS_SEARCH_URL: &str = "https://vulners.com/api/v3/search/lucene/";
pub const INTERNETDB_URL: &str = "https://internetdb.shodan.io/host";

pub const DEFAULT_USER_AGENT: &str = concat!("domain-recon/", env!("CARGO_PKG_VERSION"));

/// Per-IP enrichment runs one address at a time unless raised on the command line.
pub const DEFAULT_IP_CONCURRENCY: usize = 1;
pub const DEFAULT_LINK_CONCURRENCY: usize = 32;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Deadlines for every bounded task in a scan.
#[derive(Debug, Clone)]
pub struct Timeouts {
    pub dns_record: Duration,
    pub resolver_query: Duration,
    pub whois: Duration,
    pub dnssec: Duration,
    pub ssl: Duration,
    pub homepage: Duration,
    pub subdomains: Duration,
    pub threats: Duration,
    pub vulnerabilities: Duration,
    pub reverse_dns: Duration,
    pub host_intel: Duration,
    pub link_check: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            dns_record: DNS_RECORD_TIMEOUT,
            resolver_query: RESOLVER_QUERY_TIMEOUT,
            whois: WHOIS_TIMEOUT,
            dnssec: DNSSEC_TIMEOUT,
            ssl: SSL_TIMEOUT,
            homepage: HOMEPAGE_TIMEOUT,
            subdomains: SUBDOMAINS_TIMEOUT,
            threats: THREATS_TIMEOUT,
            vulnerabilities: VULNERABILITIES_TIMEOUT,
            reverse_dns: REVERSE_DNS_TIMEOUT,
            host_intel: HOST_INTEL_TIMEOUT,
            link_check: LINK_CHECK_TIMEOUT,
        }
    }
}

/// Base URLs of the HTTP collaborators. Tests point these at local mock servers.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub doh: String,
    pub crtsh: String,
    pub urlhaus: String,
    pub vulners: String,
    pub internetdb: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            doh: DOH_URL.to_string(),
            crtsh: CRTSH_URL.to_string(),
            urlhaus: URLHAUS_HOST_URL.to_string(),
            vulners: VULNERS_SEARCH_URL.to_string(),
            internetdb: INTERNETDB_URL.to_string(),
        }
    }
}

/// Immutable settings shared by every scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub timeouts: Timeouts,
    pub endpoints: Endpoints,
    /// Resolvers tried by the fallback unit, in order.
    pub resolvers: Vec<ResolverEndpoint>,
    pub dnssec_resolver: IpAddr,
    pub whois_server: String,
    pub whois_port: u16,
    pub tls_port: u16,
    /// When set, the homepage is fetched from this origin instead of `https://<host>`.
    pub site_origin: Option<String>,
    pub user_agent: String,
    pub ip_concurrency: usize,
    pub link_concurrency: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        let mut resolvers = vec![ResolverEndpoint::SystemDefault];
        resolvers.extend(
            PUBLIC_RESOLVERS
                .iter()
                .map(|ip| ResolverEndpoint::Address(IpAddr::V4(*ip))),
        );

        Self {
            timeouts: Timeouts::default(),
            endpoints: Endpoints::default(),
            resolvers,
            dnssec_resolver: IpAddr::V4(DNSSEC_RESOLVER),
            whois_server: WHOIS_ROOT_SERVER.to_string(),
            whois_port: WHOIS_PORT,
            tls_port: TLS_PORT,
            site_origin: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            ip_concurrency: DEFAULT_IP_CONCURRENCY,
            link_concurrency: DEFAULT_LINK_CONCURRENCY,
        }
    }
}

impl ScanConfig {
    /// Origin the homepage and relative links are resolved against.
    pub fn site_origin_for(&self, host: &str) -> String {
        match &self.site_origin {
            Some(origin) => origin.trim_end_matches('/').to_string(),
            None => format!("https://{host}"),
        }
    }
}

/// Command-line options for the scan server.
#[derive(Debug, Parser)]
#[command(name = "domain-recon", version, about = "Domain reconnaissance aggregator")]
pub struct Cli {
    /// Address the HTTP server listens on
    #[arg(long, env = "DOMAIN_RECON_BIND", default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,

    /// Write logs to a file in the user data directory instead of stderr
    #[arg(long)]
    pub log_file: bool,

    /// Override the log directory (implies --log-file)
    #[arg(long, env = "DOMAIN_RECON_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Number of IP addresses enriched at the same time
    #[arg(long, default_value_t = DEFAULT_IP_CONCURRENCY, value_parser = clap::value_parser!(u16).range(1..).map(usize::from))]
    pub ip_concurrency: usize,

    /// Number of concurrent link checks in the broken-link crawl
    #[arg(long, default_value_t = DEFAULT_LINK_CONCURRENCY, value_parser = clap::value_parser!(u16).range(1..).map(usize::from))]
    pub link_concurrency: usize,

    /// User-Agent sent with outbound HTTP requests
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

impl Cli {
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            user_agent: self.user_agent.clone(),
            ip_concurrency: self.ip_concurrency,
            link_concurrency: self.link_concurrency,
            ..ScanConfig::default()
        }
    }
}
