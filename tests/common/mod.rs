// tests/common/mod.rs

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use color_eyre::eyre::{eyre, Result};
use domain_recon::config::{Endpoints, ScanConfig, Timeouts};
use domain_recon::core::dns::{DnsBackend, RecordType, ResolverEndpoint};
use domain_recon::ScanContext;
use serde_json::Value;

pub const GOOGLE: ResolverEndpoint = ResolverEndpoint::Address(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)));
pub const CLOUDFLARE: ResolverEndpoint = ResolverEndpoint::Address(IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1)));
pub const QUAD9: ResolverEndpoint = ResolverEndpoint::Address(IpAddr::V4(Ipv4Addr::new(9, 9, 9, 9)));

enum Scripted {
    Records(Vec<Value>),
    Fail,
    Hang,
}

/// DNS backend answering from a script and recording every call it receives.
///
/// Anything not scripted answers with no records.
#[derive(Default)]
pub struct ScriptedDns {
    answers: HashMap<(ResolverEndpoint, RecordType), Scripted>,
    reverse_answers: HashMap<IpAddr, Vec<String>>,
    queries: Mutex<Vec<(ResolverEndpoint, RecordType)>>,
    reverse_calls: AtomicUsize,
    silent: bool,
}

impl ScriptedDns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, resolver: ResolverEndpoint, record_type: RecordType, values: Vec<Value>) -> Self {
        self.answers.insert((resolver, record_type), Scripted::Records(values));
        self
    }

    pub fn fail(mut self, resolver: ResolverEndpoint, record_type: RecordType) -> Self {
        self.answers.insert((resolver, record_type), Scripted::Fail);
        self
    }

    pub fn hang(mut self, resolver: ResolverEndpoint, record_type: RecordType) -> Self {
        self.answers.insert((resolver, record_type), Scripted::Hang);
        self
    }

    /// Every classic query hangs, as on a network that drops port 53.
    pub fn silent(mut self) -> Self {
        self.silent = true;
        self
    }

    pub fn reverse_answer(mut self, ip: Ipv4Addr, names: &[&str]) -> Self {
        self.reverse_answers
            .insert(IpAddr::V4(ip), names.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn queries_for(&self, record_type: RecordType) -> Vec<ResolverEndpoint> {
        self.queries
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, rtype)| *rtype == record_type)
            .map(|(resolver, _)| *resolver)
            .collect()
    }

    pub fn reverse_calls(&self) -> usize {
        self.reverse_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DnsBackend for ScriptedDns {
    async fn query(
        &self,
        resolver: &ResolverEndpoint,
        _domain: &str,
        record_type: RecordType,
    ) -> Result<Vec<Value>> {
        self.queries.lock().unwrap().push((*resolver, record_type));
        if self.silent {
            return std::future::pending().await;
        }
        match self.answers.get(&(*resolver, record_type)) {
            Some(Scripted::Records(values)) => Ok(values.clone()),
            Some(Scripted::Fail) => Err(eyre!("SERVFAIL from {resolver}")),
            Some(Scripted::Hang) => std::future::pending().await,
            None => Ok(Vec::new()),
        }
    }

    async fn reverse(&self, ip: IpAddr) -> Result<Vec<String>> {
        self.reverse_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reverse_answers.get(&ip).cloned().unwrap_or_default())
    }
}

/// A port on localhost that nothing listens on.
pub fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Configuration pointing every HTTP collaborator at `mock_uri`, with short budgets
/// and unreachable WHOIS/TLS ports.
pub fn test_config(mock_uri: &str) -> ScanConfig {
    let short = Duration::from_millis(1500);
    ScanConfig {
        timeouts: Timeouts {
            dns_record: short,
            resolver_query: Duration::from_millis(200),
            whois: short,
            dnssec: short,
            ssl: Duration::from_millis(500),
            homepage: short,
            subdomains: short,
            threats: short,
            vulnerabilities: short,
            reverse_dns: short,
            host_intel: short,
            link_check: short,
        },
        endpoints: Endpoints {
            doh: format!("{mock_uri}/resolve"),
            crtsh: format!("{mock_uri}/crtsh/"),
            urlhaus: format!("{mock_uri}/urlhaus/v1/host"),
            vulners: format!("{mock_uri}/vulners/search/"),
            internetdb: format!("{mock_uri}/internetdb/host"),
        },
        whois_server: "127.0.0.1".to_string(),
        whois_port: closed_port(),
        tls_port: closed_port(),
        site_origin: Some(mock_uri.to_string()),
        ..ScanConfig::default()
    }
}

pub fn context(config: ScanConfig, dns: Arc<ScriptedDns>) -> ScanContext {
    ScanContext::with_backend(config, dns).unwrap()
}
