// src/core/dns/backend.rs

use std::collections::HashMap;
use std::net::IpAddr;

use async_trait::async_trait;
use color_eyre::eyre::{Result, WrapErr};
use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::proto::rr::{Name, RData};
use hickory_resolver::TokioAsyncResolver;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{RecordType, ResolverEndpoint};
use crate::config::ScanConfig;

/// Classic DNS resolution with the upstream server chosen per call.
///
/// Resolver selection is an argument rather than shared state, so lookups for
/// different record types can run concurrently without interfering.
#[async_trait]
pub trait DnsBackend: Send + Sync {
    /// Queries `domain` for `record_type` through `resolver`.
    ///
    /// A name with no records of the type yields an empty list; only transport
    /// and server failures are errors.
    async fn query(
        &self,
        resolver: &ResolverEndpoint,
        domain: &str,
        record_type: RecordType,
    ) -> Result<Vec<Value>>;

    /// PTR lookup through the system resolver.
    async fn reverse(&self, ip: IpAddr) -> Result<Vec<String>>;
}

/// `hickory-resolver` backed implementation.
///
/// One resolver is built per configured endpoint at startup.
pub struct HickoryBackend {
    system: TokioAsyncResolver,
    by_address: HashMap<IpAddr, TokioAsyncResolver>,
    opts: ResolverOpts,
}

impl HickoryBackend {
    pub fn new(config: &ScanConfig) -> Self {
        let mut opts = ResolverOpts::default();
        opts.timeout = config.timeouts.resolver_query;
        opts.attempts = 1;
        opts.ndots = 0;

        let system = match hickory_resolver::system_conf::read_system_conf() {
            Ok((system_config, mut system_opts)) => {
                system_opts.timeout = opts.timeout;
                system_opts.attempts = opts.attempts;
                TokioAsyncResolver::tokio(system_config, system_opts)
            }
            Err(e) => {
                warn!(error = %e, "Could not read system resolver configuration, using hickory defaults.");
                TokioAsyncResolver::tokio(ResolverConfig::default(), opts.clone())
            }
        };

        let mut by_address = HashMap::new();
        let addresses = config
            .resolvers
            .iter()
            .filter_map(|endpoint| match endpoint {
                ResolverEndpoint::Address(ip) => Some(*ip),
                ResolverEndpoint::SystemDefault => None,
            })
            .chain(std::iter::once(config.dnssec_resolver));
        for ip in addresses {
            by_address
                .entry(ip)
                .or_insert_with(|| resolver_for_address(ip, &opts));
        }

        Self { system, by_address, opts }
    }

    fn resolver(&self, endpoint: &ResolverEndpoint) -> TokioAsyncResolver {
        match endpoint {
            ResolverEndpoint::SystemDefault => self.system.clone(),
            ResolverEndpoint::Address(ip) => self
                .by_address
                .get(ip)
                .cloned()
                .unwrap_or_else(|| resolver_for_address(*ip, &self.opts)),
        }
    }
}

fn resolver_for_address(ip: IpAddr, opts: &ResolverOpts) -> TokioAsyncResolver {
    let group = NameServerConfigGroup::from_ips_clear(&[ip], 53, true);
    let config = ResolverConfig::from_parts(None, vec![], group);
    TokioAsyncResolver::tokio(config, opts.clone())
}

#[async_trait]
impl DnsBackend for HickoryBackend {
    async fn query(
        &self,
        resolver: &ResolverEndpoint,
        domain: &str,
        record_type: RecordType,
    ) -> Result<Vec<Value>> {
        debug!(%resolver, domain, %record_type, "DNS query.");
        let wire_type: hickory_resolver::proto::rr::RecordType = record_type.into();
        let lookup = match self.resolver(resolver).lookup(domain, wire_type).await {
            Ok(lookup) => lookup,
            Err(e) if matches!(e.kind(), ResolveErrorKind::NoRecordsFound { .. }) => {
                debug!(%resolver, domain, %record_type, "No records found.");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(e).wrap_err_with(|| format!("{record_type} lookup via {resolver} failed"));
            }
        };

        Ok(lookup
            .record_iter()
            .filter(|record| record.record_type() == wire_type)
            .filter_map(|record| record.data())
            .map(rdata_to_json)
            .collect())
    }

    async fn reverse(&self, ip: IpAddr) -> Result<Vec<String>> {
        let lookup = self
            .system
            .reverse_lookup(ip)
            .await
            .wrap_err_with(|| format!("reverse lookup for {ip} failed"))?;
        Ok(lookup
            .iter()
            .map(|ptr| ptr.to_string().trim_end_matches('.').to_string())
            .collect())
    }
}

fn name_string(name: &Name) -> String {
    name.to_utf8().trim_end_matches('.').to_string()
}

/// Converts record data into the report's JSON shape.
///
/// Address and name records become strings, text records a list of chunks, and
/// MX/SOA/SRV structured objects; everything else falls back to presentation format.
pub fn rdata_to_json(rdata: &RData) -> Value {
    match rdata {
        RData::A(a) => Value::String(a.to_string()),
        RData::AAAA(aaaa) => Value::String(aaaa.to_string()),
        RData::NS(ns) => Value::String(name_string(&ns.0)),
        RData::CNAME(cname) => Value::String(name_string(&cname.0)),
        RData::PTR(ptr) => Value::String(name_string(&ptr.0)),
        RData::MX(mx) => json!({
            "exchange": name_string(mx.exchange()),
            "priority": mx.preference(),
        }),
        RData::TXT(txt) => Value::Array(
            txt.txt_data()
                .iter()
                .map(|chunk| Value::String(String::from_utf8_lossy(chunk).into_owned()))
                .collect(),
        ),
        RData::SOA(soa) => json!({
            "nsname": name_string(soa.mname()),
            "hostmaster": name_string(soa.rname()),
            "serial": soa.serial(),
            "refresh": soa.refresh(),
            "retry": soa.retry(),
            "expire": soa.expire(),
            "minttl": soa.minimum(),
        }),
        RData::SRV(srv) => json!({
            "name": name_string(srv.target()),
            "port": srv.port(),
            "priority": srv.priority(),
            "weight": srv.weight(),
        }),
        other => Value::String(other.to_string()),
    }
}
