// src/core/models.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::dns::{RawRecordSet, RecordType};

// --- Domain ---

/// Public-suffix breakdown of the scanned host.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DomainDetails {
    pub domain: String,
    pub subdomain: String,
    pub public_suffix: String,
    pub top_level_domain: String,
    pub is_icann: bool,
    pub is_private: bool,
    pub hostname: String,
}

// --- WHOIS ---

/// Parsed WHOIS response, keyed by camelCase field name. Empty when the lookup failed.
pub type WhoisRecord = Map<String, Value>;

// --- DNS ---

/// Raw record sets for every queried type.
pub type DnsRecords = BTreeMap<RecordType, RawRecordSet>;

/// Outcome of the DNSKEY probe.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DnssecStatus {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DnssecStatus {
    pub fn enabled(keys: Vec<Value>) -> Self {
        Self { enabled: true, keys, error: None }
    }

    pub fn not_configured() -> Self {
        Self {
            enabled: false,
            keys: Vec::new(),
            error: Some("DNSSEC not configured".to_string()),
        }
    }
}

// --- SSL/TLS ---

/// Details extracted from one certificate of the presented chain.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CertificateInfo {
    pub subject_name: String,
    pub issuer_name: String,
    pub serial_number: String,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    pub days_until_expiry: i64,
    pub subject_alt_names: Vec<String>,
}

/// TLS posture of the host.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SslInfo {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    pub ciphers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert: Option<CertificateInfo>,
    pub chain: Vec<CertificateInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SslInfo {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            protocol: None,
            ciphers: Vec::new(),
            cert: None,
            chain: Vec::new(),
            error: Some(error.into()),
        }
    }
}

// --- Homepage ---

/// The fetched homepage. Not part of the report; feeds the analyzers and phase two.
#[derive(Debug, Clone, Default)]
pub struct Homepage {
    pub html: String,
    pub headers: HeaderMap,
}

// --- Security ---

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HeaderStatus {
    pub present: bool,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Secure,
    Insecure,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SecurityProtocols {
    pub tls_version: String,
    pub tls_status: Strength,
    pub ciphers: Vec<String>,
    pub cipher_status: Strength,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SecurityReport {
    pub headers: BTreeMap<String, HeaderStatus>,
    pub protocols: SecurityProtocols,
}

// --- Technology stack ---

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TechStack {
    pub server: Option<String>,
    pub powered_by: Option<String>,
    pub framework: Option<String>,
    pub cms: Option<String>,
    pub js_libraries: Vec<String>,
    pub analytics: Vec<String>,
    pub cdn: Option<String>,
    pub meta: BTreeMap<String, String>,
    pub others: Vec<String>,
}

// --- Threat intelligence ---

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Threats {
    pub urlhaus: Option<Value>,
}

// --- Phase two ---

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BrokenLink {
    pub url: String,
    pub status: u16,
    pub status_text: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ServiceInfo {
    pub port: u16,
    pub service: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct IpService {
    pub ip: String,
    pub hostnames: Vec<String>,
    pub services: Vec<ServiceInfo>,
}

// --- Main report ---

/// Everything the first phase produced, each field already settled to a value.
#[derive(Debug, Clone)]
pub struct PhaseOneResults {
    pub whois: WhoisRecord,
    pub raw_dns: DnsRecords,
    pub dnssec: Option<DnssecStatus>,
    pub ssl: SslInfo,
    pub homepage: Homepage,
    pub subdomains: Vec<String>,
    pub threats: Threats,
    pub vulnerabilities: Vec<Value>,
}

/// Output of the pure analyzers.
#[derive(Debug, Clone)]
pub struct DerivedAnalysis {
    pub security: SecurityReport,
    pub tech_stack: TechStack,
    pub emails: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PhaseTwoResults {
    pub broken_links: Vec<BrokenLink>,
    pub ip_services: Vec<IpService>,
}

/// The unified report returned for one scanned domain.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub domain_details: DomainDetails,
    pub whois: WhoisRecord,
    /// Summary projection of `raw_dns`.
    pub dns: DnsRecords,
    pub raw_dns: DnsRecords,
    pub dnssec: Option<DnssecStatus>,
    pub ssl: SslInfo,
    pub security: SecurityReport,
    pub tech_stack: TechStack,
    pub subdomains: Vec<String>,
    pub threats: Threats,
    pub vulnerabilities: Vec<Value>,
    pub broken_links: Vec<BrokenLink>,
    pub ip_services: Vec<IpService>,
    pub emails: Vec<String>,
}
