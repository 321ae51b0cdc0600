// src/core/analysis/emails.rs

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::core::dns::RecordType;
use crate::core::models::{DnsRecords, WhoisRecord};

static RE_EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap());

/// WHOIS fields that usually hold contact addresses.
const WHOIS_EMAIL_FIELDS: [&str; 4] = ["registrantEmail", "adminEmail", "techEmail", "email"];

/// Collects email addresses from WHOIS contacts, TXT/SPF records and the homepage.
///
/// Addresses are trimmed and lower-cased; the first occurrence decides the order.
pub fn extract_emails(whois: &WhoisRecord, raw_dns: &DnsRecords, html: &str) -> Vec<String> {
    let mut collector = EmailCollector::default();

    for field in WHOIS_EMAIL_FIELDS {
        match whois.get(field) {
            Some(Value::String(s)) => collector.scan(s),
            Some(Value::Array(values)) => values
                .iter()
                .filter_map(Value::as_str)
                .for_each(|s| collector.scan(s)),
            _ => {}
        }
    }

    for record_type in [RecordType::TXT, RecordType::SPF] {
        if let Some(records) = raw_dns.get(&record_type) {
            records.strings().into_iter().for_each(|s| collector.scan(s));
        }
    }

    collector.scan(html);
    collector.emails
}

#[derive(Default)]
struct EmailCollector {
    seen: HashSet<String>,
    emails: Vec<String>,
}

impl EmailCollector {
    fn scan(&mut self, text: &str) {
        for found in RE_EMAIL.find_iter(text) {
            let email = found.as_str().trim().to_lowercase();
            if self.seen.insert(email.clone()) {
                self.emails.push(email);
            }
        }
    }
}
