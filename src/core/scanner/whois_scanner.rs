// src/core/scanner/whois_scanner.rs

use std::time::Duration;

use color_eyre::eyre::{eyre, Result, WrapErr};
use serde_json::{Map, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::config::MAX_WHOIS_REFERRALS;
use crate::core::context::ScanContext;
use crate::core::models::WhoisRecord;

/// Keys whose value names the next WHOIS server to ask.
const REFERRAL_KEYS: &[&str] = &["refer", "whois", "registrar whois server"];

/// Upper bound on one server's answer.
const MAX_RESPONSE_BYTES: u64 = 256 * 1024;

/// Hops stop this long before the WHOIS budget runs out, so gathered fields are returned.
const SETTLE_MARGIN: Duration = Duration::from_millis(250);

/// Looks up registration data for a domain.
///
/// The configured root server is queried first; `refer:`, `whois:` and
/// `Registrar WHOIS Server:` lines are followed for up to three more hops. Fields
/// from later hops replace fields with the same key from earlier ones, and the
/// raw text of every hop is kept under `raw`. Hops share a deadline slightly
/// inside the WHOIS budget; a referral that misses it ends the chain.
///
/// # Arguments
/// * `ctx` - Scan context holding the root server and port.
/// * `domain` - The domain to look up.
///
/// # Returns
/// The merged record, or an error if the root server could not be queried.
pub async fn run_whois_scan(ctx: &ScanContext, domain: &str) -> Result<WhoisRecord> {
    info!(target = %domain, "Starting WHOIS lookup.");

    let mut server = ctx.config.whois_server.clone();
    let mut port = ctx.config.whois_port;
    let mut record = Map::new();
    let mut raw = Vec::new();
    let deadline = Instant::now() + ctx.config.timeouts.whois.saturating_sub(SETTLE_MARGIN);

    for hop in 0..=MAX_WHOIS_REFERRALS {
        let answer = timeout_at(deadline, query_server(&server, port, domain))
            .await
            .unwrap_or_else(|_| Err(eyre!("WHOIS server {server}:{port} did not answer in time")));
        let text = match answer {
            Ok(text) => text,
            Err(e) if hop > 0 => {
                warn!(server = %server, error = %e, "WHOIS referral failed, keeping earlier data.");
                break;
            }
            Err(e) => return Err(e),
        };

        record.extend(parse_whois_text(&text));
        let next = find_referral(&text);
        raw.push(text);

        match next.and_then(|value| parse_referral(&value, ctx.config.whois_port)) {
            Some((next_server, next_port))
                if !(next_server.eq_ignore_ascii_case(&server) && next_port == port) =>
            {
                debug!(from = %server, to = %next_server, "Following WHOIS referral.");
                server = next_server;
                port = next_port;
            }
            _ => break,
        }
    }

    record.insert("raw".to_string(), Value::String(raw.join("\n")));
    info!(target = %domain, fields = record.len(), "WHOIS lookup finished.");
    Ok(record)
}

async fn query_server(server: &str, port: u16, domain: &str) -> Result<String> {
    debug!(server, port, domain, "Querying WHOIS server.");
    let mut stream = TcpStream::connect((server, port))
        .await
        .wrap_err_with(|| format!("Could not connect to WHOIS server {server}:{port}"))?;
    stream
        .write_all(format!("{domain}\r\n").as_bytes())
        .await
        .wrap_err("Failed to send WHOIS query")?;

    let mut buf = Vec::new();
    (&mut stream)
        .take(MAX_RESPONSE_BYTES)
        .read_to_end(&mut buf)
        .await
        .wrap_err("Failed to read WHOIS response")?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Parses `Key: Value` lines into a camelCase-keyed object.
///
/// Comment and banner lines are skipped. A key seen more than once becomes an
/// array of its distinct values.
pub fn parse_whois_text(text: &str) -> Map<String, Value> {
    let mut fields = Map::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('%') || line.starts_with('#') || line.starts_with(">>>") {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let (key, value) = (camel_case(key), value.trim());
        if key.is_empty() || value.is_empty() {
            continue;
        }

        let value = Value::String(value.to_string());
        match fields.get_mut(&key) {
            None => {
                fields.insert(key, value);
            }
            Some(Value::Array(values)) => {
                if !values.contains(&value) {
                    values.push(value);
                }
            }
            Some(existing) => {
                if *existing != value {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
            }
        }
    }

    fields
}

fn find_referral(text: &str) -> Option<String> {
    text.lines().find_map(|line| {
        let (key, value) = line.trim().split_once(':')?;
        let value = value.trim();
        (REFERRAL_KEYS.contains(&key.trim().to_ascii_lowercase().as_str()) && !value.is_empty())
            .then(|| value.to_string())
    })
}

/// Splits a referral value such as `whois://whois.nic.io:43` into host and port.
fn parse_referral(value: &str, default_port: u16) -> Option<(String, u16)> {
    let value = value
        .split_once("://")
        .map_or(value, |(_, rest)| rest)
        .trim_end_matches('/');
    let (host, port) = match value.rsplit_once(':') {
        Some((host, port)) => (host, port.parse().ok()?),
        None => (value, default_port),
    };
    let host = host.trim().to_ascii_lowercase();
    (!host.is_empty() && !host.contains(char::is_whitespace)).then_some((host, port))
}

/// `Registrant Email` -> `registrantEmail`, `Registrar WHOIS Server` -> `registrarWhoisServer`.
fn camel_case(key: &str) -> String {
    let mut out = String::new();
    for (i, word) in key
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .enumerate()
    {
        let lower = word.to_ascii_lowercase();
        if i == 0 {
            out.push_str(&lower);
        } else {
            let mut chars = lower.chars();
            if let Some(first) = chars.next() {
                out.push(first.to_ascii_uppercase());
                out.extend(chars);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const REGISTRY_RESPONSE: &str = "\
Domain Name: EXAMPLE.COM
Registrar WHOIS Server: whois.registrar.example
Registrant Email: owner@example.com
Name Server: A.IANA-SERVERS.NET
Name Server: B.IANA-SERVERS.NET
>>> Last update of whois database: 2024-01-01T00:00:00Z <<<
% This line is a comment: ignored
";

    #[test]
    fn keys_are_camel_cased() {
        assert_eq!(camel_case("Registrant Email"), "registrantEmail");
        assert_eq!(camel_case("Registrar WHOIS Server"), "registrarWhoisServer");
        assert_eq!(camel_case("refer"), "refer");
        assert_eq!(camel_case("Updated-Date"), "updatedDate");
    }

    #[test]
    fn parses_fields_and_collects_repeated_keys() {
        let fields = parse_whois_text(REGISTRY_RESPONSE);
        assert_eq!(fields["domainName"], json!("EXAMPLE.COM"));
        assert_eq!(fields["registrantEmail"], json!("owner@example.com"));
        assert_eq!(
            fields["nameServer"],
            json!(["A.IANA-SERVERS.NET", "B.IANA-SERVERS.NET"])
        );
        assert!(!fields.contains_key("lastUpdateOfWhoisDatabase"));
        assert!(!fields.contains_key("thisLineIsAComment"));
    }

    #[test]
    fn finds_referrals() {
        assert_eq!(
            find_referral("domain: COM\nrefer: whois.verisign-grs.com\n").as_deref(),
            Some("whois.verisign-grs.com")
        );
        assert_eq!(
            find_referral(REGISTRY_RESPONSE).as_deref(),
            Some("whois.registrar.example")
        );
        assert_eq!(find_referral("Domain Name: EXAMPLE.COM\n"), None);
    }

    #[test]
    fn referral_values_are_normalized() {
        assert_eq!(
            parse_referral("whois://WHOIS.nic.io/", 43),
            Some(("whois.nic.io".to_string(), 43))
        );
        assert_eq!(
            parse_referral("rwhois.example.net:4321", 43),
            Some(("rwhois.example.net".to_string(), 4321))
        );
        assert_eq!(parse_referral("not a host", 43), None);
    }
}
