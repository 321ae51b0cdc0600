// src/core/scanner/ssl_scanner.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use color_eyre::eyre::{eyre, Result, WrapErr};
use rustls::pki_types::{CertificateDer, ServerName};
use rustls::{ClientConfig, ProtocolVersion, RootCertStore};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tracing::{debug, info, warn};
use x509_parser::extensions::GeneralName;
use x509_parser::prelude::*;

use crate::core::context::ScanContext;
use crate::core::models::{CertificateInfo, SslInfo};

/// Runs a TLS handshake against the host and reports protocol, cipher and chain.
///
/// Failures never escape: they are reported through `SslInfo::error` with
/// `valid: false` and an empty chain.
///
/// # Arguments
/// * `ctx` - Scan context holding the TLS port.
/// * `host` - The host to connect to and verify against.
pub async fn run_ssl_scan(ctx: &ScanContext, host: &str) -> SslInfo {
    info!(target = %host, "Starting SSL/TLS scan.");
    match inspect_tls(host, ctx.config.tls_port).await {
        Ok(info) => {
            info!(
                target = %host,
                valid = info.valid,
                protocol = info.protocol.as_deref().unwrap_or("Unknown"),
                chain = info.chain.len(),
                "SSL/TLS scan finished."
            );
            info
        }
        Err(e) => {
            warn!(target = %host, error = %e, "SSL/TLS scan failed.");
            SslInfo::failed(format!("Failed to retrieve SSL information: {e}"))
        }
    }
}

fn client_config() -> Result<ClientConfig> {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = ClientConfig::builder_with_provider(Arc::new(rustls::crypto::ring::default_provider()))
        .with_safe_default_protocol_versions()
        .wrap_err("No usable TLS protocol versions")?
        .with_root_certificates(roots)
        .with_no_client_auth();
    Ok(config)
}

async fn inspect_tls(host: &str, port: u16) -> Result<SslInfo> {
    let server_name = ServerName::try_from(host.to_string()).wrap_err("Invalid server name")?;
    let connector = TlsConnector::from(Arc::new(client_config()?));

    debug!(target = %host, port, "Connecting TCP stream.");
    let stream = TcpStream::connect((host, port))
        .await
        .wrap_err("TCP connection failed")?;

    debug!(target = %host, "Performing TLS handshake.");
    let tls = connector
        .connect(server_name, stream)
        .await
        .wrap_err("TLS handshake failed")?;
    let (_, session) = tls.get_ref();

    let protocol = session.protocol_version().map(protocol_name);
    let ciphers = session
        .negotiated_cipher_suite()
        .map(|suite| vec![format!("{:?}", suite.suite())])
        .unwrap_or_default();

    let chain = session
        .peer_certificates()
        .unwrap_or_default()
        .iter()
        .map(parse_certificate)
        .collect::<Result<Vec<_>>>()?;
    let cert = chain
        .first()
        .cloned()
        .ok_or_else(|| eyre!("Server presented no certificate"))?;

    let now = Utc::now();
    let valid = now > cert.not_before && now < cert.not_after;

    Ok(SslInfo {
        valid,
        protocol,
        ciphers,
        cert: Some(cert),
        chain,
        error: None,
    })
}

fn protocol_name(version: ProtocolVersion) -> String {
    match version {
        ProtocolVersion::SSLv2 => "SSLv2".to_string(),
        ProtocolVersion::SSLv3 => "SSLv3".to_string(),
        ProtocolVersion::TLSv1_0 => "TLSv1".to_string(),
        ProtocolVersion::TLSv1_1 => "TLSv1.1".to_string(),
        ProtocolVersion::TLSv1_2 => "TLSv1.2".to_string(),
        ProtocolVersion::TLSv1_3 => "TLSv1.3".to_string(),
        other => format!("{other:?}"),
    }
}

fn parse_certificate(der: &CertificateDer<'_>) -> Result<CertificateInfo> {
    let (_, x509) = parse_x509_certificate(der.as_ref()).map_err(|e| eyre!("X.509 parse error: {e}"))?;
    debug!(subject = %x509.subject(), issuer = %x509.issuer(), "Parsed certificate.");

    let validity = x509.validity();
    let not_before = asn1_time_to_chrono_utc(&validity.not_before);
    let not_after = asn1_time_to_chrono_utc(&validity.not_after);

    let subject_alt_names = match x509.subject_alternative_name() {
        Ok(Some(san)) => san
            .value
            .general_names
            .iter()
            .filter_map(|name| match name {
                GeneralName::DNSName(dns) => Some(dns.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };

    Ok(CertificateInfo {
        subject_name: x509.subject().to_string(),
        issuer_name: x509.issuer().to_string(),
        serial_number: x509.raw_serial_as_string(),
        not_before,
        not_after,
        days_until_expiry: not_after.signed_duration_since(Utc::now()).num_days(),
        subject_alt_names,
    })
}

fn asn1_time_to_chrono_utc(time: &ASN1Time) -> DateTime<Utc> {
    DateTime::from_timestamp(time.timestamp(), 0).unwrap_or_default()
}
