// tests/phase_two_tests.rs

mod common;

use std::net::Ipv4Addr;
use std::sync::Arc;

use domain_recon::core::dns::{RawRecordSet, RecordType};
use domain_recon::core::enrichment::ip_services::enrich_ips;
use domain_recon::core::enrichment::links::find_broken_links;
use domain_recon::core::models::{BrokenLink, DnsRecords, IpService, ServiceInfo};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{closed_port, context, test_config, ScriptedDns};

#[tokio::test]
async fn broken_link_is_reported_with_absolute_url() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/fine"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let ctx = context(test_config(&server.uri()), Arc::new(ScriptedDns::new()));
    let html = r#"<a href="/broken">broken</a> <a class="nav" href='/fine'>fine</a>"#;

    let broken = find_broken_links(&ctx, "example.com", html).await;

    assert_eq!(
        broken,
        vec![BrokenLink {
            url: format!("{}/broken", server.uri()),
            status: 404,
            status_text: "Not Found".to_string(),
        }]
    );
}

#[tokio::test]
async fn page_without_anchors_makes_no_requests() {
    let server = MockServer::start().await;
    let ctx = context(test_config(&server.uri()), Arc::new(ScriptedDns::new()));

    let broken = find_broken_links(&ctx, "example.com", "<html><body>nothing here</body></html>").await;

    assert!(broken.is_empty());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_and_unreachable_links_have_status_zero() {
    let server = MockServer::start().await;
    let ctx = context(test_config(&server.uri()), Arc::new(ScriptedDns::new()));
    let unreachable = format!("http://127.0.0.1:{}/gone", closed_port());
    let html = format!(r#"<a href="http://[bad">x</a><a href="{unreachable}">y</a><a href="mailto:a@example.com">z</a>"#);

    let broken = find_broken_links(&ctx, "example.com", &html).await;

    assert_eq!(
        broken,
        vec![
            BrokenLink {
                url: "http://[bad".to_string(),
                status: 0,
                status_text: "Invalid URL".to_string(),
            },
            BrokenLink {
                url: unreachable,
                status: 0,
                status_text: "Failed to fetch".to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn no_a_records_means_no_enrichment_calls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ports": [80]})))
        .expect(0)
        .mount(&server)
        .await;

    let dns = Arc::new(ScriptedDns::new());
    let ctx = context(test_config(&server.uri()), dns.clone());
    let mut raw_dns = DnsRecords::new();
    raw_dns.insert(RecordType::A, RawRecordSet::new());
    raw_dns.insert(RecordType::AAAA, RawRecordSet::from_iter([json!("2001:db8::1")]));

    let services = enrich_ips(&ctx, &raw_dns).await;

    assert!(services.is_empty());
    assert_eq!(dns.reverse_calls(), 0);
    server.verify().await;
}

#[tokio::test]
async fn enriches_each_address_in_record_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/internetdb/host/203.0.113.10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ip": "203.0.113.10",
            "ports": [443, 80],
            "cpes": ["cpe:/a:nginx:nginx"],
            "hostnames": [],
            "tags": [],
            "vulns": []
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/internetdb/host/203.0.113.20"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "No information available"})))
        .mount(&server)
        .await;

    let dns = Arc::new(ScriptedDns::new().reverse_answer(Ipv4Addr::new(203, 0, 113, 10), &["web.example.com"]));
    let ctx = context(test_config(&server.uri()), dns.clone());
    let mut raw_dns = DnsRecords::new();
    raw_dns.insert(
        RecordType::A,
        RawRecordSet::from_iter([json!("203.0.113.10"), json!("203.0.113.20")]),
    );

    let services = enrich_ips(&ctx, &raw_dns).await;

    assert_eq!(
        services,
        vec![
            IpService {
                ip: "203.0.113.10".to_string(),
                hostnames: vec!["web.example.com".to_string()],
                services: vec![
                    ServiceInfo { port: 443, service: "cpe:/a:nginx:nginx".to_string() },
                    ServiceInfo { port: 80, service: "unknown".to_string() },
                ],
            },
            IpService {
                ip: "203.0.113.20".to_string(),
                hostnames: vec![],
                services: vec![],
            },
        ]
    );
    assert_eq!(dns.reverse_calls(), 2);
}
