// tests/sources_tests.rs

mod common;

use std::sync::Arc;
use std::time::Duration;

use domain_recon::core::bounded::run_bounded;
use domain_recon::core::models::{Threats, WhoisRecord};
use domain_recon::core::scanner::homepage_scanner::run_homepage_fetch;
use domain_recon::core::scanner::ssl_scanner::run_ssl_scan;
use domain_recon::core::scanner::subdomain_scanner::run_subdomain_scan;
use domain_recon::core::scanner::threat_scanner::{run_threat_scan, run_vulnerability_scan};
use domain_recon::core::scanner::whois_scanner::run_whois_scan;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{context, test_config, ScriptedDns};

/// Serves one WHOIS answer per connection, recording the queried names.
async fn whois_server(response: String) -> (u16, tokio::task::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = tokio::spawn(async move {
        let mut queries = Vec::new();
        let (stream, _) = listener.accept().await.unwrap();
        let mut stream = BufReader::new(stream);
        let mut line = String::new();
        stream.read_line(&mut line).await.unwrap();
        queries.push(line.trim_end().to_string());
        stream.get_mut().write_all(response.as_bytes()).await.unwrap();
        stream.get_mut().shutdown().await.unwrap();
        queries
    });
    (port, handle)
}

#[tokio::test]
async fn certificate_transparency_names_become_subdomains() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/crtsh/"))
        .and(query_param("q", "%.example.com"))
        .and(query_param("output", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"issuer_name": "C=US, O=Let's Encrypt", "name_value": "*.api.example.com\nwww.example.com"},
            {"issuer_name": "C=US, O=Let's Encrypt", "name_value": "www.example.com"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(test_config(&server.uri()), Arc::new(ScriptedDns::new()));
    let subdomains = run_subdomain_scan(&ctx, "example.com").await.unwrap();

    assert_eq!(subdomains, vec!["api.example.com", "www.example.com"]);
}

#[tokio::test]
async fn whois_follows_referral_and_merges_fields() {
    let (registrar_port, registrar) = whois_server(
        "Domain Name: example.com\r\nRegistrant Email: Owner@Example.com\r\nRegistrar: Example Registrar\r\n".to_string(),
    )
    .await;
    let (root_port, root) = whois_server(format!(
        "% IANA WHOIS server\r\n\r\ndomain:       COM\r\nrefer:        127.0.0.1:{registrar_port}\r\nregistrar: IANA placeholder\r\n"
    ))
    .await;

    let mut config = test_config("http://127.0.0.1:9");
    config.whois_port = root_port;
    let ctx = context(config, Arc::new(ScriptedDns::new()));

    let record = run_whois_scan(&ctx, "example.com").await.unwrap();

    assert_eq!(root.await.unwrap(), vec!["example.com"]);
    assert_eq!(registrar.await.unwrap(), vec!["example.com"]);
    assert_eq!(record["domain"], json!("COM"));
    assert_eq!(record["registrantEmail"], json!("Owner@Example.com"));
    assert_eq!(record["registrar"], json!("Example Registrar"));
    assert!(record["raw"].as_str().unwrap().contains("IANA WHOIS server"));
}

#[tokio::test]
async fn silent_whois_referral_keeps_root_fields() {
    let silent = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let silent_port = silent.local_addr().unwrap().port();
    let holder = tokio::spawn(async move {
        let (stream, _) = silent.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
        drop(stream);
    });
    let (root_port, _root) = whois_server(format!(
        "domain: EXAMPLE.COM\r\nRegistrant Email: owner@example.com\r\nrefer: 127.0.0.1:{silent_port}\r\n"
    ))
    .await;

    let mut config = test_config("http://127.0.0.1:9");
    config.whois_port = root_port;
    let budget = config.timeouts.whois;
    let ctx = context(config, Arc::new(ScriptedDns::new()));

    let outcome = run_bounded("whois", budget, WhoisRecord::new(), run_whois_scan(&ctx, "example.com")).await;

    assert!(!outcome.is_timed_out());
    let record = outcome.into_inner();
    assert_eq!(record["domain"], json!("EXAMPLE.COM"));
    assert_eq!(record["registrantEmail"], json!("owner@example.com"));
    holder.abort();
}

#[tokio::test]
async fn unreachable_whois_server_is_an_error() {
    let ctx = context(test_config("http://127.0.0.1:9"), Arc::new(ScriptedDns::new()));
    assert!(run_whois_scan(&ctx, "example.com").await.is_err());
}

#[tokio::test]
async fn homepage_keeps_body_and_headers_for_error_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(503)
                .insert_header("server", "nginx")
                .set_body_string("<html><body>maintenance</body></html>"),
        )
        .mount(&server)
        .await;

    let ctx = context(test_config(&server.uri()), Arc::new(ScriptedDns::new()));
    let homepage = run_homepage_fetch(&ctx, "example.com").await.unwrap();

    assert_eq!(homepage.html, "<html><body>maintenance</body></html>");
    assert_eq!(homepage.headers.get("server").unwrap(), "nginx");
}

#[tokio::test]
async fn threat_and_vulnerability_lookups() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/urlhaus/v1/host/example.com/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"query_status": "no_results"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/vulners/search/"))
        .and(query_param("query", "domain:example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "OK",
            "data": {"search": [{"_id": "EDB-1", "_source": {"title": "example"}}], "total": 1}
        })))
        .mount(&server)
        .await;

    let ctx = context(test_config(&server.uri()), Arc::new(ScriptedDns::new()));

    let threats = run_threat_scan(&ctx, "example.com").await.unwrap();
    assert_eq!(threats.urlhaus, Some(json!({"query_status": "no_results"})));

    let vulnerabilities = run_vulnerability_scan(&ctx, "example.com").await.unwrap();
    assert_eq!(vulnerabilities.len(), 1);
    assert_eq!(vulnerabilities[0]["_id"], json!("EDB-1"));
}

#[tokio::test]
async fn threat_lookups_with_error_status_fall_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/urlhaus/v1/host/example.com/"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "internal"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/vulners/search/"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({"data": {"search": [{"_id": "X"}]}})))
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let budget = config.timeouts.threats;
    let ctx = context(config, Arc::new(ScriptedDns::new()));

    assert!(run_threat_scan(&ctx, "example.com").await.is_err());
    let threats = run_bounded("threats", budget, Threats::default(), run_threat_scan(&ctx, "example.com"))
        .await
        .into_inner();
    assert_eq!(threats.urlhaus, None);
    assert_eq!(serde_json::to_value(&threats).unwrap(), json!({"urlhaus": null}));

    assert!(run_vulnerability_scan(&ctx, "example.com").await.is_err());
}

#[tokio::test]
async fn tls_failure_is_reported_not_raised() {
    let ctx = context(test_config("http://127.0.0.1:9"), Arc::new(ScriptedDns::new()));
    let ssl = run_ssl_scan(&ctx, "localhost").await;

    assert!(!ssl.valid);
    assert!(ssl.chain.is_empty());
    assert!(ssl
        .error
        .as_deref()
        .unwrap()
        .starts_with("Failed to retrieve SSL information"));
}
