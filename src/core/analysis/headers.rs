// src/core/analysis/headers.rs

use std::collections::BTreeMap;

use reqwest::header::HeaderMap;
use tracing::{debug, warn};

use crate::core::models::HeaderStatus;

/// Response headers reported under `security.headers`.
pub const SECURITY_HEADERS: [&str; 9] = [
    "content-security-policy",
    "strict-transport-security",
    "x-frame-options",
    "x-content-type-options",
    "x-xss-protection",
    "referrer-policy",
    "permissions-policy",
    "cross-origin-opener-policy",
    "cross-origin-embedder-policy",
];

/// Checks for the presence and value of a specific HTTP header in a `HeaderMap`.
///
/// # Arguments
/// * `headers` - A reference to the `HeaderMap` from the HTTP response.
/// * `name` - The name of the header to check (e.g., "content-security-policy").
///
/// # Returns
/// A `HeaderStatus` with `present: false` and no value when the header is absent.
/// Non-UTF-8 values are reported as present with a placeholder value.
fn check_header(headers: &HeaderMap, name: &str) -> HeaderStatus {
    match headers.get(name) {
        Some(value) => match value.to_str() {
            Ok(s) => {
                debug!(header_name = name, value = s, "Header found.");
                HeaderStatus {
                    present: true,
                    value: Some(s.to_string()),
                }
            }
            Err(_) => {
                warn!(header_name = name, "Header found but contained invalid UTF-8.");
                HeaderStatus {
                    present: true,
                    value: Some("[Invalid UTF-8]".to_string()),
                }
            }
        },
        None => {
            debug!(header_name = name, "Header not found.");
            HeaderStatus {
                present: false,
                value: None,
            }
        }
    }
}

/// Reports every header of [`SECURITY_HEADERS`], keyed by lower-case name.
pub fn analyze_security_headers(headers: &HeaderMap) -> BTreeMap<String, HeaderStatus> {
    SECURITY_HEADERS
        .iter()
        .map(|name| (name.to_string(), check_header(headers, name)))
        .collect()
}
