// src/core/analysis/protocols.rs

use crate::core::models::{SecurityProtocols, Strength};

/// Protocol versions considered broken.
pub const WEAK_PROTOCOLS: [&str; 4] = ["SSLv2", "SSLv3", "TLSv1", "TLSv1.1"];

/// Cipher name fragments that mark a suite as weak.
pub const WEAK_CIPHER_MARKERS: [&str; 11] = [
    "RC4", "DES", "3DES", "MD5", "SHA1", "CBC", "EXP", "NULL", "ANON", "ADH", "IDEA",
];

/// Classifies the negotiated protocol and cipher list.
///
/// An unknown protocol is reported as `"Unknown"` and counted as secure. The
/// cipher list is insecure when any suite name contains a weak marker.
pub fn analyze_protocols(protocol: Option<&str>, ciphers: &[String]) -> SecurityProtocols {
    let tls_version = protocol.unwrap_or("Unknown").to_string();
    let tls_status = if WEAK_PROTOCOLS.contains(&tls_version.as_str()) {
        Strength::Insecure
    } else {
        Strength::Secure
    };

    let weak_cipher = ciphers.iter().any(|cipher| {
        let cipher = cipher.to_ascii_uppercase();
        WEAK_CIPHER_MARKERS.iter().any(|marker| cipher.contains(marker))
    });

    SecurityProtocols {
        tls_version,
        tls_status,
        ciphers: ciphers.to_vec(),
        cipher_status: if weak_cipher { Strength::Insecure } else { Strength::Secure },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rc4_makes_the_list_insecure() {
        let report = analyze_protocols(
            Some("TLSv1.3"),
            &owned(&["TLS_RSA_WITH_RC4_128_SHA", "TLS_AES_256_GCM_SHA384"]),
        );
        assert_eq!(report.cipher_status, Strength::Insecure);
    }

    #[test]
    fn modern_suite_is_secure() {
        let report = analyze_protocols(Some("TLSv1.3"), &owned(&["TLS_AES_256_GCM_SHA384"]));
        assert_eq!(report.cipher_status, Strength::Secure);
        assert_eq!(report.tls_status, Strength::Secure);
    }

    #[test]
    fn legacy_protocols_are_insecure() {
        for version in ["SSLv3", "TLSv1", "TLSv1.1"] {
            assert_eq!(analyze_protocols(Some(version), &[]).tls_status, Strength::Insecure);
        }
        assert_eq!(analyze_protocols(Some("TLSv1.2"), &[]).tls_status, Strength::Secure);
    }

    #[test]
    fn unknown_protocol_counts_as_secure() {
        let report = analyze_protocols(None, &[]);
        assert_eq!(report.tls_version, "Unknown");
        assert_eq!(report.tls_status, Strength::Secure);
        assert_eq!(report.cipher_status, Strength::Secure);
    }
}
