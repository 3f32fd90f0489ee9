//! Canonical snapshot model.
//!
//! A snapshot describes the services a single host exposed at one point in
//! time. Every optional field decodes to its zero value when absent or `null`,
//! so a sparse document is valid input rather than an error.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

// ── Snapshot ──────────────────────────────────────────────────────

/// A captured description of a host's open services at one point in time.
///
/// Decodes `ip` and `timestamp` as fallbacks for `address` and
/// `capture_timestamp`. When both names are present the canonical one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SnapshotWire")]
pub struct Snapshot {
    /// Host identity (an IPv4 address in practice).
    pub address: String,
    /// ISO-8601 capture time.
    pub capture_timestamp: String,
    /// Services in document order. Duplicate (port, protocol) entries are kept
    /// here; the comparator resolves them.
    pub services: Vec<Service>,
}

#[derive(Deserialize)]
struct SnapshotWire {
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    ip: Option<String>,
    #[serde(default)]
    capture_timestamp: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    services: Vec<Service>,
}

impl From<SnapshotWire> for Snapshot {
    fn from(wire: SnapshotWire) -> Self {
        Self {
            address: wire.address.or(wire.ip).unwrap_or_default(),
            capture_timestamp: wire
                .capture_timestamp
                .or(wire.timestamp)
                .unwrap_or_default(),
            services: wire.services,
        }
    }
}

// ── Service ───────────────────────────────────────────────────────

/// One network-exposed endpoint, identified by (port, protocol).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Port number. Not range-checked: anything that fits an integer is kept.
    #[serde(default, deserialize_with = "null_as_default")]
    pub port: i64,
    /// Application protocol label, e.g. "HTTP". Case-sensitive.
    #[serde(default, deserialize_with = "null_as_default")]
    pub protocol: String,
    /// Response status; 0 means "not reported".
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub software: Software,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsInfo>,
    /// CVE identifiers. Absent, `null` and `[]` are equivalent.
    #[serde(default, deserialize_with = "null_as_default")]
    pub vulnerabilities: BTreeSet<String>,
}

impl Service {
    /// Short label used in logs and summaries: "443/HTTPS".
    pub fn label(&self) -> String {
        format!("{}/{}", self.port, self.protocol)
    }
}

/// Software advertised by a service. Empty strings mean "not reported".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Software {
    #[serde(default, deserialize_with = "null_as_default")]
    pub vendor: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: String,
}

/// TLS configuration presented by a service.
///
/// `cert_fingerprint_sha256` is accepted when `cert_fingerprint` is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TlsInfoWire")]
pub struct TlsInfo {
    pub version: String,
    pub cipher: String,
    pub cert_fingerprint: String,
}

#[derive(Deserialize)]
struct TlsInfoWire {
    #[serde(default, deserialize_with = "null_as_default")]
    version: String,
    #[serde(default, deserialize_with = "null_as_default")]
    cipher: String,
    #[serde(default)]
    cert_fingerprint: Option<String>,
    #[serde(default)]
    cert_fingerprint_sha256: Option<String>,
}

impl From<TlsInfoWire> for TlsInfo {
    fn from(wire: TlsInfoWire) -> Self {
        Self {
            version: wire.version,
            cipher: wire.cipher,
            cert_fingerprint: wire
                .cert_fingerprint
                .or(wire.cert_fingerprint_sha256)
                .unwrap_or_default(),
        }
    }
}

/// Deserialize `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_service_defaults() {
        let svc: Service = serde_json::from_str(r#"{"port": 22}"#).unwrap();
        assert_eq!(svc.port, 22);
        assert_eq!(svc.protocol, "");
        assert_eq!(svc.status, 0);
        assert_eq!(svc.software, Software::default());
        assert!(svc.tls.is_none());
        assert!(svc.vulnerabilities.is_empty());
    }

    #[test]
    fn test_nulls_treated_as_absent() {
        let svc: Service = serde_json::from_str(
            r#"{"port": 80, "protocol": "HTTP", "status": null, "software": null,
                "tls": null, "vulnerabilities": null}"#,
        )
        .unwrap();
        assert_eq!(svc.status, 0);
        assert!(svc.tls.is_none());
        assert!(svc.vulnerabilities.is_empty());
    }

    #[test]
    fn test_censys_field_aliases() {
        let snap: Snapshot = serde_json::from_str(
            r#"{"ip": "125.199.235.74", "timestamp": "2025-09-10T03:00:00Z",
                "services": [{"port": 443, "protocol": "HTTPS",
                              "tls": {"version": "tlsv1_2", "cert_fingerprint_sha256": "ab12"}}],
                "service_count": 1}"#,
        )
        .unwrap();
        assert_eq!(snap.address, "125.199.235.74");
        assert_eq!(snap.capture_timestamp, "2025-09-10T03:00:00Z");
        let tls = snap.services[0].tls.as_ref().unwrap();
        assert_eq!(tls.cert_fingerprint, "ab12");
        assert_eq!(tls.cipher, "");
    }

    #[test]
    fn test_canonical_name_wins_over_alias() {
        let snap: Snapshot = serde_json::from_str(
            r#"{"address": "10.0.0.1", "ip": "10.9.9.9",
                "capture_timestamp": "2025-09-10T03:00:00Z", "timestamp": "1999-01-01T00:00:00Z",
                "services": [{"port": 443, "protocol": "HTTPS",
                              "tls": {"cert_fingerprint": "aa", "cert_fingerprint_sha256": "bb"}}]}"#,
        )
        .unwrap();
        assert_eq!(snap.address, "10.0.0.1");
        assert_eq!(snap.capture_timestamp, "2025-09-10T03:00:00Z");
        assert_eq!(snap.services[0].tls.as_ref().unwrap().cert_fingerprint, "aa");
    }

    #[test]
    fn test_null_canonical_name_falls_back_to_alias() {
        let snap: Snapshot =
            serde_json::from_str(r#"{"address": null, "ip": "10.0.0.1", "services": null}"#)
                .unwrap();
        assert_eq!(snap.address, "10.0.0.1");
        assert_eq!(snap.capture_timestamp, "");
        assert!(snap.services.is_empty());
    }

    #[test]
    fn test_service_label() {
        let svc = Service {
            port: 443,
            protocol: "HTTPS".to_string(),
            ..Default::default()
        };
        assert_eq!(svc.label(), "443/HTTPS");
    }
}
