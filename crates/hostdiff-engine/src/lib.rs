//! hostdiff-engine: Snapshot comparison engine.
//!
//! Decodes two host snapshots, aligns their services and vulnerability
//! records, and produces a deterministic [`DiffReport`] with a rendered
//! summary. Every stage is a pure function: the engine holds no state and
//! performs no I/O, so it can be called concurrently without coordination.

pub mod decode;
pub mod error;
pub mod render;
pub mod services;
pub mod vulns;

use hostdiff_core::{DiffReport, Snapshot};

pub use error::{DecodeError, Result, Side};

/// Compare two raw snapshot documents.
///
/// Fails only when either buffer is not well-formed; once both decode, the
/// comparison always succeeds.
pub fn diff_snapshots(a: &[u8], b: &[u8]) -> Result<DiffReport> {
    let (snap_a, snap_b) = decode::decode_pair(a, b)?;
    Ok(compare(&snap_a, &snap_b))
}

/// Compare two decoded snapshots.
pub fn compare(a: &Snapshot, b: &Snapshot) -> DiffReport {
    let service_diff = services::compare_services(&a.services, &b.services);
    let vuln_diff = vulns::compare_vulnerabilities(&a.services, &b.services);

    let mut report = DiffReport {
        summary: String::new(),
        added_services: service_diff.added,
        removed_services: service_diff.removed,
        changed_services: service_diff.changed,
        added_vulnerabilities: vuln_diff.added,
        removed_vulnerabilities: vuln_diff.removed,
    };
    report.summary = render::render_summary(&report);

    tracing::debug!(
        address = %b.address,
        from = %a.capture_timestamp,
        to = %b.capture_timestamp,
        added = report.added_services.len(),
        removed = report.removed_services.len(),
        changed = report.changed_services.len(),
        cves_added = report.added_vulnerabilities.len(),
        cves_removed = report.removed_vulnerabilities.len(),
        "Snapshots compared"
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_real_censys_snapshots() {
        let a = br#"{
            "timestamp": "2025-09-10T03:00:00Z",
            "ip": "125.199.235.74",
            "services": [
                {"port": 80, "protocol": "HTTP", "status": 200,
                 "software": {"vendor": "microsoft", "product": "internet_information_services", "version": "8.5"}}
            ],
            "service_count": 1
        }"#;
        let b = br#"{
            "timestamp": "2025-09-15T08:49:45Z",
            "ip": "125.199.235.74",
            "services": [
                {"port": 80, "protocol": "HTTP", "status": 301,
                 "software": {"vendor": "microsoft", "product": "internet_information_services", "version": "8.5"}},
                {"port": 443, "protocol": "HTTPS", "status": 200,
                 "software": {"vendor": "microsoft", "product": "asp.net"},
                 "tls": {"version": "tlsv1_2", "cipher": "TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384"},
                 "vulnerabilities": ["CVE-2023-99999"]}
            ],
            "service_count": 2
        }"#;

        let report = diff_snapshots(a, b).unwrap();
        assert_eq!(report.added_services.len(), 1);
        assert_eq!(report.added_services[0].port, 443);
        assert!(report.removed_services.is_empty());
        assert_eq!(report.changed_services.len(), 1);
        assert_eq!(report.changed_services[0].changes["status"], "200 -> 301");
        assert_eq!(report.added_vulnerabilities.len(), 1);
        assert_eq!(report.added_vulnerabilities[0].cve_id, "CVE-2023-99999");
        assert!(report.summary.contains("Added Services (1):"));
        assert!(report.summary.contains("+ CVE-2023-99999 on port 443 (HTTPS)"));
    }

    #[test]
    fn test_decode_failure_yields_no_report() {
        let err = diff_snapshots(b"{invalid json}", br#"{"services": []}"#).unwrap_err();
        assert!(matches!(err, DecodeError::A(_)));
    }
}
