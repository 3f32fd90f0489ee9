//! Diff report model.
//!
//! A report is computed on demand from two snapshots and never persisted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::Service;

/// Attribute names used as keys in [`ServiceChange::changes`].
pub mod attr {
    pub const PROTOCOL: &str = "protocol";
    pub const STATUS: &str = "status";
    pub const SOFTWARE_PRODUCT: &str = "software_product";
    pub const SOFTWARE_VERSION: &str = "software_version";
    pub const SOFTWARE_VENDOR: &str = "software_vendor";
    pub const TLS: &str = "tls";
    pub const TLS_VERSION: &str = "tls_version";
    pub const TLS_CIPHER: &str = "tls_cipher";
}

/// Structured result of comparing two snapshots of the same host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffReport {
    /// Human-readable rendering of the lists below.
    pub summary: String,
    pub added_services: Vec<Service>,
    pub removed_services: Vec<Service>,
    pub changed_services: Vec<ServiceChange>,
    pub added_vulnerabilities: Vec<VulnerabilityChange>,
    pub removed_vulnerabilities: Vec<VulnerabilityChange>,
}

impl DiffReport {
    /// True when all five change lists are empty.
    pub fn is_empty(&self) -> bool {
        self.added_services.is_empty()
            && self.removed_services.is_empty()
            && self.changed_services.is_empty()
            && self.added_vulnerabilities.is_empty()
            && self.removed_vulnerabilities.is_empty()
    }

    /// Total number of entries across all lists.
    pub fn change_count(&self) -> usize {
        self.added_services.len()
            + self.removed_services.len()
            + self.changed_services.len()
            + self.added_vulnerabilities.len()
            + self.removed_vulnerabilities.len()
    }
}

/// Attribute-level differences for a service present in both snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceChange {
    pub port: i64,
    pub protocol: String,
    /// Attribute name -> "old -> new" description, ordered by name.
    pub changes: BTreeMap<String, String>,
}

/// A CVE that appeared on, or disappeared from, a port.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VulnerabilityChange {
    pub cve_id: String,
    pub port: i64,
    pub protocol: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_report_is_empty() {
        let report = DiffReport::default();
        assert!(report.is_empty());
        assert_eq!(report.change_count(), 0);
    }

    #[test]
    fn test_change_count() {
        let report = DiffReport {
            added_vulnerabilities: vec![VulnerabilityChange {
                cve_id: "CVE-2023-1234".to_string(),
                port: 22,
                protocol: "SSH".to_string(),
            }],
            changed_services: vec![ServiceChange {
                port: 80,
                protocol: "HTTP".to_string(),
                changes: BTreeMap::from([(attr::STATUS.to_string(), "200 -> 301".to_string())]),
            }],
            ..Default::default()
        };
        assert!(!report.is_empty());
        assert_eq!(report.change_count(), 2);
    }
}
