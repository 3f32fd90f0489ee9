//! Vulnerability matching.
//!
//! Every service's CVE identifiers are flattened into one set per snapshot,
//! keyed by (CVE id, port). The same CVE on two ports is two entries.

use std::collections::BTreeMap;

use hostdiff_core::{Service, VulnerabilityChange};

/// The outcome of matching vulnerability records between two snapshots.
#[derive(Debug, Default)]
pub struct VulnDiff {
    pub added: Vec<VulnerabilityChange>,
    pub removed: Vec<VulnerabilityChange>,
}

/// Flatten vulnerability records across all services of a snapshot.
///
/// The map is keyed by (port, CVE id) so iteration yields port order. When
/// several services contribute the same key, the last one supplies the
/// protocol.
pub fn collect_vulnerabilities(services: &[Service]) -> BTreeMap<(i64, &str), &str> {
    let mut records = BTreeMap::new();
    for svc in services {
        for cve in &svc.vulnerabilities {
            records.insert((svc.port, cve.as_str()), svc.protocol.as_str());
        }
    }
    records
}

/// Symmetric difference of the two snapshots' vulnerability records.
///
/// Output lists are ordered by port, then CVE id.
pub fn compare_vulnerabilities(a: &[Service], b: &[Service]) -> VulnDiff {
    let records_a = collect_vulnerabilities(a);
    let records_b = collect_vulnerabilities(b);

    VulnDiff {
        added: only_in(&records_b, &records_a),
        removed: only_in(&records_a, &records_b),
    }
}

fn only_in(
    left: &BTreeMap<(i64, &str), &str>,
    right: &BTreeMap<(i64, &str), &str>,
) -> Vec<VulnerabilityChange> {
    left.iter()
        .filter(|(key, _)| !right.contains_key(*key))
        .map(|((port, cve), protocol)| VulnerabilityChange {
            cve_id: cve.to_string(),
            port: *port,
            protocol: protocol.to_string(),
        })
        .collect()
}
