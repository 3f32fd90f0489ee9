//! Service matching and attribute comparison.
//!
//! Services are aligned between snapshots by their exact (port, protocol)
//! pair. Keys present on one side only are additions or removals; keys present
//! on both sides are compared attribute by attribute.

use std::collections::BTreeMap;

use hostdiff_core::report::attr;
use hostdiff_core::{Service, ServiceChange};

/// Identity of a service within one snapshot.
///
/// Ordering is (port, protocol), which is also the output order of every
/// service list in a report.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServiceKey {
    pub port: i64,
    pub protocol: String,
}

impl ServiceKey {
    pub fn of(service: &Service) -> Self {
        Self {
            port: service.port,
            protocol: service.protocol.clone(),
        }
    }
}

/// The outcome of aligning two service lists.
#[derive(Debug, Default)]
pub struct ServiceDiff {
    pub added: Vec<Service>,
    pub removed: Vec<Service>,
    pub changed: Vec<ServiceChange>,
}

/// Index services by identity key.
///
/// When a key occurs more than once, the last occurrence in document order
/// wins and earlier ones are ignored. This is lossy for malformed input.
pub fn index_services(services: &[Service]) -> BTreeMap<ServiceKey, &Service> {
    let mut index = BTreeMap::new();
    for svc in services {
        if index.insert(ServiceKey::of(svc), svc).is_some() {
            tracing::debug!(
                service = %svc.label(),
                "Duplicate service key, keeping last occurrence"
            );
        }
    }
    index
}

/// Align two service lists and collect added, removed and changed services.
///
/// Output lists are ordered by (port, protocol).
pub fn compare_services(a: &[Service], b: &[Service]) -> ServiceDiff {
    let index_a = index_services(a);
    let index_b = index_services(b);
    let mut diff = ServiceDiff::default();

    for (key, svc_a) in &index_a {
        match index_b.get(key) {
            None => diff.removed.push((*svc_a).clone()),
            Some(svc_b) => {
                let changes = compare_attributes(svc_a, svc_b);
                if !changes.is_empty() {
                    diff.changed.push(ServiceChange {
                        port: svc_b.port,
                        protocol: svc_b.protocol.clone(),
                        changes,
                    });
                }
            }
        }
    }

    diff.added = index_b
        .iter()
        .filter(|(key, _)| !index_a.contains_key(*key))
        .map(|(_, svc)| (*svc).clone())
        .collect();

    diff
}

/// Compare the mutable attributes of two services sharing a key.
///
/// Every rule is evaluated independently; the returned map holds one
/// "old -> new" description per differing attribute.
pub fn compare_attributes(a: &Service, b: &Service) -> BTreeMap<String, String> {
    let mut changes = BTreeMap::new();

    // Unreachable while protocol is part of the key.
    if a.protocol != b.protocol {
        changes.insert(attr::PROTOCOL.to_string(), transition(&a.protocol, &b.protocol));
    }

    // 0 means "not reported", so 0 vs 0 never counts.
    if a.status != b.status && (a.status != 0 || b.status != 0) {
        changes.insert(attr::STATUS.to_string(), transition(a.status, b.status));
    }

    let software = [
        (attr::SOFTWARE_PRODUCT, &a.software.product, &b.software.product),
        (attr::SOFTWARE_VERSION, &a.software.version, &b.software.version),
        (attr::SOFTWARE_VENDOR, &a.software.vendor, &b.software.vendor),
    ];
    for (name, old, new) in software {
        if old != new {
            changes.insert(name.to_string(), transition(old, new));
        }
    }

    match (&a.tls, &b.tls) {
        (None, Some(_)) => {
            changes.insert(attr::TLS.to_string(), "TLS added".to_string());
        }
        (Some(_), None) => {
            changes.insert(attr::TLS.to_string(), "TLS removed".to_string());
        }
        (Some(old), Some(new)) => {
            // cert_fingerprint is not compared.
            if old.version != new.version {
                changes.insert(
                    attr::TLS_VERSION.to_string(),
                    transition(&old.version, &new.version),
                );
            }
            if old.cipher != new.cipher {
                changes.insert(
                    attr::TLS_CIPHER.to_string(),
                    transition(&old.cipher, &new.cipher),
                );
            }
        }
        (None, None) => {}
    }

    changes
}

fn transition(old: impl std::fmt::Display, new: impl std::fmt::Display) -> String {
    format!("{old} -> {new}")
}
