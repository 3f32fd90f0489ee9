//! Human-readable report rendering.
//!
//! Pure formatting over an already-computed report: sections appear in a
//! fixed order and only when non-empty.

use std::fmt::Write;

use hostdiff_core::{DiffReport, Service, ServiceChange, VulnerabilityChange};

/// Summary used when every change list is empty.
pub const NO_DIFFERENCES: &str = "No meaningful differences found.";

/// Render the summary text for a report. The report's own `summary` field is
/// ignored.
pub fn render_summary(report: &DiffReport) -> String {
    if report.is_empty() {
        return NO_DIFFERENCES.to_string();
    }

    let mut sections = Vec::new();

    if !report.added_services.is_empty() {
        sections.push(service_section("Added Services", '+', &report.added_services));
    }
    if !report.removed_services.is_empty() {
        sections.push(service_section("Removed Services", '-', &report.removed_services));
    }
    if !report.changed_services.is_empty() {
        sections.push(change_section(&report.changed_services));
    }
    if !report.added_vulnerabilities.is_empty() {
        sections.push(vuln_section(
            "Added Vulnerabilities",
            "+",
            "on",
            &report.added_vulnerabilities,
        ));
    }
    if !report.removed_vulnerabilities.is_empty() {
        sections.push(vuln_section(
            "Removed Vulnerabilities",
            "-",
            "from",
            &report.removed_vulnerabilities,
        ));
    }

    sections.join("\n")
}

fn service_section(title: &str, marker: char, services: &[Service]) -> String {
    let mut out = format!("{title} ({}):\n", services.len());
    for svc in services {
        let _ = write!(out, "  {marker} Port {} ({})", svc.port, svc.protocol);
        if !svc.software.product.is_empty() {
            let _ = write!(out, " - {}", svc.software.product);
            if !svc.software.version.is_empty() {
                let _ = write!(out, " {}", svc.software.version);
            }
        }
        if !svc.vulnerabilities.is_empty() {
            let _ = write!(out, " [{} CVEs]", svc.vulnerabilities.len());
        }
        out.push('\n');
    }
    out
}

fn change_section(changes: &[ServiceChange]) -> String {
    let mut out = format!("Changed Services ({}):\n", changes.len());
    for change in changes {
        let _ = writeln!(out, "  ~ Port {} ({}):", change.port, change.protocol);
        for (name, description) in &change.changes {
            let _ = writeln!(out, "      {name}: {description}");
        }
    }
    out
}

fn vuln_section(
    title: &str,
    marker: &str,
    preposition: &str,
    vulns: &[VulnerabilityChange],
) -> String {
    let mut out = format!("{title} ({}):\n", vulns.len());
    for v in vulns {
        let _ = writeln!(
            out,
            "  {marker} {} {preposition} port {} ({})",
            v.cve_id, v.port, v.protocol
        );
    }
    out
}
