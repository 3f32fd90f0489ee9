//! hostdiff-core: Shared types for the hostdiff workspace.
//!
//! This crate provides the foundational types used across all hostdiff components:
//! - The canonical snapshot model (Snapshot, Service, software and TLS info)
//! - The diff report model (DiffReport, ServiceChange, VulnerabilityChange)

pub mod report;
pub mod types;

pub use report::{DiffReport, ServiceChange, VulnerabilityChange};
pub use types::{Service, Snapshot, Software, TlsInfo};
