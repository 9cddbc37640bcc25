//! Stable DTOs and IDs used across the ociguard workspace.
//!
//! This crate is intentionally boring:
//! - data types for the emitted report
//! - stable rule IDs and finding codes
//! - repo-relative paths and source ranges
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod location;
pub mod receipt;

pub use explain::{lookup_explanation, ExamplePair, Explanation};
pub use location::{RepoPath, SourcePos, SourceRange};
pub use receipt::{
    Finding, OciguardData, ReportEnvelope, RuleFault, Severity, ToolMeta, Verdict,
    SCHEMA_REPORT_V1,
};
