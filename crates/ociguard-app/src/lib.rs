//! Use case orchestration for ociguard.
//!
//! This crate provides the application layer: use cases that coordinate the settings, hcl,
//! domain, and render layers. The CLI crate depends on this; it only handles argument parsing
//! and I/O.

#![forbid(unsafe_code)]

mod check;
mod explain;
mod render;
mod report;
mod rules;

pub use check::{report_exit_code, run_check, verdict_exit_code, CheckInput, CheckOutput};
pub use explain::{format_explanation, format_not_found, run_explain, ExplainOutput};
pub use render::{render_annotations, render_markdown, render_text};
pub use rules::{format_rule_listing, list_rules, RuleListing};
pub use report::{parse_report_json, runtime_error_report, serialize_report, to_renderable};
