//! The `check` use case: resolve config, load the Terraform workspace, evaluate rules, and
//! produce a report.

use anyhow::Context;
use camino::Utf8Path;
use ociguard_hcl::LoadOptions;
use ociguard_settings::{Overrides, ResolvedConfig};
use ociguard_types::{ReportEnvelope, SCHEMA_REPORT_V1, ToolMeta, Verdict};
use time::OffsetDateTime;
use tracing::debug;

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// Directory scanned for `*.tf` files.
    pub repo_root: &'a Utf8Path,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

#[derive(Clone, Debug)]
pub struct CheckOutput {
    pub report: ReportEnvelope,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Empty config is allowed, defaults apply.
    let cfg = if input.config_text.trim().is_empty() {
        ociguard_settings::OciguardConfigV1::default()
    } else {
        ociguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let resolved = ociguard_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;
    debug!(
        profile = %resolved.effective.profile,
        excludes = resolved.exclude.len(),
        variables = resolved.variables.len(),
        "resolved config"
    );

    let opts = LoadOptions {
        exclude: resolved.exclude.clone(),
        variables: resolved.variables.clone(),
    };
    let workspace =
        ociguard_hcl::load_workspace(input.repo_root, &opts).context("load terraform workspace")?;

    let ociguard_domain::report::DomainReport {
        verdict,
        findings,
        faults,
        data,
        counts: _,
    } = ociguard_domain::evaluate(&workspace, &resolved.effective);

    let finished_at = OffsetDateTime::now_utc();

    let report = ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "ociguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at,
        verdict,
        findings,
        faults,
        data,
    };

    Ok(CheckOutput {
        report,
        resolved_config: resolved,
    })
}

/// Map verdict to exit code: 0 = pass/warn, 2 = fail.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Warn => 0,
        Verdict::Fail => 2,
    }
}

/// Rule faults mean the analysis itself is incomplete, so they exit like a runtime error.
pub fn report_exit_code(report: &ReportEnvelope) -> i32 {
    if !report.faults.is_empty() {
        return 1;
    }
    verdict_exit_code(report.verdict)
}
