use crate::{model::OciguardConfigV1, presets};
use anyhow::Context;
use globset::Glob;
use ociguard_domain::policy::{EffectiveConfig, FailOn};
use ociguard_types::Severity;
use serde_json::Value;
use std::collections::BTreeMap;

/// Values supplied on the command line; each wins over the config file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub max_findings: Option<u32>,
    /// `--var name=value`.
    pub variables: BTreeMap<String, String>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
    pub exclude: Vec<String>,
    pub variables: BTreeMap<String, Value>,
}

pub fn resolve_config(
    cfg: OciguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "strict".to_string());

    let mut effective = presets::preset(&profile)?;

    // max findings
    if let Some(mf) = overrides.max_findings.or(cfg.max_findings) {
        effective.max_findings = mf as usize;
    }

    // per-rule overrides
    for (rule_id, rc) in cfg.rules.iter() {
        let entry = effective.rules.get_mut(rule_id).with_context(|| {
            format!(
                "unknown rule in [rules.{rule_id}] (see `ociguard rules` for the list)"
            )
        })?;

        if let Some(enabled) = rc.enabled {
            entry.enabled = enabled;
        }
        if let Some(sev) = rc.severity.as_deref() {
            entry.severity =
                parse_severity(sev).with_context(|| format!("invalid severity for {rule_id}"))?;
        }
    }

    // fail_on override from config
    if let Some(fail_on_s) = cfg.fail_on.as_deref() {
        effective.fail_on = parse_fail_on(fail_on_s)?;
    }

    validate_excludes(&cfg.exclude)?;

    let mut variables = cfg.variables;
    for (name, value) in overrides.variables {
        variables.insert(name, Value::String(value));
    }

    Ok(ResolvedConfig {
        effective,
        exclude: cfg.exclude,
        variables,
    })
}

fn validate_excludes(patterns: &[String]) -> anyhow::Result<()> {
    for pattern in patterns {
        Glob::new(pattern).with_context(|| format!("invalid exclude glob: {pattern}"))?;
    }
    Ok(())
}

fn parse_severity(v: &str) -> anyhow::Result<Severity> {
    match v {
        "notice" => Ok(Severity::Notice),
        "warning" | "warn" => Ok(Severity::Warning),
        "error" => Ok(Severity::Error),
        other => anyhow::bail!("unknown severity: {other} (expected notice|warning|error)"),
    }
}

fn parse_fail_on(v: &str) -> anyhow::Result<FailOn> {
    match v {
        "error" => Ok(FailOn::Error),
        "warning" | "warn" => Ok(FailOn::Warning),
        other => anyhow::bail!("unknown fail_on: {other} (expected error|warning)"),
    }
}
