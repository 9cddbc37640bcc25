use ociguard_domain::policy::{EffectiveConfig, FailOn, RulePolicy};
use ociguard_domain::rules;
use ociguard_types::Severity;
use std::collections::BTreeMap;

pub const PROFILES: [&str; 2] = ["strict", "warn"];

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything complex should go into repo config.
pub fn preset(profile: &str) -> anyhow::Result<EffectiveConfig> {
    match profile {
        "strict" => Ok(strict_profile()),
        "warn" => Ok(warn_profile()),
        other => anyhow::bail!(
            "unknown profile: {other} (expected {})",
            PROFILES.join("|")
        ),
    }
}

fn strict_profile() -> EffectiveConfig {
    EffectiveConfig {
        profile: "strict".to_string(),
        fail_on: FailOn::Error,
        max_findings: 200,
        rules: default_rules(None),
    }
}

/// Advisory run: everything reported, nothing fails.
fn warn_profile() -> EffectiveConfig {
    EffectiveConfig {
        profile: "warn".to_string(),
        fail_on: FailOn::Error,
        max_findings: 200,
        rules: default_rules(Some(Severity::Warning)),
    }
}

fn default_rules(severity: Option<Severity>) -> BTreeMap<String, RulePolicy> {
    rules::all()
        .iter()
        .map(|rule| {
            let policy = RulePolicy {
                enabled: rule.enabled(),
                severity: severity.unwrap_or_else(|| rule.severity()),
            };
            (rule.name().to_string(), policy)
        })
        .collect()
}
