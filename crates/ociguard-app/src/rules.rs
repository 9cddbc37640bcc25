//! The `rules` use case: list every rule with the policy it would run under.

use anyhow::Context;
use ociguard_domain::rules;
use ociguard_settings::Overrides;
use ociguard_types::Severity;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleListing {
    pub id: &'static str,
    pub enabled: bool,
    pub severity: Severity,
    pub link: &'static str,
}

/// Built-in defaults overlaid with the resolved profile and `[rules.*]` entries.
pub fn list_rules(config_text: &str, overrides: Overrides) -> anyhow::Result<Vec<RuleListing>> {
    let cfg = if config_text.trim().is_empty() {
        ociguard_settings::OciguardConfigV1::default()
    } else {
        ociguard_settings::parse_config_toml(config_text).context("parse config")?
    };
    let resolved = ociguard_settings::resolve_config(cfg, overrides).context("resolve config")?;

    Ok(rules::all()
        .iter()
        .map(|rule| {
            let (enabled, severity) = match resolved.effective.rule_policy(rule.name()) {
                Some(policy) => (policy.enabled, policy.severity),
                None => (rule.enabled(), rule.severity()),
            };
            RuleListing {
                id: rule.name(),
                enabled,
                severity,
                link: rule.link(),
            }
        })
        .collect())
}

pub fn format_rule_listing(listing: &[RuleListing]) -> String {
    let width = listing.iter().map(|r| r.id.len()).max().unwrap_or(0);
    let mut out = String::new();
    for rule in listing {
        let state = if rule.enabled { "enabled" } else { "disabled" };
        out.push_str(&format!(
            "{:<width$}  {:<8}  {:<7}  {}\n",
            rule.id,
            state,
            rule.severity.as_str(),
            rule.link,
            width = width
        ));
    }
    out
}
