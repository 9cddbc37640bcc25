use crate::emit::RuleStamp;
use crate::fingerprint::fingerprint_for_finding;
use crate::model::Workspace;
use crate::policy::{EffectiveConfig, FailOn};
use crate::report::{DomainReport, SeverityCounts};
use crate::resolve::StaticResolver;
use crate::rule::{Rule, Runner};
use crate::rules;
use ociguard_types::{Finding, OciguardData, RuleFault, Severity, Verdict};
use tracing::{debug, info, warn};

pub fn evaluate(workspace: &Workspace, cfg: &EffectiveConfig) -> DomainReport {
    let registry = rules::all();
    let active: Vec<(&dyn Rule, RuleStamp)> = registry
        .iter()
        .filter_map(|rule| stamp_for(rule.as_ref(), cfg).map(|s| (rule.as_ref(), s)))
        .collect();

    let mut findings: Vec<Finding> = Vec::new();
    let mut faults: Vec<RuleFault> = Vec::new();

    // Emission order: module, document, rule, block. Not re-sorted afterwards.
    for module in &workspace.modules {
        let resolver = StaticResolver::new(&module.context);
        for document in &module.documents {
            for (rule, stamp) in &active {
                let mut runner = Runner::new(document, &resolver, *stamp);
                let outcome = rule.check(&mut runner);
                let emitted = runner.into_findings();
                debug!(
                    rule = stamp.id,
                    file = %document.path,
                    findings = emitted.len(),
                    "rule run"
                );
                findings.extend(emitted);

                if let Err(err) = outcome {
                    warn!(rule = stamp.id, file = %document.path, error = %err, "rule fault");
                    faults.push(RuleFault {
                        rule_id: stamp.id.to_string(),
                        file: document.path.clone(),
                        message: err.to_string(),
                        range: err.range().cloned(),
                    });
                }
            }
        }
    }

    for finding in &mut findings {
        finding.fingerprint = Some(fingerprint_for_finding(finding));
    }

    let total = findings.len() as u32;

    let mut emitted = findings;
    let mut truncated_reason: Option<String> = None;
    if emitted.len() > cfg.max_findings {
        emitted.truncate(cfg.max_findings);
        truncated_reason = Some(format!(
            "findings truncated to max_findings={}",
            cfg.max_findings
        ));
    }

    let verdict = compute_verdict(&emitted, &faults, cfg.fail_on);
    let counts = SeverityCounts::from_findings(&emitted);

    let data = OciguardData {
        profile: cfg.profile.clone(),
        files_scanned: workspace
            .modules
            .iter()
            .map(|m| m.documents.len() as u32)
            .sum(),
        modules_scanned: workspace.modules.len() as u32,
        rules_run: active.len() as u32,
        findings_total: total,
        findings_emitted: emitted.len() as u32,
        truncated_reason,
    };

    info!(
        files = data.files_scanned,
        modules = data.modules_scanned,
        findings = total,
        faults = faults.len(),
        "check complete"
    );

    DomainReport {
        verdict,
        findings: emitted,
        faults,
        data,
        counts,
    }
}

/// Config overrides win over the rule's own defaults; `None` means the rule is off.
fn stamp_for(rule: &dyn Rule, cfg: &EffectiveConfig) -> Option<RuleStamp> {
    let (enabled, severity) = match cfg.rule_policy(rule.name()) {
        Some(policy) => (policy.enabled, policy.severity),
        None => (rule.enabled(), rule.severity()),
    };
    enabled.then(|| RuleStamp {
        id: rule.name(),
        severity,
        link: rule.link(),
    })
}

fn compute_verdict(findings: &[Finding], faults: &[RuleFault], fail_on: FailOn) -> Verdict {
    if !faults.is_empty() {
        return Verdict::Fail;
    }

    let has_error = findings.iter().any(|f| f.severity == Severity::Error);
    if has_error {
        return Verdict::Fail;
    }

    let has_warn = findings.iter().any(|f| f.severity == Severity::Warning);
    if has_warn {
        return match fail_on {
            FailOn::Warning => Verdict::Fail,
            FailOn::Error => Verdict::Warn,
        };
    }

    Verdict::Pass
}
