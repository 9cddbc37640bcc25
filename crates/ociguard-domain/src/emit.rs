use ociguard_types::{Finding, Severity, SourceRange};

/// Identity stamped onto every finding produced by one rule pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuleStamp {
    pub id: &'static str,
    pub severity: Severity,
    pub link: &'static str,
}

/// Append-only finding sink. No de-duplication; order is emission order.
#[derive(Debug, Default)]
pub struct Emitter {
    findings: Vec<Finding>,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(
        &mut self,
        rule: RuleStamp,
        code: &str,
        message: impl Into<String>,
        range: &SourceRange,
    ) {
        self.findings.push(Finding {
            rule_id: rule.id.to_string(),
            code: code.to_string(),
            severity: rule.severity,
            message: message.into(),
            range: range.clone(),
            link: Some(rule.link.to_string()),
            fingerprint: None,
        });
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }
}
