use anyhow::Context;
use ociguard_render::{
    RenderableData, RenderableFault, RenderableFinding, RenderableRange, RenderableReport,
    RenderableSeverity, RenderableVerdictStatus,
};
use ociguard_types::{
    Finding, OciguardData, RepoPath, ReportEnvelope, RuleFault, SCHEMA_REPORT_V1, Severity,
    SourcePos, SourceRange, ToolMeta, Verdict, ids,
};
use time::OffsetDateTime;

pub fn parse_report_json(text: &str) -> anyhow::Result<ReportEnvelope> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema}");
    }

    serde_json::from_value(value).context("parse ociguard v1 report")
}

pub fn serialize_report(report: &ReportEnvelope) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

pub fn to_renderable(report: &ReportEnvelope) -> RenderableReport {
    RenderableReport {
        verdict: match report.verdict {
            Verdict::Pass => RenderableVerdictStatus::Pass,
            Verdict::Warn => RenderableVerdictStatus::Warn,
            Verdict::Fail => RenderableVerdictStatus::Fail,
        },
        findings: report.findings.iter().map(renderable_finding).collect(),
        faults: report.faults.iter().map(renderable_fault).collect(),
        data: RenderableData {
            files_scanned: report.data.files_scanned,
            findings_emitted: report.data.findings_emitted,
            findings_total: report.data.findings_total,
            truncated_reason: report.data.truncated_reason.clone(),
        },
    }
}

fn renderable_range(range: &SourceRange) -> RenderableRange {
    RenderableRange {
        path: range.filename.as_str().to_string(),
        line: range.start.line,
        col: range.start.column,
        end_line: range.end.line,
        end_col: range.end.column,
    }
}

fn renderable_finding(f: &Finding) -> RenderableFinding {
    RenderableFinding {
        severity: match f.severity {
            Severity::Notice => RenderableSeverity::Notice,
            Severity::Warning => RenderableSeverity::Warning,
            Severity::Error => RenderableSeverity::Error,
        },
        rule_id: f.rule_id.clone(),
        code: f.code.clone(),
        message: f.message.clone(),
        range: Some(renderable_range(&f.range)),
        link: f.link.clone(),
    }
}

fn renderable_fault(fault: &RuleFault) -> RenderableFault {
    RenderableFault {
        rule_id: fault.rule_id.clone(),
        path: fault.file.as_str().to_string(),
        message: fault.message.clone(),
        range: fault.range.as_ref().map(renderable_range),
    }
}

fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: "ociguard".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

/// A report for a run that failed before any rule could be evaluated.
///
/// The single finding is anchored to the scan root since no document was analyzed.
pub fn runtime_error_report(message: &str) -> ReportEnvelope {
    let now = OffsetDateTime::now_utc();
    let origin = SourcePos::new(1, 1, 0);
    ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        started_at: now,
        finished_at: now,
        verdict: Verdict::Fail,
        findings: vec![Finding {
            rule_id: ids::RULE_TOOL_RUNTIME.to_string(),
            code: ids::CODE_RUNTIME_ERROR.to_string(),
            severity: Severity::Error,
            message: message.to_string(),
            range: SourceRange::new(RepoPath::default(), origin, origin),
            link: None,
            fingerprint: None,
        }],
        faults: Vec::new(),
        data: OciguardData {
            profile: "unknown".to_string(),
            findings_total: 1,
            findings_emitted: 1,
            ..OciguardData::default()
        },
    }
}
