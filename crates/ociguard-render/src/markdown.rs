use crate::{RenderableReport, RenderableSeverity, RenderableVerdictStatus};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# ociguard report\n\n");
    let verdict = match report.verdict {
        RenderableVerdictStatus::Pass => "PASS",
        RenderableVerdictStatus::Warn => "WARN",
        RenderableVerdictStatus::Fail => "FAIL",
    };
    out.push_str(&format!(
        "- Verdict: **{}**\n- Files scanned: {}\n- Findings: {} (emitted) / {} (total)\n",
        verdict,
        report.data.files_scanned,
        report.data.findings_emitted,
        report.data.findings_total
    ));
    if !report.faults.is_empty() {
        out.push_str(&format!("- Rule faults: {}\n", report.faults.len()));
    }
    out.push('\n');

    if let Some(r) = &report.data.truncated_reason {
        out.push_str(&format!("> Note: {}\n\n", r));
    }

    if report.findings.is_empty() && report.faults.is_empty() {
        out.push_str("No findings.\n");
        return out;
    }

    if !report.findings.is_empty() {
        out.push_str("## Findings\n\n");
    }
    for f in &report.findings {
        let sev = match f.severity {
            RenderableSeverity::Notice => "NOTICE",
            RenderableSeverity::Warning => "WARN",
            RenderableSeverity::Error => "ERROR",
        };

        out.push_str(&format!("- [{}] `{}` / `{}`: {}", sev, f.rule_id, f.code, f.message));
        if let Some(r) = &f.range {
            out.push_str(&format!(" (`{}`:{}:{})", r.path, r.line, r.col));
        }
        out.push('\n');

        if let Some(link) = &f.link {
            out.push_str(&format!("  - docs: {}\n", link));
        }
    }

    if !report.faults.is_empty() {
        if !report.findings.is_empty() {
            out.push('\n');
        }
        out.push_str("## Rule faults\n\n");
        out.push_str("These rules could not finish and their results are incomplete.\n\n");
        for fault in &report.faults {
            out.push_str(&format!(
                "- `{}` in `{}`: {}\n",
                fault.rule_id, fault.path, fault.message
            ));
        }
    }

    out
}
