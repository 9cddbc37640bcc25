use crate::{RenderableReport, RenderableSeverity};

/// One line per finding, then one per fault: `file:line:col: severity: message (rule)`.
pub fn render_text(report: &RenderableReport) -> String {
    let mut out = String::new();

    for f in &report.findings {
        let sev = match f.severity {
            RenderableSeverity::Error => "error",
            RenderableSeverity::Warning => "warning",
            RenderableSeverity::Notice => "notice",
        };
        match &f.range {
            Some(r) => out.push_str(&format!("{}:{}:{}: ", r.path, r.line, r.col)),
            None => out.push_str("ociguard: "),
        }
        out.push_str(&format!("{}: {} ({})\n", sev, f.message, f.rule_id));
    }

    for fault in &report.faults {
        match &fault.range {
            Some(r) => out.push_str(&format!("{}:{}:{}: ", r.path, r.line, r.col)),
            None => out.push_str(&format!("{}: ", fault.path)),
        }
        out.push_str(&format!("fault: {} ({})\n", fault.message, fault.rule_id));
    }

    out
}
