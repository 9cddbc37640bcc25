use crate::{RenderableRange, RenderableReport, RenderableSeverity};

/// Render findings and rule faults as GitHub Actions workflow command annotations.
///
/// Format:
/// `::{level} file={path},line={line},col={col},endLine={line},endColumn={col}::{message}`
pub fn render_github_annotations(report: &RenderableReport) -> Vec<String> {
    let mut out = Vec::new();

    for f in &report.findings {
        let level = match f.severity {
            RenderableSeverity::Error => "error",
            RenderableSeverity::Warning => "warning",
            RenderableSeverity::Notice => "notice",
        };
        let message = format!("[{}:{}] {}", f.rule_id, f.code, f.message);
        out.push(annotation(level, f.range.as_ref(), &message));
    }

    for fault in &report.faults {
        let message = format!("[{}:fault] {}", fault.rule_id, fault.message);
        out.push(annotation("error", fault.range.as_ref(), &message));
    }

    out
}

fn annotation(level: &str, range: Option<&RenderableRange>, message: &str) -> String {
    let message = escape_data(message);
    match range {
        Some(r) => format!(
            "::{} file={},line={},col={},endLine={},endColumn={}::{}",
            level,
            escape_property(&r.path),
            r.line,
            r.col,
            r.end_line,
            r.end_col,
            message
        ),
        None => format!("::{}::{}", level, message),
    }
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}
