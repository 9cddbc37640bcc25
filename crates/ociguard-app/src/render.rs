//! Render use cases over in-memory reports.

use ociguard_render::RenderableReport;

pub fn render_markdown(report: &RenderableReport) -> String {
    ociguard_render::render_markdown(report)
}

pub fn render_text(report: &RenderableReport) -> String {
    ociguard_render::render_text(report)
}

pub fn render_annotations(report: &RenderableReport, max: usize) -> Vec<String> {
    ociguard_render::render_github_annotations(report)
        .into_iter()
        .take(max)
        .collect()
}
