//! Markdown rendering of the exported requirement document

use requirements_types::RequirementDocument;

pub const REPORT_TITLE: &str = "# 📋 项目需求文档";

/// Render the human-readable report.
///
/// Sections appear in a fixed order and are left out entirely when empty,
/// so an empty document renders as the title and timestamp lines only.
pub fn render_report(doc: &RequirementDocument, generated_at: &str) -> String {
    let mut output = format!("{}\n\n**生成时间**：{}\n", REPORT_TITLE, generated_at);

    push_section(
        &mut output,
        "## 🎯 项目概述",
        doc.project_overview.iter().map(|e| e.content.as_str()),
    );
    push_section(
        &mut output,
        "## ⚙️ 功能需求",
        doc.functional_requirements.iter().map(|e| e.content.as_str()),
    );
    push_section(
        &mut output,
        "## 🔧 技术需求",
        doc.technical_requirements.iter().map(|e| e.content.as_str()),
    );
    push_section(
        &mut output,
        "## 🏗️ 架构设计",
        doc.architecture_designs.iter().map(|e| e.content.as_str()),
    );
    push_section(
        &mut output,
        "## 💬 澄清历史",
        doc.clarification_history.iter().map(|e| e.user_input.as_str()),
    );

    output
}

fn push_section<'a>(output: &mut String, heading: &str, items: impl Iterator<Item = &'a str>) {
    let mut items = items.peekable();
    if items.peek().is_none() {
        return;
    }

    output.push('\n');
    output.push_str(heading);
    output.push_str("\n\n");
    for item in items {
        output.push_str(&bullet(item));
        output.push('\n');
    }
}

/// Multi-line content stays inside its bullet by indenting continuation lines
fn bullet(content: &str) -> String {
    let mut lines = content.trim_end().lines();
    let first = lines.next().unwrap_or("");
    let mut out = format!("- {}", first);
    for line in lines {
        out.push('\n');
        if !line.is_empty() {
            out.push_str("  ");
            out.push_str(line);
        }
    }
    out
}
