//! Markdown rendering

use super::{FileDocs, Parameter};
use crate::descriptor::BuildDescriptor;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub include_toc: bool,
    pub generated_on: NaiveDate,
}

impl RenderOptions {
    /// Table of contents on, dated today (local time)
    pub fn today() -> Self {
        Self {
            include_toc: true,
            generated_on: chrono::Local::now().date_naive(),
        }
    }
}

/// A heading that appears in the table of contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub level: usize,
}

/// Anchor for a heading: lowercase, spaces become `-`, and `.`, `(`, `)`
/// and `:` are dropped.
pub fn anchor(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            '.' | '(' | ')' | ':' => None,
            c => Some(c),
        })
        .collect()
}

pub fn table_of_contents(sections: &[Section]) -> Vec<String> {
    let mut toc = vec!["## Table of Contents".to_string(), String::new()];
    for section in sections {
        let indent = "  ".repeat(section.level.saturating_sub(1));
        toc.push(format!("{}- [{}](#{})", indent, section.title, anchor(&section.title)));
    }
    toc
}

/// Parameter table, empty when there are no parameters
pub fn parameter_table(params: &[Parameter]) -> String {
    if params.is_empty() {
        return String::new();
    }

    let mut table = vec!["| Parameter | Type |".to_string(), "|-----------|------|".to_string()];
    for param in params {
        table.push(format!("| `{}` | `{}` |", param.name, param.ty));
    }
    table.join("\n")
}

struct Document {
    lines: Vec<String>,
    sections: Vec<Section>,
}

impl Document {
    fn line(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    /// Heading tracked for the table of contents
    fn section(&mut self, level: usize, title: &str) {
        self.sections.push(Section {
            title: title.to_string(),
            level,
        });
        self.heading(level, title);
    }

    fn heading(&mut self, level: usize, title: &str) {
        self.line(format!("{} {}", "#".repeat(level), title));
        self.blank();
    }

    fn bullets(&mut self, label: &str, items: &[String]) {
        self.line(format!("**{label}:**"));
        for item in items {
            self.line(format!("- `{item}`"));
        }
        self.blank();
    }
}

fn render_configuration(doc: &mut Document, descriptor: &BuildDescriptor) {
    doc.section(2, "Build Configuration");

    if descriptor.kernels.is_empty() {
        return;
    }
    doc.section(3, "Kernels");

    for (name, kernel) in &descriptor.kernels {
        doc.heading(4, name);

        if let Some(capabilities) = &kernel.cuda_capabilities {
            doc.line("**CUDA Capabilities:**");
            doc.line(format!("- `[{}]`", capabilities.join(", ")));
            doc.blank();
        }
        if let Some(archs) = &kernel.rocm_archs {
            doc.line("**ROCm Architectures:**");
            doc.line(format!("- `[{}]`", archs.join(", ")));
            doc.blank();
        }
        if let Some(src) = &kernel.src {
            doc.bullets("Source Files", src);
        }
        if let Some(depends) = &kernel.depends {
            doc.bullets("Dependencies", depends);
        }
    }
}

fn render_api(doc: &mut Document, files: &[FileDocs]) {
    doc.section(2, "API Documentation");

    for file in files {
        doc.section(3, &file.file);

        let mut functions: Vec<_> = file.functions.iter().collect();
        functions.sort_by(|a, b| a.name.cmp(&b.name));

        for func in functions {
            doc.section(4, &format!("{} ({})", func.name, func.kind.label()));

            doc.line("```cpp");
            doc.line(func.signature());
            doc.line("```");
            doc.blank();

            if !func.doc.is_empty() {
                doc.line(func.doc.clone());
                doc.blank();
            }

            if !func.params.is_empty() {
                doc.line("**Parameters:**");
                doc.blank();
                doc.line(parameter_table(&func.params));
                doc.blank();
            }
        }
    }
}

/// Render the Markdown document for a project.
pub fn render_markdown(
    project_name: &str,
    descriptor: Option<&BuildDescriptor>,
    files: &[FileDocs],
    options: &RenderOptions,
) -> String {
    let mut doc = Document {
        lines: vec![
            format!("# `{project_name}` Documentation"),
            String::new(),
            format!("*Generated on {}*", options.generated_on.format("%Y-%m-%d")),
            String::new(),
        ],
        sections: Vec::new(),
    };

    doc.section(2, "Project Overview");
    match descriptor.and_then(|d| d.general.description.as_deref()) {
        Some(description) => doc.line(description),
        None => doc.line(format!("{project_name} is a CUDA kernel project.")),
    }
    doc.blank();

    if let Some(descriptor) = descriptor {
        render_configuration(&mut doc, descriptor);
    }
    if !files.is_empty() {
        render_api(&mut doc, files);
    }

    let mut lines = doc.lines;
    if options.include_toc {
        let toc = table_of_contents(&doc.sections);
        let body = lines.split_off(3);
        lines.push(String::new());
        lines.extend(toc);
        lines.push(String::new());
        lines.extend(body);
    }

    lines.join("\n")
}
