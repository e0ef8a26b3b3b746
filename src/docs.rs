//! Documentation generation for kernel projects
//!
//! Source files are gathered from the build descriptor and from a scan of
//! the project tree, signatures are pulled out with [`extract`], and the
//! result is rendered to Markdown by [`render`].

pub mod extract;
pub mod params;
pub mod render;

use crate::descriptor::{BuildDescriptor, Kernel};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

pub use extract::extract_functions;
pub use render::{anchor, render_markdown, RenderOptions};

/// Extensions scanned for kernel sources
pub const SOURCE_EXTENSIONS: &[&str] = &["cu", "cuh", "h", "cpp", "metal"];

/// Directory holding hand-written Python binding glue, never documented
pub const EXCLUDED_SEGMENT: &str = "torch-ext";

#[derive(Debug, Error)]
pub enum DocsError {
    #[error("project directory not found: {}", .0.display())]
    ProjectNotFound(PathBuf),
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize documentation: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionKind {
    Function,
    Kernel,
}

impl FunctionKind {
    pub fn label(self) -> &'static str {
        match self {
            FunctionKind::Function => "Function",
            FunctionKind::Kernel => "Kernel",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

/// One documented function or kernel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionRecord {
    pub name: String,
    pub kind: FunctionKind,
    /// `__global__` or `kernel` for kernel entry points
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,
    pub return_type: String,
    pub params: Vec<Parameter>,
    pub doc: String,
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl FunctionRecord {
    pub fn signature(&self) -> String {
        let params = self
            .params
            .iter()
            .map(|p| if p.name.is_empty() { p.ty.clone() } else { format!("{} {}", p.ty, p.name) })
            .collect::<Vec<_>>()
            .join(", ");
        match &self.qualifier {
            Some(qualifier) => format!("{} {} {}({})", qualifier, self.return_type, self.name, params),
            None => format!("{} {}({})", self.return_type, self.name, params),
        }
    }
}

/// Functions found in one source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDocs {
    /// Path relative to the project root, `/`-separated
    pub file: String,
    pub functions: Vec<FunctionRecord>,
}

/// Output format of the `docs` command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DocsFormat {
    #[default]
    Markdown,
    Json,
}

impl DocsFormat {
    fn extension(self) -> &'static str {
        match self {
            DocsFormat::Markdown => "md",
            DocsFormat::Json => "json",
        }
    }
}

fn relative_display(path: &Path, project: &Path) -> String {
    let rel = path.strip_prefix(project).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn is_excluded(path: &Path, project: &Path) -> bool {
    path.strip_prefix(project)
        .unwrap_or(path)
        .components()
        .any(|c| c.as_os_str() == EXCLUDED_SEGMENT)
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SOURCE_EXTENSIONS.contains(&e))
}

/// Candidate source files: every existing `src` entry of every kernel plus
/// every source file under the project outside the binding glue.
/// Deduplicated and sorted.
pub fn collect_sources(project: &Path, kernels: &BTreeMap<String, Kernel>) -> Vec<PathBuf> {
    let mut sources = BTreeSet::new();

    for (name, kernel) in kernels {
        for src in kernel.sources() {
            let path = project.join(src);
            if path.exists() {
                sources.insert(path);
            } else {
                tracing::warn!(kernel = %name, path = %path.display(), "listed source file does not exist");
            }
        }
    }

    let walker = WalkDir::new(project)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_excluded(e.path(), project));
    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_file() && has_source_extension(entry.path()) => {
                sources.insert(entry.into_path());
            },
            Ok(_) => {},
            Err(e) => tracing::warn!(error = %e, "skipping unreadable entry"),
        }
    }

    sources.into_iter().collect()
}

/// Extract documentation records for every source file that yields at
/// least one function.
pub fn extract_kernel_docs(project: &Path, kernels: &BTreeMap<String, Kernel>) -> Vec<FileDocs> {
    let mut docs = Vec::new();

    for path in collect_sources(project, kernels) {
        let rel = relative_display(&path, project);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                crate::output::skipping(&format!("{rel}: {e}"));
                continue;
            },
        };

        let functions = extract_functions(&String::from_utf8_lossy(&bytes), &rel);
        if functions.is_empty() {
            tracing::debug!(file = %rel, "no functions found");
            continue;
        }
        tracing::debug!(file = %rel, count = functions.len(), "extracted functions");
        docs.push(FileDocs { file: rel, functions });
    }

    docs
}

/// Project name from the descriptor, falling back to the directory name
pub fn project_name(project: &Path, descriptor: Option<&BuildDescriptor>) -> String {
    if let Some(name) = descriptor.and_then(|d| d.general.name.as_deref()) {
        return name.to_string();
    }
    std::path::absolute(project)
        .ok()
        .as_deref()
        .unwrap_or(project)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string())
}

/// Options for [`generate`]
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Output directory, relative to the project root
    pub output: PathBuf,
    pub format: DocsFormat,
    pub render: RenderOptions,
}

/// What [`generate`] produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub path: PathBuf,
    pub files: usize,
    pub functions: usize,
    pub bytes: u64,
}

/// Generate documentation for the project at `project`.
pub fn generate(project: &Path, options: &GenerateOptions) -> Result<Generated, DocsError> {
    if !project.is_dir() {
        return Err(DocsError::ProjectNotFound(project.to_path_buf()));
    }

    let descriptor = BuildDescriptor::load_or_absent(project);
    let kernels = descriptor.as_ref().map(|d| d.kernels.clone()).unwrap_or_default();
    let docs = extract_kernel_docs(project, &kernels);
    let name = project_name(project, descriptor.as_ref());

    let contents = match options.format {
        DocsFormat::Markdown => render_markdown(&name, descriptor.as_ref(), &docs, &options.render),
        DocsFormat::Json => serde_json::to_string_pretty(&docs)?,
    };

    let output_dir = project.join(&options.output);
    std::fs::create_dir_all(&output_dir).map_err(|source| DocsError::Write {
        path: output_dir.clone(),
        source,
    })?;

    let path = output_dir.join(format!("{}.{}", name, options.format.extension()));
    std::fs::write(&path, &contents).map_err(|source| DocsError::Write {
        path: path.clone(),
        source,
    })?;

    Ok(Generated {
        path,
        files: docs.len(),
        functions: docs.iter().map(|f| f.functions.len()).sum(),
        bytes: contents.len() as u64,
    })
}
