//! Package dependency metadata
//!
//! Every immediate subdirectory of the scanned directory is a package. A
//! package may declare dependencies in `deps/deps.txt`, one per line with the
//! dependency name as the first whitespace-separated token. Only
//! dependencies that are themselves packages in the same directory are kept.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Location of the dependency declaration inside a package
pub const DEPS_FILE: [&str; 2] = ["deps", "deps.txt"];

/// Package name to its in-repository dependencies (sorted, deduplicated)
pub type DependencyGraph = BTreeMap<String, Vec<String>>;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> MetadataError + '_ {
    move |source| MetadataError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Names of the immediate subdirectories of `dir`
pub fn package_names(dir: &Path) -> Result<BTreeSet<String>, MetadataError> {
    if !dir.is_dir() {
        return Err(MetadataError::NotADirectory(dir.to_path_buf()));
    }

    let mut names = BTreeSet::new();
    for entry in std::fs::read_dir(dir).map_err(io_error(dir))? {
        let entry = entry.map_err(io_error(dir))?;
        if entry.path().is_dir() {
            names.insert(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(names)
}

/// First token of every non-blank line that names a known package
pub fn parse_dependencies(text: &str, known: &BTreeSet<String>) -> Vec<String> {
    text.lines()
        .filter_map(|line| line.split_whitespace().next())
        .filter(|dep| known.contains(*dep))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Build the dependency graph for the packages in `dir`.
pub fn collect(dir: &Path) -> Result<DependencyGraph, MetadataError> {
    let packages = package_names(dir)?;
    tracing::debug!(count = packages.len(), dir = %dir.display(), "found packages");

    let mut graph = DependencyGraph::new();
    for package in &packages {
        let deps_file: PathBuf = DEPS_FILE.iter().fold(dir.join(package), |p, part| p.join(part));
        let deps = if deps_file.is_file() {
            let text = std::fs::read_to_string(&deps_file).map_err(io_error(&deps_file))?;
            parse_dependencies(&text, &packages)
        } else {
            tracing::trace!(package = %package, "no dependency file");
            Vec::new()
        };
        graph.insert(package.clone(), deps);
    }

    Ok(graph)
}

/// Pretty JSON with two-space indentation
pub fn to_json(graph: &DependencyGraph) -> serde_json::Result<String> {
    serde_json::to_string_pretty(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn filters_unknown_and_deduplicates() {
        let text = "rocblas >= 4.0\n\nhipcub\nexternal-lib 1.2\nrocblas\n   \n";
        let deps = parse_dependencies(text, &known(&["hipcub", "rocblas", "rocm-core"]));
        assert_eq!(deps, vec!["hipcub", "rocblas"]);
    }

    #[test]
    fn json_shape() {
        let mut graph = DependencyGraph::new();
        graph.insert("a".into(), vec!["b".into()]);
        graph.insert("b".into(), vec![]);
        assert_eq!(to_json(&graph).unwrap(), "{\n  \"a\": [\n    \"b\"\n  ],\n  \"b\": []\n}");
    }
}
