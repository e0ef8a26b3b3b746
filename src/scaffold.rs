//! Kernel project scaffolding
//!
//! Writes the fixed ReLU skeleton (see [`templates::FILES`]) into a target
//! directory.

pub mod templates;
pub mod tree;

use std::path::{Path, PathBuf};
use thiserror::Error;

pub use templates::{TemplateFile, EXAMPLE_NAME, FILES};
pub use tree::{render_tree, TreeStyle};

/// What to do when a skeleton file already exists in the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistingFiles {
    /// Replace existing files without asking
    Overwrite,
    /// Fail before writing anything
    Refuse,
}

#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("refusing to overwrite existing files (use --force):\n  {}", format_paths(.0))]
    WouldOverwrite(Vec<PathBuf>),
    #[error("{} exists and is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join("\n  ")
}

/// Outcome of a scaffold run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scaffolded {
    /// Whether the target directory had to be created
    pub created_root: bool,
    /// Written files, joined onto the target as given, in template order
    pub files: Vec<PathBuf>,
}

/// Skeleton files that already exist under `target`
pub fn collisions(target: &Path) -> Vec<PathBuf> {
    FILES
        .iter()
        .map(|f| target.join(f.path))
        .filter(|p| p.exists())
        .collect()
}

/// Write the skeleton into `target`, creating it if needed.
pub fn scaffold(target: &Path, existing: ExistingFiles) -> Result<Scaffolded, ScaffoldError> {
    if target.exists() && !target.is_dir() {
        return Err(ScaffoldError::NotADirectory(target.to_path_buf()));
    }

    if existing == ExistingFiles::Refuse {
        let clashes = collisions(target);
        if !clashes.is_empty() {
            return Err(ScaffoldError::WouldOverwrite(clashes));
        }
    }

    let created_root = !target.exists();
    if created_root {
        create_dir(target)?;
        tracing::info!(dir = %target.display(), "created target directory");
    }

    let mut files = Vec::with_capacity(FILES.len());
    for file in FILES {
        let path = target.join(file.path);
        write_file(&path, file.contents)?;
        tracing::debug!(path = %path.display(), bytes = file.contents.len(), "wrote template");
        files.push(path);
    }

    Ok(Scaffolded { created_root, files })
}

fn create_dir(path: &Path) -> Result<(), ScaffoldError> {
    std::fs::create_dir_all(path).map_err(|source| ScaffoldError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, contents: &str) -> Result<(), ScaffoldError> {
    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }
    std::fs::write(path, contents).map_err(|source| ScaffoldError::Io {
        path: path.to_path_buf(),
        source,
    })
}
