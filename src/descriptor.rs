//! Build descriptor (`build.toml`) model
//!
//! Only the parts the documentation tooling reads are modelled. The file is
//! owned by the build system, so unknown keys are accepted and ignored.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const FILE_NAME: &str = "build.toml";

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("build.toml not found at {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct BuildDescriptor {
    #[serde(default)]
    pub general: General,
    pub torch: Option<Torch>,
    #[serde(rename = "kernel", default)]
    pub kernels: BTreeMap<String, Kernel>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct General {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Torch {
    #[serde(default)]
    pub src: Vec<String>,
    pub include: Option<Vec<String>>,
    pub pyext: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Kernel {
    pub cuda_capabilities: Option<Vec<String>>,
    pub rocm_archs: Option<Vec<String>>,
    pub src: Option<Vec<String>>,
    pub depends: Option<Vec<String>>,
    pub include: Option<Vec<String>>,
}

impl Kernel {
    pub fn sources(&self) -> &[String] {
        self.src.as_deref().unwrap_or_default()
    }
}

impl BuildDescriptor {
    pub fn parse(text: &str, path: &Path) -> Result<Self, DescriptorError> {
        toml::from_str(text).map_err(|source| DescriptorError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `<project>/build.toml`
    pub fn load(project: &Path) -> Result<Self, DescriptorError> {
        let path = project.join(FILE_NAME);
        if !path.exists() {
            return Err(DescriptorError::NotFound(path));
        }
        let text = std::fs::read_to_string(&path).map_err(|source| DescriptorError::Io {
            path: path.clone(),
            source,
        })?;
        Self::parse(&text, &path)
    }

    /// Load the descriptor, logging and discarding any failure.
    pub fn load_or_absent(project: &Path) -> Option<Self> {
        match Self::load(project) {
            Ok(descriptor) => {
                tracing::info!(project = %project.display(), "parsed build configuration");
                Some(descriptor)
            },
            Err(e) => {
                crate::output::warning(&e.to_string());
                tracing::warn!(error = %e, "continuing without build configuration");
                None
            },
        }
    }
}
