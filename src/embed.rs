//! Embed a compiled Metal library into a C++ header
//!
//! The generated header exposes the library bytes as
//! `<target>_metal::metallib_data` and their count as
//! `<target>_metal::metallib_data_len`, so the extension can hand the blob
//! to `newLibraryWithData` without shipping a separate file.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;

const BYTES_PER_LINE: usize = 16;

#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("invalid target name '{0}': expected a C identifier")]
    InvalidTarget(String),
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of a successful embedding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embedded {
    pub header_path: PathBuf,
    pub len: usize,
}

/// Whether `name` can be spliced into a C++ namespace identifier
pub fn is_c_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {},
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

/// Render the header text for `data`
pub fn render_header(data: &[u8], target: &str) -> String {
    let mut out = String::with_capacity(data.len() * 6 + 256);
    out.push_str("// Auto-generated file containing embedded Metal library\n");
    out.push_str("#pragma once\n");
    out.push_str("#include <cstddef>\n");
    out.push('\n');
    let _ = writeln!(out, "namespace {target}_metal {{");
    out.push_str("    static const unsigned char metallib_data[] = {\n");

    let mut lines = data.chunks(BYTES_PER_LINE).peekable();
    while let Some(chunk) = lines.next() {
        out.push_str("        ");
        let hex: Vec<String> = chunk.iter().map(|b| format!("0x{:02x}", b)).collect();
        out.push_str(&hex.join(", "));
        out.push(',');
        if lines.peek().is_some() {
            out.push('\n');
        }
    }

    out.push('\n');
    out.push_str("    };\n");
    let _ = writeln!(out, "    static const size_t metallib_data_len = {};", data.len());
    let _ = writeln!(out, "}} // namespace {target}_metal");
    out
}

/// Read `metallib_path` and write its header to `header_path`, creating
/// parent directories as needed.
pub fn embed_file(metallib_path: &Path, header_path: &Path, target: &str) -> Result<Embedded, EmbedError> {
    if !is_c_identifier(target) {
        return Err(EmbedError::InvalidTarget(target.to_string()));
    }

    let data = std::fs::read(metallib_path).map_err(|source| EmbedError::Read {
        path: metallib_path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %metallib_path.display(), len = data.len(), "read metallib");

    let header = render_header(&data, target);

    if let Some(parent) = header_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| EmbedError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(header_path, header).map_err(|source| EmbedError::Write {
        path: header_path.to_path_buf(),
        source,
    })?;

    Ok(Embedded {
        header_path: header_path.to_path_buf(),
        len: data.len(),
    })
}
