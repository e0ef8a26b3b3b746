//! Directory tree rendering
//!
//! ```text
//!   activation/
//!     ├── relu_kernel/
//!     │   └── relu.cu
//!     └── build.toml
//! ```

use crate::output::Style;
use std::io;
use std::path::Path;

const BRANCH: &str = "├── ";
const LAST: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeStyle {
    Plain,
    Colored,
}

impl TreeStyle {
    /// Colored when the terminal supports it
    pub fn detect() -> Self {
        if crate::output::supports_color() {
            TreeStyle::Colored
        } else {
            TreeStyle::Plain
        }
    }

    fn paint(self, style: Style, text: &str) -> String {
        style.paint(text, self == TreeStyle::Colored)
    }
}

/// Render `root` and everything below it. Directories come before files at
/// every level, each group sorted by name.
pub fn render_tree(root: &Path, label: &str, style: TreeStyle) -> io::Result<String> {
    let mut out = String::new();
    out.push_str("  ");
    out.push_str(&style.paint(Style::Emphasis, &format!("{}/", label.trim_end_matches('/'))));
    out.push('\n');
    render_level(root, "", style, &mut out)?;
    Ok(out)
}

fn render_level(dir: &Path, prefix: &str, style: TreeStyle, out: &mut String) -> io::Result<()> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type()?.is_dir() {
            dirs.push(name);
        } else {
            files.push(name);
        }
    }
    dirs.sort();
    files.sort();

    for (i, name) in dirs.iter().enumerate() {
        let is_last = i == dirs.len() - 1 && files.is_empty();
        let connector = if is_last { LAST } else { BRANCH };
        out.push_str(&format!(
            "{SPACE}{prefix}{connector}{}\n",
            style.paint(Style::Directory, &format!("{name}/"))
        ));

        let next = format!("{prefix}{}", if is_last { SPACE } else { PIPE });
        render_level(&dir.join(name), &next, style, out)?;
    }

    for (i, name) in files.iter().enumerate() {
        let connector = if i == files.len() - 1 { LAST } else { BRANCH };
        out.push_str(&format!("{SPACE}{prefix}{connector}{}\n", style.paint(Style::File, name)));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn directories_first_then_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("b_dir")).unwrap();
        fs::create_dir_all(root.join("a_dir/nested")).unwrap();
        fs::write(root.join("a_dir/nested/x.cu"), "x").unwrap();
        fs::write(root.join("a_dir/y.h"), "y").unwrap();
        fs::write(root.join("b_dir/z.py"), "z").unwrap();
        fs::write(root.join("aaa.toml"), "a").unwrap();

        let tree = render_tree(root, "proj", TreeStyle::Plain).unwrap();
        let expected = "\
  proj/
    ├── a_dir/
    │   ├── nested/
    │   │   └── x.cu
    │   └── y.h
    ├── b_dir/
    │   └── z.py
    └── aaa.toml
";
        assert_eq!(tree, expected);
    }

    #[test]
    fn last_directory_uses_corner() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("only/inner")).unwrap();

        let tree = render_tree(dir.path(), "p/", TreeStyle::Plain).unwrap();
        assert_eq!(tree, "  p/\n    └── only/\n        └── inner/\n");
    }

    #[test]
    fn colored_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("d")).unwrap();

        let tree = render_tree(dir.path(), "p", TreeStyle::Colored).unwrap();
        assert!(tree.contains(&Style::Directory.paint("d/", true)));
    }
}
