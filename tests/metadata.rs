use kernel_tools::metadata::{collect, to_json, MetadataError};
use std::fs;
use std::path::Path;

fn package(root: &Path, name: &str, deps: Option<&str>) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    if let Some(deps) = deps {
        fs::create_dir_all(dir.join("deps")).unwrap();
        fs::write(dir.join("deps").join("deps.txt"), deps).unwrap();
    }
}

#[test]
fn keeps_only_in_repository_dependencies() {
    let dir = tempfile::tempdir().unwrap();
    package(dir.path(), "A", Some("B\nX >= 2.0\n\nB\n"));
    package(dir.path(), "B", None);
    fs::write(dir.path().join("README.md"), "not a package").unwrap();

    let graph = collect(dir.path()).unwrap();
    assert_eq!(graph.len(), 2);
    assert_eq!(graph["A"], vec!["B"]);
    assert!(graph["B"].is_empty());

    assert_eq!(to_json(&graph).unwrap(), "{\n  \"A\": [\n    \"B\"\n  ],\n  \"B\": []\n}");
}

#[test]
fn dependencies_are_sorted() {
    let dir = tempfile::tempdir().unwrap();
    package(dir.path(), "app", Some("zlib\ncore 1.0\nmath\n"));
    package(dir.path(), "core", None);
    package(dir.path(), "math", Some("core\n"));
    package(dir.path(), "zlib", Some(""));

    let graph = collect(dir.path()).unwrap();
    assert_eq!(graph["app"], vec!["core", "math", "zlib"]);
    assert_eq!(graph["math"], vec!["core"]);
    assert!(graph["zlib"].is_empty());
}

#[test]
fn empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    assert!(collect(dir.path()).unwrap().is_empty());
    assert_eq!(to_json(&collect(dir.path()).unwrap()).unwrap(), "{}");
}

#[test]
fn missing_directory() {
    assert!(matches!(
        collect(Path::new("/nonexistent/packages")),
        Err(MetadataError::NotADirectory(_))
    ));
}
