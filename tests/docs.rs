use chrono::NaiveDate;
use kernel_tools::docs::{generate, DocsError, DocsFormat, GenerateOptions, RenderOptions};
use kernel_tools::scaffold::{scaffold, ExistingFiles};
use std::path::{Path, PathBuf};

fn options(format: DocsFormat) -> GenerateOptions {
    GenerateOptions {
        output: PathBuf::from("docs"),
        format,
        render: RenderOptions {
            include_toc: true,
            generated_on: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        },
    }
}

fn scaffolded_project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    scaffold(dir.path(), ExistingFiles::Refuse).unwrap();
    dir
}

#[test]
fn documents_scaffolded_project() {
    let project = scaffolded_project();

    let generated = generate(project.path(), &options(DocsFormat::Markdown)).unwrap();
    assert_eq!(generated.path, project.path().join("docs").join("relu.md"));
    assert_eq!(generated.files, 1);
    assert_eq!(generated.functions, 2);

    let md = std::fs::read_to_string(&generated.path).unwrap();
    assert!(md.starts_with("# `relu` Documentation\n\n*Generated on 2025-01-31*\n"));
    assert!(md.contains("## Table of Contents"));
    assert!(md.contains("relu is a CUDA kernel project."));
    assert!(md.contains("#### activation\n"));
    assert!(md.contains("### relu_kernel/relu.cu\n"));
    assert!(md.contains("#### relu_kernel (Kernel)\n"));
    assert!(md.contains("#### relu (Function)\n"));
    assert!(md.contains("Elementwise ReLU over the last dimension of a row-major tensor."));
    assert!(md.contains("| `out` | `float *__restrict__` |"));
    assert!(md.contains("| `input` | `torch::Tensor const&` |"));
    assert!(!md.contains("torch_binding"));
}

#[test]
fn json_output() {
    let project = scaffolded_project();

    let generated = generate(project.path(), &options(DocsFormat::Json)).unwrap();
    assert_eq!(generated.path, project.path().join("docs").join("relu.json"));

    let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&generated.path).unwrap()).unwrap();
    let files = value.as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["file"], "relu_kernel/relu.cu");
    assert_eq!(files[0]["functions"][0]["name"], "relu_kernel");
    assert_eq!(files[0]["functions"][0]["kind"], "kernel");
    assert_eq!(files[0]["functions"][0]["params"][2]["type"], "const int");
}

#[test]
fn works_without_descriptor() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("gelu");
    std::fs::create_dir_all(project.join("src")).unwrap();
    std::fs::write(
        project.join("src").join("gelu.cuh"),
        "/** Tanh approximation. */\n__device__ float gelu(float x) {\n  return x;\n}\n",
    )
    .unwrap();

    let generated = generate(&project, &options(DocsFormat::Markdown)).unwrap();
    assert_eq!(generated.path, project.join("docs").join("gelu.md"));

    let md = std::fs::read_to_string(&generated.path).unwrap();
    assert!(md.contains("gelu is a CUDA kernel project."));
    assert!(!md.contains("## Build Configuration"));
    assert!(md.contains("#### gelu (Function)\n\n```cpp\n__device__ float gelu(float x)\n```\n\nTanh approximation.\n"));
}

#[test]
fn malformed_descriptor_is_treated_as_absent() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("build.toml"), "[general\nname = ").unwrap();

    let generated = generate(dir.path(), &options(DocsFormat::Markdown)).unwrap();
    assert_eq!(generated.functions, 0);
    let md = std::fs::read_to_string(&generated.path).unwrap();
    assert!(!md.contains("## API Documentation"));
}

#[test]
fn missing_project() {
    let err = generate(Path::new("/nonexistent/kernel/project"), &options(DocsFormat::Markdown)).unwrap_err();
    assert!(matches!(err, DocsError::ProjectNotFound(_)));
}
