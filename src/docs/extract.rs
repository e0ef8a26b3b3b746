//! Regex-based signature extraction
//!
//! Four pattern families are tried in priority order: documented kernels,
//! documented functions, undocumented kernels, undocumented functions. A name
//! recorded by an earlier family is never recorded again, so a documented
//! definition wins over a later bare declaration of the same function.

use super::params::parse_parameters;
use super::{FunctionKind, FunctionRecord, Location};
use regex::{Captures, Regex};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Block comment directly before a signature
const DOC: &str = r"/\*+(?P<doc>(?:[^*]|\*+[^*/])*)\*+/";
const TEMPLATE: &str = r"(?:template\s*<[^;{}]*?>\s*)?";
const KERNEL: &str = r#"(?:extern\s+"C"\s+)?(?P<qual>__global__|kernel)\s+"#;
const RET: &str = r"(?P<ret>(?:(?:const|static|inline|constexpr|extern|unsigned|signed|long|short|__device__|__host__|__forceinline__|__inline__)\s+)*[A-Za-z_][\w:]*(?:\s*<[^;{}()]*?>)?(?:\s*[*&]+\s*|\s+))";
/// `__launch_bounds__(...)` and `__attribute__((...))` between return type and name
const ATTRS: &str = r"(?:(?:__launch_bounds__\s*\([^()]*\)|__attribute__\s*\(\([^()]*(?:\([^()]*\)[^()]*)*\)\))\s*)*";
const NAME: &str = r"(?P<name>[A-Za-z_]\w*)";
const PARAMS: &str = r"\s*\((?P<params>[^()]*(?:\([^()]*\)[^()]*)*)\)";
const TRAIL: &str = r"\s*(?:const\s*)?(?:noexcept\s*)?[{;]";

const KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "do", "switch", "case", "return", "sizeof", "new", "delete", "throw", "catch",
    "using", "typedef", "goto", "operator", "__launch_bounds__", "__attribute__",
];

struct Family {
    regex: Regex,
    kind: FunctionKind,
    documented: bool,
}

fn families() -> &'static [Family] {
    static FAMILIES: OnceLock<Vec<Family>> = OnceLock::new();
    FAMILIES.get_or_init(|| {
        let build = |pattern: String, kind, documented| Family {
            regex: Regex::new(&pattern).unwrap_or_else(|e| panic!("invalid signature pattern: {e}")),
            kind,
            documented,
        };
        vec![
            build(
                format!(r"{DOC}\s*{TEMPLATE}{KERNEL}{RET}{ATTRS}{NAME}{PARAMS}"),
                FunctionKind::Kernel,
                true,
            ),
            build(
                format!(r"(?m){DOC}[ \t]*\n^{TEMPLATE}{RET}{ATTRS}{NAME}{PARAMS}{TRAIL}"),
                FunctionKind::Function,
                true,
            ),
            build(
                format!(r"(?m)^[ \t]*{TEMPLATE}{KERNEL}{RET}{ATTRS}{NAME}{PARAMS}"),
                FunctionKind::Kernel,
                false,
            ),
            build(
                format!(r"(?m)^{TEMPLATE}{RET}{ATTRS}{NAME}{PARAMS}{TRAIL}"),
                FunctionKind::Function,
                false,
            ),
        ]
    })
}

/// Strip comment delimiters and leading asterisks from a block comment body.
pub fn clean_doc(raw: &str) -> String {
    let lines: Vec<&str> = raw
        .lines()
        .map(|line| line.trim().trim_start_matches('*').trim())
        .collect();

    let start = lines.iter().position(|l| !l.is_empty()).unwrap_or(lines.len());
    let end = lines.iter().rposition(|l| !l.is_empty()).map_or(start, |i| i + 1);
    lines[start..end].join("\n")
}

fn location(source: &str, offset: usize) -> Location {
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    Location {
        line,
        column: before[line_start..].chars().count() + 1,
    }
}

fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

fn to_record(caps: &Captures<'_>, family: &Family, source: &str, file: &str) -> Option<FunctionRecord> {
    let name = caps.name("name")?.as_str();
    let ret = caps.name("ret")?;
    let return_type = ret.as_str().split_whitespace().collect::<Vec<_>>().join(" ");
    let base_type = return_type.rsplit(' ').next().unwrap_or_default();

    if is_keyword(name) || is_keyword(base_type.trim_end_matches(['*', '&'])) {
        return None;
    }

    let start = caps.name("qual").map_or(ret.start(), |q| q.start());
    let doc = if family.documented {
        caps.name("doc").map(|d| clean_doc(d.as_str())).unwrap_or_default()
    } else {
        String::new()
    };

    Some(FunctionRecord {
        name: name.to_string(),
        kind: family.kind,
        qualifier: caps.name("qual").map(|q| q.as_str().to_string()),
        return_type,
        params: parse_parameters(caps.name("params").map_or("", |p| p.as_str())),
        doc,
        file: file.to_string(),
        location: Some(location(source, start)),
    })
}

/// Extract every function and kernel signature from `source`.
///
/// Records are returned in source order.
pub fn extract_functions(source: &str, file: &str) -> Vec<FunctionRecord> {
    let source = source.replace("\r\n", "\n");
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for family in families() {
        for caps in family.regex.captures_iter(&source) {
            let Some(record) = to_record(&caps, family, &source, file) else {
                continue;
            };
            if seen.insert(record.name.clone()) {
                records.push(record);
            }
        }
    }

    records.sort_by_key(|r| r.location.map(|l| (l.line, l.column)));
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(records: &[FunctionRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn documented_kernel_wins_over_later_declaration() {
        let src = "\
/**
 * Computes the ReLU of every element.
 */
__global__ void relu_kernel(float *out, const float *in, int n) {
  out[0] = in[0];
}

__global__ void relu_kernel(float *out, const float *in, int n);
";
        let records = extract_functions(src, "relu.cu");
        assert_eq!(names(&records), vec!["relu_kernel"]);
        let kernel = &records[0];
        assert_eq!(kernel.kind, FunctionKind::Kernel);
        assert_eq!(kernel.doc, "Computes the ReLU of every element.");
        assert_eq!(kernel.qualifier.as_deref(), Some("__global__"));
        assert_eq!(kernel.params.len(), 3);
        assert_eq!(kernel.location, Some(Location { line: 4, column: 1 }));
    }

    #[test]
    fn documented_function_and_bare_function() {
        let src = "\
#include <torch/all.h>

/* Host launcher. */
void relu(torch::Tensor &out,
          torch::Tensor const &input)
{
  dim3 grid(num_tokens);
  if (x) { return; }
}

int helper(int a, int b) {
  return a + b;
}
";
        let records = extract_functions(src, "relu.cu");
        assert_eq!(names(&records), vec!["relu", "helper"]);
        assert_eq!(records[0].doc, "Host launcher.");
        assert_eq!(records[0].kind, FunctionKind::Function);
        assert_eq!(records[0].return_type, "void");
        assert_eq!(records[1].doc, "");
        assert_eq!(records[1].signature(), "int helper(int a, int b)");
    }

    #[test]
    fn template_parameters_are_not_over_split() {
        let src = "std::vector<int> gather(const std::map<int, float> &m, std::pair<int, int> range);\n";
        let records = extract_functions(src, "gather.h");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].return_type, "std::vector<int>");
        assert_eq!(records[0].params.len(), 2);
        assert_eq!(records[0].params[1].ty, "std::pair<int, int>");
        assert_eq!(records[0].params[1].name, "range");
    }

    #[test]
    fn templated_device_function() {
        let src = "\
template <typename T>
__device__ __forceinline__ T silu(const T &x) {
  return x / (1.0f + expf(-x));
}
";
        let records = extract_functions(src, "act.cuh");
        assert_eq!(names(&records), vec!["silu"]);
        assert_eq!(records[0].return_type, "__device__ __forceinline__ T");
    }

    #[test]
    fn metal_kernels() {
        let src = "\
#include <metal_stdlib>
using namespace metal;

kernel void relu_forward(device const float *input [[buffer(0)]],
                         device float *output [[buffer(1)]],
                         uint index [[thread_position_in_grid]]) {
  output[index] = max(0.0f, input[index]);
}
";
        let records = extract_functions(src, "relu.metal");
        assert_eq!(names(&records), vec!["relu_forward"]);
        assert_eq!(records[0].kind, FunctionKind::Kernel);
        assert_eq!(records[0].params.len(), 3);
        assert_eq!(records[0].params[2].name, "index");
    }

    #[test]
    fn indented_statements_are_ignored() {
        let src = "void f() {\n  dim3 block(std::min(d, 1024));\n  return foo(x);\n}\n";
        assert_eq!(names(&extract_functions(src, "f.cu")), vec!["f"]);
    }

    #[test]
    fn launch_bounds_and_attributes() {
        let src = "\
/** Fused SiLU. */
__global__ void __launch_bounds__(256) silu_kernel(float *out, const float *in) {}
__global__ void __launch_bounds__(128, 2) gelu_kernel(float *out) {}
void __attribute__((visibility(\"default\"))) launch_silu(int n);
";
        let records = extract_functions(src, "act.cu");
        assert_eq!(names(&records), vec!["silu_kernel", "gelu_kernel", "launch_silu"]);
        assert_eq!(records[0].doc, "Fused SiLU.");
        assert_eq!(records[0].return_type, "void");
        assert_eq!(records[0].params.len(), 2);
        assert_eq!(records[1].kind, FunctionKind::Kernel);
        assert_eq!(records[1].params, vec![crate::docs::Parameter { name: "out".into(), ty: "float*".into() }]);
        assert_eq!(records[2].kind, FunctionKind::Function);
        assert_eq!(records[2].params.len(), 1);
    }

    #[test]
    fn no_functions() {
        assert!(extract_functions("#pragma once\n#define X 1\n", "x.h").is_empty());
    }

    #[test]
    fn doc_cleanup() {
        assert_eq!(clean_doc("*\n * First line.\n *\n * Second line.\n "), "First line.\n\nSecond line.");
    }
}
