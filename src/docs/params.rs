//! Parameter list parsing for C++/CUDA/Metal signatures

use super::Parameter;

/// Split on commas that are not nested inside `<>`, `()` or `[]`.
pub fn split_top_level(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in list.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&list[start..i]);
                start = i + 1;
            },
            _ => {},
        }
    }
    parts.push(&list[start..]);

    parts.into_iter().map(str::trim).filter(|p| !p.is_empty()).collect()
}

/// Drop comments and `[[attribute]]` annotations, collapse whitespace.
fn normalize(raw: &str) -> String {
    let mut text = String::with_capacity(raw.len());
    let mut rest = raw;
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("/*") {
            rest = after.find("*/").map(|end| &after[end + 2..]).unwrap_or("");
            text.push(' ');
        } else if let Some(after) = rest.strip_prefix("//") {
            rest = after.find('\n').map(|end| &after[end..]).unwrap_or("");
        } else if let Some(after) = rest.strip_prefix("[[") {
            rest = after.find("]]").map(|end| &after[end + 2..]).unwrap_or("");
            text.push(' ');
        } else {
            let c = rest.chars().next().unwrap_or(' ');
            text.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip a top-level default value (`int n = 4` -> `int n`).
fn strip_default(param: &str) -> &str {
    let mut depth = 0usize;
    for (i, c) in param.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth = depth.saturating_sub(1),
            '=' if depth == 0 => return param[..i].trim_end(),
            _ => {},
        }
    }
    param
}

/// Parse a single parameter. The last whitespace-separated token is the
/// name with pointer/reference sigils moved onto the type.
pub fn parse_parameter(raw: &str) -> Option<Parameter> {
    let param = strip_default(raw.trim());
    if param.is_empty() {
        return None;
    }

    let (head, last) = match param.rsplit_once(' ') {
        Some((head, last)) => (head.trim_end(), last),
        None => {
            return Some(Parameter {
                name: String::new(),
                ty: param.to_string(),
            })
        },
    };

    let name = last.trim_start_matches(['*', '&']);
    let sigils = &last[..last.len() - name.len()];

    if name.is_empty() {
        // `float *` with no name
        return Some(Parameter {
            name: String::new(),
            ty: param.to_string(),
        });
    }

    Some(Parameter {
        name: name.to_string(),
        ty: format!("{head}{sigils}"),
    })
}

/// Parse the text between a signature's parentheses.
pub fn parse_parameters(list: &str) -> Vec<Parameter> {
    let list = normalize(list);
    if list.is_empty() || list == "void" {
        return Vec::new();
    }
    split_top_level(&list).into_iter().filter_map(parse_parameter).collect()
}
