//! Heuristic structural parser for contract source text.
//!
//! The parser never fails. Functions and modifiers are located by regex and
//! their bodies by brace-depth matching; variables are located by two
//! declaration regexes applied to the whole text. Malformed input produces
//! a partial model rather than an error.
//!
//! Brace matching does not skip string literals or comments, so a stray
//! `{` or `}` inside either can shift the recorded body boundaries.

use tracing::{debug, warn};

use crate::source::model::{FunctionInfo, LineIndex, ModifierInfo, StructuralModel, VariableInfo};
use crate::source::patterns::{
    RE_CONTAINER_DECL, RE_FUNCTION_DECL, RE_MAPPING_VAR, RE_MODIFIER_DECL, RE_PRAGMA,
    RE_RETURNS_CLAUSE, RE_SCALAR_VAR, RE_SIGNATURE_TOKEN,
};

const VISIBILITY_KEYWORDS: [&str; 4] = ["public", "private", "internal", "external"];

/// Signature tokens that are never modifier names.
const RESERVED_SIGNATURE_TOKENS: [&str; 9] = [
    "view",
    "pure",
    "payable",
    "nonpayable",
    "virtual",
    "override",
    "constant",
    "returns",
    "return",
];

/// Advisory check: does `source` contain a pragma or a
/// contract/interface/library declaration?
pub fn looks_like_supported_source(source: &str) -> bool {
    [&RE_PRAGMA, &RE_CONTAINER_DECL]
        .into_iter()
        .filter_map(|p| p.as_ref())
        .any(|re| re.is_match(source))
}

/// Build the structural model of `source`.
pub fn parse(source: &str) -> StructuralModel {
    let index = LineIndex::new(source);
    let lines: Vec<&str> = source.lines().collect();

    let functions = extract_functions(source, &index, &lines);
    let modifiers = extract_modifiers(source, &index);
    let variables = extract_variables(source, &index);

    debug!(
        functions = functions.len(),
        modifiers = modifiers.len(),
        variables = variables.len(),
        "parsed source"
    );

    StructuralModel::new(source, functions, modifiers, variables)
}

/// Where a declaration's body ends.
enum Body {
    /// `{ ... }` with the offset of the opening and closing brace.
    Closed { open: usize, close: usize },
    /// `{ ...` running to end of text.
    Unterminated { open: usize },
    /// Declaration ended with `;` at this offset.
    Absent { semicolon: usize },
    /// Neither `{` nor `;` follows.
    Missing,
}

fn locate_body(source: &str, from: usize) -> Body {
    let bytes = source.as_bytes();
    let Some(rel) = bytes[from..].iter().position(|b| *b == b'{' || *b == b';') else {
        return Body::Missing;
    };
    let at = from + rel;
    if bytes[at] == b';' {
        return Body::Absent { semicolon: at };
    }
    match matching_brace(bytes, at) {
        Some(close) => Body::Closed { open: at, close },
        None => Body::Unterminated { open: at },
    }
}

/// Offset of the `}` closing the `{` at `open`, by depth counting.
fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Offset of the `)` closing the `(` at `open`, or end of text.
fn matching_paren(bytes: &[u8], open: usize) -> usize {
    let mut depth = 0usize;
    for (i, b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i;
                }
            }
            _ => {}
        }
    }
    bytes.len()
}

fn extract_functions(source: &str, index: &LineIndex, lines: &[&str]) -> Vec<FunctionInfo> {
    let Some(re) = RE_FUNCTION_DECL.as_ref() else {
        warn!("function declaration pattern unavailable; no functions extracted");
        return Vec::new();
    };
    let bytes = source.as_bytes();
    let mut out = Vec::new();

    for caps in re.captures_iter(source) {
        let Some(whole) = caps.get(0) else { continue };
        let (name, keyword_start) = match (caps.get(1), caps.get(2)) {
            (Some(named), _) => {
                let start = whole
                    .as_str()
                    .find("function")
                    .map_or(named.start(), |i| whole.start() + i);
                (named.as_str().to_string(), start)
            }
            (None, Some(special)) => (special.as_str().to_string(), special.start()),
            (None, None) => continue,
        };

        let params_open = whole.end() - 1;
        let params_close = matching_paren(bytes, params_open);
        let tail_from = (params_close + 1).min(source.len());

        let start_line = index.line_of(keyword_start);
        let (tail_end, body, body_offset, end_line, terminated) = match locate_body(source, tail_from)
        {
            Body::Closed { open, close } => (
                open,
                source[open + 1..close].to_string(),
                open + 1,
                index.line_of(close),
                true,
            ),
            Body::Unterminated { open } => (
                open,
                source[open + 1..].to_string(),
                open + 1,
                index.line_of(source.len()),
                false,
            ),
            Body::Absent { semicolon } => (
                semicolon,
                String::new(),
                semicolon,
                index.line_of(semicolon),
                true,
            ),
            Body::Missing => (
                source.len(),
                String::new(),
                source.len(),
                index.line_of(source.len()),
                false,
            ),
        };

        let (visibility, modifiers) = read_signature_tail(&source[tail_from..tail_end]);

        out.push(FunctionInfo {
            name,
            start_line,
            end_line,
            visibility,
            modifiers,
            body,
            body_offset,
            full_signature: signature_snippet(lines, start_line),
            terminated,
        });
    }

    out
}

/// Visibility (default `public`) and modifier names from the text between
/// the parameter list and the body.
fn read_signature_tail(tail: &str) -> (String, Vec<String>) {
    let tail = match RE_RETURNS_CLAUSE.as_ref() {
        Some(re) => re.replace_all(tail, " ").into_owned(),
        None => tail.to_string(),
    };

    let mut visibility = None;
    let mut modifiers = Vec::new();

    if let Some(re) = RE_SIGNATURE_TOKEN.as_ref() {
        for caps in re.captures_iter(&tail) {
            let Some(token) = caps.get(1).map(|m| m.as_str()) else { continue };
            if VISIBILITY_KEYWORDS.contains(&token) {
                visibility.get_or_insert_with(|| token.to_string());
            } else if !RESERVED_SIGNATURE_TOKENS.contains(&token) {
                modifiers.push(token.to_string());
            }
        }
    }

    (visibility.unwrap_or_else(|| "public".to_string()), modifiers)
}

fn signature_snippet(lines: &[&str], start_line: usize) -> String {
    let first = start_line.saturating_sub(1);
    lines
        .iter()
        .skip(first)
        .take(3)
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn extract_modifiers(source: &str, index: &LineIndex) -> Vec<ModifierInfo> {
    let Some(re) = RE_MODIFIER_DECL.as_ref() else {
        warn!("modifier declaration pattern unavailable; no modifiers extracted");
        return Vec::new();
    };

    re.captures_iter(source)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?;
            let keyword_start = whole
                .as_str()
                .find("modifier")
                .map(|i| whole.start() + i)
                .unwrap_or(name.start());

            let body = match locate_body(source, name.end()) {
                Body::Closed { open, close } => source[open + 1..close].to_string(),
                Body::Unterminated { open } => source[open + 1..].to_string(),
                Body::Absent { .. } | Body::Missing => String::new(),
            };

            Some(ModifierInfo {
                name: name.as_str().to_string(),
                line: index.line_of(keyword_start),
                body,
            })
        })
        .collect()
}

fn extract_variables(source: &str, index: &LineIndex) -> Vec<VariableInfo> {
    let mut found: Vec<(usize, VariableInfo)> = Vec::new();

    match RE_SCALAR_VAR.as_ref() {
        Some(re) => {
            for caps in re.captures_iter(source) {
                let (Some(ty), Some(name)) = (caps.get(1), caps.get(3)) else { continue };
                let keywords = caps.get(2).map(|m| m.as_str()).unwrap_or("");
                found.push((
                    ty.start(),
                    VariableInfo {
                        name: name.as_str().to_string(),
                        var_type: ty.as_str().to_string(),
                        visibility: visibility_from(keywords),
                        line: index.line_of(ty.start()),
                        is_constant: keywords.split_whitespace().any(|k| k == "constant"),
                    },
                ));
            }
        }
        None => warn!("scalar variable pattern unavailable"),
    }

    match RE_MAPPING_VAR.as_ref() {
        Some(re) => {
            for caps in re.captures_iter(source) {
                let (Some(whole), Some(name)) = (caps.get(0), caps.get(2)) else { continue };
                let keywords = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                found.push((
                    whole.start(),
                    VariableInfo {
                        name: name.as_str().to_string(),
                        var_type: "mapping".to_string(),
                        visibility: visibility_from(keywords),
                        line: index.line_of(whole.start()),
                        is_constant: false,
                    },
                ));
            }
        }
        None => warn!("mapping variable pattern unavailable"),
    }

    found.sort_by_key(|(offset, _)| *offset);
    found.into_iter().map(|(_, v)| v).collect()
}

fn visibility_from(keywords: &str) -> String {
    keywords
        .split_whitespace()
        .find(|k| matches!(*k, "public" | "private" | "internal"))
        .unwrap_or("internal")
        .to_string()
}
