use serde::Serialize;

/// Byte-offset to line-number lookup over a source text.
///
/// Lines are 1-indexed. The line of an offset is one plus the number of
/// `\n` characters preceding it.
#[derive(Debug, Clone, Default)]
pub struct LineIndex {
    /// Byte offset of every `\n` in the source, ascending.
    newlines: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        Self {
            newlines: source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i)
                .collect(),
        }
    }

    /// 1-indexed line containing `offset`.
    pub fn line_of(&self, offset: usize) -> usize {
        self.newlines.partition_point(|&nl| nl < offset) + 1
    }
}

/// A `function`, `constructor`, `fallback` or `receive` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionInfo {
    pub name: String,
    pub start_line: usize,
    pub end_line: usize,
    /// Declared visibility; `public` when omitted.
    pub visibility: String,
    /// Modifier names attached to the signature, in declaration order.
    pub modifiers: Vec<String>,
    /// Raw text between the matched braces (exclusive).
    pub body: String,
    /// Byte offset of `body` within the source.
    pub body_offset: usize,
    /// Declaration line plus up to two following lines, trimmed.
    pub full_signature: String,
    /// `false` when the closing brace was never found and the body ran to
    /// end of text.
    pub terminated: bool,
}

impl FunctionInfo {
    pub fn is_constructor(&self) -> bool {
        self.name == "constructor"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModifierInfo {
    pub name: String,
    pub line: usize,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableInfo {
    pub name: String,
    /// Declared type; the literal `mapping` for mapping types.
    pub var_type: String,
    /// Declared visibility; `internal` when omitted.
    pub visibility: String,
    pub line: usize,
    pub is_constant: bool,
}

impl VariableInfo {
    pub fn is_mapping(&self) -> bool {
        self.var_type == "mapping"
    }
}

/// Immutable structural view of one source text.
///
/// Built once per analysis by `source::parse::parse` and shared read-only
/// by every detector.
#[derive(Debug, Clone, Default)]
pub struct StructuralModel {
    source: String,
    lines: Vec<String>,
    index: LineIndex,
    functions: Vec<FunctionInfo>,
    modifiers: Vec<ModifierInfo>,
    variables: Vec<VariableInfo>,
}

impl StructuralModel {
    pub(crate) fn new(
        source: &str,
        functions: Vec<FunctionInfo>,
        modifiers: Vec<ModifierInfo>,
        variables: Vec<VariableInfo>,
    ) -> Self {
        Self {
            source: source.to_string(),
            lines: source.lines().map(str::to_string).collect(),
            index: LineIndex::new(source),
            functions,
            modifiers,
            variables,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Text of a 1-indexed line, if it exists.
    pub fn line(&self, line: usize) -> Option<&str> {
        line.checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map(String::as_str)
    }

    pub fn line_of(&self, offset: usize) -> usize {
        self.index.line_of(offset)
    }

    pub fn functions(&self) -> &[FunctionInfo] {
        &self.functions
    }

    pub fn modifiers(&self) -> &[ModifierInfo] {
        &self.modifiers
    }

    pub fn variables(&self) -> &[VariableInfo] {
        &self.variables
    }

    /// Number of functions whose body was closed by a matching brace or
    /// whose declaration ended with `;`.
    pub fn terminated_function_count(&self) -> usize {
        self.functions.iter().filter(|f| f.terminated).count()
    }
}
