//! C++ rendering of one validated enumeration: a header (declaration
//! artifact) and a source file (definition artifact).
//!
//! Both outputs are pure functions of the definition and its tables. Nothing
//! time- or environment-dependent goes into the text, so regenerating from
//! the same input is byte-identical.
//!
//! Caller code fragments are a trust boundary: they are pasted verbatim at two
//! fixed points and never parsed. Guarantees here cover the generated code
//! only.
pub mod header;
pub mod literal;
pub mod source;

use thiserror::Error;

use crate::ir::EnumDefinition;
use crate::tables::LookupTables;
use crate::validate::ValidatedEnum;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

pub const BANNER: &str = "// Generated by enumgen. Do not edit.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub header_extension: String,
    pub source_extension: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { header_extension: "hpp".into(), source_extension: "cpp".into() }
    }
}

impl RenderOptions {
    pub fn header_file(&self, stem: &str) -> String {
        format!("{stem}.{}", self.header_extension)
    }

    pub fn source_file(&self, stem: &str) -> String {
        format!("{stem}.{}", self.source_extension)
    }
}

/// The two rendered files of one definition. Paths are relative to whatever
/// directory the sink writes into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub name: String,
    pub header_path: String,
    pub header: String,
    pub source_path: String,
    pub source: String,
}

/// Generator defects. Never caused by user input that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("{table} table has {actual} entries, expected {expected}")]
    TableCountMismatch { table: &'static str, expected: usize, actual: usize },
    #[error("header and source would both be written to `{0}`")]
    SameArtifactPath(String),
}

/// Everything an emitter needs, borrowed for one render.
pub(crate) struct RenderContext<'a> {
    pub definition: &'a EnumDefinition,
    pub tables: &'a LookupTables<'a>,
    pub options: &'a RenderOptions,
}

impl RenderContext<'_> {
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// `::scope::Name`, for places where a helper of the same name may be in
    /// scope.
    pub fn qualified_type(&self) -> String {
        format!("::{}", self.definition.qualified_name())
    }

    pub fn lookup_error_name(&self) -> String {
        format!("{}LookupError", self.definition.name)
    }

    pub fn tables_namespace(&self) -> String {
        format!("{}_tables", self.definition.name)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// WRITER
// ————————————————————————————————————————————————————————————————————————————

/// Line-oriented text builder with two-space indentation.
#[derive(Debug, Default)]
pub struct Codegen {
    out: String,
    depth: usize,
}

impl Codegen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str("  ");
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    /// Access specifiers and similar, one level out from the body.
    pub fn label(&mut self, text: &str) {
        for _ in 0..self.depth.saturating_sub(1) {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    /// `open` at the current depth, body one level in, then `close`. An empty
    /// `open` continues the previous line's statement (array initializers).
    pub fn block(&mut self, open: impl AsRef<str>, close: impl AsRef<str>, body: impl FnOnce(&mut Self)) {
        if !open.as_ref().is_empty() {
            self.line(open);
        }
        self.line("{");
        self.depth += 1;
        body(self);
        self.depth -= 1;
        self.line(close);
    }

    /// Comma-separated entries, one per line, no trailing comma.
    pub fn list<I, S>(&mut self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let items: Vec<S> = items.into_iter().collect();
        let last = items.len().saturating_sub(1);
        for (i, item) in items.iter().enumerate() {
            if i == last {
                self.line(item.as_ref());
            } else {
                self.line(format!("{},", item.as_ref()));
            }
        }
    }

    /// Caller text, unindented and unchanged apart from a guaranteed final
    /// newline.
    pub fn verbatim(&mut self, text: &str) {
        self.out.push_str(text);
        if !text.ends_with('\n') {
            self.out.push('\n');
        }
    }

    pub fn namespace_open(&mut self, scope: &[String]) {
        for segment in scope {
            self.line(format!("namespace {segment} {{"));
        }
        if !scope.is_empty() {
            self.blank();
        }
    }

    pub fn namespace_close(&mut self, scope: &[String]) {
        for segment in scope.iter().rev() {
            self.line(format!("}} // namespace {segment}"));
        }
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

// ————————————————————————————————————————————————————————————————————————————
// ENTRY POINT
// ————————————————————————————————————————————————————————————————————————————

pub fn render(validated: &ValidatedEnum<'_>, options: &RenderOptions) -> Result<Artifacts, RenderError> {
    let tables = LookupTables::build(validated);
    check_counts(validated.values.len(), &tables)?;

    let definition = validated.definition;
    let stem = definition.file_stem();
    let header_path = options.header_file(stem);
    let source_path = options.source_file(stem);
    if header_path == source_path {
        return Err(RenderError::SameArtifactPath(header_path));
    }

    let ctx = RenderContext { definition, tables: &tables, options };

    let mut cg = Codegen::new();
    header::emit_header(&mut cg, &ctx);
    let header = cg.into_string();

    let mut cg = Codegen::new();
    source::emit_source(&mut cg, &ctx);
    let source = cg.into_string();

    tracing::debug!(
        name = %definition.qualified_name(),
        header = %header_path,
        source = %source_path,
        "rendered artifacts"
    );
    Ok(Artifacts { name: definition.qualified_name(), header_path, header, source_path, source })
}

fn check_counts(expected: usize, tables: &LookupTables<'_>) -> Result<(), RenderError> {
    for (table, actual) in [("declaration", tables.declaration.len()), ("name", tables.by_name.len())] {
        if actual != expected {
            return Err(RenderError::TableCountMismatch { table, expected, actual });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{EnumValue, NormalizedValue};

    #[test]
    fn count_mismatch_is_reported() {
        let values = vec![
            NormalizedValue::new("A", EnumValue::Integer(0)),
            NormalizedValue::new("B", EnumValue::Integer(1)),
        ];
        let mut tables = LookupTables::from_declaration(&values);
        tables.by_name.pop();
        assert_eq!(
            check_counts(2, &tables),
            Err(RenderError::TableCountMismatch { table: "name", expected: 2, actual: 1 })
        );
    }

    #[test]
    fn same_extension_rejected() {
        let def = EnumDefinition::new("E").with_names(["A"]);
        let ok = crate::validate::validate(&def).unwrap();
        let options = RenderOptions { header_extension: "h".into(), source_extension: "h".into() };
        assert_eq!(render(&ok, &options), Err(RenderError::SameArtifactPath("E.h".into())));
    }

    #[test]
    fn codegen_blocks_and_lists() {
        let mut cg = Codegen::new();
        cg.block("enum class E", "};", |cg| cg.list(["A = 0", "B = 1"]));
        assert_eq!(cg.into_string(), "enum class E\n{\n  A = 0,\n  B = 1\n};\n");
    }

    #[test]
    fn verbatim_is_not_indented() {
        let mut cg = Codegen::new();
        cg.block("struct S", "};", |cg| cg.verbatim("int x;"));
        assert_eq!(cg.into_string(), "struct S\n{\nint x;\n};\n");
    }
}
