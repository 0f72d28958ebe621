//! C++ spellings of values, includes and guards.
use crate::ir::EnumValue;

/// Decimal integer or single-quoted character, whichever the value is.
pub fn value_literal(value: &EnumValue) -> String {
    match *value {
        EnumValue::Integer(i) => integer_literal(i),
        EnumValue::Char(c) => char_literal(c),
    }
}

fn integer_literal(i: i128) -> String {
    if i == i64::MIN as i128 {
        // `-9223372036854775808` is unary minus on a literal that does not fit
        return format!("({} - 1)", i64::MIN + 1);
    }
    if i > i64::MAX as i128 {
        return format!("{i}ULL");
    }
    i.to_string()
}

pub fn char_literal(c: char) -> String {
    match c {
        '\'' => r"'\''".to_string(),
        '\\' => r"'\\'".to_string(),
        '\n' => r"'\n'".to_string(),
        '\r' => r"'\r'".to_string(),
        '\t' => r"'\t'".to_string(),
        '\0' => r"'\0'".to_string(),
        c if c.is_ascii_control() => format!("'\\x{:02x}'", c as u32),
        c => format!("'{c}'"),
    }
}

/// `<vector>` and `"foo.hpp"` pass through, a bare path gets quoted, and a
/// full `#include ...` line is kept as written.
pub fn include_line(include: &str) -> String {
    let include = include.trim();
    if include.starts_with("#include") {
        include.to_string()
    } else if include.starts_with('<') || include.starts_with('"') {
        format!("#include {include}")
    } else {
        format!("#include \"{include}\"")
    }
}

/// `scope_segments_Name_ext` with case kept. Inside a part `Z` becomes `ZZ`,
/// `_` becomes `ZU` and anything else outside `[A-Za-z0-9]` becomes `ZX`
/// plus six hex digits, so parts never contain `_` and the joined guard is
/// unique per (scope, name, extension). It never starts with `_` and never
/// contains `__`.
pub fn include_guard(scope: &[String], name: &str, extension: &str) -> String {
    scope
        .iter()
        .map(String::as_str)
        .chain([name, extension])
        .filter(|part| !part.is_empty())
        .map(guard_part)
        .collect::<Vec<_>>()
        .join("_")
}

fn guard_part(part: &str) -> String {
    let mut out = String::with_capacity(part.len());
    for c in part.chars() {
        match c {
            'Z' => out.push_str("ZZ"),
            '_' => out.push_str("ZU"),
            c if c.is_ascii_alphanumeric() => out.push(c),
            c => out.push_str(&format!("ZX{:06X}", c as u32)),
        }
    }
    out
}
