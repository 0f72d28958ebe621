//! Definition validation. Runs once per definition, before any table is built.
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::ir::{EnumDefinition, EnumValue, NormalizedValue, RawValue, RawValues, ValueKind};
use crate::normalize::{normalize_values, to_enum_value};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no values supplied")]
    NoValues,
    #[error("values mix {first} and {second} kinds (`{name}` is {second})")]
    MixedValueKinds { first: ValueKind, second: ValueKind, name: String },
    #[error("value of `{name}` must be exactly one ASCII character, got {value:?}")]
    InvalidCharValue { name: String, value: String },
    #[error("name `{0}` is declared more than once")]
    DuplicateName(String),
    #[error("`{first}` and `{second}` share the value {value}")]
    DuplicateValue { first: String, second: String, value: EnumValue },
    #[error("{what} `{text}` is not a valid identifier")]
    InvalidIdentifier { what: &'static str, text: String },
    #[error("storage type `{0}` is not a type name")]
    InvalidStorageType(String),
    #[error("value {value} of `{name}` does not fit in `{storage}`")]
    ValueOutOfRange { name: String, value: EnumValue, storage: String },
}

/// A definition that passed every check, with its values in declaration order.
#[derive(Debug, Clone)]
pub struct ValidatedEnum<'a> {
    pub definition: &'a EnumDefinition,
    pub values: Vec<NormalizedValue>,
}

// ————————————————————————————————————————————————————————————————————————————
// RULES
// ————————————————————————————————————————————————————————————————————————————

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static pattern"));
static FILE_STEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.\-]*$").expect("static pattern"));
static STORAGE_TYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_: ]*$").expect("static pattern"));

const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "char8_t", "char16_t", "char32_t", "class", "compl", "concept",
    "const", "consteval", "constexpr", "constinit", "const_cast", "continue", "co_await",
    "co_return", "co_yield", "decltype", "default", "delete", "do", "double", "dynamic_cast",
    "else", "enum", "explicit", "export", "extern", "false", "float", "for", "friend", "goto",
    "if", "inline", "int", "long", "mutable", "namespace", "new", "noexcept", "not", "not_eq",
    "nullptr", "operator", "or", "or_eq", "private", "protected", "public", "register",
    "reinterpret_cast", "requires", "return", "short", "signed", "sizeof", "static",
    "static_assert", "static_cast", "struct", "switch", "template", "this", "thread_local",
    "throw", "true", "try", "typedef", "typeid", "typename", "union", "unsigned", "using",
    "virtual", "void", "volatile", "wchar_t", "while", "xor", "xor_eq",
];

/// Object-like macros from the C headers the generated code pulls in
/// (directly or through `<string>` and friends). A constant spelled like one
/// gets rewritten by the preprocessor.
const STANDARD_MACROS: &[&str] = &[
    "NULL", "EOF", "errno", "assert", "offsetof", "stdin", "stdout", "stderr",
    "BUFSIZ", "FILENAME_MAX", "SEEK_SET", "SEEK_CUR", "SEEK_END", "EXIT_SUCCESS", "EXIT_FAILURE",
    "RAND_MAX", "MB_CUR_MAX", "CHAR_BIT", "EDOM", "ERANGE", "EILSEQ", "SIZE_MAX",
    "INT8_MIN", "INT8_MAX", "INT16_MIN", "INT16_MAX", "INT32_MIN", "INT32_MAX", "INT64_MIN",
    "INT64_MAX", "UINT8_MAX", "UINT16_MAX", "UINT32_MAX", "UINT64_MAX", "INTMAX_MIN", "INTMAX_MAX",
    "UINTMAX_MAX", "INTPTR_MIN", "INTPTR_MAX", "UINTPTR_MAX", "PTRDIFF_MIN", "PTRDIFF_MAX",
];

/// Names the implementation keeps for itself: a double underscore anywhere,
/// or an underscore followed by an uppercase letter.
fn is_reserved(text: &str) -> bool {
    let bytes = text.as_bytes();
    text.contains("__") || (bytes.first() == Some(&b'_') && bytes.get(1).is_some_and(u8::is_ascii_uppercase))
}

pub fn is_identifier(text: &str) -> bool {
    IDENTIFIER.is_match(text)
        && !CPP_KEYWORDS.contains(&text)
        && !STANDARD_MACROS.contains(&text)
        && !is_reserved(text)
}

fn check_identifier(what: &'static str, text: &str) -> Result<(), ValidationError> {
    if is_identifier(text) {
        Ok(())
    } else {
        Err(ValidationError::InvalidIdentifier { what, text: text.to_string() })
    }
}

/// Inclusive range of the standard integer types we know about. `None` for
/// anything else (typedefs from user headers are taken on trust).
pub fn storage_range(storage: &str) -> Option<(i128, i128)> {
    let normalized = storage.split_whitespace().collect::<Vec<_>>().join(" ");
    let bare = normalized.strip_prefix("std::").unwrap_or(&normalized);
    let range = match bare {
        "int8_t" | "signed char" => (i8::MIN as i128, i8::MAX as i128),
        "uint8_t" | "unsigned char" => (0, u8::MAX as i128),
        // plain char signedness is implementation defined; take the overlap
        "char" => (0, i8::MAX as i128),
        "int16_t" | "short" | "short int" | "signed short" => (i16::MIN as i128, i16::MAX as i128),
        "uint16_t" | "unsigned short" | "unsigned short int" => (0, u16::MAX as i128),
        "int32_t" | "int" | "signed" | "signed int" => (i32::MIN as i128, i32::MAX as i128),
        "uint32_t" | "unsigned" | "unsigned int" => (0, u32::MAX as i128),
        "int64_t" | "long" | "long int" | "signed long" | "long long" | "long long int"
        | "signed long long" => (i64::MIN as i128, i64::MAX as i128),
        "uint64_t" | "unsigned long" | "unsigned long int" | "unsigned long long"
        | "unsigned long long int" => (0, u64::MAX as i128),
        _ => return None,
    };
    Some(range)
}

// ————————————————————————————————————————————————————————————————————————————
// ENTRY POINT
// ————————————————————————————————————————————————————————————————————————————

pub fn validate(definition: &EnumDefinition) -> Result<ValidatedEnum<'_>, ValidationError> {
    let raw = match &definition.values {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Err(ValidationError::NoValues),
    };

    check_identifier("type name", &definition.name)?;
    for segment in &definition.scope {
        check_identifier("namespace segment", segment)?;
    }
    if !FILE_STEM.is_match(definition.file_stem()) {
        return Err(ValidationError::InvalidIdentifier {
            what: "file stem",
            text: definition.file_stem().to_string(),
        });
    }
    for name in raw.names() {
        check_identifier("constant", name)?;
    }

    if let RawValues::Mapping(pairs) = raw {
        check_kinds(pairs)?;
    }
    check_unique_names(raw)?;

    let values = normalize_values(raw);
    check_unique_values(&values)?;
    // without an explicit storage type an `enum class` is backed by `int`
    check_range(definition.storage.as_deref().unwrap_or("int"), &values)?;
    if let Some(storage) = &definition.storage {
        if !STORAGE_TYPE.is_match(storage.trim()) {
            return Err(ValidationError::InvalidStorageType(storage.clone()));
        }
    }

    tracing::debug!(name = %definition.qualified_name(), count = values.len(), "definition validated");
    Ok(ValidatedEnum { definition, values })
}

/// Kind homogeneity first, then character shape: a mixed list is reported
/// as mixed even when one of its strings is also too long.
fn check_kinds(pairs: &[(String, RawValue)]) -> Result<(), ValidationError> {
    let kind_of = |v: &RawValue| match v {
        RawValue::Integer(_) => ValueKind::Integer,
        RawValue::Text(_) => ValueKind::Char,
    };
    let Some((_, head)) = pairs.first() else { return Ok(()) };
    let first = kind_of(head);
    for (name, value) in pairs {
        let kind = kind_of(value);
        if kind != first {
            return Err(ValidationError::MixedValueKinds { first, second: kind, name: name.clone() });
        }
    }
    for (name, value) in pairs {
        if let RawValue::Text(text) = value {
            let ok = matches!(to_enum_value(value), Some(EnumValue::Char(c)) if c.is_ascii());
            if !ok {
                return Err(ValidationError::InvalidCharValue { name: name.clone(), value: text.clone() });
            }
        }
    }
    Ok(())
}

fn check_unique_names(raw: &RawValues) -> Result<(), ValidationError> {
    let mut seen = IndexMap::<&str, ()>::with_capacity(raw.len());
    for name in raw.names() {
        if seen.insert(name, ()).is_some() {
            return Err(ValidationError::DuplicateName(name.to_string()));
        }
    }
    Ok(())
}

fn check_unique_values(values: &[NormalizedValue]) -> Result<(), ValidationError> {
    // sorted by value, so equal values are neighbours
    for pair in values.windows(2) {
        if pair[0].value == pair[1].value {
            return Err(ValidationError::DuplicateValue {
                first: pair[0].name.clone(),
                second: pair[1].name.clone(),
                value: pair[0].value,
            });
        }
    }
    Ok(())
}

fn check_range(storage: &str, values: &[NormalizedValue]) -> Result<(), ValidationError> {
    let Some((min, max)) = storage_range(storage) else {
        tracing::debug!(storage, "storage type not range checked");
        return Ok(());
    };
    for v in values {
        let n = v.value.as_integer();
        if n < min || n > max {
            return Err(ValidationError::ValueOutOfRange {
                name: v.name.clone(),
                value: v.value,
                storage: storage.to_string(),
            });
        }
    }
    Ok(())
}

// ------------------------------- Tests ------------------------------------ //
