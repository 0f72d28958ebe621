//! Input-side model of one enumeration plus the normalized value shapes the
//! rest of the pipeline works with.
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;

// ————————————————————————————————————————————————————————————————————————————
// DEFINITION
// ————————————————————————————————————————————————————————————————————————————

/// One enumeration as handed over by a definition source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumDefinition {
    pub name: String,
    /// `"a::b"` or `["a", "b"]`
    #[serde(default, rename = "namespace", deserialize_with = "deserialize_scope")]
    pub scope: Vec<String>,
    #[serde(default, rename = "file")]
    pub file_stem: Option<String>,
    #[serde(default)]
    pub storage: Option<String>,
    #[serde(default)]
    pub values: Option<RawValues>,
    #[serde(default)]
    pub interface_code: Option<String>,
    #[serde(default)]
    pub implementation_code: Option<String>,
    #[serde(default)]
    pub interface_includes: Vec<String>,
    #[serde(default)]
    pub implementation_includes: Vec<String>,
}

impl EnumDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn file_stem(&self) -> &str {
        self.file_stem.as_deref().unwrap_or(&self.name)
    }

    pub fn qualified_name(&self) -> String {
        let mut out = String::new();
        for segment in &self.scope {
            out.push_str(segment);
            out.push_str("::");
        }
        out.push_str(&self.name);
        out
    }

    // builder helpers, mostly for tests and programmatic sources

    pub fn with_scope<I, S>(mut self, scope: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scope = scope.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = Some(RawValues::Names(names.into_iter().map(Into::into).collect()));
        self
    }

    pub fn with_mapping<I, S>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, RawValue)>,
        S: Into<String>,
    {
        self.values = Some(RawValues::Mapping(
            pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ));
        self
    }

    pub fn with_storage(mut self, storage: impl Into<String>) -> Self {
        self.storage = Some(storage.into());
        self
    }

    pub fn with_file_stem(mut self, stem: impl Into<String>) -> Self {
        self.file_stem = Some(stem.into());
        self
    }
}

// ————————————————————————————————————————————————————————————————————————————
// RAW VALUES
// ————————————————————————————————————————————————————————————————————————————

/// Values exactly as written by the caller.
///
/// The mapping form is kept as a list of pairs, not a map: a JSON object with a
/// repeated key must reach the validator as two entries so it can be rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValues {
    Names(Vec<String>),
    Mapping(Vec<(String, RawValue)>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Integer(i128),
    /// Expected to hold exactly one character.
    Text(String),
}

impl RawValues {
    pub fn len(&self) -> usize {
        match self {
            RawValues::Names(xs) => xs.len(),
            RawValues::Mapping(xs) => xs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn names(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            RawValues::Names(xs) => Box::new(xs.iter().map(String::as_str)),
            RawValues::Mapping(xs) => Box::new(xs.iter().map(|(k, _)| k.as_str())),
        }
    }
}

impl<'de> Deserialize<'de> for RawValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RawValuesVisitor;

        impl<'de> Visitor<'de> for RawValuesVisitor {
            type Value = RawValues;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a list of names or an object mapping names to values")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<RawValues, A::Error> {
                let mut names = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(name) = seq.next_element::<String>()? {
                    names.push(name);
                }
                Ok(RawValues::Names(names))
            }

            // a lone string is a one-constant list
            fn visit_str<E: de::Error>(self, v: &str) -> Result<RawValues, E> {
                Ok(RawValues::Names(vec![v.to_string()]))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawValues, A::Error> {
                let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, value)) = map.next_entry::<String, RawValue>()? {
                    pairs.push((name, value));
                }
                Ok(RawValues::Mapping(pairs))
            }
        }

        deserializer.deserialize_any(RawValuesVisitor)
    }
}

impl<'de> Deserialize<'de> for RawValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RawValueVisitor;

        impl<'de> Visitor<'de> for RawValueVisitor {
            type Value = RawValue;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an integer or a single-character string")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<RawValue, E> {
                Ok(RawValue::Integer(v.into()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<RawValue, E> {
                Ok(RawValue::Integer(v.into()))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<RawValue, E> {
                Ok(RawValue::Text(v.to_string()))
            }
        }

        deserializer.deserialize_any(RawValueVisitor)
    }
}

fn deserialize_scope<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scope {
        Joined(String),
        Segments(Vec<String>),
    }

    Ok(match Scope::deserialize(deserializer)? {
        Scope::Joined(s) if s.is_empty() => Vec::new(),
        Scope::Joined(s) => s.split("::").map(str::to_string).collect(),
        Scope::Segments(xs) => xs,
    })
}

// ————————————————————————————————————————————————————————————————————————————
// NORMALIZED VALUES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Integer,
    Char,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Integer => f.write_str("integer"),
            ValueKind::Char => f.write_str("character"),
        }
    }
}

/// Underlying value of one constant. Ordering is only meaningful within one
/// kind; mixed kinds never survive validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EnumValue {
    Integer(i128),
    Char(char),
}

impl EnumValue {
    /// Numeric value as the target compiler sees it.
    pub fn as_integer(&self) -> i128 {
        match *self {
            EnumValue::Integer(i) => i,
            EnumValue::Char(c) => c as i128,
        }
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumValue::Integer(i) => write!(f, "{i}"),
            EnumValue::Char(c) => write!(f, "{c:?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedValue {
    pub name: String,
    pub value: EnumValue,
}

impl NormalizedValue {
    pub fn new(name: impl Into<String>, value: EnumValue) -> Self {
        Self { name: name.into(), value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_keeps_repeated_keys() {
        let def: EnumDefinition = serde_json::from_str(
            r#"{ "name": "E", "values": { "A": 1, "B": 2, "A": 3 } }"#,
        ).unwrap();
        let Some(RawValues::Mapping(pairs)) = def.values else { panic!("expected mapping") };
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[2], ("A".to_string(), RawValue::Integer(3)));
    }

    #[test]
    fn scope_accepts_joined_and_segments() {
        let a: EnumDefinition = serde_json::from_str(r#"{ "name": "E", "namespace": "gfx::palette" }"#).unwrap();
        let b: EnumDefinition = serde_json::from_str(r#"{ "name": "E", "namespace": ["gfx", "palette"] }"#).unwrap();
        assert_eq!(a.scope, vec!["gfx", "palette"]);
        assert_eq!(a.scope, b.scope);
        assert_eq!(a.qualified_name(), "gfx::palette::E");
    }

    #[test]
    fn values_accept_u64_and_negative() {
        let def: EnumDefinition = serde_json::from_str(
            r#"{ "name": "E", "values": { "MAX": 18446744073709551615, "NEG": -5 } }"#,
        ).unwrap();
        let Some(RawValues::Mapping(pairs)) = def.values else { panic!("expected mapping") };
        assert_eq!(pairs[0].1, RawValue::Integer(u64::MAX as i128));
        assert_eq!(pairs[1].1, RawValue::Integer(-5));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let res = serde_json::from_str::<EnumDefinition>(r#"{ "name": "E", "valuez": [] }"#);
        assert!(res.is_err());
    }

    #[test]
    fn file_stem_defaults_to_name() {
        let def = EnumDefinition::new("Color");
        assert_eq!(def.file_stem(), "Color");
        assert_eq!(def.with_file_stem("color").file_stem(), "color");
    }
}
