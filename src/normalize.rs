//! Raw values → canonical `(name, value)` list in declaration order.
use indexmap::IndexMap;

use crate::ir::{EnumValue, NormalizedValue, RawValue, RawValues};

/// Normalize without judging. Callers that need the invariants (one kind,
/// unique names, single characters) run [`crate::validate`] instead, which
/// calls this after its raw checks.
///
/// - Bare names get their 0-based position as value, in input order.
///   A repeated name collapses to its last index (kept at the position of its
///   first occurrence); the validator rejects that case before we get here.
/// - Mappings pass values through and come out sorted by value, so the output
///   does not depend on how the caller ordered the object keys.
/// - Text values that are not exactly one character are dropped here; they
///   only appear in unvalidated input.
pub fn normalize_values(raw: &RawValues) -> Vec<NormalizedValue> {
    match raw {
        RawValues::Names(names) => {
            let mut positions = IndexMap::<&str, usize>::with_capacity(names.len());
            for (index, name) in names.iter().enumerate() {
                positions.insert(name.as_str(), index);
            }
            positions
                .into_iter()
                .map(|(name, index)| NormalizedValue::new(name, EnumValue::Integer(index as i128)))
                .collect()
        }
        RawValues::Mapping(pairs) => {
            let mut out: Vec<NormalizedValue> = pairs
                .iter()
                .filter_map(|(name, value)| Some(NormalizedValue::new(name.clone(), to_enum_value(value)?)))
                .collect();
            // ties only happen on duplicate values, which validation rejects;
            // name as tie-breaker keeps the output stable regardless
            out.sort_by(|a, b| a.value.cmp(&b.value).then_with(|| a.name.cmp(&b.name)));
            out
        }
    }
}

pub(crate) fn to_enum_value(value: &RawValue) -> Option<EnumValue> {
    match value {
        RawValue::Integer(i) => Some(EnumValue::Integer(*i)),
        RawValue::Text(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(EnumValue::Char(c)),
                _ => None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(xs: &[&str]) -> RawValues {
        RawValues::Names(xs.iter().map(|s| s.to_string()).collect())
    }

    fn pairs(values: &[NormalizedValue]) -> Vec<(&str, EnumValue)> {
        values.iter().map(|v| (v.name.as_str(), v.value)).collect()
    }

    #[test]
    fn bare_names_get_positions() {
        let out = normalize_values(&names(&["RED", "GREEN", "BLUE"]));
        assert_eq!(pairs(&out), vec![
            ("RED", EnumValue::Integer(0)),
            ("GREEN", EnumValue::Integer(1)),
            ("BLUE", EnumValue::Integer(2)),
        ]);
    }

    #[test]
    fn repeated_bare_name_takes_last_index() {
        let out = normalize_values(&names(&["A", "B", "A"]));
        assert_eq!(pairs(&out), vec![
            ("A", EnumValue::Integer(2)),
            ("B", EnumValue::Integer(1)),
        ]);
    }

    #[test]
    fn mapping_sorted_by_value_not_insertion() {
        let raw = RawValues::Mapping(vec![
            ("HIGH".into(), RawValue::Integer(10)),
            ("NEG".into(), RawValue::Integer(-3)),
            ("LOW".into(), RawValue::Integer(1)),
        ]);
        let out = normalize_values(&raw);
        assert_eq!(pairs(&out), vec![
            ("NEG", EnumValue::Integer(-3)),
            ("LOW", EnumValue::Integer(1)),
            ("HIGH", EnumValue::Integer(10)),
        ]);
    }

    #[test]
    fn char_mapping_sorted_by_code_point() {
        let raw = RawValues::Mapping(vec![
            ("Z".into(), RawValue::Text("z".into())),
            ("A".into(), RawValue::Text("a".into())),
        ]);
        let out = normalize_values(&raw);
        assert_eq!(pairs(&out), vec![
            ("A", EnumValue::Char('a')),
            ("Z", EnumValue::Char('z')),
        ]);
    }
}
