//! Lookup tables derived from a validated definition.
//!
//! Two views of the same values:
//! - declaration order (ascending value) drives the constant list and the
//!   value→name switch;
//! - name order (byte-wise ascending) becomes the static sorted array the
//!   generated code binary-searches for name→value.
//!
//! [`name_less`] is the only ordering used for names. The generated source
//! compares with `std::strcmp(..) < 0`, which orders the same bytes the same
//! way, so the array we emit is sorted under the predicate that searches it.
use std::cmp::Ordering;

use crate::ir::{EnumValue, NormalizedValue};
use crate::validate::ValidatedEnum;

#[derive(Debug, Clone)]
pub struct LookupTables<'a> {
    pub declaration: &'a [NormalizedValue],
    pub by_name: Vec<&'a NormalizedValue>,
}

pub fn name_less(lhs: &str, rhs: &str) -> bool {
    lhs.as_bytes() < rhs.as_bytes()
}

fn name_order(lhs: &str, rhs: &str) -> Ordering {
    if name_less(lhs, rhs) {
        Ordering::Less
    } else if name_less(rhs, lhs) {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

impl<'a> LookupTables<'a> {
    pub fn build(validated: &'a ValidatedEnum<'_>) -> Self {
        Self::from_declaration(&validated.values)
    }

    /// `declaration` must already be in ascending value order with unique names.
    pub fn from_declaration(declaration: &'a [NormalizedValue]) -> Self {
        let mut by_name: Vec<&NormalizedValue> = declaration.iter().collect();
        by_name.sort_by(|a, b| name_order(&a.name, &b.name));
        Self { declaration, by_name }
    }

    pub fn len(&self) -> usize {
        self.declaration.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declaration.is_empty()
    }

    /// Same lower-bound search the generated `name_to_value` performs.
    pub fn find_by_name(&self, name: &str) -> Option<&'a NormalizedValue> {
        let index = self.by_name.partition_point(|entry| name_less(&entry.name, name));
        match self.by_name.get(index) {
            Some(entry) if !name_less(name, &entry.name) => Some(*entry),
            _ => None,
        }
    }

    /// Mirror of the generated value→name switch.
    pub fn name_of(&self, value: EnumValue) -> Option<&'a str> {
        let declaration = self.declaration;
        declaration
            .binary_search_by(|entry| entry.value.cmp(&value))
            .ok()
            .map(|i| declaration[i].name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{EnumDefinition, RawValue};
    use crate::validate::validate;

    fn colors() -> EnumDefinition {
        EnumDefinition::new("Color").with_names(["RED", "GREEN", "BLUE", "Amber", "_x"])
    }

    #[test]
    fn name_order_is_bytewise() {
        let def = colors();
        let ok = validate(&def).unwrap();
        let tables = LookupTables::build(&ok);
        let names: Vec<_> = tables.by_name.iter().map(|v| v.name.as_str()).collect();
        // uppercase sorts before lowercase, '_' (0x5f) between them
        assert_eq!(names, vec!["Amber", "BLUE", "GREEN", "RED", "_x"]);
    }

    #[test]
    fn name_table_is_permutation_of_declaration() {
        let def = colors();
        let ok = validate(&def).unwrap();
        let tables = LookupTables::build(&ok);
        assert_eq!(tables.by_name.len(), tables.declaration.len());
        assert_eq!(tables.len(), ok.values.len());
        for v in tables.declaration {
            assert!(tables.by_name.iter().any(|w| std::ptr::eq(*w, v)));
        }
    }

    #[test]
    fn round_trips_both_ways() {
        let def = EnumDefinition::new("Level").with_mapping([
            ("HIGH", RawValue::Integer(10)),
            ("LOW", RawValue::Integer(1)),
            ("MID", RawValue::Integer(5)),
        ]);
        let ok = validate(&def).unwrap();
        let tables = LookupTables::build(&ok);
        for v in tables.declaration {
            let name = tables.name_of(v.value).unwrap();
            assert_eq!(tables.find_by_name(name).unwrap().value, v.value);
            assert_eq!(tables.name_of(tables.find_by_name(&v.name).unwrap().value), Some(v.name.as_str()));
        }
    }

    #[test]
    fn unknown_names_miss() {
        let def = colors();
        let ok = validate(&def).unwrap();
        let tables = LookupTables::build(&ok);
        assert!(tables.find_by_name("PURPLE").is_none());
        assert!(tables.find_by_name("").is_none());
        assert!(tables.find_by_name("RE").is_none());
        assert!(tables.find_by_name("REDD").is_none());
        assert_eq!(tables.find_by_name("GREEN").unwrap().value, EnumValue::Integer(1));
    }
}
