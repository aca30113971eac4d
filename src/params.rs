//! Per-element classification output.

use std::collections::BTreeMap;

use crate::Tag;
use crate::type_code::TypeCode;

/// Everything the engine derives from one element: its type codes, names per
/// language, address parts and a handful of scalar attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureParams {
    types: Vec<TypeCode>,
    names: BTreeMap<String, String>,
    house_name: Option<String>,
    house_number: Option<String>,
    /// Street from `addr:street`.
    pub street: Option<String>,
    /// Flat numbers from `addr:flats`.
    pub flats: Option<String>,
    /// Population rank, `floor(ln(population) / ln(1.1))`.
    pub rank: u8,
    /// Road/route number from `ref`.
    pub reference: Option<String>,
    /// Vertical layer, always within `[-10, 10]`.
    pub layer: i8,
    /// Set when a `oneway=-1` road must be drawn against its node order.
    pub reverse_geometry: bool,
    /// City label of the subway qualifier, if one was assigned.
    pub subway_city: Option<String>,
}

impl FeatureParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type code; returns false if it was already present.
    pub fn add_type(&mut self, code: TypeCode) -> bool {
        if self.types.contains(&code) {
            return false;
        }
        self.types.push(code);
        true
    }

    /// Remove exactly `code` (not its subtypes); returns whether it was present.
    pub fn pop_exact_type(&mut self, code: TypeCode) -> bool {
        let before = self.types.len();
        self.types.retain(|&t| t != code);
        before != self.types.len()
    }

    pub fn has_type(&self, code: TypeCode) -> bool {
        self.types.contains(&code)
    }

    /// Type codes in insertion order (sorted once finished).
    pub fn types(&self) -> &[TypeCode] {
        &self.types
    }

    /// Sort and dedup the type set.
    pub fn finish_adding_types(&mut self) {
        self.types.sort_unstable();
        self.types.dedup();
    }

    /// Store a name for `lang`; the first name stored for a language wins.
    pub fn add_name(&mut self, lang: &str, name: &str) -> bool {
        if self.names.contains_key(lang) {
            return false;
        }
        self.names.insert(lang.to_string(), name.to_string());
        true
    }

    pub fn name(&self, lang: &str) -> Option<&str> {
        self.names.get(lang).map(String::as_str)
    }

    pub fn names(&self) -> &BTreeMap<String, String> {
        &self.names
    }

    pub fn clear_names(&mut self) {
        self.names.clear();
    }

    pub fn house_name(&self) -> Option<&str> {
        self.house_name.as_deref()
    }

    pub fn house_number(&self) -> Option<&str> {
        self.house_number.as_deref()
    }

    /// True once a house name or a house number was recorded.
    pub fn has_house(&self) -> bool {
        self.house_name.is_some() || self.house_number.is_some()
    }

    pub fn add_house_name(&mut self, name: &str) {
        if self.house_name.is_none() && !name.is_empty() {
            self.house_name = Some(name.to_string());
        }
    }

    /// Store a structurally valid house number; returns false (storing
    /// nothing) when `number` does not look like one.
    pub fn add_house_number(&mut self, number: &str) -> bool {
        if !crate::rules::tagging::helpers::is_house_number(number) {
            return false;
        }
        self.house_number = Some(number.trim().to_string());
        true
    }
}

/// Receives the tags left over after classification (opening hours, cuisine,
/// stars, ...). Processing stops at the first tag for which it returns `true`.
pub trait MetadataProcessor {
    fn process(&mut self, tag: &Tag, params: &mut FeatureParams) -> bool;
}

/// Metadata processor that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMetadata;

impl MetadataProcessor for NoMetadata {
    fn process(&mut self, _tag: &Tag, _params: &mut FeatureParams) -> bool {
        false
    }
}

impl<F> MetadataProcessor for F
where
    F: FnMut(&Tag, &mut FeatureParams) -> bool,
{
    fn process(&mut self, tag: &Tag, params: &mut FeatureParams) -> bool {
        self(tag, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn types_are_unique() {
        let mut params = FeatureParams::new();
        let code = TypeCode::from_indices([1, 2]);
        assert!(params.add_type(code));
        assert!(!params.add_type(code));
        assert_eq!(params.types(), &[code]);
        assert!(params.pop_exact_type(code));
        assert!(!params.pop_exact_type(code));
        assert!(params.types().is_empty());
    }

    #[test]
    fn pop_exact_type_keeps_subtypes() {
        let mut params = FeatureParams::new();
        let parent = TypeCode::from_indices([1]);
        let child = TypeCode::from_indices([1, 0]);
        params.add_type(parent);
        params.add_type(child);
        params.pop_exact_type(parent);
        assert_eq!(params.types(), &[child]);
    }

    #[test]
    fn finish_sorts_types() {
        let mut params = FeatureParams::new();
        let a = TypeCode::from_indices([4]);
        let b = TypeCode::from_indices([2, 1]);
        params.add_type(a);
        params.add_type(b);
        params.finish_adding_types();
        assert_eq!(params.types(), &[b, a]);
    }

    #[test]
    fn first_name_per_language_wins() {
        let mut params = FeatureParams::new();
        assert!(params.add_name("en", "Foo"));
        assert!(!params.add_name("en", "Bar"));
        assert_eq!(params.name("en"), Some("Foo"));
        params.clear_names();
        assert!(params.names().is_empty());
    }

    #[test]
    fn house_number_validation() {
        let mut params = FeatureParams::new();
        assert!(!params.add_house_number("Rose Cottage"));
        assert!(params.house_number().is_none());
        assert!(params.add_house_number("12A"));
        assert_eq!(params.house_number(), Some("12A"));
        assert!(params.has_house());
    }
}
