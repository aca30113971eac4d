//! Name extraction.
//!
//! Name-like keys are tokenized on tab, space and colon:
//!
//! ```text
//! name          -> default
//! name:en       -> en
//! name:ar1      -> ar
//! int_name      -> int_name
//! old_name, ... -> not a name
//! ```
//!
//! Values are NFKC-normalized before storage so search matching later sees one
//! canonical spelling. Every name tag is consumed, including duplicates of a
//! language that already has a name (those values are dropped).

use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use crate::{FeatureParams, Tag, ignore_tag};

/// Language slot a tag key stores its name under, if it is a name key.
pub(crate) fn lang_for_key(key: &str) -> Option<&str> {
    let mut tokens = key.split(['\t', ' ', ':']).filter(|t| !t.is_empty());
    match tokens.next()? {
        "int_name" => Some("int_name"),
        "name" => Some(match tokens.next() {
            None => "default",
            Some("ar1") => "ar",
            Some(lang) => lang,
        }),
        _ => None,
    }
}

/// Move every name tag into `params`. Returns how many names were stored.
pub(crate) fn extract_names(tags: &mut [Tag], params: &mut FeatureParams) -> usize {
    let mut stored = 0;
    for tag in tags.iter_mut() {
        if ignore_tag(tag) || tag.value.is_empty() {
            continue;
        }
        let Some(lang) = lang_for_key(&tag.key) else {
            continue;
        };

        let name: String = tag.value.nfkc().collect();
        if params.add_name(lang, &name) {
            stored += 1;
        } else {
            debug!(lang, discarded = %name, "duplicate name for language");
        }
        tag.consume();
    }
    stored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(pairs: &[(&str, &str)]) -> (Vec<Tag>, FeatureParams) {
        let mut tags: Vec<Tag> = pairs.iter().map(|(k, v)| Tag::new(*k, *v)).collect();
        let mut params = FeatureParams::new();
        extract_names(&mut tags, &mut params);
        (tags, params)
    }

    #[test]
    fn language_keys() {
        assert_eq!(lang_for_key("name"), Some("default"));
        assert_eq!(lang_for_key("name:"), Some("default"));
        assert_eq!(lang_for_key("name:en"), Some("en"));
        assert_eq!(lang_for_key("name:ar1"), Some("ar"));
        assert_eq!(lang_for_key("name zh"), Some("zh"));
        assert_eq!(lang_for_key("int_name"), Some("int_name"));
        assert_eq!(lang_for_key("old_name"), None);
        assert_eq!(lang_for_key("name_1"), None);
        assert_eq!(lang_for_key(""), None);
    }

    #[test]
    fn first_name_per_language_wins_and_all_are_consumed() {
        let (tags, params) = run(&[("name:en", "Foo"), ("name:en", "Bar"), ("name", "Main St")]);
        assert_eq!(params.name("en"), Some("Foo"));
        assert_eq!(params.name("default"), Some("Main St"));
        assert_eq!(params.names().len(), 2);
        assert!(tags.iter().all(Tag::is_consumed));
    }

    #[test]
    fn values_are_nfkc_normalized() {
        // "e" + combining acute, and a full-width "Ａ".
        let (_, params) = run(&[("name", "Caf\u{0065}\u{0301}"), ("name:ja", "\u{FF21}")]);
        assert_eq!(params.name("default"), Some("Caf\u{00E9}"));
        assert_eq!(params.name("ja"), Some("A"));
    }

    #[test]
    fn non_names_and_empty_values_are_left_alone() {
        let (tags, params) = run(&[("old_name", "Old"), ("name:de", ""), ("highway", "primary")]);
        assert!(params.names().is_empty());
        assert!(tags.iter().all(Tag::is_live));
    }
}
