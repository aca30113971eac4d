#[macro_use]
mod macros;
mod api;
mod engine;
mod params;
mod rules;
mod taxonomy;
mod type_code;

pub use api::{
    ClassifyDetails, ClassifyResultVerbose, Options, PathTrace, classify, classify_verbose_with, classify_with,
    classify_with_metadata, default_classificator,
};
pub use engine::{Classifier, Rounds, StageTimings};
pub use params::{FeatureParams, MetadataProcessor, NoMetadata};
pub use taxonomy::{Classificator, ClassificatorBuilder, NodeRef, TaxonomyError};
pub use type_code::{MAX_LEVELS, TypeCode};

// --- Tags -------------------------------------------------------------------

/// One key/value attribute of an input element.
///
/// A tag can be *consumed*: its key and value are cleared and it is flagged so
/// that no later pass over the same element sees it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
    consumed: bool,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Tag { key: key.into(), value: value.into(), consumed: false }
    }

    /// Permanently void this tag for the rest of the classification call.
    pub fn consume(&mut self) {
        self.key.clear();
        self.value.clear();
        self.consumed = true;
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// True when the tag can still be seen by a pass: not consumed and with a
    /// non-empty key.
    pub fn is_live(&self) -> bool {
        !self.consumed && !self.key.is_empty()
    }
}

/// A raw map element: an opaque identity plus its ordered tag list.
///
/// The engine mutates the tags in place (consumption, relabeling, synthetic
/// `layer` tags) and never reorders them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsmElement {
    pub id: u64,
    pub tags: Vec<Tag>,
}

impl OsmElement {
    pub fn new(id: u64) -> Self {
        OsmElement { id, tags: Vec::new() }
    }

    /// Build an element from `(key, value)` pairs, keeping their order.
    pub fn from_pairs<K, V>(id: u64, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        OsmElement { id, tags: pairs.into_iter().map(|(k, v)| Tag::new(k, v)).collect() }
    }

    pub fn add_tag(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags.push(Tag::new(key, value));
    }

    /// Value of the first live tag with `key`.
    pub fn tag_value(&self, key: &str) -> Option<&str> {
        self.tags.iter().find(|t| t.is_live() && t.key == key).map(|t| t.value.as_str())
    }
}

// --- Tag predicates ---------------------------------------------------------

/// Values treated as an explicit "no" by the `!` / `~` value patterns.
pub(crate) fn is_negative(value: &str) -> bool {
    matches!(value, "no" | "none" | "false")
}

/// Whether a tag is invisible to the name extractor, the taxonomy walker and
/// the metadata hand-off.
///
/// `description`, `cycleway`, `proposed` and `construction` would otherwise
/// classify as the thing they only describe (`highway=primary` +
/// `proposed=primary` is not a built primary road). `layer` and `oneway` are
/// kept whatever their polarity.
pub(crate) fn ignore_tag(tag: &Tag) -> bool {
    if !tag.is_live() {
        return true;
    }

    match tag.key.as_str() {
        "description" | "cycleway" | "proposed" | "construction" => return true,
        "layer" | "oneway" => return false,
        _ => {}
    }

    matches!(tag.value.as_str(), "no" | "false" | "-1")
}

/// Numeric values only take part in taxonomy matching for keys where the
/// number is the category itself (`admin_level=4`, `capital=2`).
pub(crate) fn need_match_value(tag: &Tag) -> bool {
    let is_number = tag.value.parse::<i64>().is_ok();
    !is_number || matches!(tag.key.as_str(), "admin_level" | "capital")
}

// --- Tag rules --------------------------------------------------------------

/// Value side of a tag rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValuePattern {
    /// `*`: any value.
    Any,
    /// `!`: only explicit negatives (`no`, `none`, `false`).
    Negative,
    /// `~`: anything that is not an explicit negative.
    Positive,
    /// Exact, case-sensitive match.
    Exact(&'static str),
}

impl ValuePattern {
    pub(crate) fn parse(pattern: &'static str) -> Self {
        match pattern {
            "*" => ValuePattern::Any,
            "!" => ValuePattern::Negative,
            "~" => ValuePattern::Positive,
            literal => ValuePattern::Exact(literal),
        }
    }

    pub(crate) fn matches(&self, value: &str) -> bool {
        match self {
            ValuePattern::Any => true,
            ValuePattern::Negative => is_negative(value),
            ValuePattern::Positive => !is_negative(value),
            ValuePattern::Exact(literal) => value == *literal,
        }
    }
}

/// Action run when a rule fires. It receives the table's context and the
/// matched tag, which it may rewrite or consume in place.
pub(crate) type Effect<C> = fn(&mut C, &mut Tag);

/// A declarative tag rule: exact key, value pattern and effect.
///
/// Rules are built with the `tag_rule!` macro and grouped in tables under
/// `src/rules/**`.
pub(crate) struct TagRule<C> {
    pub key: &'static str,
    pub value: ValuePattern,
    pub effect: Effect<C>,
}

impl<C> TagRule<C> {
    pub(crate) fn matches(&self, tag: &Tag) -> bool {
        tag.is_live() && tag.key == self.key && self.value.matches(&tag.value)
    }
}

impl<C> std::fmt::Debug for TagRule<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagRule")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("effect", &"<function>")
            .finish()
    }
}
