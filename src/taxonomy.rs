//! Read-only classification taxonomy.
//!
//! The taxonomy is a tree of labels: first-level nodes are tag keys
//! (`highway`, `railway`), deeper nodes are tag values or further keys
//! (`highway/residential`, `railway/station/subway`). It is built once through
//! [`ClassificatorBuilder`] and then frozen into an arena, so it can be shared
//! by reference across threads with no locking.
//!
//! Layout of the frozen arena:
//!
//! ```text
//! nodes: [world | amenity building highway ... | atm cafe ... | ...]
//!          0      └── world.children ──────┘
//! ```
//!
//! Children of one node are contiguous and sorted by label, so child lookup is
//! a binary search and a node's ordinal index is its position in that run.

use std::collections::{BTreeMap, VecDeque};
use std::ops::Range;

use thiserror::Error;

use crate::type_code::{MAX_INDEX, MAX_LEVELS, TypeCode};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaxonomyError {
    #[error("empty classification path")]
    EmptyPath,
    #[error("empty label in classification path {0:?}")]
    EmptyLabel(Vec<String>),
    #[error("classification path {0:?} is deeper than {max} levels", max = MAX_LEVELS)]
    TooDeep(Vec<String>),
    #[error("node {parent:?} has more than {max} children", max = MAX_INDEX as usize + 1)]
    TooManyChildren { parent: String },
}

#[derive(Debug, Default)]
struct BuilderNode {
    visible: bool,
    children: BTreeMap<String, BuilderNode>,
}

/// Mutable taxonomy under construction.
#[derive(Debug, Default)]
pub struct ClassificatorBuilder {
    root: BuilderNode,
}

impl ClassificatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a drawable classification path. Missing ancestors are created
    /// hidden unless they are added themselves.
    pub fn add_path(&mut self, path: &[&str]) -> Result<&mut Self, TaxonomyError> {
        self.insert(path, true)?;
        Ok(self)
    }

    /// Add a path whose leaf fails the visibility predicate.
    pub fn add_hidden_path(&mut self, path: &[&str]) -> Result<&mut Self, TaxonomyError> {
        self.insert(path, false)?;
        Ok(self)
    }

    fn insert(&mut self, path: &[&str], visible: bool) -> Result<(), TaxonomyError> {
        let owned = || path.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        if path.is_empty() {
            return Err(TaxonomyError::EmptyPath);
        }
        if path.len() > MAX_LEVELS {
            return Err(TaxonomyError::TooDeep(owned()));
        }
        if path.iter().any(|label| label.is_empty()) {
            return Err(TaxonomyError::EmptyLabel(owned()));
        }

        let mut node = &mut self.root;
        let mut parent = "world";
        for label in path {
            if !node.children.contains_key(*label) && node.children.len() > MAX_INDEX as usize {
                return Err(TaxonomyError::TooManyChildren { parent: parent.to_string() });
            }
            node = node.children.entry(label.to_string()).or_default();
            parent = *label;
        }
        node.visible |= visible;
        Ok(())
    }

    /// Freeze the tree into its arena form.
    pub fn build(self) -> Classificator {
        let mut nodes = vec![ClassifNode { label: "world".to_string(), index: 0, visible: false, children: 0..0 }];
        let mut queue = VecDeque::from([(0usize, self.root)]);

        while let Some((id, node)) = queue.pop_front() {
            let start = nodes.len();
            for (index, (label, child)) in node.children.into_iter().enumerate() {
                nodes.push(ClassifNode { label, index: index as u8, visible: child.visible, children: 0..0 });
                queue.push_back((start + index, child));
            }
            nodes[id].children = start..nodes.len();
        }

        Classificator { nodes }
    }
}

#[derive(Debug, Clone)]
struct ClassifNode {
    label: String,
    index: u8,
    visible: bool,
    children: Range<usize>,
}

/// Frozen classification tree.
#[derive(Debug, Clone)]
pub struct Classificator {
    nodes: Vec<ClassifNode>,
}

/// Cheap handle to one node of a [`Classificator`].
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a Classificator,
    id: usize,
}

impl<'a> NodeRef<'a> {
    fn node(self) -> &'a ClassifNode {
        &self.tree.nodes[self.id]
    }

    pub fn label(self) -> &'a str {
        &self.node().label
    }

    /// Ordinal of this node among its siblings.
    pub fn index(self) -> u8 {
        self.node().index
    }

    /// Exact-match child lookup.
    pub fn find_child(self, label: &str) -> Option<NodeRef<'a>> {
        let range = self.node().children.clone();
        let siblings = &self.tree.nodes[range.clone()];
        siblings
            .binary_search_by(|n| n.label.as_str().cmp(label))
            .ok()
            .map(|offset| NodeRef { tree: self.tree, id: range.start + offset })
    }

    fn child_at(self, index: u8) -> Option<NodeRef<'a>> {
        let range = self.node().children.clone();
        let id = range.start + index as usize;
        range.contains(&id).then_some(NodeRef { tree: self.tree, id })
    }

    pub fn children(self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        self.node().children.clone().map(move |id| NodeRef { tree, id })
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef").field("label", &self.label()).field("index", &self.index()).finish()
    }
}

impl Classificator {
    pub fn builder() -> ClassificatorBuilder {
        ClassificatorBuilder::new()
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef { tree: self, id: 0 }
    }

    /// Canonical code of a label path, if every label exists.
    pub fn type_by_path(&self, path: &[&str]) -> Option<TypeCode> {
        let mut node = self.root();
        let mut code = TypeCode::EMPTY;
        for label in path {
            node = node.find_child(label)?;
            code.push(node.index());
        }
        (!code.is_empty()).then_some(code)
    }

    fn node_by_code(&self, code: TypeCode) -> Option<NodeRef<'_>> {
        if code.is_empty() {
            return None;
        }
        code.indices().try_fold(self.root(), |node, index| node.child_at(index))
    }

    /// Visibility predicate: the code resolves to a node marked drawable.
    pub fn is_visible(&self, code: TypeCode) -> bool {
        self.node_by_code(code).is_some_and(|node| node.node().visible)
    }

    /// Decode a code back into its label path.
    pub fn path_of(&self, code: TypeCode) -> Option<Vec<&str>> {
        if code.is_empty() {
            return None;
        }
        let mut node = self.root();
        let mut labels = Vec::with_capacity(code.depth());
        for index in code.indices() {
            node = node.child_at(index)?;
            labels.push(node.label());
        }
        Some(labels)
    }

    /// Label path joined with `-`, or the raw code when it does not resolve.
    pub fn readable(&self, code: TypeCode) -> String {
        match self.path_of(code) {
            Some(labels) => labels.join("-"),
            None => code.to_string(),
        }
    }

    /// Built-in taxonomy covering the feature families the tag rules know
    /// about, plus a representative set of common map features.
    pub fn default_tree() -> Classificator {
        let mut builder = ClassificatorBuilder::new();
        for path in DEFAULT_PATHS.iter() {
            builder.add_path(path).expect("built-in classification paths are well-formed");
        }
        for path in DEFAULT_HIDDEN_PATHS {
            builder.add_hidden_path(path).expect("built-in classification paths are well-formed");
        }
        builder.build()
    }
}

/// Categories the taxonomy knows but never draws.
const DEFAULT_HIDDEN_PATHS: &[&[&str]] =
    &[&["highway", "construction"], &["highway", "proposed"], &["railway", "abandoned"], &["railway", "construction"]];

const SUBWAY_CITIES: &[&str] =
    &["barcelona", "berlin", "kiev", "london", "madrid", "minsk", "moscow", "newyork", "paris", "roma", "spb"];

static DEFAULT_PATHS: once_cell::sync::Lazy<Vec<Vec<&'static str>>> = once_cell::sync::Lazy::new(|| {
    let mut paths: Vec<Vec<&'static str>> = Vec::new();
    let mut family = |key: &'static str, values: &[&'static str]| {
        for value in values {
            paths.push(vec![key, value]);
        }
    };

    family(
        "highway",
        &[
            "motorway",
            "trunk",
            "primary",
            "secondary",
            "tertiary",
            "unclassified",
            "residential",
            "living_street",
            "service",
            "track",
            "pedestrian",
            "footway",
            "cycleway",
            "path",
            "steps",
            "bus_stop",
        ],
    );
    family("hwtag", &["oneway", "private", "lit", "nofoot", "yesfoot"]);
    family("railway", &["station", "halt", "rail", "subway", "tram", "tram_stop", "subway_entrance"]);
    family(
        "amenity",
        &[
            "atm",
            "bank",
            "cafe",
            "fuel",
            "hospital",
            "parking",
            "pharmacy",
            "place_of_worship",
            "restaurant",
            "school",
            "toilets",
        ],
    );
    family("tourism", &["attraction", "hotel", "information", "museum", "viewpoint"]);
    family("place", &["city", "town", "village", "hamlet", "suburb", "locality"]);
    family("shop", &["bakery", "clothes", "convenience", "supermarket"]);
    family("leisure", &["park", "playground", "pitch"]);
    family("natural", &["water", "wood", "peak"]);
    family("waterway", &["river", "stream", "canal"]);
    family("landuse", &["forest", "residential", "industrial"]);
    family("building", &["address"]);

    paths.push(vec!["building"]);
    paths.push(vec!["entrance"]);
    paths.push(vec!["railway", "station", "subway"]);
    for city in SUBWAY_CITIES {
        paths.push(vec!["railway", "station", "subway", city]);
    }
    for road in ["motorway", "trunk", "primary", "secondary", "tertiary", "residential"] {
        paths.push(vec!["highway", road, "bridge"]);
        paths.push(vec!["highway", road, "tunnel"]);
    }
    paths.push(vec!["highway", "pedestrian", "area"]);
    // Walks may stop at the category node itself (`capital=yes`, a missing or
    // unusual `admin_level`), so it is drawable too.
    paths.push(vec!["place", "city", "capital"]);
    paths.push(vec!["place", "city", "capital", "2"]);
    paths.push(vec!["place", "city", "capital", "4"]);
    paths.push(vec!["boundary", "administrative"]);
    for level in ["2", "3", "4", "5", "6", "7", "8", "9", "10"] {
        paths.push(vec!["boundary", "administrative", level]);
    }
    paths
});

#[cfg(test)]
mod tests {
    use super::*;

    fn small_tree() -> Classificator {
        let mut builder = Classificator::builder();
        builder
            .add_path(&["highway", "residential"])
            .unwrap()
            .add_path(&["highway", "primary", "bridge"])
            .unwrap()
            .add_hidden_path(&["highway", "proposed"])
            .unwrap()
            .add_path(&["amenity", "cafe"])
            .unwrap();
        builder.build()
    }

    #[test]
    fn children_are_sorted_and_indexed() {
        let tree = small_tree();
        let labels: Vec<&str> = tree.root().children().map(|n| n.label()).collect();
        assert_eq!(labels, vec!["amenity", "highway"]);

        let highway = tree.root().find_child("highway").unwrap();
        assert_eq!(highway.index(), 1);
        let indices: Vec<(&str, u8)> = highway.children().map(|n| (n.label(), n.index())).collect();
        assert_eq!(indices, vec![("primary", 0), ("proposed", 1), ("residential", 2)]);
        assert!(highway.find_child("motorway").is_none());
    }

    #[test]
    fn canonical_codes_round_trip_to_paths() {
        let tree = small_tree();
        let code = tree.type_by_path(&["highway", "primary", "bridge"]).unwrap();
        assert_eq!(code.depth(), 3);
        assert_eq!(tree.path_of(code).unwrap(), vec!["highway", "primary", "bridge"]);
        assert_eq!(code.truncate(1), tree.type_by_path(&["highway"]).unwrap());
        assert_eq!(tree.readable(code), "highway-primary-bridge");
        assert!(tree.type_by_path(&["highway", "bogus"]).is_none());
        assert!(tree.type_by_path(&[]).is_none());
    }

    #[test]
    fn visibility_follows_added_leaves() {
        let tree = small_tree();
        let visible = |path: &[&str]| tree.is_visible(tree.type_by_path(path).unwrap());
        assert!(visible(&["highway", "residential"]));
        assert!(visible(&["highway", "primary", "bridge"]));
        assert!(!visible(&["highway", "primary"]));
        assert!(!visible(&["highway"]));
        assert!(!visible(&["highway", "proposed"]));
        assert!(!tree.is_visible(TypeCode::EMPTY));
        assert!(!tree.is_visible(TypeCode::from_indices([200])));
    }

    #[test]
    fn builder_rejects_malformed_paths() {
        let mut builder = Classificator::builder();
        assert_eq!(builder.add_path(&[]).unwrap_err(), TaxonomyError::EmptyPath);
        assert!(matches!(builder.add_path(&["a", "b", "c", "d", "e"]), Err(TaxonomyError::TooDeep(_))));
        assert!(matches!(builder.add_path(&["a", ""]), Err(TaxonomyError::EmptyLabel(_))));
    }

    #[test]
    fn builder_rejects_too_many_siblings() {
        let mut builder = Classificator::builder();
        let labels: Vec<String> = (0..=MAX_INDEX as usize).map(|i| format!("v{i}")).collect();
        for label in &labels {
            builder.add_path(&["key", label]).unwrap();
        }
        let err = builder.add_path(&["key", "one_more"]).unwrap_err();
        assert_eq!(err, TaxonomyError::TooManyChildren { parent: "key".to_string() });
    }

    #[test]
    fn default_tree_resolves_rule_categories() {
        let tree = Classificator::default_tree();
        for path in [
            &["entrance"][..],
            &["building", "address"],
            &["hwtag", "oneway"],
            &["hwtag", "yesfoot"],
            &["railway", "station"],
            &["railway", "station", "subway"],
            &["railway", "station", "subway", "london"],
            &["boundary", "administrative", "4"],
            &["boundary", "administrative", "10"],
            &["boundary", "administrative"],
            &["place", "city", "capital"],
        ] {
            let code = tree.type_by_path(path).unwrap_or_else(|| panic!("missing {path:?}"));
            assert!(tree.is_visible(code), "{path:?} should be drawable");
        }
        assert!(tree.type_by_path(&["highway"]).is_some());
        assert!(!tree.is_visible(tree.type_by_path(&["highway"]).unwrap()));
    }
}
