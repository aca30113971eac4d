//! Taxonomy walker.
//!
//! Discovers every independent classification path an element's tags support.
//! Each outer round starts at the taxonomy root and looks for the first tag
//! whose *key* is a root child; then the path is extended one level at a time,
//! preferring a tag whose *value* is a child of the deepest node and falling
//! back to a tag whose key is (`area=yes` under `highway-pedestrian`).
//!
//! ```text
//! highway=pedestrian  area=yes  name=Market Sq
//!
//! root ──key──▶ highway ──value──▶ pedestrian ──key──▶ area
//!                 (same tag)                      (area=yes)
//! ```
//!
//! Every tag that extends a path is marked skipped for the rest of the walk,
//! so two paths never share a tag. Skipping is local to the walk: the tags are
//! not consumed and later passes still see them. Keys containing `name` never
//! take part.

use tracing::{debug, trace};

use crate::taxonomy::{Classificator, NodeRef};
use crate::type_code::TypeCode;
use crate::{Tag, ignore_tag, need_match_value};

/// One complete path found by the walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DiscoveredPath {
    pub code: TypeCode,
    pub visible: bool,
}

pub(crate) struct TaxonomyWalker<'t, 'e> {
    taxonomy: &'t Classificator,
    tags: &'e [Tag],
    /// Tag positions already used by (or excluded from) a path.
    skipped: Vec<bool>,
}

impl<'t, 'e> TaxonomyWalker<'t, 'e> {
    pub(crate) fn new(taxonomy: &'t Classificator, tags: &'e [Tag]) -> Self {
        TaxonomyWalker { taxonomy, tags, skipped: vec![false; tags.len()] }
    }

    /// Feed candidate tags to `matcher` in order until it returns `Some`; the
    /// matching tag is marked skipped.
    fn next_match<R>(&mut self, mut matcher: impl FnMut(&Tag) -> Option<R>) -> Option<R> {
        for (pos, tag) in self.tags.iter().enumerate() {
            if self.skipped[pos] || ignore_tag(tag) {
                continue;
            }
            if tag.key.contains("name") {
                self.skipped[pos] = true;
                continue;
            }
            if let Some(found) = matcher(tag) {
                self.skipped[pos] = true;
                return Some(found);
            }
        }
        None
    }

    /// Find the next root match and extend it as deep as the tags allow.
    pub(crate) fn next_path(&mut self) -> Option<Vec<NodeRef<'t>>> {
        let root = self.taxonomy.root();
        let (key_node, value_node) = self.next_match(|tag| match_key(root, tag))?;

        let mut path = vec![key_node];
        path.extend(value_node);
        let mut current = value_node.unwrap_or(key_node);

        loop {
            if let Some(node) = self.next_match(|tag| match_value(current, tag)) {
                path.push(node);
                current = node;
                continue;
            }

            match self.next_match(|tag| match_key(current, tag)) {
                Some((key_node, value_node)) => {
                    path.push(key_node);
                    path.extend(value_node);
                    current = value_node.unwrap_or(key_node);
                }
                None => break,
            }
        }

        trace!(path = ?path.iter().map(|n| n.label()).collect::<Vec<_>>(), "path complete");
        Some(path)
    }
}

impl<'t> Iterator for TaxonomyWalker<'t, '_> {
    type Item = Vec<NodeRef<'t>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_path()
    }
}

/// Match the tag key against a child of `current`, then try the value one
/// level further down.
fn match_key<'t>(current: NodeRef<'t>, tag: &Tag) -> Option<(NodeRef<'t>, Option<NodeRef<'t>>)> {
    let key_node = current.find_child(&tag.key)?;
    let value_node = if need_match_value(tag) { key_node.find_child(&tag.value) } else { None };
    Some((key_node, value_node))
}

fn match_value<'t>(current: NodeRef<'t>, tag: &Tag) -> Option<NodeRef<'t>> {
    if !need_match_value(tag) {
        return None;
    }
    current.find_child(&tag.value)
}

pub(crate) fn encode_path(path: &[NodeRef<'_>]) -> TypeCode {
    TypeCode::from_indices(path.iter().map(|node| node.index()))
}

/// Walk `tags` to exhaustion and report every path with its visibility.
pub(crate) fn discover_paths(taxonomy: &Classificator, tags: &[Tag]) -> Vec<DiscoveredPath> {
    TaxonomyWalker::new(taxonomy, tags)
        .map(|path| {
            let code = encode_path(&path);
            let visible = taxonomy.is_visible(code);
            debug!(code = %code, path = %taxonomy.readable(code), visible, "classification path");
            DiscoveredPath { code, visible }
        })
        .collect()
}
