//! Classification engine.
//!
//! This module is the entry point the public API drives. It is split into
//! focused submodules under `src/engine/`, each owning one stage of the
//! per-element pipeline.
//!
//! ## How the parts work together
//!
//! ```text
//! OsmElement.tags ──┐
//!                   │  layer probe + synthetic layer      (classifier.rs)
//!                   v
//!            extract_names                                (names.rs)
//!              - tokenized name keys, NFKC, first wins
//!                   │
//!                   v
//!            apply_rules(base table)                      (tag_rules.rs)
//!              - relabel atm/restaurant/hotel
//!              - addr:*, population, ref, layer
//!                   │
//!                   v
//!            discover_paths                               (walker.rs)
//!              - root key match, value/key extension
//!              - encode + visibility filter
//!                   │
//!                   v
//!            address fix-up, apply_qualifiers             (post_match.rs)
//!              - highway / subway / station rounds
//!                   │
//!                   v
//!            finish_adding_types ─▶ MetadataProcessor ─▶ FeatureParams
//! ```
//!
//! Tags are consumed in place as they are used: a consumed tag is invisible to
//! every later stage. The walker is the exception and only skips tags for the
//! duration of its own walk, so the qualifier rounds still see `oneway`,
//! `network` and friends.
//!
//! ## Responsibilities by module
//!
//! - `tag_rules.rs`: evaluates `TagRule` tables (all hits, or first hit).
//! - `names.rs`: name-key tokenization and name extraction.
//! - `walker.rs`: the taxonomy walk and path encoding.
//! - `post_match.rs`: category-gated qualifier rounds and the type filter.
//! - `classifier.rs`: orders the stages for one element.
//! - `metrics.rs`: per-stage timings and the run trace.
//!
//! ## Adding new rules
//!
//! Rule tables live under `src/rules/**`. A new preprocessing attribute goes in
//! `rules::tagging::rules::base`; a new qualifier category needs a `Rounds`
//! bit, a cached category code in `CachedTypes` and a gate in
//! `apply_qualifiers`.
//!
//! ## Debugging
//!
//! Every stage emits `tracing` events; the CLI shows them with
//! `OSMTYPE_LOG=osmtype=debug` (or `trace` for individual rule hits).

#[path = "engine/classifier.rs"]
mod classifier;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/names.rs"]
mod names;
#[path = "engine/post_match.rs"]
mod post_match;
#[path = "engine/tag_rules.rs"]
mod tag_rules;
#[path = "engine/walker.rs"]
mod walker;

pub use classifier::Classifier;
pub use metrics::StageTimings;
pub use post_match::Rounds;
#[cfg(test)]
pub(crate) use tag_rules::{apply_first_rule, apply_rules};
