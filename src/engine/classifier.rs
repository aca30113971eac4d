//! Per-element classification pipeline.
//!
//! ```text
//! layer probe ─▶ names ─▶ base rules ─▶ walk ─▶ address fix-up ─▶ qualifiers
//!   (bridge/      (NFKC,    (relabel,     (paths,                  (gated
//!    tunnel)      consume)   addr, rank)   visibility)              rounds)
//!                                                           │
//!                                   finish_adding_types ◀───┘ ─▶ metadata
//! ```
//!
//! The order matters: names must be gone before the walk (name keys never
//! classify), relabeling must happen before the walk (`atm=yes` classifies as
//! `amenity-atm`), and the qualifier rounds look at the walk's types.

use std::time::Instant;

use once_cell::sync::Lazy;
use tracing::debug;

use super::metrics::{RunResult, StageTimings};
use super::names::extract_names;
use super::post_match::{CachedTypes, TypeFilter, apply_qualifiers};
use super::tag_rules::apply_rules;
use super::walker::discover_paths;
use crate::rules::tagging::rules::{self as tagging_rules, LayerProbe};
use crate::taxonomy::Classificator;
use crate::{FeatureParams, MetadataProcessor, NoMetadata, Options, OsmElement, TagRule, ignore_tag};

static LAYER_PROBE_RULES: Lazy<Vec<TagRule<LayerProbe>>> = Lazy::new(tagging_rules::layer_probe);
static BASE_RULES: Lazy<Vec<TagRule<FeatureParams>>> = Lazy::new(tagging_rules::base);

/// Classifies elements against one taxonomy.
///
/// Holds only shared, read-only state, so one classifier can serve many
/// threads; every call owns its element and output record.
///
/// ```text
/// Classifier::new(taxonomy, options) ──▶ run(element) ──▶ FeatureParams
/// ```
#[derive(Debug)]
pub struct Classifier<'t> {
    taxonomy: &'t Classificator,
    options: Options,
    types: CachedTypes,
}

impl<'t> Classifier<'t> {
    pub fn new(taxonomy: &'t Classificator, options: &Options) -> Self {
        Classifier { taxonomy, options: options.clone(), types: CachedTypes::new(taxonomy) }
    }

    fn filter(&self) -> TypeFilter<'t> {
        TypeFilter { taxonomy: self.taxonomy, enforce_visibility: self.options.visibility_filter }
    }

    /// Classify `element` and return the output record with the run trace.
    pub(crate) fn run_with_metrics(
        &self,
        element: &mut OsmElement,
        metadata: &mut dyn MetadataProcessor,
    ) -> RunResult {
        let total_start = Instant::now();
        let mut timings = StageTimings::default();
        let mut params = FeatureParams::new();

        let stage = Instant::now();
        let mut probe = LayerProbe::default();
        apply_rules(&mut element.tags, LAYER_PROBE_RULES.as_slice(), &mut probe);
        if let (false, Some(layer)) = (probe.has_layer, probe.synthetic) {
            element.add_tag("layer", layer);
        }
        timings.preprocess = stage.elapsed();

        let stage = Instant::now();
        extract_names(&mut element.tags, &mut params);
        timings.names = stage.elapsed();

        let stage = Instant::now();
        apply_rules(&mut element.tags, BASE_RULES.as_slice(), &mut params);
        timings.preprocess += stage.elapsed();

        let stage = Instant::now();
        let filter = self.filter();
        let paths = discover_paths(self.taxonomy, &element.tags);
        for path in &paths {
            if filter.admits(path.code) {
                params.add_type(path.code);
            }
        }
        timings.walk = stage.elapsed();

        let stage = Instant::now();
        let address_fixup = self.options.address_fixup && self.fix_address(&mut params);
        let rounds = apply_qualifiers(&mut element.tags, &mut params, &self.types, filter);
        params.finish_adding_types();
        timings.post_match = stage.elapsed();

        for tag in &element.tags {
            if !ignore_tag(tag) && metadata.process(tag, &mut params) {
                break;
            }
        }

        timings.total = total_start.elapsed();
        RunResult { params, paths, rounds, address_fixup, timings }
    }

    /// Classify `element`, discarding the run trace.
    pub fn run(&self, element: &mut OsmElement) -> FeatureParams {
        self.run_with_metrics(element, &mut NoMetadata).params
    }

    /// An addressed feature tagged as a bare entrance is really an address
    /// point: drop the entrance type and its name, add the address type.
    fn fix_address(&self, params: &mut FeatureParams) -> bool {
        if !params.has_house() {
            return false;
        }
        let Some(entrance) = self.types.entrance else {
            return false;
        };
        if !params.pop_exact_type(entrance) {
            return false;
        }

        params.clear_names();
        if let Some(address) = self.types.address {
            self.filter().add(params, address);
        }
        debug!(
            house_number = ?params.house_number(),
            house_name = ?params.house_name(),
            "entrance replaced by address"
        );
        true
    }
}
