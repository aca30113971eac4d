use crate::engine::{self, Rounds, StageTimings};
use crate::taxonomy::Classificator;
use crate::type_code::TypeCode;
use crate::{FeatureParams, MetadataProcessor, NoMetadata, OsmElement};
use once_cell::sync::Lazy;

static DEFAULT_CLASSIFICATOR: Lazy<Classificator> = Lazy::new(Classificator::default_tree);

/// The built-in taxonomy, built on first use and shared process-wide.
pub fn default_classificator() -> &'static Classificator {
    &DEFAULT_CLASSIFICATOR
}

/// Options that affect classification.
#[derive(Debug, Clone)]
pub struct Options {
    /// Replace an `entrance` type with `building-address` when the element
    /// carries a house name or number.
    pub address_fixup: bool,
    /// Drop types the taxonomy marks as not visible.
    ///
    /// Switching this off is meant for inspecting a taxonomy only: every path
    /// the walker finds is kept, so the output may then hold types that fail
    /// [`Classificator::is_visible`].
    pub visibility_filter: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options { address_fixup: true, visibility_filter: true }
    }
}

/// One path found by the taxonomy walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTrace {
    pub code: TypeCode,
    /// Node labels from the root match down.
    pub labels: Vec<String>,
    /// Whether the code passed the visibility predicate.
    pub visible: bool,
}

/// Additional details returned by [`classify_verbose_with`].
#[derive(Debug, Clone)]
pub struct ClassifyDetails {
    /// Every path the walker discovered, kept or not.
    pub paths: Vec<PathTrace>,
    /// Qualifier rounds that ran.
    pub rounds: Rounds,
    /// Whether an `entrance` type was replaced by the address type.
    pub address_fixup: bool,
    pub timings: StageTimings,
}

/// Result from [`classify_verbose_with`].
#[derive(Debug, Clone)]
pub struct ClassifyResultVerbose {
    pub params: FeatureParams,
    pub details: ClassifyDetails,
}

/// Classify `element` against the default taxonomy with default [`Options`].
///
/// # Example
/// ```
/// use osmtype::{OsmElement, classify, default_classificator};
///
/// let mut element = OsmElement::from_pairs(1, [("highway", "residential"), ("name", "Main St")]);
/// let params = classify(&mut element);
///
/// let tree = default_classificator();
/// assert!(params.has_type(tree.type_by_path(&["highway", "residential"]).unwrap()));
/// assert_eq!(params.name("default"), Some("Main St"));
/// ```
pub fn classify(element: &mut OsmElement) -> FeatureParams {
    classify_with(element, default_classificator(), &Options::default())
}

/// Classify `element` against `taxonomy`.
///
/// The element's tags are consumed in place as the engine uses them.
pub fn classify_with(element: &mut OsmElement, taxonomy: &Classificator, options: &Options) -> FeatureParams {
    classify_with_metadata(element, taxonomy, options, &mut NoMetadata)
}

/// Like [`classify_with`], handing each tag left over after classification to
/// `metadata` until it claims one.
pub fn classify_with_metadata(
    element: &mut OsmElement,
    taxonomy: &Classificator,
    options: &Options,
    metadata: &mut dyn MetadataProcessor,
) -> FeatureParams {
    engine::Classifier::new(taxonomy, options).run_with_metrics(element, metadata).params
}

/// Classify `element` and return the walk trace, the qualifier rounds and
/// per-stage timings alongside the output record.
pub fn classify_verbose_with(
    element: &mut OsmElement,
    taxonomy: &Classificator,
    options: &Options,
) -> ClassifyResultVerbose {
    let run = engine::Classifier::new(taxonomy, options).run_with_metrics(element, &mut NoMetadata);

    let paths = run
        .paths
        .iter()
        .map(|path| PathTrace {
            code: path.code,
            labels: taxonomy.path_of(path.code).unwrap_or_default().into_iter().map(str::to_string).collect(),
            visible: path.visible,
        })
        .collect();

    let details =
        ClassifyDetails { paths, rounds: run.rounds, address_fixup: run.address_fixup, timings: run.timings };

    ClassifyResultVerbose { params: run.params, details }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tag;

    fn element(pairs: &[(&str, &str)]) -> OsmElement {
        OsmElement::from_pairs(42, pairs.iter().copied())
    }

    fn code(path: &[&str]) -> TypeCode {
        default_classificator().type_by_path(path).unwrap()
    }

    fn readable(params: &FeatureParams) -> Vec<String> {
        let tree = default_classificator();
        let mut names: Vec<String> = params.types().iter().map(|&c| tree.readable(c)).collect();
        names.sort();
        names
    }

    #[test]
    fn residential_oneway_with_name() {
        let mut el = element(&[("highway", "residential"), ("oneway", "yes"), ("name", "Main St")]);
        let params = classify(&mut el);

        assert_eq!(readable(&params), vec!["highway-residential", "hwtag-oneway"]);
        assert_eq!(params.names().len(), 1);
        assert_eq!(params.name("default"), Some("Main St"));
        assert!(!params.reverse_geometry);
    }

    #[test]
    fn london_subway_station() {
        let mut el = element(&[("railway", "station"), ("station", "subway"), ("network", "London Underground")]);
        let res = classify_verbose_with(&mut el, default_classificator(), &Options::default());

        assert_eq!(readable(&res.params), vec!["railway-station-subway", "railway-station-subway-london"]);
        assert_eq!(res.params.subway_city.as_deref(), Some("london"));
        assert_eq!(res.details.rounds, Rounds::SUBWAY);
    }

    #[test]
    fn building_with_house_number() {
        let mut el = element(&[("building", "yes"), ("addr:housenumber", "12A")]);
        let res = classify_verbose_with(&mut el, default_classificator(), &Options::default());

        assert_eq!(res.params.house_number(), Some("12A"));
        assert_eq!(res.params.house_name(), None);
        assert_eq!(readable(&res.params), vec!["building"]);
        assert!(!res.details.address_fixup);
    }

    #[test]
    fn addressed_entrance_becomes_address() {
        let mut el = element(&[("entrance", "yes"), ("addr:housenumber", "12A"), ("name", "Side door")]);
        let res = classify_verbose_with(&mut el, default_classificator(), &Options::default());

        assert!(res.details.address_fixup);
        assert_eq!(readable(&res.params), vec!["building-address"]);
        assert!(!res.params.has_type(code(&["entrance"])));
        assert!(res.params.names().is_empty());
    }

    #[test]
    fn malformed_house_number_falls_back_to_house_name_and_still_fixes_entrance() {
        let mut el = element(&[("entrance", "main"), ("addr:housenumber", "Rose Cottage")]);
        let params = classify(&mut el);

        assert_eq!(params.house_number(), None);
        assert_eq!(params.house_name(), Some("Rose Cottage"));
        assert_eq!(readable(&params), vec!["building-address"]);
    }

    #[test]
    fn address_fixup_can_be_disabled() {
        let mut el = element(&[("entrance", "yes"), ("addr:housenumber", "3")]);
        let opts = Options { address_fixup: false, ..Options::default() };
        let params = classify_with(&mut el, default_classificator(), &opts);

        assert_eq!(readable(&params), vec!["entrance"]);
    }

    #[test]
    fn duplicate_language_names() {
        let mut el = element(&[("amenity", "cafe"), ("name:en", "Foo"), ("name:en", "Bar")]);
        let params = classify(&mut el);

        assert_eq!(params.name("en"), Some("Foo"));
        assert_eq!(params.names().len(), 1);
        assert!(el.tags.iter().filter(|t| t.is_consumed()).count() == 2);
    }

    #[test]
    fn relabeled_tags_classify() {
        let mut el = element(&[("atm", "yes"), ("building", "yes")]);
        let params = classify(&mut el);
        assert_eq!(readable(&params), vec!["amenity-atm", "building"]);

        let mut el = element(&[("hotel", "yes")]);
        assert_eq!(readable(&classify(&mut el)), vec!["tourism-hotel"]);
    }

    #[test]
    fn bridge_gets_synthetic_layer_and_subtype() {
        let mut el = element(&[("highway", "primary"), ("bridge", "yes")]);
        let params = classify(&mut el);

        assert_eq!(readable(&params), vec!["highway-primary-bridge"]);
        assert_eq!(params.layer, 1);
        assert_eq!(el.tag_value("layer"), Some("1"));
    }

    #[test]
    fn explicit_layer_wins_over_tunnel() {
        let mut el = element(&[("highway", "secondary"), ("tunnel", "yes"), ("layer", "-3")]);
        let params = classify(&mut el);

        assert_eq!(params.layer, -3);
        assert_eq!(el.tags.iter().filter(|t| t.key == "layer").count(), 1);
    }

    #[test]
    fn proposed_road_is_not_a_road() {
        let mut el = element(&[("proposed", "primary"), ("highway", "proposed")]);
        let params = classify(&mut el);
        assert!(!params.has_type(code(&["highway", "primary"])));
    }

    #[test]
    fn capital_without_rank_stays_classified() {
        let mut el = element(&[("place", "city"), ("capital", "yes"), ("name", "Paris")]);
        let params = classify(&mut el);

        assert_eq!(readable(&params), vec!["place-city-capital"]);
        assert_eq!(params.name("default"), Some("Paris"));

        let mut el = element(&[("place", "city"), ("capital", "2")]);
        assert_eq!(readable(&classify(&mut el)), vec!["place-city-capital-2"]);
    }

    #[test]
    fn administrative_boundaries_at_any_level() {
        let mut el = element(&[("boundary", "administrative"), ("admin_level", "3")]);
        assert_eq!(readable(&classify(&mut el)), vec!["boundary-administrative-3"]);

        let mut el = element(&[("boundary", "administrative")]);
        assert_eq!(readable(&classify(&mut el)), vec!["boundary-administrative"]);

        let mut el = element(&[("boundary", "administrative"), ("admin_level", "11")]);
        assert_eq!(readable(&classify(&mut el)), vec!["boundary-administrative"]);
    }

    #[test]
    fn hidden_types_respect_the_visibility_switch() {
        let tree = default_classificator();

        let mut el = element(&[("highway", "construction")]);
        let res = classify_verbose_with(&mut el, tree, &Options::default());
        assert!(res.params.types().is_empty());
        assert_eq!(res.details.paths.len(), 1);
        assert_eq!(res.details.paths[0].labels, vec!["highway", "construction"]);
        assert!(!res.details.paths[0].visible);

        let mut el = element(&[("highway", "construction")]);
        let opts = Options { visibility_filter: false, ..Options::default() };
        let params = classify_with(&mut el, tree, &opts);
        assert_eq!(readable(&params), vec!["highway-construction"]);
    }

    #[test]
    fn metadata_processor_sees_leftover_tags_until_it_claims_one() {
        let mut el = element(&[
            ("amenity", "restaurant"),
            ("name", "Chez Nous"),
            ("cuisine", "french"),
            ("opening_hours", "Mo-Fr 12:00-22:00"),
            ("website", "https://example.org"),
        ]);
        let mut seen: Vec<String> = Vec::new();
        let mut processor = |tag: &Tag, _params: &mut FeatureParams| {
            seen.push(tag.key.clone());
            tag.key == "opening_hours"
        };
        let params = classify_with_metadata(&mut el, default_classificator(), &Options::default(), &mut processor);

        assert_eq!(readable(&params), vec!["amenity-restaurant"]);
        assert_eq!(seen, vec!["amenity", "cuisine", "opening_hours"]);
    }

    #[test]
    fn verbose_timings_are_consistent() {
        let mut el = element(&[("highway", "primary"), ("lit", "yes"), ("population", "5000")]);
        let res = classify_verbose_with(&mut el, default_classificator(), &Options::default());

        let t = res.details.timings;
        assert!(t.walk <= t.total);
        assert!(t.post_match <= t.total);
        assert_eq!(res.details.rounds, Rounds::HIGHWAY);
        assert!(res.params.rank > 0);
    }

    #[test]
    fn parallel_classification_shares_one_taxonomy() {
        let tree = default_classificator();
        let opts = Options::default();

        let results: Vec<Vec<String>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let opts = &opts;
                    scope.spawn(move || {
                        let oneway = if i % 2 == 0 { "yes" } else { "no" };
                        let mut el = element(&[("highway", "residential"), ("oneway", oneway)]);
                        readable(&classify_with(&mut el, tree, opts))
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for (i, types) in results.iter().enumerate() {
            if i % 2 == 0 {
                assert_eq!(types, &vec!["highway-residential", "hwtag-oneway"]);
            } else {
                assert_eq!(types, &vec!["highway-residential"]);
            }
        }
    }
}
