use crate::rules::tagging::helpers::{parse_layer, population_rank, relabel};
use crate::{FeatureParams, TagRule};

/// What the layer probe saw before anything else touched the element.
#[derive(Debug, Default)]
pub(crate) struct LayerProbe {
    pub has_layer: bool,
    /// Layer to synthesize for bridges (`1`) and tunnels (`-1`).
    pub synthetic: Option<&'static str>,
}

/// Bridges and tunnels without an explicit `layer` get one, so later
/// layer-dependent logic only has to look at `layer`.
pub(crate) fn layer_probe() -> Vec<TagRule<LayerProbe>> {
    vec![
        tag_rule!("bridge", "yes", |probe: LayerProbe, _tag| probe.synthetic = Some("1")),
        tag_rule!("tunnel", "yes", |probe: LayerProbe, _tag| probe.synthetic = Some("-1")),
        tag_rule!("layer", "*", |probe: LayerProbe, _tag| probe.has_layer = true),
    ]
}

/// Relabeling and attribute extraction applied to every element before the
/// taxonomy walk. Attribute tags are consumed; `layer` is left in place
/// because the taxonomy may still classify on it.
pub(crate) fn base() -> Vec<TagRule<FeatureParams>> {
    vec![
        tag_rule!("atm", "yes", |_params: FeatureParams, tag| relabel(tag, "amenity")),
        tag_rule!("restaurant", "yes", |_params: FeatureParams, tag| relabel(tag, "amenity")),
        tag_rule!("hotel", "yes", |_params: FeatureParams, tag| relabel(tag, "tourism")),
        tag_rule!("addr:housename", "*", |params: FeatureParams, tag| {
            params.add_house_name(&tag.value);
            tag.consume()
        }),
        tag_rule!("addr:street", "*", |params: FeatureParams, tag| {
            params.street = Some(tag.value.clone());
            tag.consume()
        }),
        tag_rule!("addr:flats", "*", |params: FeatureParams, tag| {
            params.flats = Some(tag.value.clone());
            tag.consume()
        }),
        tag_rule!("addr:housenumber", "*", |params: FeatureParams, tag| {
            // Not a number: keep it as the house name.
            if !params.add_house_number(&tag.value) {
                params.add_house_name(&tag.value);
            }
            tag.consume()
        }),
        tag_rule!("population", "*", |params: FeatureParams, tag| {
            if let Some(rank) = population_rank(&tag.value) {
                params.rank = rank;
            }
            tag.consume()
        }),
        tag_rule!("ref", "*", |params: FeatureParams, tag| {
            params.reference = Some(tag.value.clone());
            tag.consume()
        }),
        tag_rule!("layer", "*", |params: FeatureParams, tag| {
            if params.layer == 0 {
                params.layer = parse_layer(&tag.value);
            }
        }),
    ]
}
