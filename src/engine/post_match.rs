//! Category-gated qualifier rounds.
//!
//! After the walk, each assigned type is inspected once, in order, against
//! three categories. The first type of a category runs that category's rule
//! table; no later type runs it again.
//!
//! ```text
//! type.truncate(1) == highway                 -> highway table   (all hits)
//! type.truncate(3) == railway-station-subway  -> subway table    (first hit)
//! type == railway-station, no subway type     -> station table   (first hit)
//! ```
//!
//! The rounds only collect [`Qualifiers`]; they are turned into type codes
//! after the loop, so the iteration runs over a stable copy of the types.

use once_cell::sync::Lazy;
use tracing::debug;

use super::tag_rules::{apply_first_rule, apply_rules};
use crate::rules::qualifiers::rules::{self as qualifier_rules, QualifierFlags, Qualifiers};
use crate::taxonomy::Classificator;
use crate::type_code::TypeCode;
use crate::{FeatureParams, Tag, TagRule};

static HIGHWAY_RULES: Lazy<Vec<TagRule<Qualifiers>>> = Lazy::new(qualifier_rules::highway);
static SUBWAY_RULES: Lazy<Vec<TagRule<Qualifiers>>> = Lazy::new(qualifier_rules::subway);
static RAILWAY_STATION_RULES: Lazy<Vec<TagRule<Qualifiers>>> = Lazy::new(qualifier_rules::railway_station);

bitflags::bitflags! {
    /// Qualifier rounds that ran for an element.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Rounds: u8 {
        const HIGHWAY         = 1 << 0;
        const SUBWAY          = 1 << 1;
        const RAILWAY_STATION = 1 << 2;
    }
}

/// Canonical codes the engine compares against, resolved once per taxonomy.
/// A category missing from the taxonomy simply never matches.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CachedTypes {
    pub entrance: Option<TypeCode>,
    pub address: Option<TypeCode>,
    highway: Option<TypeCode>,
    oneway: Option<TypeCode>,
    private: Option<TypeCode>,
    lit: Option<TypeCode>,
    nofoot: Option<TypeCode>,
    yesfoot: Option<TypeCode>,
    rw_station: Option<TypeCode>,
    rw_station_subway: Option<TypeCode>,
}

impl CachedTypes {
    pub(crate) fn new(taxonomy: &Classificator) -> Self {
        let get = |path: &[&str]| taxonomy.type_by_path(path);
        CachedTypes {
            entrance: get(&["entrance"]),
            address: get(&["building", "address"]),
            highway: get(&["highway"]),
            oneway: get(&["hwtag", "oneway"]),
            private: get(&["hwtag", "private"]),
            lit: get(&["hwtag", "lit"]),
            nofoot: get(&["hwtag", "nofoot"]),
            yesfoot: get(&["hwtag", "yesfoot"]),
            rw_station: get(&["railway", "station"]),
            rw_station_subway: get(&["railway", "station", "subway"]),
        }
    }

    pub(crate) fn is_highway(&self, code: TypeCode) -> bool {
        self.highway == Some(code.truncate(1))
    }

    pub(crate) fn is_rw_subway(&self, code: TypeCode) -> bool {
        self.rw_station_subway == Some(code.truncate(3))
    }

    pub(crate) fn is_rw_station(&self, code: TypeCode) -> bool {
        self.rw_station == Some(code)
    }

    fn qualifier(&self, flag: QualifierFlags) -> Option<TypeCode> {
        [
            (QualifierFlags::ONEWAY, self.oneway),
            (QualifierFlags::PRIVATE, self.private),
            (QualifierFlags::LIT, self.lit),
            (QualifierFlags::NOFOOT, self.nofoot),
            (QualifierFlags::YESFOOT, self.yesfoot),
        ]
        .into_iter()
        .find_map(|(known, code)| if known == flag { code } else { None })
    }
}

/// Admits type codes into the output record, enforcing the visibility
/// predicate unless it is switched off.
#[derive(Clone, Copy)]
pub(crate) struct TypeFilter<'t> {
    pub taxonomy: &'t Classificator,
    pub enforce_visibility: bool,
}

impl TypeFilter<'_> {
    pub(crate) fn admits(&self, code: TypeCode) -> bool {
        !self.enforce_visibility || self.taxonomy.is_visible(code)
    }

    pub(crate) fn add(&self, params: &mut FeatureParams, code: TypeCode) -> bool {
        self.admits(code) && params.add_type(code)
    }
}

/// Run the gated qualifier rounds over `tags` for the types already in
/// `params`, then add the resulting qualifier types.
pub(crate) fn apply_qualifiers(
    tags: &mut [Tag],
    params: &mut FeatureParams,
    types: &CachedTypes,
    filter: TypeFilter<'_>,
) -> Rounds {
    let assigned = params.types().to_vec();
    let has_subway = assigned.iter().any(|&code| types.is_rw_subway(code));

    let mut rounds = Rounds::empty();
    let mut qualifiers = Qualifiers::default();

    for code in assigned {
        if !rounds.contains(Rounds::HIGHWAY) && types.is_highway(code) {
            apply_rules(tags, HIGHWAY_RULES.as_slice(), &mut qualifiers);
            rounds |= Rounds::HIGHWAY;
        } else if !rounds.contains(Rounds::SUBWAY) && types.is_rw_subway(code) {
            apply_first_rule(tags, SUBWAY_RULES.as_slice(), &mut qualifiers);
            rounds |= Rounds::SUBWAY;
        } else if !has_subway && !rounds.contains(Rounds::RAILWAY_STATION) && types.is_rw_station(code) {
            apply_first_rule(tags, RAILWAY_STATION_RULES.as_slice(), &mut qualifiers);
            rounds |= Rounds::RAILWAY_STATION;
        }
    }

    for flag in qualifiers.flags.iter() {
        if let Some(code) = types.qualifier(flag) {
            filter.add(params, code);
        }
    }
    if qualifiers.reverse_geometry {
        params.reverse_geometry = true;
    }
    if let Some(city) = qualifiers.subway_city {
        if let Some(code) = filter.taxonomy.type_by_path(&["railway", "station", "subway", city]) {
            filter.add(params, code);
        }
        params.subway_city = Some(city.to_string());
    }

    if !rounds.is_empty() {
        debug!(?rounds, qualifiers = ?qualifiers.flags, city = ?qualifiers.subway_city, "qualifier rounds");
    }
    rounds
}
