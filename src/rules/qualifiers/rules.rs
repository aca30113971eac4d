use crate::TagRule;

bitflags::bitflags! {
    /// Road qualifiers collected by the highway table. Each maps to one
    /// `hwtag-*` type.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct QualifierFlags: u8 {
        const ONEWAY  = 1 << 0;
        const PRIVATE = 1 << 1;
        const LIT     = 1 << 2;
        const NOFOOT  = 1 << 3;
        const YESFOOT = 1 << 4;
    }
}

/// Accumulator the qualifier tables write into. The engine turns it into type
/// codes once every gated round has run.
#[derive(Debug, Default)]
pub(crate) struct Qualifiers {
    pub flags: QualifierFlags,
    pub reverse_geometry: bool,
    pub subway_city: Option<&'static str>,
}

/// Qualifiers for anything classified as `highway-*`.
pub(crate) fn highway() -> Vec<TagRule<Qualifiers>> {
    vec![
        tag_rule!("oneway", "yes", |q: Qualifiers, _tag| q.flags |= QualifierFlags::ONEWAY),
        tag_rule!("oneway", "1", |q: Qualifiers, _tag| q.flags |= QualifierFlags::ONEWAY),
        tag_rule!("oneway", "-1", |q: Qualifiers, _tag| {
            q.flags |= QualifierFlags::ONEWAY;
            q.reverse_geometry = true
        }),
        tag_rule!("access", "private", |q: Qualifiers, _tag| q.flags |= QualifierFlags::PRIVATE),
        tag_rule!("lit", "~", |q: Qualifiers, _tag| q.flags |= QualifierFlags::LIT),
        tag_rule!("foot", "!", |q: Qualifiers, _tag| q.flags |= QualifierFlags::NOFOOT),
        tag_rule!("foot", "~", |q: Qualifiers, _tag| q.flags |= QualifierFlags::YESFOOT),
        tag_rule!("sidewalk", "~", |q: Qualifiers, _tag| q.flags |= QualifierFlags::YESFOOT),
    ]
}

/// Metro system labels for `railway-station-subway`. Exact, case-sensitive
/// `network`/`operator` strings; only the first hit is used.
pub(crate) fn subway() -> Vec<TagRule<Qualifiers>> {
    vec![
        tag_rule!("network", "London Underground", |q: Qualifiers, _tag| q.subway_city = Some("london")),
        tag_rule!("network", "New York City Subway", |q: Qualifiers, _tag| q.subway_city = Some("newyork")),
        tag_rule!("network", "Московский метрополитен", |q: Qualifiers, _tag| q.subway_city = Some("moscow")),
        tag_rule!("network", "Петербургский метрополитен", |q: Qualifiers, _tag| q.subway_city = Some("spb")),
        tag_rule!("network", "Verkehrsverbund Berlin-Brandenburg", |q: Qualifiers, _tag| {
            q.subway_city = Some("berlin")
        }),
        tag_rule!("network", "Минский метрополитен", |q: Qualifiers, _tag| q.subway_city = Some("minsk")),
        tag_rule!("network", "Київський метрополітен", |q: Qualifiers, _tag| q.subway_city = Some("kiev")),
        tag_rule!("operator", "КП «Київський метрополітен»", |q: Qualifiers, _tag| q.subway_city = Some("kiev")),
        tag_rule!("network", "RATP", |q: Qualifiers, _tag| q.subway_city = Some("paris")),
        tag_rule!("network", "Metro de Barcelona", |q: Qualifiers, _tag| q.subway_city = Some("barcelona")),
        tag_rule!("network", "Metro de Madrid", |q: Qualifiers, _tag| q.subway_city = Some("madrid")),
        tag_rule!("operator", "Metro de Madrid", |q: Qualifiers, _tag| q.subway_city = Some("madrid")),
        tag_rule!("network", "Metropolitana di Roma", |q: Qualifiers, _tag| q.subway_city = Some("roma")),
        tag_rule!("network", "ATAC", |q: Qualifiers, _tag| q.subway_city = Some("roma")),
    ]
}

/// Reduced table for plain `railway-station` features (stations mapped
/// without `station=subway`).
pub(crate) fn railway_station() -> Vec<TagRule<Qualifiers>> {
    vec![tag_rule!("network", "London Underground", |q: Qualifiers, _tag| q.subway_city = Some("london"))]
}
