use crate::Tag;

/// Layers are clamped to this magnitude.
pub const LAYER_BOUND: i64 = 10;

/// Structural house-number check: starts with a digit, then letters, digits
/// and the usual separators, at most 24 characters overall.
pub fn is_house_number(value: &str) -> bool {
    regex!(r"^\d[\p{L}\p{N} /.,;-]{0,23}$").is_match(value.trim())
}

/// Leading signed integer of `value`, clamped to `[-10, 10]`. Anything that
/// does not start with a number is layer 0.
pub fn parse_layer(value: &str) -> i8 {
    let Some(caps) = regex!(r"^\s*([+-]?)(\d+)").captures(value) else {
        return 0;
    };
    let negative = &caps[1] == "-";
    let magnitude = caps[2].parse::<i64>().unwrap_or(i64::MAX);
    let layer = if negative { -magnitude } else { magnitude };
    layer.clamp(-LAYER_BOUND, LAYER_BOUND) as i8
}

/// Population rank `floor(ln(population) / ln(1.1))`, saturated to `u8`.
/// Returns `None` when the value is not an unsigned integer.
pub fn population_rank(value: &str) -> Option<u8> {
    let population = value.trim().parse::<u64>().ok()?;
    let rank = (population as f64).ln() / 1.1f64.ln();
    Some(rank.clamp(0.0, f64::from(u8::MAX)) as u8)
}

/// Turn a `thing=yes` tag into `key=thing`.
pub fn relabel(tag: &mut Tag, key: &str) {
    std::mem::swap(&mut tag.key, &mut tag.value);
    tag.key = key.to_string();
}
