//! Tag rule evaluation.
//!
//! A rule table is evaluated against the element's tags in tag order; for each
//! tag every rule is tried in table order, so one tag may fire several rules of
//! the same table. Effects may rewrite or consume the tag they fired on, and a
//! consumed tag stops matching immediately, including for the rest of the
//! current table.
//!
//! ```text
//! tags:  [t0, t1, t2]
//! rules: [r0, r1]
//!
//! t0·r0  t0·r1  t1·r0  t1·r1  t2·r0  t2·r1
//! ```

use tracing::trace;

use crate::{Tag, TagRule};

/// Run every matching rule of `rules` over `tags`. Returns how many rules
/// fired.
pub(crate) fn apply_rules<C>(tags: &mut [Tag], rules: &[TagRule<C>], ctx: &mut C) -> usize {
    let mut fired = 0;
    for tag in tags.iter_mut() {
        for rule in rules {
            if rule.matches(tag) {
                trace!(key = rule.key, value = %tag.value, "tag rule fired");
                (rule.effect)(ctx, tag);
                fired += 1;
            }
        }
    }
    fired
}

/// Like [`apply_rules`], but stop after the first rule that fires.
pub(crate) fn apply_first_rule<C>(tags: &mut [Tag], rules: &[TagRule<C>], ctx: &mut C) -> bool {
    for tag in tags.iter_mut() {
        if let Some(rule) = rules.iter().find(|rule| rule.matches(tag)) {
            trace!(key = rule.key, value = %tag.value, "first tag rule fired");
            (rule.effect)(ctx, tag);
            return true;
        }
    }
    false
}
