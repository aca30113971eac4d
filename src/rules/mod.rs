//! Declarative tag rule tables.
//!
//! - `tagging`: element-wide preprocessing (synthetic layers, relabeling,
//!   address/rank/ref/layer attributes).
//! - `qualifiers`: category-gated tables run after the taxonomy walk
//!   (road qualifiers, subway network labels).

pub(crate) mod qualifiers;
pub(crate) mod tagging;
