//! Bit-packed classification type codes.
//!
//! A [`TypeCode`] stores a classification path of up to [`MAX_LEVELS`] nodes in
//! one `u32`. Each level owns a fixed 8-bit field holding `index + 1`, where
//! `index` is the node's ordinal among its siblings; `0` marks an absent level.
//! The shallowest level sits in the most significant field:
//!
//! ```text
//!   bits 31..24   23..16   15..8    7..0
//!      level 0  level 1  level 2  level 3
//!
//! railway/station/subway  ->  [r+1][s+1][u+1][ 0 ]
//! ```
//!
//! Truncating to `n` levels zeroes every field below level `n - 1`, which is
//! exactly the code of the `n`-level prefix path. Category tests ("is this any
//! highway") compare truncated codes against canonical prefix codes.

use std::fmt;

/// Maximum number of levels a type code can hold.
pub const MAX_LEVELS: usize = 4;

const LEVEL_BITS: u32 = 8;
const LEVEL_MASK: u32 = (1 << LEVEL_BITS) - 1;

/// Largest sibling ordinal that still fits a level field (`index + 1 <= 255`).
pub(crate) const MAX_INDEX: u8 = (LEVEL_MASK - 1) as u8;

#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeCode(u32);

impl TypeCode {
    /// Code of the empty path.
    pub const EMPTY: TypeCode = TypeCode(0);

    pub const fn from_raw(raw: u32) -> Self {
        TypeCode(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Encode a path given as per-level sibling ordinals, shallowest first.
    pub fn from_indices(indices: impl IntoIterator<Item = u8>) -> Self {
        let mut code = TypeCode::EMPTY;
        for index in indices {
            code.push(index);
        }
        code
    }

    fn shift(level: usize) -> u32 {
        LEVEL_BITS * (MAX_LEVELS - 1 - level) as u32
    }

    /// Append one level below the current deepest one.
    ///
    /// # Panics
    ///
    /// Panics when the code already holds [`MAX_LEVELS`] levels or `index`
    /// does not fit a level field. Both mean the taxonomy handed out a node it
    /// could never have been built with.
    pub fn push(&mut self, index: u8) {
        let depth = self.depth();
        assert!(depth < MAX_LEVELS, "type code {self:?} already holds {MAX_LEVELS} levels");
        assert!(index <= MAX_INDEX, "sibling index {index} does not fit a type code level");
        self.0 |= (u32::from(index) + 1) << Self::shift(depth);
    }

    /// Number of levels set, counted from the top.
    pub fn depth(self) -> usize {
        (0..MAX_LEVELS).take_while(|&level| self.field(level) != 0).count()
    }

    fn field(self, level: usize) -> u32 {
        (self.0 >> Self::shift(level)) & LEVEL_MASK
    }

    /// Sibling ordinal stored at `level`, or `None` past the code's depth.
    pub fn level(self, level: usize) -> Option<u8> {
        if level >= self.depth() {
            return None;
        }
        Some((self.field(level) - 1) as u8)
    }

    /// Keep the first `levels` levels and clear the rest.
    pub fn truncate(self, levels: usize) -> Self {
        match levels {
            0 => TypeCode::EMPTY,
            n if n >= MAX_LEVELS => self,
            n => TypeCode(self.0 & (u32::MAX << Self::shift(n - 1))),
        }
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Per-level sibling ordinals, shallowest first.
    pub fn indices(self) -> impl Iterator<Item = u8> {
        (0..self.depth()).filter_map(move |level| self.level(level))
    }
}

impl fmt::Debug for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let levels: Vec<String> = self.indices().map(|i| i.to_string()).collect();
        write!(f, "TypeCode({:#010x} [{}])", self.0, levels.join("."))
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}
