//! Displayable box identifiers.

use serde::{Serialize, Serializer};
use std::fmt;

/// How a box is referred to in reports.
///
/// Boxes carry an integer id when one was declared or synthesized. A box
/// whose id could not be parsed is referred to by its 1-based position in
/// its frame instead, rendered as `index:<n>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoxRef {
    Id(i64),
    Index(usize),
}

impl BoxRef {
    /// Builds the reference for the box at 0-based `position` in its frame.
    #[inline]
    pub fn for_box(id: Option<i64>, position: usize) -> Self {
        match id {
            Some(id) => BoxRef::Id(id),
            None => BoxRef::Index(position + 1),
        }
    }
}

impl fmt::Display for BoxRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoxRef::Id(id) => write!(f, "{id}"),
            BoxRef::Index(n) => write!(f, "index:{n}"),
        }
    }
}

// Ids serialize as JSON numbers, positional fallbacks as strings.
impl Serialize for BoxRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BoxRef::Id(id) => serializer.serialize_i64(*id),
            BoxRef::Index(_) => serializer.collect_str(self),
        }
    }
}
