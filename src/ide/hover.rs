//! Hover results for symbols and coverage ranges.
//!
//! Symbol hovers are built with [`HoverResult::new`] from memoized
//! grammar documentation.

use crate::base::Span;
use crate::coverage::{CoverageEntry, render_values};

/// Result of a hover request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoverResult {
    /// The hover content (markdown).
    pub contents: String,
    /// The hovered range (0-indexed).
    pub range: Span,
}

impl HoverResult {
    pub fn new(contents: impl Into<String>, range: Span) -> Self {
        Self {
            contents: contents.into(),
            range,
        }
    }

    /// Observed values of a coverage entry, over the entry's range.
    pub fn from_coverage(entry: &CoverageEntry) -> Self {
        Self::new(render_values(&entry.values), entry.span)
    }
}
