//! Coverage: values observed by the rules emulator, indexed by source range.
//!
//! The emulator writes an HTML report with the evaluation tree embedded as
//! JSON. [`CoverageIndex`] extracts and flattens it per rules file, caches
//! the result by path and evicts it when a [`FileWatcher`] reports a change.
//! [`render_values`] turns the values at a position into hover markdown.
//!
//! ```text
//! coverage.html ──extract──▶ CoverageDocument ──flatten──▶ [CoverageEntry]
//!                                                               │
//!                                            query(position) ◀──┘
//! ```

mod error;
mod index;
mod render;
mod report;
mod value;
mod watch;

pub use error::CoverageError;
pub use index::{CoverageEntries, CoverageIndex};
pub use render::{LINE_SEPARATOR, render_value, render_values};
pub use report::{
    CoverageDocument, CoverageEntry, DATA_END_MARKER, DATA_START_MARKER, ReportNode,
    RulesFile, RulesSection, SourcePosition, ValueCount, extract_payload, flatten,
    parse_coverage, parse_document,
};
pub use value::{CompoundKind, CoverageValue, LiteralKind};
pub use watch::{ChangeCallback, ChangeKind, FileWatcher, ManualWatcher, NotifyWatcher, WatchHandle};
