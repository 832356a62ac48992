//! Coverage report parsing and flattening.
//!
//! The emulator writes an HTML/JS page with the report embedded as a JSON
//! literal between two fixed markers. The report is a tree of source ranges;
//! it is flattened in pre-order so that a parent always precedes its children.

use serde::Deserialize;

use crate::base::{Position, Span};

use super::error::CoverageError;
use super::value::CoverageValue;

/// Text immediately preceding the embedded report.
pub const DATA_START_MARKER: &str = "// Populated by the emulator at runtime\nconst data = ";

/// Text immediately following the embedded report.
pub const DATA_END_MARKER: &str = ";\n\nconst REPORT_LIMIT_SIZE";

/// Extra columns added to each range to match the emulator's column accounting.
const END_COLUMN_ADJUSTMENT: i64 = 2;

/// The embedded report document.
#[derive(Debug, Clone, Deserialize)]
pub struct CoverageDocument {
    pub rules: RulesSection,
    pub report: Vec<ReportNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RulesSection {
    pub files: Vec<RulesFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RulesFile {
    pub name: String,
}

/// A source range with the values observed there, and nested ranges.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportNode {
    pub source_position: SourcePosition,
    #[serde(default)]
    pub values: Vec<ValueCount>,
    #[serde(default)]
    pub children: Vec<ReportNode>,
}

/// 1-based start of a range plus the offsets that give its length.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
    pub current_offset: i64,
    pub end_offset: i64,
}

/// A value and how many times it was observed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValueCount {
    pub value: CoverageValue,
    pub count: u64,
}

/// A flattened report node in editor coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageEntry {
    pub span: Span,
    pub values: Vec<ValueCount>,
}

impl SourcePosition {
    /// Convert to a 0-indexed span on the starting line.
    ///
    /// Offsets whose width does not fit a column are malformed.
    pub fn to_span(self) -> Result<Span, CoverageError> {
        let start = Position::new(
            self.line.saturating_sub(1),
            self.column.saturating_sub(1),
        );
        let width = self
            .end_offset
            .checked_sub(self.current_offset)
            .and_then(|width| width.checked_add(END_COLUMN_ADJUSTMENT))
            .ok_or_else(|| self.out_of_range())?
            .max(0);
        let width = usize::try_from(width).map_err(|_| self.out_of_range())?;
        let end = start.translate(width).ok_or_else(|| self.out_of_range())?;
        Ok(Span::new(start, end))
    }

    fn out_of_range(&self) -> CoverageError {
        CoverageError::malformed(format!(
            "source position out of range at {}:{} (offsets {}..{})",
            self.line, self.column, self.current_offset, self.end_offset
        ))
    }
}

/// Slice the JSON document out of the coverage page.
pub fn extract_payload(text: &str) -> Result<&str, CoverageError> {
    let (_, rest) = text
        .split_once(DATA_START_MARKER)
        .ok_or(CoverageError::MissingMarker("const data ="))?;
    let (payload, _) = rest
        .split_once(DATA_END_MARKER)
        .ok_or(CoverageError::MissingMarker("const REPORT_LIMIT_SIZE"))?;
    Ok(payload)
}

/// Parse a coverage page into its report document.
pub fn parse_document(text: &str) -> Result<CoverageDocument, CoverageError> {
    let payload = extract_payload(text)?;
    serde_json::from_str(payload).map_err(|e| CoverageError::malformed(e.to_string()))
}

/// Parse a coverage page and flatten it, checking it describes `file_identity`.
pub fn parse_coverage(text: &str, file_identity: &str) -> Result<Vec<CoverageEntry>, CoverageError> {
    let document = parse_document(text)?;

    let declared = document
        .rules
        .files
        .first()
        .ok_or_else(|| CoverageError::malformed("report lists no rules files"))?;
    if declared.name != file_identity {
        return Err(CoverageError::MismatchedSource {
            expected: file_identity.to_string(),
            found: declared.name.clone(),
        });
    }

    flatten(&document.report)
}

/// Flatten a report tree in pre-order.
pub fn flatten(report: &[ReportNode]) -> Result<Vec<CoverageEntry>, CoverageError> {
    let mut entries = Vec::new();
    flatten_into(report, &mut entries)?;
    Ok(entries)
}

fn flatten_into(report: &[ReportNode], entries: &mut Vec<CoverageEntry>) -> Result<(), CoverageError> {
    for node in report {
        entries.push(CoverageEntry {
            span: node.source_position.to_span()?,
            values: node.values.clone(),
        });
        flatten_into(&node.children, entries)?;
    }
    Ok(())
}
