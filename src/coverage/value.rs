//! Values observed by the rules emulator for one expression.
//!
//! On the wire a value is an object with a single tag key, e.g.
//! `{"boolValue": true}` or `{"undefined": {"causeMessage": "..."}}`. An empty
//! object means the expression was short-circuited. Anything else is kept as
//! [`CoverageValue::Unrecognized`] so rendering can report it.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Tag of a value that renders as its JSON literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Null,
    Bool,
    Int,
    Float,
    String,
    Bytes,
    Duration,
    Timestamp,
    LatLng,
    Path,
}

impl LiteralKind {
    pub const ALL: [LiteralKind; 10] = [
        LiteralKind::Null,
        LiteralKind::Bool,
        LiteralKind::Int,
        LiteralKind::Float,
        LiteralKind::String,
        LiteralKind::Bytes,
        LiteralKind::Duration,
        LiteralKind::Timestamp,
        LiteralKind::LatLng,
        LiteralKind::Path,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            LiteralKind::Null => "nullValue",
            LiteralKind::Bool => "boolValue",
            LiteralKind::Int => "intValue",
            LiteralKind::Float => "floatValue",
            LiteralKind::String => "stringValue",
            LiteralKind::Bytes => "bytesValue",
            LiteralKind::Duration => "durationValue",
            LiteralKind::Timestamp => "timestampValue",
            LiteralKind::LatLng => "latlngValue",
            LiteralKind::Path => "pathValue",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

/// Tag of a recursive value that renders as its tag name only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompoundKind {
    Map,
    List,
    Constraint,
}

impl CompoundKind {
    pub fn tag(self) -> &'static str {
        match self {
            CompoundKind::Map => "mapValue",
            CompoundKind::List => "listValue",
            CompoundKind::Constraint => "constraintValue",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        [CompoundKind::Map, CompoundKind::List, CompoundKind::Constraint]
            .into_iter()
            .find(|kind| kind.tag() == tag)
    }
}

/// Tag under which the emulator reports evaluation errors.
const ERROR_TAG: &str = "undefined";

/// One observed evaluation result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub enum CoverageValue {
    /// No tag: the expression was never evaluated because of short-circuiting.
    ShortCircuited,
    /// Evaluation raised an error.
    Error { cause_message: String },
    /// A simple value such as a bool or string.
    Literal { kind: LiteralKind, value: Value },
    /// A map, list or constraint.
    Compound { kind: CompoundKind },
    /// Tags that do not form a single recognized value.
    Unrecognized { tags: Vec<String> },
}

impl From<Map<String, Value>> for CoverageValue {
    fn from(map: Map<String, Value>) -> Self {
        if let Some(error) = map.get(ERROR_TAG).filter(|v| !v.is_null()) {
            let cause_message = error
                .get("causeMessage")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            return CoverageValue::Error { cause_message };
        }

        if let Some(kind) = map.keys().find_map(|tag| CompoundKind::from_tag(tag)) {
            return CoverageValue::Compound { kind };
        }

        let mut literals = map
            .iter()
            .filter_map(|(tag, value)| LiteralKind::from_tag(tag).map(|kind| (kind, value)));
        if let (Some((kind, value)), None) = (literals.next(), literals.next()) {
            return CoverageValue::Literal {
                kind,
                value: value.clone(),
            };
        }

        if map.is_empty() {
            return CoverageValue::ShortCircuited;
        }

        CoverageValue::Unrecognized {
            tags: map.keys().cloned().collect(),
        }
    }
}
