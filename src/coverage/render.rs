//! Markdown rendering of observed values for hover text.

use tracing::warn;

use super::report::ValueCount;
use super::value::CoverageValue;

/// Separator between rendered values: a markdown soft line break.
pub const LINE_SEPARATOR: &str = "  \n";

/// Render every observed value, one line each.
pub fn render_values(values: &[ValueCount]) -> String {
    if values.is_empty() {
        return "Expression never evaluated".to_string();
    }

    values
        .iter()
        .map(|v| render_value(&v.value, v.count))
        .collect::<Vec<_>>()
        .join(LINE_SEPARATOR)
}

/// Render one value with its observation count.
///
/// A value with an unrecognized shape is logged and renders as an empty line.
pub fn render_value(value: &CoverageValue, count: u64) -> String {
    let times = count_phrase(count);
    match value {
        CoverageValue::Error { cause_message } => {
            format!("Error '{cause_message}' occurred {times}")
        }
        CoverageValue::Compound { kind } => format!("`[{}]` returned {times}", kind.tag()),
        CoverageValue::Literal { value, .. } => format!("`{value}` returned {times}"),
        CoverageValue::ShortCircuited => format!("Expression short-circuited {times}"),
        CoverageValue::Unrecognized { tags } => {
            warn!(?tags, "invalid expression return type in coverage report");
            String::new()
        }
    }
}

fn count_phrase(count: u64) -> String {
    if count == 1 {
        "once".to_string()
    } else {
        format!("{count} times")
    }
}
