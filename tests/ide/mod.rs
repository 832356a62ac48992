//! IDE feature tests
//!
//! Tests for:
//! - Member and directive completion
//! - Hover over grammar symbols and coverage ranges
//! - Host lifecycle

pub mod tests_completion;
pub mod tests_hover;
