//! Foundation types for the firerules toolchain.
//!
//! This module provides the source-location primitives shared by the
//! coverage index and the IDE layer:
//! - [`Position`] - 0-indexed line/column positions
//! - [`Span`] - inclusive ranges between two positions
//!
//! This module has NO dependencies on other firerules modules.

mod position;

pub use position::{Position, Span};
