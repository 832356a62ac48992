//! Project: editor configuration for a rules project.
//!
//! The host detects the project root and forwards the editor's settings;
//! this module only interprets them.

mod settings;

pub use settings::{ProjectError, Settings};
