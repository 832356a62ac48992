//! # firerules-base
//!
//! Editor-assistance library for Firestore security rules: grammar symbol
//! lookup for completion and hover, and emulator coverage indexed by source
//! range.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide       → AnalysisHost, symbol resolver, completion, hover
//!   ↓
//! coverage  → Coverage report parsing, per-file index, file watching
//!   ↓
//! grammar   → Grammar definition, compiler, single-flight symbol table
//!   ↓
//! project   → Editor settings
//!   ↓
//! core      → Cursor text utilities (prior word, word ranges)
//!   ↓
//! base      → Primitives (Position, Span)
//! ```

// ============================================================================
// MODULES (dependency order: base → core → project → grammar → coverage → ide)
// ============================================================================

/// Foundation types: Position, Span
pub mod base;

/// Cursor text utilities
pub mod core;

/// Editor settings
pub mod project;

/// Rules grammar and its compiled symbol table
pub mod grammar;

/// Emulator coverage reports
pub mod coverage;

/// IDE features: completion, hover
pub mod ide;

// Re-export foundation types
pub use base::{Position, Span};
pub use ide::AnalysisHost;
