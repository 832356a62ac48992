//! Grammar: the rules language's types, methods and access modifiers.
//!
//! A [`GrammarDefinition`] is authored as nested data. [`compile`] flattens it
//! into a [`CompiledSymbolTable`] in which every type is reachable by short
//! name and by dotted path, basic-type members are shared by reference, and
//! colliding method names carry merged documentation.
//!
//! [`SymbolTableCell`] wraps compilation in a single-flight, one-shot
//! initialization so that concurrent first queries compile once.
//!
//! ## Key Types
//!
//! - [`GrammarSource`] / [`EmbeddedGrammar`]: where the definition comes from
//! - [`TypeDescriptor`], [`MethodDescriptor`], [`AccessModifierDescriptor`]
//! - [`SymbolInfo`]: any of the above, as returned by `find_any`

mod cell;
mod compile;
mod definition;
mod error;
mod source;
mod symbols;
mod table;

pub use cell::{CompileOutcome, SymbolTableCell};
pub use compile::compile;
pub use definition::{AccessModifierDef, GrammarDefinition, MethodDef, TypeDef};
pub use error::{GrammarError, GrammarWarning};
pub use source::{EmbeddedGrammar, GrammarSource};
pub use symbols::{
    AccessModifierDescriptor, FieldTable, MethodDescriptor, MethodTable, SymbolInfo,
    TypeDescriptor, call_snippet,
};
pub use table::CompiledSymbolTable;
