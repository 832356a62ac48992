//! Error and warning types for grammar loading and compilation.

use thiserror::Error;

/// Errors that prevent a symbol table from being produced.
///
/// Cloned to every caller waiting on the same compilation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// The grammar document is not valid JSON or has the wrong shape.
    #[error("malformed grammar definition: {0}")]
    Malformed(String),

    /// A custom grammar source failed to produce a definition.
    #[error("grammar source failed: {0}")]
    Source(String),
}

impl GrammarError {
    /// Create a malformed-definition error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    /// Create a source error.
    pub fn source(message: impl Into<String>) -> Self {
        Self::Source(message.into())
    }
}

/// Problems in a grammar definition that compilation tolerates.
///
/// The compiler logs these and carries on: an unresolved reference simply
/// contributes nothing to the symbol table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarWarning {
    #[error("`{path}` inherits from unknown basic type `{name}`")]
    UnresolvedBasicType { path: String, name: String },

    #[error("basic type `{name}` inherits from itself")]
    CyclicBasicType { name: String },

    #[error("`{path}` declares methods that are replaced by its basic type")]
    MethodsShadowedByBasicType { path: String },

    #[error("access modifier `{modifier}` includes unknown modifier `{name}`")]
    UnresolvedInclude { modifier: String, name: String },

    #[error("access modifier `{modifier}` includes itself")]
    CyclicInclude { modifier: String },
}
