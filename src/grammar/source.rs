//! Where grammar definitions come from.

use async_trait::async_trait;

use super::definition::GrammarDefinition;
use super::error::GrammarError;

/// Firestore security rules grammar, compiled into the binary.
const FIRESTORE_RULES: &str = include_str!("data/firestore_rules.json");

/// Provides the grammar to compile.
///
/// Loading is asynchronous so a source may fetch the definition remotely;
/// the shipped grammar resolves immediately.
#[async_trait]
pub trait GrammarSource: Send + Sync {
    async fn load(&self) -> Result<GrammarDefinition, GrammarError>;
}

/// The grammar shipped with the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedGrammar;

impl EmbeddedGrammar {
    /// Parse the embedded grammar without going through a [`GrammarSource`].
    pub fn definition() -> Result<GrammarDefinition, GrammarError> {
        GrammarDefinition::from_json(FIRESTORE_RULES)
    }
}

#[async_trait]
impl GrammarSource for EmbeddedGrammar {
    async fn load(&self) -> Result<GrammarDefinition, GrammarError> {
        Self::definition()
    }
}

/// An in-memory definition is its own source.
#[async_trait]
impl GrammarSource for GrammarDefinition {
    async fn load(&self) -> Result<GrammarDefinition, GrammarError> {
        Ok(self.clone())
    }
}
