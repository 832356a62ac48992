//! IDE features: high-level APIs for editor handlers.
//!
//! This module is the interface between the grammar/coverage layers and an
//! editor integration. Each query corresponds to an editor request.
//!
//! ## Design Principles
//!
//! 1. **Owned state**: everything lives in an [`AnalysisHost`]
//! 2. **No LSP types**: results use our own types, converted at the boundary
//! 3. **Silent absence**: every failure degrades to `None`
//!
//! ## Usage
//!
//! ```ignore
//! use firerules::ide::AnalysisHost;
//!
//! let host = AnalysisHost::new()?;
//! let items = host.completions("allow read: if request.").await;
//! ```

mod analysis;
mod completion;
mod hover;
mod resolver;

pub use analysis::AnalysisHost;
pub use completion::{
    CompletionItem, CompletionKind, access_modifier_completions, member_completions, sanitize,
};
pub use hover::HoverResult;
pub use resolver::{Completions, SymbolResolver};
