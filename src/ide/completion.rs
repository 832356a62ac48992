//! Completion items for member access and directives.

use std::sync::Arc;

use crate::grammar::{AccessModifierDescriptor, MethodDescriptor, TypeDescriptor};

/// Kind of completion item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionKind {
    Field,
    Method,
    Keyword,
}

impl CompletionKind {
    /// Convert to LSP completion item kind number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            CompletionKind::Method => 2,   // Method
            CompletionKind::Field => 5,    // Field
            CompletionKind::Keyword => 14, // Keyword
        }
    }
}

/// A completion suggestion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionItem {
    /// The member or keyword name.
    pub label: Arc<str>,
    /// The kind of completion.
    pub kind: CompletionKind,
    /// Documentation (shown in popup), plain text.
    pub documentation: Option<Arc<str>>,
    /// Snippet to insert instead of the label.
    pub insert_text: Option<Arc<str>>,
}

impl CompletionItem {
    /// Create a new completion item.
    pub fn new(label: impl Into<Arc<str>>, kind: CompletionKind) -> Self {
        Self {
            label: label.into(),
            kind,
            documentation: None,
            insert_text: None,
        }
    }

    /// Set the documentation, stripping markdown emphasis.
    pub fn with_documentation(mut self, doc: &str) -> Self {
        self.documentation = Some(sanitize(doc).into());
        self
    }

    /// Set the insert text.
    pub fn with_insert_text(mut self, text: impl Into<Arc<str>>) -> Self {
        self.insert_text = Some(text.into());
        self
    }

    pub fn from_field(name: &str, field: &TypeDescriptor) -> Self {
        Self::new(name, CompletionKind::Field).with_documentation(&field.about)
    }

    pub fn from_method(name: &str, method: &MethodDescriptor) -> Self {
        let item = Self::new(name, CompletionKind::Method).with_documentation(&method.about);
        match &method.snippet {
            Some(snippet) => item.with_insert_text(snippet.as_str()),
            None => item,
        }
    }

    pub fn from_access_modifier(modifier: &AccessModifierDescriptor) -> Self {
        Self::new(modifier.name.as_str(), CompletionKind::Keyword)
            .with_documentation(&modifier.about)
    }
}

/// Fields of a type in authoring order, then its methods.
pub fn member_completions(info: &TypeDescriptor) -> Vec<CompletionItem> {
    let fields = info
        .fields
        .iter()
        .flatten()
        .map(|(name, field)| CompletionItem::from_field(name, field));
    let methods = info
        .methods
        .iter()
        .flat_map(|table| table.iter())
        .map(|(name, method)| CompletionItem::from_method(name, method));
    fields.chain(methods).collect()
}

/// Keyword items for the access modifiers that may follow `allow`.
pub fn access_modifier_completions(
    modifiers: &[Arc<AccessModifierDescriptor>],
) -> Vec<CompletionItem> {
    modifiers
        .iter()
        .map(|modifier| CompletionItem::from_access_modifier(modifier))
        .collect()
}

/// Completion popups render plain text, so drop markdown code and emphasis marks.
pub fn sanitize(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '`' | '*')).collect()
}
