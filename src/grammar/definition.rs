//! Authored grammar data, as written before compilation.
//!
//! A [`GrammarDefinition`] is plain data: nested type definitions, method
//! signatures and access-modifier keywords. Nothing here is derived; snippets,
//! inherited members and resolved includes are produced by the compiler.

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;

use super::error::{GrammarError, GrammarWarning};

/// The complete grammar of the rules language.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarDefinition {
    /// Access-modifier keywords accepted after `allow`, in authoring order.
    #[serde(default)]
    pub access_modifiers: Vec<AccessModifierDef>,
    /// Reusable primitive types whose members are shared with implementing types.
    #[serde(default)]
    pub basic_types: IndexMap<String, TypeDef>,
    /// Root types reachable from rule expressions.
    #[serde(default)]
    pub types: IndexMap<String, TypeDef>,
}

/// A type with optional methods and nested fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDef {
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub methods: Option<IndexMap<String, MethodDef>>,
    #[serde(default)]
    pub fields: Option<IndexMap<String, TypeDef>>,
    /// Name of a basic type whose members this type inherits.
    #[serde(default)]
    pub basic_type_ref: Option<String>,
}

/// A method signature.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDef {
    #[serde(default)]
    pub about: String,
    /// Parameter labels. `Some(vec![])` still produces a call snippet.
    #[serde(default)]
    pub parameters: Option<Vec<String>>,
    #[serde(default)]
    pub returns: Option<String>,
}

/// An access-modifier keyword such as `read` or `write`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessModifierDef {
    pub name: String,
    #[serde(default)]
    pub about: String,
    /// Names of other modifiers this one implies.
    #[serde(default)]
    pub include_names: Option<Vec<String>>,
}

impl GrammarDefinition {
    /// Parse a grammar from its JSON form.
    pub fn from_json(text: &str) -> Result<Self, GrammarError> {
        serde_json::from_str(text).map_err(|e| GrammarError::malformed(e.to_string()))
    }

    /// Check cross references without compiling.
    ///
    /// Returns every unresolved or cyclic reference. An empty result means the
    /// compiled table will contain every declared relationship.
    pub fn validate(&self) -> Vec<GrammarWarning> {
        let mut warnings = Vec::new();

        for (name, def) in &self.basic_types {
            self.check_type(name, def, &mut warnings);
        }
        for (name, def) in &self.types {
            self.check_type(name, def, &mut warnings);
        }
        warnings.extend(self.basic_type_cycles());
        warnings.extend(self.access_modifier_problems());

        warnings
    }

    fn check_type(&self, path: &str, def: &TypeDef, warnings: &mut Vec<GrammarWarning>) {
        if let Some(basic) = &def.basic_type_ref {
            if !self.basic_types.contains_key(basic) {
                warnings.push(GrammarWarning::UnresolvedBasicType {
                    path: path.to_string(),
                    name: basic.clone(),
                });
            } else if def.methods.is_some() {
                warnings.push(GrammarWarning::MethodsShadowedByBasicType {
                    path: path.to_string(),
                });
            }
        }

        for (key, field) in def.fields.iter().flatten() {
            self.check_type(&format!("{path}.{key}"), field, warnings);
        }
    }

    /// Basic types that can reach themselves through `basicTypeRef`s anywhere
    /// in their field tree.
    fn basic_type_cycles(&self) -> Vec<GrammarWarning> {
        let edges: FxHashMap<&str, Vec<&str>> = self
            .basic_types
            .iter()
            .map(|(name, def)| {
                let mut refs = Vec::new();
                collect_basic_refs(def, &mut refs);
                (name.as_str(), refs)
            })
            .collect();

        self.basic_types
            .keys()
            .filter(|name| reaches_itself(name, &edges))
            .map(|name| GrammarWarning::CyclicBasicType { name: name.clone() })
            .collect()
    }

    fn access_modifier_problems(&self) -> Vec<GrammarWarning> {
        let mut warnings = Vec::new();
        let mut edges: FxHashMap<&str, Vec<&str>> = FxHashMap::default();

        for modifier in &self.access_modifiers {
            let includes = edges.entry(modifier.name.as_str()).or_default();
            for name in modifier.include_names.iter().flatten() {
                if self.access_modifiers.iter().any(|m| &m.name == name) {
                    includes.push(name.as_str());
                } else {
                    warnings.push(GrammarWarning::UnresolvedInclude {
                        modifier: modifier.name.clone(),
                        name: name.clone(),
                    });
                }
            }
        }

        for modifier in &self.access_modifiers {
            if reaches_itself(&modifier.name, &edges) {
                warnings.push(GrammarWarning::CyclicInclude {
                    modifier: modifier.name.clone(),
                });
            }
        }

        warnings
    }
}

fn collect_basic_refs<'a>(def: &'a TypeDef, refs: &mut Vec<&'a str>) {
    if let Some(basic) = &def.basic_type_ref {
        refs.push(basic.as_str());
    }
    for field in def.fields.iter().flat_map(|fields| fields.values()) {
        collect_basic_refs(field, refs);
    }
}

fn reaches_itself(start: &str, edges: &FxHashMap<&str, Vec<&str>>) -> bool {
    let mut seen = FxHashSet::default();
    let mut stack: Vec<&str> = edges.get(start).cloned().unwrap_or_default();

    while let Some(next) = stack.pop() {
        if next == start {
            return true;
        }
        if seen.insert(next) {
            stack.extend(edges.get(next).into_iter().flatten().copied());
        }
    }
    false
}
