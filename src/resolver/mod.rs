/*
MIT License

Copyright (c) 2026 Raja Lehtihet and Wael El Oraiby

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! Name resolution: turns parsed declarations into a [`ResolvedSchema`].
//!
//! Declarations are consumed strictly in source order, so a name must be
//! declared before it is referenced. Lookup order for an identifier is
//! aliases, definitions, models, builtin primitives, then builtin factories.

mod builtins;
mod context;
mod decls;
mod identifier;

use crate::ast::{AliasDecl, ConfigBlock, Literal, Struct, StructDecl, Token, TokenKind};
use crate::constraint::{
    Check, Composite, Constraint, DependencyTarget, EvaluationFault, Property, TypeDescriptor,
};
use crate::diagnostics::{CompileError, ErrorKind};
use crate::emitter::instantiate;
use serde::Serialize;
use serde::ser::SerializeMap;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, trace};

pub use self::builtins::{Argument, Builtins, Factory, FactoryCall, FactoryFn};
use self::context::{Binding, ResolveContext};

/// Resolves declarations against the process-wide builtin registry.
pub fn resolve(structs: Vec<Struct>) -> Result<ResolvedSchema, CompileError> {
    resolve_with(Builtins::shared(), structs)
}

/// Resolves declarations against an explicitly supplied builtin registry.
pub fn resolve_with(
    builtins: &Builtins,
    structs: Vec<Struct>,
) -> Result<ResolvedSchema, CompileError> {
    let mut ctx = ResolveContext::new(builtins);
    for decl in structs {
        ctx.resolve_struct(decl)?;
    }
    let schema = ctx.build();
    debug!(
        config = schema.config.len(),
        aliases = schema.aliases.len(),
        definitions = schema.definitions.len(),
        models = schema.models.len(),
        "resolved schema"
    );
    Ok(schema)
}

/// Declaration kinds that own a top-level binding in generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Alias,
    Definition,
    Model,
}

/// Generated binding name of a declaration.
///
/// Models use `isName`, or `is_name` when the name is snake_case.
pub fn binding_name(role: Role, name: &str) -> String {
    match role {
        Role::Alias => format!("alias${name}"),
        Role::Definition => format!("def${name}"),
        Role::Model if is_snake_case(name) => format!("is_{name}"),
        Role::Model => format!("is{name}"),
    }
}

/// Matches `^[a-z]+(_[a-z]+)*$`.
fn is_snake_case(name: &str) -> bool {
    name.split('_')
        .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_lowercase()))
}

/// Ordered configuration map; re-inserting a key overwrites it in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigMap {
    entries: Vec<(String, Literal)>,
}

impl ConfigMap {
    pub fn insert(&mut self, key: impl Into<String>, value: Literal) {
        let key = key.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Literal> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Literal)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ConfigMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, &value.to_json())?;
        }
        map.end()
    }
}

/// A resolved `alias`.
#[derive(Debug, Clone)]
pub struct AliasEntry {
    pub name: String,
    /// Flattened constraints; nested alias references are inlined.
    pub constraints: Vec<Constraint>,
}

impl AliasEntry {
    /// Union of the constraint types.
    pub fn ty(&self) -> TypeDescriptor {
        TypeDescriptor::union(self.constraints.iter().map(|c| &c.ty))
    }

    /// Conjunction of all constraints against a present value.
    pub fn test(&self, value: &Value) -> Result<bool, EvaluationFault> {
        for constraint in &self.constraints {
            if !constraint.test(value)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// A resolved `define` or `model`.
#[derive(Debug, Clone)]
pub struct StructEntry {
    pub name: String,
    pub composite: Arc<Composite>,
    /// Constraint that validates a whole value against this struct.
    pub constraint: Constraint,
}

impl StructEntry {
    pub fn properties(&self) -> &[Property] {
        &self.composite.properties
    }

    pub fn validate(&self, value: &Value) -> Result<bool, EvaluationFault> {
        self.composite.validate(value)
    }
}

/// Output of resolution, consumed by the emitter.
#[derive(Debug, Clone, Default)]
pub struct ResolvedSchema {
    pub config: ConfigMap,
    pub aliases: Vec<AliasEntry>,
    pub definitions: Vec<StructEntry>,
    pub models: Vec<StructEntry>,
    /// Accumulated global statements, one per line, possibly repeated.
    pub preamble: String,
    /// Declared name -> declared names it references.
    pub dependencies: BTreeMap<String, BTreeSet<String>>,
}

impl ResolvedSchema {
    pub fn alias(&self, name: &str) -> Option<&AliasEntry> {
        self.aliases.iter().find(|alias| alias.name == name)
    }

    pub fn definition(&self, name: &str) -> Option<&StructEntry> {
        self.definitions.iter().find(|entry| entry.name == name)
    }

    pub fn model(&self, name: &str) -> Option<&StructEntry> {
        self.models.iter().find(|entry| entry.name == name)
    }
}
