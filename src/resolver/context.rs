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

//! Resolution context and core state management.

use super::*;

/// What a declared name is bound to.
#[derive(Debug, Clone)]
pub(super) enum Binding {
    Alias(Vec<Constraint>),
    Definition(Arc<Composite>),
    Model(Arc<Composite>),
}

/// Resolution state for one schema.
///
/// Holds the declared bindings and the schema being accumulated.
pub(super) struct ResolveContext<'b> {
    pub(super) builtins: &'b Builtins,
    pub(super) bindings: HashMap<String, Binding>,
    /// Top-level names of the validation module -> owning declaration.
    pub(super) symbols: HashMap<String, String>,
    pub(super) schema: ResolvedSchema,
    pub(super) invocation_counter: usize,
    pub(super) current_decl: Option<String>,
}

impl<'b> ResolveContext<'b> {
    pub(super) fn new(builtins: &'b Builtins) -> Self {
        Self {
            builtins,
            bindings: HashMap::new(),
            symbols: HashMap::new(),
            schema: ResolvedSchema::default(),
            invocation_counter: 0,
            current_decl: None,
        }
    }

    /// Returns a fresh id for a factory invocation.
    pub(super) fn next_invocation_id(&mut self) -> usize {
        self.invocation_counter += 1;
        self.invocation_counter
    }

    /// Registers a new declared name and makes it the current declaration.
    ///
    /// Names may not collide with earlier declarations or with builtins.
    pub(super) fn declare(&mut self, name: &Token) -> Result<(), CompileError> {
        if self.bindings.contains_key(&name.text) || self.builtins.contains(&name.text) {
            return Err(name.error(
                ErrorKind::Reference,
                format!("Identifier '{}' has already been declared", name.text),
            ));
        }
        self.schema.dependencies.entry(name.text.clone()).or_default();
        self.current_decl = Some(name.text.clone());
        Ok(())
    }

    /// Reserves a generated top-level name for the current declaration.
    ///
    /// Distinct declarations may still map onto the same generated name
    /// (`foo` and `_foo` both guard as `is_foo`), which would not load.
    pub(super) fn claim(&mut self, symbol: String, anchor: &Token) -> Result<(), CompileError> {
        let owner = self.current_decl.clone().unwrap_or_default();
        if let Some(previous) = self.symbols.get(&symbol) {
            return Err(anchor.error(
                ErrorKind::Reference,
                format!("Generated name '{symbol}' of '{owner}' is already used by '{previous}'"),
            ));
        }
        self.symbols.insert(symbol, owner);
        Ok(())
    }

    /// Records that the current declaration references `name`.
    pub(super) fn record_dependency(&mut self, name: &str) {
        if let Some(current) = &self.current_decl {
            self.schema
                .dependencies
                .entry(current.clone())
                .or_default()
                .insert(name.to_string());
        }
    }

    /// Appends one global statement to the preamble.
    pub(super) fn push_global(&mut self, statement: &str) {
        self.schema.preamble.push('\n');
        self.schema.preamble.push_str(statement);
    }

    /// Finalizes resolution.
    pub(super) fn build(self) -> ResolvedSchema {
        self.schema
    }
}
