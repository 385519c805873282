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

//! Resolution of top-level declarations.

use super::identifier::Bound;
use super::*;

impl ResolveContext<'_> {
    pub(super) fn resolve_struct(&mut self, decl: Struct) -> Result<(), CompileError> {
        match decl {
            Struct::Config(block) => self.resolve_config(block),
            Struct::Alias(alias) => self.resolve_alias(alias),
            Struct::Define(decl) => self.resolve_composite(decl, Role::Definition),
            Struct::Model(decl) => self.resolve_composite(decl, Role::Model),
        }
    }

    /// Merges a `config` block; later keys overwrite earlier ones.
    fn resolve_config(&mut self, block: ConfigBlock) -> Result<(), CompileError> {
        for option in block.options {
            if option.key.kind != TokenKind::Identifier {
                return Err(option.key.error(
                    ErrorKind::Structural,
                    format!("Incorrect configuration syntax, '{}' is not a name", option.key.text),
                ));
            }
            if !option.value.kind.is_literal() {
                return Err(option.value.error(
                    ErrorKind::Structural,
                    format!(
                        "Incorrect configuration syntax, '{}' is not a literal",
                        option.value.text
                    ),
                ));
            }
            let value = Literal::from_token(&option.value)?;
            trace!(key = %option.key.text, %value, "config option");
            self.schema.config.insert(option.key.text, value);
        }
        Ok(())
    }

    fn resolve_alias(&mut self, alias: AliasDecl) -> Result<(), CompileError> {
        self.declare(&alias.name)?;
        self.claim(binding_name(Role::Alias, &alias.name.text), &alias.name)?;
        let name = alias.name.text;

        // Referenced aliases are flattened into this one.
        let mut constraints = Vec::new();
        for bound in self.resolve_expression(alias.body)? {
            match bound {
                Bound::Alias {
                    constraints: inner, ..
                } => constraints.extend(inner),
                other => constraints.push(other.into_constraint()),
            }
        }

        trace!(alias = %name, constraints = constraints.len(), "bound alias");
        self.bindings
            .insert(name.clone(), Binding::Alias(constraints.clone()));
        self.schema.aliases.push(AliasEntry { name, constraints });
        Ok(())
    }

    /// Resolves a `define` or `model` body into a composite constraint.
    fn resolve_composite(&mut self, decl: StructDecl, role: Role) -> Result<(), CompileError> {
        self.declare(&decl.name)?;
        self.claim(binding_name(role, &decl.name.text), &decl.name)?;
        self.claim(format!("members${}", decl.name.text), &decl.name)?;
        let name = decl.name.text;

        let mut seen = HashSet::new();
        let mut properties = Vec::new();
        let mut members = Vec::new();
        for line in decl.properties {
            let property = line.name.text.clone();
            if !seen.insert(property.clone()) {
                return Err(line.name.error(
                    ErrorKind::Reference,
                    format!("Property '{property}' is declared twice in '{name}'"),
                ));
            }
            let symbol = format!("{name}${property}");
            self.claim(symbol.clone(), &line.name)?;

            let constraints: Vec<Constraint> = self
                .resolve_expression(line.constraints)?
                .into_iter()
                .map(Bound::into_constraint)
                .collect();
            let ty = TypeDescriptor::union(constraints.iter().map(|c| &c.ty));

            let mut generated = Vec::with_capacity(constraints.len());
            for constraint in &constraints {
                generated.push(instantiate(&symbol, constraint, &mut self.schema.preamble));
            }
            self.push_global(&format!("const {symbol} = [{}];", generated.join(", ")));
            members.push(format!(
                "(v) => {symbol}.every((fn) => wrap(fn(field(v, {}))))",
                Value::from(property.as_str())
            ));

            properties.push(Property {
                name: property,
                ty,
                constraints,
            });
        }
        self.push_global(&format!("const members${name} = [{}];", members.join(", ")));

        let composite = Arc::new(Composite {
            name: name.clone(),
            properties,
        });
        let constraint = Constraint::new(
            Check::Composite(composite.clone()),
            TypeDescriptor::named(name.clone()),
            format!("(v) => members${name}.every((fn) => fn(v))"),
        );
        let entry = StructEntry {
            name: name.clone(),
            composite: composite.clone(),
            constraint,
        };

        trace!(name = %name, ?role, properties = entry.properties().len(), "bound struct");
        match role {
            Role::Model => {
                self.bindings.insert(name, Binding::Model(composite));
                self.schema.models.push(entry);
            }
            _ => {
                self.bindings.insert(name, Binding::Definition(composite));
                self.schema.definitions.push(entry);
            }
        }
        Ok(())
    }
}
