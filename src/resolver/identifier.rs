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

//! Identifier binding and factory invocation inside constraint expressions.

use super::*;
use std::iter::Peekable;
use std::vec::IntoIter;

type TokenStream = Peekable<IntoIter<Token>>;

/// What one identifier in an expression resolved to.
#[derive(Debug, Clone)]
pub(super) enum Bound {
    /// Builtin primitive or the result of a factory call.
    Constraint(Constraint),
    /// Reference to a declared alias.
    Alias {
        name: String,
        constraints: Vec<Constraint>,
    },
    /// Reference to a declared definition or model.
    Struct {
        composite: Arc<Composite>,
        binding: String,
    },
}

impl Bound {
    /// Number of constraints this reference contributes.
    pub(super) fn constraint_count(&self) -> usize {
        match self {
            Bound::Alias { constraints, .. } => constraints.len(),
            _ => 1,
        }
    }

    /// Converts a reference into a single composable constraint.
    ///
    /// Alias and struct references become constraints that reach their
    /// target binding lazily in generated code.
    pub(super) fn into_constraint(self) -> Constraint {
        match self {
            Bound::Constraint(constraint) => constraint,
            Bound::Alias { name, constraints } => {
                let ty = TypeDescriptor::union(constraints.iter().map(|c| &c.ty));
                let symbol = format!("dep${name}");
                let code = format!("(v) => {symbol}().every((fn) => wrap(fn(v)))");
                Constraint::new(Check::All(constraints), ty, code).with_dependency(
                    symbol,
                    DependencyTarget::Binding(binding_name(Role::Alias, &name)),
                )
            }
            Bound::Struct { composite, binding } => {
                let symbol = format!("dep${}", composite.name);
                let ty = TypeDescriptor::named(composite.name.clone());
                let code = format!("(v) => {symbol}()(v)");
                Constraint::new(Check::Composite(composite), ty, code)
                    .with_dependency(symbol, DependencyTarget::Binding(binding))
            }
        }
    }
}

impl ResolveContext<'_> {
    /// Binds every identifier of a constraint expression.
    pub(super) fn resolve_expression(
        &mut self,
        tokens: Vec<Token>,
    ) -> Result<Vec<Bound>, CompileError> {
        let mut stream = tokens.into_iter().peekable();
        let mut bound = Vec::new();
        while let Some(token) = stream.next() {
            if token.kind != TokenKind::Identifier {
                return Err(token.error(
                    ErrorKind::Structural,
                    format!("Unexpected token '{}'", token.text),
                ));
            }
            bound.push(self.identifier(&token, &mut stream)?);
        }
        Ok(bound)
    }

    /// Binds one identifier, invoking it when an argument list follows.
    fn identifier(&mut self, token: &Token, rest: &mut TokenStream) -> Result<Bound, CompileError> {
        let invoked = rest
            .peek()
            .is_some_and(|next| next.kind == TokenKind::OpenParen);
        if !invoked {
            return self.reference(token);
        }

        let builtins = self.builtins;
        let Some(factory) = builtins.factory(&token.text) else {
            if self.bindings.contains_key(&token.text) || builtins.contains(&token.text) {
                return Err(token.error(
                    ErrorKind::Reference,
                    format!("Identifier '{}' is not a factory", token.text),
                ));
            }
            return Err(unknown_identifier(token));
        };

        rest.next();
        let args = self.arguments(token, rest)?;
        let id = self.next_invocation_id();
        trace!(factory = factory.name(), id, args = args.len(), "invoking factory");
        let call = FactoryCall { token, id };
        factory.invoke(&call, args).map(Bound::Constraint)
    }

    /// Binds a bare (uninvoked) identifier.
    fn reference(&mut self, token: &Token) -> Result<Bound, CompileError> {
        let name = &token.text;
        if let Some(binding) = self.bindings.get(name) {
            let bound = match binding {
                Binding::Alias(constraints) => Bound::Alias {
                    name: name.clone(),
                    constraints: constraints.clone(),
                },
                Binding::Definition(composite) => Bound::Struct {
                    composite: composite.clone(),
                    binding: binding_name(Role::Definition, name),
                },
                Binding::Model(composite) => Bound::Struct {
                    composite: composite.clone(),
                    binding: binding_name(Role::Model, name),
                },
            };
            self.record_dependency(name);
            return Ok(bound);
        }
        if let Some(primitive) = self.builtins.primitive(name) {
            return Ok(Bound::Constraint(primitive.clone()));
        }
        if self.builtins.factory(name).is_some() {
            return Err(token.error(
                ErrorKind::Reference,
                format!("Factory '{name}' wasn't called"),
            ));
        }
        Err(unknown_identifier(token))
    }

    /// Parses a factory argument list; the opening paren is already consumed.
    fn arguments(
        &mut self,
        callee: &Token,
        rest: &mut TokenStream,
    ) -> Result<Vec<Argument>, CompileError> {
        let mut args = Vec::new();
        if rest.next_if(|t| t.kind == TokenKind::CloseParen).is_some() {
            return Ok(args);
        }
        loop {
            let token = rest.next().ok_or_else(|| unclosed_call(callee))?;
            let arg = match token.kind {
                kind if kind.is_literal() => Argument::Literal(Literal::from_token(&token)?),
                TokenKind::Identifier => {
                    let bound = self.identifier(&token, rest)?;
                    if bound.constraint_count() > 1 {
                        return Err(token.error(
                            ErrorKind::Reference,
                            format!(
                                "Cannot pass '{}' as a parameter, it resolves to more than one constraint",
                                token.text
                            ),
                        ));
                    }
                    Argument::Constraint(bound.into_constraint())
                }
                _ => {
                    return Err(token.error(
                        ErrorKind::Structural,
                        format!("Expected an argument, found '{}'", token.text),
                    ));
                }
            };
            args.push(arg);

            let separator = rest.next().ok_or_else(|| unclosed_call(callee))?;
            match separator.kind {
                TokenKind::Comma => {}
                TokenKind::CloseParen => return Ok(args),
                _ => {
                    return Err(separator.error(
                        ErrorKind::Structural,
                        format!("Expected ',' or ')', found '{}'", separator.text),
                    ));
                }
            }
        }
    }
}

fn unknown_identifier(token: &Token) -> CompileError {
    token.error(
        ErrorKind::Reference,
        format!("Identifier '{}' does not exist", token.text),
    )
}

fn unclosed_call(callee: &Token) -> CompileError {
    callee.error(
        ErrorKind::Structural,
        format!("Argument list of '{}' is not closed", callee.text),
    )
}
