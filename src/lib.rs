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

//! Type guard compiler.
//!
//! Compiles a small declarative schema language into two texts: a
//! JavaScript module of runtime validation predicates and a TypeScript
//! declaration module with matching interfaces and type guards.
//!
//! ```text
//! config {
//!     strict true
//! }
//!
//! alias ErrorCode range(400, 599)
//!
//! model APIError {
//!     status   number ErrorCode
//!     endpoint string match("(/[^/]*)+")
//!     details  optional(string)
//! }
//! ```
//!
//! # Pipeline
//!
//! 1. [`tokenize`]: context-sensitive lexing with an adjacency table.
//! 2. [`parse`]: grouping tokens into `config`/`alias`/`define`/`model`.
//! 3. [`resolve`]: binding names in declaration order into constraints.
//! 4. [`emit`]: rendering the validation and declaration modules.
//!
//! Resolved constraints can also be evaluated directly against
//! `serde_json::Value` input (see [`StructEntry::validate`]).

mod ast;
mod constraint;
mod diagnostics;
mod emitter;
mod format;
mod hooks;
mod lexer;
mod parser;
mod resolver;

pub use ast::{
    AliasDecl, ConfigBlock, ConfigOption, Literal, PropertyLine, SourceSpan, Struct, StructDecl,
    Token, TokenKind,
};
pub use constraint::{
    Check, Composite, Constraint, Dependency, DependencyTarget, EvaluationFault, Limit, Primitive,
    Property, TypeDescriptor, Verdict,
};
pub use diagnostics::{CompileError, ErrorKind};
pub use emitter::{DECLARATION_FILE, EmittedModules, VALIDATION_FILE, emit};
pub use format::{format_schema, print_structs};
pub use hooks::{CompilerHooks, NoopHooks};
pub use lexer::tokenize;
pub use parser::parse;
pub use resolver::{
    AliasEntry, Argument, Builtins, ConfigMap, Factory, FactoryCall, FactoryFn, ResolvedSchema,
    Role, StructEntry, binding_name, resolve, resolve_with,
};

use tracing::debug;

/// Source label used when the caller does not name the schema.
pub const INLINE_SOURCE: &str = "<inline>";

/// Compiles schema text into the validation and declaration modules.
///
/// # Errors
///
/// Returns [`CompileError`] with line/column and caret highlight when any
/// stage rejects the schema.
pub fn compile(source: &str) -> Result<EmittedModules, CompileError> {
    compile_in_source(source, INLINE_SOURCE)
}

/// Compiles schema text, tagging diagnostics with `source_name`.
pub fn compile_in_source(
    source: &str,
    source_name: &str,
) -> Result<EmittedModules, CompileError> {
    compile_with_hooks(source, source_name, &NoopHooks)
}

/// Compiles schema text and runs `hooks` after every stage.
pub fn compile_with_hooks(
    source: &str,
    source_name: &str,
    hooks: &dyn CompilerHooks,
) -> Result<EmittedModules, CompileError> {
    debug!(source = source_name, bytes = source.len(), "compiling schema");
    let schema = resolve_stages(source, source_name, hooks)?;
    let mut modules = emit(&schema);
    hooks.after_emit(&mut modules);
    Ok(modules)
}

/// Runs the front half of the pipeline and returns the resolved schema.
///
/// Useful for validating values in-process without generating code.
pub fn resolve_source(source: &str) -> Result<ResolvedSchema, CompileError> {
    resolve_stages(source, INLINE_SOURCE, &NoopHooks)
}

fn resolve_stages(
    source: &str,
    source_name: &str,
    hooks: &dyn CompilerHooks,
) -> Result<ResolvedSchema, CompileError> {
    let attach = |err: CompileError| err.with_source(source_name, source);

    let mut tokens = tokenize(source).map_err(attach)?;
    hooks.after_tokenize(&mut tokens);

    let mut structs = parse(tokens).map_err(attach)?;
    hooks.after_parse(&mut structs);

    let mut schema = resolve(structs).map_err(attach)?;
    hooks.after_resolve(&mut schema);
    Ok(schema)
}

#[cfg(test)]
mod tests;
