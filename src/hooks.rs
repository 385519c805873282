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

//! Extension points invoked between pipeline stages.

use crate::ast::{Struct, Token};
use crate::emitter::EmittedModules;
use crate::resolver::ResolvedSchema;

/// Callbacks run by [`crate::compile_with_hooks`] after each stage.
///
/// Every method defaults to a no-op; implementors override only the stages
/// they care about and may rewrite the stage output in place.
pub trait CompilerHooks {
    fn after_tokenize(&self, _tokens: &mut Vec<Token>) {}

    fn after_parse(&self, _structs: &mut Vec<Struct>) {}

    fn after_resolve(&self, _schema: &mut ResolvedSchema) {}

    fn after_emit(&self, _modules: &mut EmittedModules) {}
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl CompilerHooks for NoopHooks {}
