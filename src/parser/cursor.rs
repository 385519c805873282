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

//! Forward-only cursor over the filtered token stream.

use crate::ast::{Token, TokenKind};
use crate::diagnostics::{CompileError, ErrorKind};
use std::iter::Peekable;
use std::vec::IntoIter;

pub(super) struct TokenCursor {
    tokens: Peekable<IntoIter<Token>>,
}

impl TokenCursor {
    pub(super) fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter().peekable(),
        }
    }

    pub(super) fn next(&mut self) -> Option<Token> {
        self.tokens.next()
    }

    pub(super) fn skip_newlines(&mut self) {
        while self
            .tokens
            .next_if(|token| token.kind == TokenKind::Newline)
            .is_some()
        {}
    }

    /// Consumes the next token, which must be of `kind`.
    ///
    /// `anchor` positions the error when input ends early.
    pub(super) fn expect(
        &mut self,
        kind: TokenKind,
        what: &str,
        anchor: &Token,
    ) -> Result<Token, CompileError> {
        match self.tokens.next() {
            Some(token) if token.kind == kind => Ok(token),
            Some(token) => Err(token.error(
                ErrorKind::Structural,
                format!("Expected {what}, found {}", token.describe()),
            )),
            None => Err(anchor.error(
                ErrorKind::Structural,
                format!("Unexpected end of input, expected {what}"),
            )),
        }
    }

    /// Consumes tokens up to the next newline (dropped) or end of input.
    pub(super) fn read_line(&mut self) -> Vec<Token> {
        let mut line = Vec::new();
        while let Some(token) = self.tokens.next() {
            if token.kind == TokenKind::Newline {
                break;
            }
            line.push(token);
        }
        line
    }
}
