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

//! Context-sensitive lexer.
//!
//! Each step tries every token pattern in priority order and takes the first
//! one that matches. The match is only accepted when its kind may follow the
//! previously emitted token (see [`adjacency`]). Inside a `{ ... }` block the
//! keyword patterns are skipped, so reserved words lex as identifiers there.

mod adjacency;
mod patterns;

use crate::ast::{Span, SourceSpan, Token, TokenKind};
use crate::diagnostics::{CompileError, ErrorKind};
use adjacency::permitted_after;
use patterns::PATTERNS;
use tracing::{debug, trace};

struct Lexer<'a> {
    input: Span<'a>,
    previous: Option<TokenKind>,
    in_block: bool,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            input: Span::new(source),
            previous: None,
            in_block: false,
        }
    }

    fn is_done(&self) -> bool {
        self.input.fragment().is_empty()
    }

    fn next_token(&mut self) -> Result<Token, CompileError> {
        for (kind, recognize) in PATTERNS {
            if self.in_block && kind.is_keyword() {
                continue;
            }
            let Ok((rest, matched)) = recognize(self.input) else {
                continue;
            };

            let line = matched.location_line() as usize;
            let column = matched.get_utf8_column();
            let token = Token::new(kind, *matched.fragment(), line, column);

            if !permitted_after(self.previous).contains(&kind) {
                let message = match kind {
                    TokenKind::Newline | TokenKind::Whitespace => {
                        format!("Unexpected {}", kind.label())
                    }
                    _ => format!("Unexpected token '{}'", token.text),
                };
                return Err(token.error(ErrorKind::Lexical, message));
            }

            match kind {
                TokenKind::OpenBrace => self.in_block = true,
                TokenKind::CloseBrace => self.in_block = false,
                _ => {}
            }
            self.previous = Some(kind);
            self.input = rest;
            return Ok(token);
        }

        let symbol = self.input.fragment().chars().next().unwrap_or_default();
        let span = SourceSpan::new(
            self.input.location_line() as usize,
            self.input.get_utf8_column(),
            1,
        );
        Err(CompileError::at(
            ErrorKind::Lexical,
            format!("Unexpected symbol '{symbol}'"),
            &span,
        ))
    }
}

/// Converts schema text into the full token stream, layout tokens included.
pub fn tokenize(source: &str) -> Result<Vec<Token>, CompileError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    while !lexer.is_done() {
        let token = lexer.next_token()?;
        trace!(kind = ?token.kind, line = token.line, column = token.column, "token");
        tokens.push(token);
    }
    debug!(tokens = tokens.len(), "tokenized schema");
    Ok(tokens)
}
