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

//! Structural parser.
//!
//! Groups the flat token stream into top-level declarations:
//! - `config { key value ... }`
//! - `alias Name expr...` (one line)
//! - `define Name { property expr... }`
//! - `model Name { property expr... }`
//!
//! Constraint expressions are kept as raw token lists; the resolver gives
//! them meaning.

mod cursor;
mod structs;

use crate::ast::{Struct, Token, TokenKind};
use crate::diagnostics::{CompileError, ErrorKind};
use tracing::debug;

use self::cursor::TokenCursor;
use self::structs::{alias_decl, config_block, struct_decl};

/// Parses a token stream into ordered declarations.
pub fn parse(tokens: Vec<Token>) -> Result<Vec<Struct>, CompileError> {
    check_balance(&tokens)?;

    let tokens = tokens
        .into_iter()
        .filter(|token| !token.kind.is_layout())
        .collect();
    let mut cursor = TokenCursor::new(tokens);
    let mut structs = Vec::new();

    while let Some(token) = cursor.next() {
        let parsed = match token.kind {
            TokenKind::Newline => continue,
            TokenKind::Config => Struct::Config(config_block(token, &mut cursor)?),
            TokenKind::Alias => Struct::Alias(alias_decl(token, &mut cursor)?),
            TokenKind::Define => Struct::Define(struct_decl(token, &mut cursor)?),
            TokenKind::Model => Struct::Model(struct_decl(token, &mut cursor)?),
            _ => {
                return Err(token.error(
                    ErrorKind::Structural,
                    format!("Unexpected {}", token.describe()),
                ));
            }
        };
        structs.push(parsed);
    }

    debug!(structs = structs.len(), "parsed schema");
    Ok(structs)
}

/// Rejects unbalanced or interleaved braces and parentheses.
///
/// Reports the first stray closer, or else the innermost unclosed opener.
fn check_balance(tokens: &[Token]) -> Result<(), CompileError> {
    let mut open: Vec<&Token> = Vec::new();
    for token in tokens {
        let expected = match token.kind {
            TokenKind::OpenBrace | TokenKind::OpenParen => {
                open.push(token);
                continue;
            }
            TokenKind::CloseBrace => TokenKind::OpenBrace,
            TokenKind::CloseParen => TokenKind::OpenParen,
            _ => continue,
        };
        match open.pop() {
            Some(opener) if opener.kind == expected => {}
            Some(opener) => {
                return Err(token.error(
                    ErrorKind::Structural,
                    format!(
                        "Mismatched '{}', '{}' opened at {}:{} is not closed",
                        token.text, opener.text, opener.line, opener.column
                    ),
                ));
            }
            None => {
                return Err(token.error(
                    ErrorKind::Structural,
                    format!("Unmatched '{}'", token.text),
                ));
            }
        }
    }
    match open.last() {
        Some(opener) => Err(opener.error(
            ErrorKind::Structural,
            format!("Unclosed '{}'", opener.text),
        )),
        None => Ok(()),
    }
}
