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

//! Token adjacency table.
//!
//! The lexer is a small state machine whose state is the kind of the most
//! recently emitted token. This table lists the kinds allowed to follow each
//! state; the start state (`None`) only admits keywords and layout.

use crate::ast::TokenKind as K;

/// Returns the token kinds permitted after `previous`.
pub(super) fn permitted_after(previous: Option<K>) -> &'static [K] {
    match previous {
        None => &[
            K::Config,
            K::Alias,
            K::Define,
            K::Model,
            K::Newline,
            K::Whitespace,
            K::Comment,
        ],
        Some(K::Newline) => &[
            K::Config,
            K::Alias,
            K::Define,
            K::Model,
            K::Identifier,
            K::CloseBrace,
            K::Whitespace,
            K::Comment,
        ],
        Some(K::Whitespace) => &[
            K::Comma,
            K::Number,
            K::String,
            K::Boolean,
            K::Config,
            K::Alias,
            K::Define,
            K::Model,
            K::Identifier,
            K::Newline,
            K::OpenBrace,
            K::CloseBrace,
            K::Comment,
        ],
        Some(K::Comment) => &[K::Newline],
        Some(K::Config) => &[K::Newline, K::Whitespace, K::OpenBrace],
        Some(K::Alias | K::Define | K::Model) => &[K::Whitespace],
        Some(K::Identifier) => &[
            K::Comma,
            K::Newline,
            K::Whitespace,
            K::OpenParen,
            K::CloseParen,
        ],
        Some(K::Number | K::String | K::Boolean) => {
            &[K::Newline, K::Whitespace, K::CloseParen, K::Comma]
        }
        Some(K::OpenBrace | K::CloseBrace) => &[K::Newline, K::Whitespace],
        Some(K::OpenParen) => &[
            K::Identifier,
            K::Number,
            K::String,
            K::Boolean,
            K::Whitespace,
            K::CloseParen,
        ],
        Some(K::CloseParen) => &[
            K::Identifier,
            K::Whitespace,
            K::Newline,
            K::Comma,
            K::CloseParen,
        ],
        Some(K::Comma) => &[
            K::Identifier,
            K::Number,
            K::String,
            K::Boolean,
            K::Whitespace,
        ],
    }
}
