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

//! Token recognizers, one per token kind, in match priority order.

use crate::ast::{Span, TokenKind};
use nom::Parser;
use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{anychar, char, digit0, digit1, one_of, satisfy},
    combinator::{not, opt, recognize},
    multi::many0_count,
    sequence::{pair, terminated, tuple},
};

/// Matched prefix of the remaining input.
pub(super) type Recognized<'a> = IResult<Span<'a>, Span<'a>>;

pub(super) type Recognizer = for<'a> fn(Span<'a>) -> Recognized<'a>;

/// Token patterns in fixed priority order; the first match wins.
pub(super) const PATTERNS: [(TokenKind, Recognizer); 16] = [
    (TokenKind::Newline, newline),
    (TokenKind::Whitespace, whitespace),
    (TokenKind::Comment, comment),
    (TokenKind::Config, config_keyword),
    (TokenKind::Alias, alias_keyword),
    (TokenKind::Define, define_keyword),
    (TokenKind::Model, model_keyword),
    (TokenKind::Boolean, boolean),
    (TokenKind::Identifier, identifier),
    (TokenKind::Number, number),
    (TokenKind::String, string),
    (TokenKind::OpenBrace, open_brace),
    (TokenKind::CloseBrace, close_brace),
    (TokenKind::OpenParen, open_paren),
    (TokenKind::CloseParen, close_paren),
    (TokenKind::Comma, comma),
];

/// Returns whether a char can start an identifier.
fn is_ident_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_ascii_alphabetic() || ('\u{A0}'..='\u{FFFF}').contains(&c)
}

/// Returns whether a char can continue an identifier.
fn is_ident_continue(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

/// Matches `text` only as a whole word.
fn word<'a>(text: &'static str) -> impl FnMut(Span<'a>) -> Recognized<'a> {
    recognize(terminated(tag(text), not(satisfy(is_ident_continue))))
}

fn newline(input: Span<'_>) -> Recognized<'_> {
    take_while1(|c: char| c == '\n').parse(input)
}

fn whitespace(input: Span<'_>) -> Recognized<'_> {
    take_while1(|c: char| matches!(c, ' ' | '\t' | '\r' | '\x0B' | '\x0C'))
        .parse(input)
}

/// Parses `// ...` up to (not including) the line break.
fn comment(input: Span<'_>) -> Recognized<'_> {
    recognize(pair(tag("//"), take_while(|c: char| c != '\n')))
        .parse(input)
}

fn config_keyword(input: Span<'_>) -> Recognized<'_> {
    word("config").parse(input)
}

fn alias_keyword(input: Span<'_>) -> Recognized<'_> {
    word("alias").parse(input)
}

fn define_keyword(input: Span<'_>) -> Recognized<'_> {
    word("define").parse(input)
}

fn model_keyword(input: Span<'_>) -> Recognized<'_> {
    word("model").parse(input)
}

fn boolean(input: Span<'_>) -> Recognized<'_> {
    alt((word("true"), word("false"))).parse(input)
}

/// Parses identifiers (`[_$A-Za-z\u{A0}-\u{FFFF}][_$A-Za-z0-9\u{A0}-\u{FFFF}]*`).
fn identifier(input: Span<'_>) -> Recognized<'_> {
    recognize(pair(satisfy(is_ident_start), take_while(is_ident_continue)))
        .parse(input)
}

/// Parses `[+-]?\d+(\.\d*)?` or `\.\d+`.
fn number(input: Span<'_>) -> Recognized<'_> {
    alt((
        recognize(tuple((opt(one_of("+-")), digit1, opt(char('.')), digit0))),
        recognize(pair(char('.'), digit1)),
    ))
    .parse(input)
}

/// Parses a double- or single-quoted literal, quotes included.
///
/// A backslash escapes the next character; the literal may span lines.
fn string(input: Span<'_>) -> Recognized<'_> {
    alt((quoted('"'), quoted('\''))).parse(input)
}

fn quoted<'a>(quote: char) -> impl FnMut(Span<'a>) -> Recognized<'a> {
    recognize(tuple((
        char(quote),
        many0_count(alt((
            recognize(pair(char('\\'), anychar)),
            take_while1(move |c: char| c != quote && c != '\\'),
        ))),
        char(quote),
    )))
}

fn open_brace(input: Span<'_>) -> Recognized<'_> {
    recognize(char('{')).parse(input)
}

fn close_brace(input: Span<'_>) -> Recognized<'_> {
    recognize(char('}')).parse(input)
}

fn open_paren(input: Span<'_>) -> Recognized<'_> {
    recognize(char('(')).parse(input)
}

fn close_paren(input: Span<'_>) -> Recognized<'_> {
    recognize(char(')')).parse(input)
}

fn comma(input: Span<'_>) -> Recognized<'_> {
    recognize(char(',')).parse(input)
}
