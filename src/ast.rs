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

//! Token and declaration definitions for the schema language.
//!
//! The lexer produces a flat [`Token`] stream first. The structural parser
//! then groups it into [`Struct`] declarations, which the resolver consumes
//! strictly in declaration order.

use crate::diagnostics::{CompileError, ErrorKind};
use nom_locate::LocatedSpan;
use serde::Serialize;
use std::fmt;

/// Lexer input span type carrying byte offsets and line/column info.
pub type Span<'a> = LocatedSpan<&'a str>;

/// Source anchor for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceSpan {
    /// 1-based line number.
    pub line: usize,
    /// 1-based UTF-8 column.
    pub column: usize,
    /// Highlighted length in characters.
    pub length: usize,
}

impl SourceSpan {
    /// Creates a span anchored at `line:column`.
    pub fn new(line: usize, column: usize, length: usize) -> Self {
        Self {
            line,
            column,
            length,
        }
    }

    /// Returns the highlighted length (at least one character).
    pub fn len(&self) -> usize {
        self.length.max(1)
    }
}

/// Lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    /// Numeric literal (`400`, `-1.5`, `.5`).
    Number,
    /// Quoted literal, quotes included in the token text.
    String,
    /// `true` / `false`.
    Boolean,
    /// `config` keyword.
    Config,
    /// `alias` keyword.
    Alias,
    /// `define` keyword.
    Define,
    /// `model` keyword.
    Model,
    /// Identifier reference or declared name.
    Identifier,
    /// Horizontal whitespace run.
    Whitespace,
    /// One or more line breaks.
    Newline,
    /// `// ...` line comment.
    Comment,
    /// `{`
    OpenBrace,
    /// `}`
    CloseBrace,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `,`
    Comma,
}

impl TokenKind {
    /// Returns whether this kind is one of the four reserved words.
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Config | TokenKind::Alias | TokenKind::Define | TokenKind::Model
        )
    }

    /// Returns whether this kind carries a literal value.
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::Number | TokenKind::String | TokenKind::Boolean
        )
    }

    /// Returns whether the structural parser discards this kind.
    ///
    /// Newlines are layout too, but they separate lines and are kept.
    pub fn is_layout(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }

    /// Human-readable label used in diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Boolean => "boolean",
            TokenKind::Config => "'config'",
            TokenKind::Alias => "'alias'",
            TokenKind::Define => "'define'",
            TokenKind::Model => "'model'",
            TokenKind::Identifier => "identifier",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Newline => "newline",
            TokenKind::Comment => "comment",
            TokenKind::OpenBrace => "'{'",
            TokenKind::CloseBrace => "'}'",
            TokenKind::OpenParen => "'('",
            TokenKind::CloseParen => "')'",
            TokenKind::Comma => "','",
        }
    }
}

/// One lexed token with its source position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Lexical category.
    pub kind: TokenKind,
    /// Exact source text.
    pub text: String,
    /// 1-based line number.
    pub line: usize,
    /// 1-based UTF-8 column.
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
        }
    }

    /// Returns the diagnostic span covering this token's first line.
    pub fn span(&self) -> SourceSpan {
        let first_line = self.text.lines().next().unwrap_or("");
        SourceSpan::new(self.line, self.column, first_line.chars().count())
    }

    /// Describes this token for diagnostics (`identifier 'x'`, `'{'`).
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Identifier | TokenKind::Number | TokenKind::String | TokenKind::Boolean => {
                format!("{} '{}'", self.kind.label(), self.text)
            }
            _ => self.kind.label().to_string(),
        }
    }

    /// Builds a diagnostic anchored at this token.
    pub fn error(&self, kind: ErrorKind, message: impl Into<String>) -> CompileError {
        CompileError::at(kind, message, &self.span())
    }
}

/// A primitive literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
    Boolean(bool),
}

impl Literal {
    /// Converts a literal token into its primitive value.
    ///
    /// String literals keep their raw contents: quotes are stripped but
    /// escape sequences are not interpreted.
    pub fn from_token(token: &Token) -> Result<Self, CompileError> {
        match token.kind {
            TokenKind::Boolean => Ok(Literal::Boolean(token.text == "true")),
            TokenKind::Number => match token.text.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(Literal::Number(value)),
                _ => Err(token.error(
                    ErrorKind::TypeConversion,
                    format!("Cannot convert '{}' to a finite number", token.text),
                )),
            },
            TokenKind::String => {
                let text = &token.text;
                Ok(Literal::String(text[1..text.len() - 1].to_string()))
            }
            _ => Err(token.error(
                ErrorKind::TypeConversion,
                format!("Cannot convert '{}' to a primitive", token.text),
            )),
        }
    }

    /// Type name used in argument diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Number(_) => "number",
            Literal::String(_) => "string",
            Literal::Boolean(_) => "boolean",
        }
    }

    /// Converts to JSON, printing integral numbers without a fraction.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Literal::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => {
                serde_json::Value::from(*n as i64)
            }
            Literal::Number(n) => serde_json::Value::from(*n),
            Literal::String(s) => serde_json::Value::from(s.as_str()),
            Literal::Boolean(b) => serde_json::Value::from(*b),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(n) => write!(f, "{n}"),
            Literal::String(s) => write!(f, "{s:?}"),
            Literal::Boolean(b) => write!(f, "{b}"),
        }
    }
}

/// One `key value` line of a `config` block.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigOption {
    /// Option name (expected to be an identifier).
    pub key: Token,
    /// Option value, retyped by shape during parsing.
    pub value: Token,
}

/// `config { ... }` block.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigBlock {
    /// The `config` keyword token.
    pub keyword: Token,
    /// Options in source order.
    pub options: Vec<ConfigOption>,
}

/// `alias Name expr...` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct AliasDecl {
    /// Declared name.
    pub name: Token,
    /// Unparsed constraint expression tokens.
    pub body: Vec<Token>,
}

/// One `property constraint...` line of a definition or model.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyLine {
    /// Property name token.
    pub name: Token,
    /// Unparsed constraint expression tokens (never empty).
    pub constraints: Vec<Token>,
}

/// Body shared by `define` and `model` declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    /// Declared name.
    pub name: Token,
    /// Property lines in source order.
    pub properties: Vec<PropertyLine>,
}

/// One top-level declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Struct {
    Config(ConfigBlock),
    Alias(AliasDecl),
    Define(StructDecl),
    Model(StructDecl),
}

impl Struct {
    /// Declared name, `None` for configuration blocks.
    pub fn name(&self) -> Option<&str> {
        match self {
            Struct::Config(_) => None,
            Struct::Alias(alias) => Some(&alias.name.text),
            Struct::Define(decl) | Struct::Model(decl) => Some(&decl.name.text),
        }
    }

    /// Keyword that introduces this declaration.
    pub fn keyword(&self) -> &'static str {
        match self {
            Struct::Config(_) => "config",
            Struct::Alias(_) => "alias",
            Struct::Define(_) => "define",
            Struct::Model(_) => "model",
        }
    }
}
