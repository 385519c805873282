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

//! Compile-time diagnostics with source snippets and caret pointers.

use crate::ast::SourceSpan;
use serde::Serialize;
use std::fmt;

/// Root-cause category of a compile error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// Invalid character or invalid token adjacency.
    Lexical,
    /// Unbalanced delimiters, malformed block syntax, unconstrained property.
    Structural,
    /// Unknown or duplicate identifier, factory misuse.
    Reference,
    /// Literal conversion failure or bad factory arguments.
    TypeConversion,
}

impl ErrorKind {
    fn label(self) -> &'static str {
        match self {
            ErrorKind::Lexical => "LexicalError",
            ErrorKind::Structural => "StructuralError",
            ErrorKind::Reference => "ReferenceError",
            ErrorKind::TypeConversion => "TypeConversionError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rich compile error returned by every pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileError {
    /// Error category.
    pub kind: ErrorKind,
    /// Human-readable error message.
    pub message: String,
    /// Source file/path label (`""` when unavailable).
    pub file: String,
    /// 1-based line number (`0` when unavailable).
    pub line: usize,
    /// 1-based column number (`0` when unavailable).
    pub column: usize,
    /// Source line snippet where the error occurred.
    pub snippet: String,
    /// Caret pointer aligned to `snippet`.
    pub pointer: String,
    #[serde(skip)]
    length: usize,
}

impl CompileError {
    /// Creates an error with no location information.
    pub fn message_only(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            file: String::new(),
            line: 0,
            column: 0,
            snippet: String::new(),
            pointer: String::new(),
            length: 0,
        }
    }

    /// Creates a positioned error without source text.
    ///
    /// Snippet and pointer stay empty until [`CompileError::with_source`]
    /// is applied.
    pub fn at(kind: ErrorKind, message: impl Into<String>, span: &SourceSpan) -> Self {
        Self {
            line: span.line,
            column: span.column,
            length: span.len(),
            ..Self::message_only(kind, message)
        }
    }

    /// Creates a source-mapped diagnostic from a [`SourceSpan`].
    pub fn from_span(
        kind: ErrorKind,
        message: impl Into<String>,
        source: &str,
        span: &SourceSpan,
    ) -> Self {
        Self::at(kind, message, span).with_source("<inline>", source)
    }

    /// Attaches a source label and fills the snippet/caret from `source`.
    pub fn with_source(mut self, file: impl Into<String>, source: &str) -> Self {
        self.file = file.into();
        if self.line == 0 || self.column == 0 {
            return self;
        }
        // Pull the exact source line where the stage reported the position.
        let snippet = source
            .lines()
            .nth(self.line.saturating_sub(1))
            .unwrap_or("")
            .to_string();
        // Compute a safe caret range even when spans extend past line boundaries.
        let line_len = snippet.chars().count();
        let pointer_column = self.column.saturating_sub(1).min(line_len);
        let requested_len = self.length.max(1);
        let max_len = line_len.saturating_sub(pointer_column).max(1);
        let pointer_len = requested_len.min(max_len);
        self.pointer = format!("{}{}", " ".repeat(pointer_column), "^".repeat(pointer_len));
        self.snippet = snippet;
        self
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 || self.column == 0 {
            if self.file.is_empty() {
                return write!(f, "{}: {}", self.kind, self.message);
            }
            return write!(f, "{}: {} ({})", self.kind, self.message, self.file);
        }

        let location = if self.file.is_empty() {
            format!("line {}, column {}", self.line, self.column)
        } else {
            format!("{}:{}:{}", self.file, self.line, self.column)
        };

        if self.snippet.is_empty() {
            return write!(f, "{}: {}\n --> {}", self.kind, self.message, location);
        }

        write!(
            f,
            "{}: {}\n --> {}\n  |\n{:>3} | {}\n  | {}",
            self.kind, self.message, location, self.line, self.snippet, self.pointer
        )
    }
}

impl std::error::Error for CompileError {}
