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

//! Parsers for the four top-level declaration forms.

use crate::ast::{AliasDecl, ConfigBlock, ConfigOption, PropertyLine, StructDecl, Token, TokenKind};
use crate::diagnostics::{CompileError, ErrorKind};

use super::cursor::TokenCursor;

/// Parses `config { key value ... }` after its keyword.
pub(super) fn config_block(
    keyword: Token,
    cursor: &mut TokenCursor,
) -> Result<ConfigBlock, CompileError> {
    cursor.skip_newlines();
    let open = cursor.expect(TokenKind::OpenBrace, "'{' after 'config'", &keyword)?;
    let options = block_lines(&open, cursor)?
        .into_iter()
        .map(config_option)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ConfigBlock { keyword, options })
}

/// Parses `alias Name expr...`; the body runs to the end of the line.
pub(super) fn alias_decl(
    keyword: Token,
    cursor: &mut TokenCursor,
) -> Result<AliasDecl, CompileError> {
    let name = cursor.expect(TokenKind::Identifier, "alias name", &keyword)?;
    let body = cursor.read_line();
    if body.is_empty() {
        return Err(name.error(
            ErrorKind::Structural,
            format!("Alias '{}' has an empty body", name.text),
        ));
    }
    Ok(AliasDecl { name, body })
}

/// Parses `define Name { ... }` or `model Name { ... }` after the keyword.
pub(super) fn struct_decl(
    keyword: Token,
    cursor: &mut TokenCursor,
) -> Result<StructDecl, CompileError> {
    let what = format!("{} name", keyword.text);
    let name = cursor.expect(TokenKind::Identifier, &what, &keyword)?;
    cursor.skip_newlines();
    let open = cursor.expect(
        TokenKind::OpenBrace,
        &format!("'{{' after '{}'", name.text),
        &name,
    )?;

    let mut properties = Vec::new();
    for mut line in block_lines(&open, cursor)? {
        let property = line.remove(0);
        if property.kind != TokenKind::Identifier {
            return Err(property.error(
                ErrorKind::Structural,
                format!("Expected property name, found {}", property.describe()),
            ));
        }
        if line.is_empty() {
            return Err(property.error(
                ErrorKind::Structural,
                format!("Property '{}' does not have any constraints", property.text),
            ));
        }
        properties.push(PropertyLine {
            name: property,
            constraints: line,
        });
    }
    Ok(StructDecl { name, properties })
}

/// Collects the non-empty lines of a block up to its closing `}`.
///
/// Tokens sharing a line with either brace still form a line of their own.
fn block_lines(open: &Token, cursor: &mut TokenCursor) -> Result<Vec<Vec<Token>>, CompileError> {
    let mut lines = Vec::new();
    let mut line = Vec::new();
    loop {
        let Some(token) = cursor.next() else {
            return Err(open.error(
                ErrorKind::Structural,
                "Unexpected end of input, block is never closed",
            ));
        };
        match token.kind {
            TokenKind::Newline => {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
            }
            TokenKind::CloseBrace => {
                if !line.is_empty() {
                    lines.push(line);
                }
                return Ok(lines);
            }
            TokenKind::OpenBrace => {
                return Err(token.error(ErrorKind::Structural, "Blocks cannot be nested"));
            }
            _ => line.push(token),
        }
    }
}

/// Splits a config line into its key and (retyped) value.
fn config_option(line: Vec<Token>) -> Result<ConfigOption, CompileError> {
    let [key, mut value]: [Token; 2] = line.try_into().map_err(|line: Vec<Token>| {
        line[0].error(
            ErrorKind::Structural,
            "Incorrect configuration syntax, expected `name value`",
        )
    })?;
    retype_config_value(&mut value);
    Ok(ConfigOption { key, value })
}

/// Re-infers a config value's kind from its text.
///
/// Inside blocks every bare word lexes as an identifier, so `true` or `1`
/// may arrive with the wrong kind.
fn retype_config_value(token: &mut Token) {
    let text = token.text.as_str();
    if text == "true" || text == "false" {
        token.kind = TokenKind::Boolean;
    } else if text.parse::<f64>().is_ok_and(f64::is_finite) {
        token.kind = TokenKind::Number;
    } else if is_quoted(text) {
        token.kind = TokenKind::String;
    }
}

fn is_quoted(text: &str) -> bool {
    text.len() >= 2
        && ((text.starts_with('"') && text.ends_with('"'))
            || (text.starts_with('\'') && text.ends_with('\'')))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: TokenKind, text: &str) -> Token {
        Token::new(kind, text, 1, 1)
    }

    #[test]
    fn config_values_are_retyped_by_shape() {
        let cases = [
            ("true", TokenKind::Boolean),
            ("399", TokenKind::Number),
            ("-1.5", TokenKind::Number),
            ("\"x\"", TokenKind::String),
            ("inf", TokenKind::Identifier),
            ("NaN", TokenKind::Identifier),
        ];
        for (text, expected) in cases {
            let mut value = token(TokenKind::Identifier, text);
            retype_config_value(&mut value);
            assert_eq!(value.kind, expected, "{text}");
        }
    }

    #[test]
    fn config_line_needs_exactly_two_tokens() {
        let line = vec![token(TokenKind::Identifier, "strict")];
        let err = config_option(line).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Structural);
        assert!(err.message.contains("Incorrect configuration syntax"));
    }
}
