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

//! Canonical schema re-formatter.
//!
//! Works on parsed declarations only, so it accepts any structurally valid
//! schema. Comments are not preserved.

use crate::ast::{AliasDecl, ConfigBlock, Struct, StructDecl, Token, TokenKind};
use crate::diagnostics::CompileError;
use crate::lexer::tokenize;
use crate::parser::parse;

const INDENT: &str = "    ";

/// Re-formats schema text into its canonical layout.
pub fn format_schema(source: &str) -> Result<String, CompileError> {
    let structs = parse(tokenize(source)?)?;
    Ok(print_structs(&structs))
}

/// Prints declarations: config blocks first, then the rest in source order.
///
/// Consecutive aliases stay grouped; other declarations are separated by a
/// blank line.
pub fn print_structs(structs: &[Struct]) -> String {
    let mut blocks: Vec<String> = structs
        .iter()
        .filter_map(|decl| match decl {
            Struct::Config(block) => Some(print_config(block)),
            _ => None,
        })
        .collect();

    let mut aliases: Vec<String> = Vec::new();
    for decl in structs {
        match decl {
            Struct::Config(_) => continue,
            Struct::Alias(alias) => {
                aliases.push(print_alias(alias));
                continue;
            }
            Struct::Define(decl) => {
                flush_aliases(&mut aliases, &mut blocks);
                blocks.push(print_struct("define", decl));
            }
            Struct::Model(decl) => {
                flush_aliases(&mut aliases, &mut blocks);
                blocks.push(print_struct("model", decl));
            }
        }
    }
    flush_aliases(&mut aliases, &mut blocks);

    if blocks.is_empty() {
        return String::new();
    }
    let mut text = blocks.join("\n\n");
    text.push('\n');
    text
}

fn flush_aliases(aliases: &mut Vec<String>, blocks: &mut Vec<String>) {
    if !aliases.is_empty() {
        blocks.push(aliases.join("\n"));
        aliases.clear();
    }
}

fn print_config(block: &ConfigBlock) -> String {
    let lines: Vec<(&str, String)> = block
        .options
        .iter()
        .map(|option| (option.key.text.as_str(), option.value.text.clone()))
        .collect();
    print_block("config", &lines)
}

fn print_alias(alias: &AliasDecl) -> String {
    format!("alias {} {}", alias.name.text, print_expression(&alias.body))
}

fn print_struct(keyword: &str, decl: &StructDecl) -> String {
    let lines: Vec<(&str, String)> = decl
        .properties
        .iter()
        .map(|line| (line.name.text.as_str(), print_expression(&line.constraints)))
        .collect();
    print_block(&format!("{keyword} {}", decl.name.text), &lines)
}

/// Prints `head { ... }` with names padded to the longest one.
fn print_block(head: &str, lines: &[(&str, String)]) -> String {
    let width = lines
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0);
    let mut text = format!("{head} {{\n");
    for (name, value) in lines {
        let padding = " ".repeat(width - name.chars().count());
        text.push_str(&format!("{INDENT}{name}{padding} {value}\n"));
    }
    text.push('}');
    text
}

/// Prints an expression with single spaces between terms, `", "` between
/// arguments and no space inside parentheses.
fn print_expression(tokens: &[Token]) -> String {
    let mut text = String::new();
    let mut previous: Option<TokenKind> = None;
    for token in tokens {
        let spaced = match (previous, token.kind) {
            (None, _) => false,
            (Some(TokenKind::OpenParen), _) => false,
            (_, TokenKind::OpenParen | TokenKind::CloseParen | TokenKind::Comma) => false,
            _ => true,
        };
        if spaced {
            text.push(' ');
        }
        text.push_str(&token.text);
        previous = Some(token.kind);
    }
    text
}
