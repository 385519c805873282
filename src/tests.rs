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

//! Crate unit tests.

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::cell::RefCell;

const SCHEMA: &str = r#"
    config {
      strict true
    }

    alias ErrorCode range(400, 599)

    define ErrorObject {
      message string
      stack   string
    }

    model APIError {
      status   number      ErrorCode
      message  string
      endpoint string      match("(/[^/]*)+")
      error    ErrorObject
    }
    "#;

fn first_caret_column(pointer: &str) -> Option<usize> {
    pointer.chars().position(|ch| ch == '^').map(|idx| idx + 1)
}

fn assert_error_case(
    case_name: &str,
    source: &str,
    kind: ErrorKind,
    expected: (usize, usize),
    message: &str,
) {
    let err = compile(source).expect_err("compile should fail");
    assert_eq!(err.kind, kind, "{case_name}: unexpected error kind");
    assert_eq!(
        (err.line, err.column),
        expected,
        "{case_name}: unexpected position"
    );
    assert!(
        err.message.contains(message),
        "{case_name}: unexpected message '{}'",
        err.message
    );

    let expected_snippet = source
        .lines()
        .nth(err.line.saturating_sub(1))
        .unwrap_or_default();
    assert_eq!(
        err.snippet, expected_snippet,
        "{case_name}: snippet should match source line"
    );
    assert_eq!(
        first_caret_column(&err.pointer),
        Some(err.column),
        "{case_name}: caret column mismatch"
    );
}

fn significant(tokens: Vec<Token>) -> Vec<(TokenKind, String)> {
    tokens
        .into_iter()
        .filter(|token| !token.kind.is_layout() && token.kind != TokenKind::Newline)
        .map(|token| (token.kind, token.text))
        .collect()
}

fn banner() -> String {
    format!(
        "/**\n * guardc - Type Guard Compiler\n *\n * version {}\n *\n * AUTO-GENERATED FILE DO NOT EDIT DIRECTLY\n */",
        env!("CARGO_PKG_VERSION")
    )
}

#[test]
fn tokenizes_with_positions() {
    let tokens = tokenize(SCHEMA).unwrap();
    let find = |line: usize, column: usize| {
        tokens
            .iter()
            .find(|token| token.line == line && token.column == column)
            .map(|token| (token.kind, token.text.as_str()))
    };

    assert_eq!(tokens[0], Token::new(TokenKind::Newline, "\n", 1, 1));
    assert_eq!(find(2, 5), Some((TokenKind::Config, "config")));
    assert_eq!(find(3, 7), Some((TokenKind::Identifier, "strict")));
    assert_eq!(find(3, 14), Some((TokenKind::Boolean, "true")));
    assert_eq!(find(6, 21), Some((TokenKind::Identifier, "range")));
    assert_eq!(find(6, 26), Some((TokenKind::OpenParen, "(")));
    assert_eq!(find(6, 27), Some((TokenKind::Number, "400")));
    assert_eq!(find(6, 30), Some((TokenKind::Comma, ",")));
    assert_eq!(find(14, 7), Some((TokenKind::Identifier, "status")));
    assert_eq!(find(14, 28), Some((TokenKind::Identifier, "ErrorCode")));
    assert_eq!(find(16, 34), Some((TokenKind::String, "\"(/[^/]*)+\"")));
    assert_eq!(find(19, 1), Some((TokenKind::Whitespace, "    ")));
}

#[test]
fn keywords_inside_blocks_lex_as_identifiers() {
    let tokens = tokenize("define A {\n  model string\n  config number\n}").unwrap();
    let kinds: Vec<TokenKind> = significant(tokens).into_iter().map(|(kind, _)| kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Define,
            TokenKind::Identifier,
            TokenKind::OpenBrace,
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::CloseBrace,
        ]
    );
}

#[test]
fn keywords_need_a_word_boundary() {
    let tokens = tokenize("alias configured aliasing").unwrap();
    let texts = significant(tokens);
    assert_eq!(
        texts,
        vec![
            (TokenKind::Alias, "alias".to_string()),
            (TokenKind::Identifier, "configured".to_string()),
            (TokenKind::Identifier, "aliasing".to_string()),
        ]
    );
}

#[test]
fn comments_are_skipped_by_the_parser() {
    let source = "// header\nalias A string // trailing\n";
    let tokens = tokenize(source).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Comment);
    let structs = parse(tokens).unwrap();
    assert_eq!(structs.len(), 1);
    match &structs[0] {
        Struct::Alias(alias) => assert_eq!(alias.body.len(), 1),
        other => panic!("expected alias, got {other:?}"),
    }
}

#[test]
fn lexical_errors_report_position() {
    let cases = [
        ("brace after keyword", "define{", (1, 7), "Unexpected token '{'"),
        ("stray symbol", "alias A @", (1, 9), "Unexpected symbol '@'"),
        ("identifier at start", "ErrorCode", (1, 1), "Unexpected token 'ErrorCode'"),
        ("number glued to name", "alias A range(1a)", (1, 16), "Unexpected token 'a'"),
    ];
    for (name, source, position, message) in cases {
        assert_error_case(name, source, ErrorKind::Lexical, position, message);
    }
}

#[test]
fn structural_errors_report_position() {
    let cases = [
        ("unclosed block", "define A {\n  x string\n", (1, 10), "Unclosed '{'"),
        ("stray paren", "alias A range(1))", (1, 17), "Unmatched ')'"),
        (
            "unconstrained property",
            "define A {\n  x\n}",
            (2, 3),
            "Property 'x' does not have any constraints",
        ),
        (
            "config line",
            "config {\n  strict\n}",
            (2, 3),
            "Incorrect configuration syntax",
        ),
        ("missing name", "model {\n}", (1, 7), "Expected model name"),
        ("literal in expression", "alias A 1", (1, 9), "Unexpected token '1'"),
        (
            "missing separator",
            "alias A range(1 2)",
            (1, 17),
            "Expected ',' or ')'",
        ),
        ("empty alias body", "alias A\n", (1, 7), "Alias 'A' has an empty body"),
        (
            "nested block",
            "define A {\n  x {\n}\n}",
            (2, 5),
            "Blocks cannot be nested",
        ),
        (
            "config value is a name",
            "config {\n  mode strict\n}",
            (2, 8),
            "Incorrect configuration syntax, 'strict' is not a literal",
        ),
    ];
    for (name, source, position, message) in cases {
        assert_error_case(name, source, ErrorKind::Structural, position, message);
    }
}

#[test]
fn reference_errors_report_position() {
    let cases = [
        ("unknown", "alias A Foo", (1, 9), "Identifier 'Foo' does not exist"),
        (
            "forward reference",
            "alias A B\nalias B string",
            (1, 9),
            "Identifier 'B' does not exist",
        ),
        (
            "redeclared",
            "alias A string\nalias A number",
            (2, 7),
            "Identifier 'A' has already been declared",
        ),
        (
            "definition redeclared as model",
            "define A {\n  x string\n}\nmodel A {\n  y string\n}",
            (4, 7),
            "Identifier 'A' has already been declared",
        ),
        (
            "model redeclared as alias",
            "model A {\n  x string\n}\nalias A string",
            (4, 7),
            "Identifier 'A' has already been declared",
        ),
        (
            "alias redeclared as definition",
            "alias A string\ndefine A {\n  x string\n}",
            (2, 8),
            "Identifier 'A' has already been declared",
        ),
        (
            "shadowed builtin",
            "alias string number",
            (1, 7),
            "Identifier 'string' has already been declared",
        ),
        ("uncalled factory", "alias A range", (1, 9), "Factory 'range' wasn't called"),
        ("not a factory", "alias A string(1)", (1, 9), "Identifier 'string' is not a factory"),
        (
            "multi-constraint argument",
            "alias A string number\nalias B optional(A)",
            (2, 18),
            "Cannot pass 'A' as a parameter",
        ),
        (
            "duplicate property",
            "define A {\n  x string\n  x number\n}",
            (3, 3),
            "Property 'x' is declared twice in 'A'",
        ),
        (
            "guard name taken by snake case model",
            "model foo {\n  a string\n}\nmodel _foo {\n  b number\n}",
            (4, 7),
            "Generated name 'is_foo' of '_foo' is already used by 'foo'",
        ),
        (
            "property array name taken",
            "model A {\n  b$c string\n}\nmodel A$b {\n  c number\n}",
            (5, 3),
            "Generated name 'A$b$c' of 'A$b' is already used by 'A'",
        ),
        (
            "member list name taken",
            "define A {\n  x string\n}\ndefine members {\n  A string\n}",
            (5, 3),
            "Generated name 'members$A' of 'members' is already used by 'A'",
        ),
        (
            "definition binding name taken",
            "define X {\n  y string\n}\nmodel def {\n  X string\n}",
            (5, 3),
            "Generated name 'def$X' of 'def' is already used by 'X'",
        ),
    ];
    for (name, source, position, message) in cases {
        assert_error_case(name, source, ErrorKind::Reference, position, message);
    }
}

#[test]
fn type_conversion_errors_report_position() {
    let cases = [
        ("empty pattern", "alias A match(\"\")", (1, 9), "non-empty pattern"),
        (
            "wrong argument type",
            "alias A min(\"1\")",
            (1, 9),
            "min expects a number as argument 1, got string",
        ),
        (
            "too many arguments",
            "alias A range(1, 2, 3, 4)",
            (1, 9),
            "range expects 0-3 argument(s), found 4",
        ),
    ];
    for (name, source, position, message) in cases {
        assert_error_case(name, source, ErrorKind::TypeConversion, position, message);
    }
}

#[test]
fn compile_errors_render_snippet_and_caret() {
    let err = compile_in_source("alias A Foo", "schema.guard").unwrap_err();
    assert_eq!(err.file, "schema.guard");
    assert_eq!(err.pointer, "        ^^^");
    assert_eq!(
        err.to_string(),
        "ReferenceError: Identifier 'Foo' does not exist\n --> schema.guard:1:9\n  |\n  1 | alias A Foo\n  |         ^^^"
    );
}

#[test]
fn parses_declarations_in_order() {
    let structs = parse(tokenize(SCHEMA).unwrap()).unwrap();
    let names: Vec<(&str, Option<&str>)> = structs
        .iter()
        .map(|decl| (decl.keyword(), decl.name()))
        .collect();
    assert_eq!(
        names,
        vec![
            ("config", None),
            ("alias", Some("ErrorCode")),
            ("define", Some("ErrorObject")),
            ("model", Some("APIError")),
        ]
    );

    let Struct::Model(model) = &structs[3] else {
        panic!("expected model");
    };
    let properties: Vec<&str> = model.properties.iter().map(|p| p.name.text.as_str()).collect();
    assert_eq!(properties, vec!["status", "message", "endpoint", "error"]);
    assert_eq!(model.properties[2].constraints.len(), 5);
}

#[test]
fn tokens_sharing_a_line_with_braces_still_count() {
    let structs = parse(tokenize("define A { x string\n  y number }").unwrap()).unwrap();
    let Struct::Define(decl) = &structs[0] else {
        panic!("expected definition");
    };
    let properties: Vec<&str> = decl.properties.iter().map(|p| p.name.text.as_str()).collect();
    assert_eq!(properties, vec!["x", "y"]);
}

#[test]
fn config_values_are_typed() {
    let source = "config {\n  strict true\n  limit 399\n  name \"api\"\n}\nconfig {\n  strict false\n}";
    let schema = resolve_source(source).unwrap();
    let entries: Vec<(&str, &Literal)> = schema.config.iter().collect();
    assert_eq!(
        entries,
        vec![
            ("strict", &Literal::Boolean(false)),
            ("limit", &Literal::Number(399.0)),
            ("name", &Literal::String("api".to_string())),
        ]
    );
    assert!(schema.aliases.is_empty());
    assert!(schema.definitions.is_empty());
    assert!(schema.models.is_empty());
}

#[test]
fn validates_api_error_values() {
    let schema = resolve_source(SCHEMA).unwrap();
    let model = schema.model("APIError").unwrap();

    assert_eq!(model.validate(&json!({})), Ok(false));
    assert_eq!(model.validate(&json!({ "status": "400" })), Ok(false));
    assert_eq!(model.validate(&json!({ "status": 399 })), Ok(false));
    assert_eq!(
        model.validate(&json!({
            "status": 400,
            "message": "",
            "endpoint": "not an endpoint"
        })),
        Ok(false)
    );
    assert_eq!(
        model.validate(&json!({
            "status": 400,
            "message": "",
            "endpoint": "/",
            "error": { "message": "", "stack": "" }
        })),
        Ok(true)
    );
    assert_eq!(model.validate(&json!("not an object")), Ok(false));
}

#[test]
fn alias_range_accepts_its_bounds() {
    let schema = resolve_source("alias ErrorCode range(400, 599)").unwrap();
    let alias = schema.alias("ErrorCode").unwrap();
    for (value, expected) in [(399, false), (400, true), (500, true), (599, true), (600, false)] {
        assert_eq!(alias.test(&json!(value)), Ok(expected), "{value}");
    }
    assert_eq!(alias.ty().to_string(), "string | number");
}

#[test]
fn aliases_are_flattened() {
    let schema = resolve_source("alias Text string\nalias Short Text maxlength(3)").unwrap();
    let short = schema.alias("Short").unwrap();
    assert_eq!(short.constraints.len(), 2);
    assert_eq!(short.test(&json!("abc")), Ok(true));
    assert_eq!(short.test(&json!("abcd")), Ok(false));
    assert_eq!(short.test(&json!(1)), Ok(false));
}

#[test]
fn optional_properties_may_be_absent() {
    let source = "define Inner {\n  id number\n}\nmodel M {\n  note  optional(string)\n  inner optional(Inner)\n}";
    let schema = resolve_source(source).unwrap();
    let model = schema.model("M").unwrap();
    assert_eq!(model.validate(&json!({})), Ok(true));
    assert_eq!(model.validate(&json!({ "note": "x" })), Ok(true));
    assert_eq!(model.validate(&json!({ "note": 1 })), Ok(false));
    assert_eq!(model.validate(&json!({ "inner": { "id": 1 } })), Ok(true));
    assert_eq!(model.validate(&json!({ "inner": {} })), Ok(false));
    assert_eq!(
        model.properties()[1].ty.to_string(),
        "Inner | undefined"
    );
}

#[test]
fn bound_factories() {
    let source = "model M {\n  n number min(0, true) max(10)\n  s minlength(2) maxlength(4, true)\n}";
    let schema = resolve_source(source).unwrap();
    let model = schema.model("M").unwrap();
    assert_eq!(model.validate(&json!({ "n": 10, "s": "abc" })), Ok(true));
    assert_eq!(model.validate(&json!({ "n": 0, "s": "abc" })), Ok(false));
    assert_eq!(model.validate(&json!({ "n": 11, "s": "abc" })), Ok(false));
    assert_eq!(model.validate(&json!({ "n": 1, "s": "abcd" })), Ok(false));
    assert_eq!(model.validate(&json!({ "n": 1, "s": "a" })), Ok(false));
    assert_eq!(model.properties()[1].ty.to_string(), "string");
}

#[test]
fn pattern_flags_apply() {
    let source = "model M {\n  code match(\"^ab$\", \"i\")\n}";
    let schema = resolve_source(source).unwrap();
    let model = schema.model("M").unwrap();
    assert_eq!(model.validate(&json!({ "code": "AB" })), Ok(true));
    assert_eq!(model.validate(&json!({ "code": "abc" })), Ok(false));
    assert_eq!(model.validate(&json!({ "code": 1 })), Ok(false));
}

#[test]
fn diagnostics_escalate_but_failures_do_not() {
    let schema = resolve_source("model M {\n  x range(5, 1)\n}").unwrap();
    let model = schema.model("M").unwrap();
    assert_eq!(
        model.validate(&json!({ "x": 3 })),
        Err(EvaluationFault::Diagnostic {
            context: "M.x".to_string(),
            message: "Stop parameter must be greater than the start parameter in the range factory."
                .to_string(),
        })
    );

    let schema = resolve_source("model M {\n  x range(1, 5)\n}").unwrap();
    let model = schema.model("M").unwrap();
    assert_eq!(model.validate(&json!({ "x": 30 })), Ok(false));
}

#[test]
fn argumentless_range_faults_at_evaluation() {
    let schema = resolve_source("model M {\n  x range()\n}").unwrap();
    let model = schema.model("M").unwrap();
    assert!(matches!(
        model.validate(&json!({ "x": 1 })),
        Err(EvaluationFault::TypeConversion(_))
    ));
}

#[test]
fn negative_single_range_rejects_strings() {
    let schema = resolve_source("model M {\n  x range(-5)\n}").unwrap();
    let model = schema.model("M").unwrap();
    assert_eq!(model.validate(&json!({ "x": 2 })), Ok(true));
    assert!(matches!(
        model.validate(&json!({ "x": "abc" })),
        Err(EvaluationFault::Range(_))
    ));
}

#[test]
fn records_dependency_graph() {
    let schema = resolve_source(SCHEMA).unwrap();
    let api_error: Vec<&str> = schema.dependencies["APIError"]
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(api_error, vec!["ErrorCode", "ErrorObject"]);
    assert!(schema.dependencies["ErrorObject"].is_empty());
    assert!(schema.dependencies["ErrorCode"].is_empty());
}

#[test]
fn emits_declaration_module() {
    let modules = compile(SCHEMA).unwrap();
    let expected = format!(
        "{}\n\n{}",
        banner(),
        r#"/**
 * config
 * {
 *     "strict": true
 * }
 */

/**
 * type aliases
 */
type ErrorCode = string | number;

/**
 * interfaces
 */
interface ErrorObject {
    message: string;
    stack: string;
}

/**
 * exported interfaces
 */
export interface APIError {
    status: number | string;
    message: string;
    endpoint: string;
    error: ErrorObject;
}

/**
 * type guards
 */
export declare const isAPIError: (v: unknown) => v is APIError;
"#
    );
    assert_eq!(modules.declarations, expected);
}

#[test]
fn emits_validation_module_sections() {
    let modules = compile(SCHEMA).unwrap();
    let js = &modules.validation;

    assert!(js.starts_with(&banner()));
    let order = [
        "/**\n * config\n",
        "const wrap = (e) => {",
        "/**\n * globals\n */",
        "/**\n * aliases\n */",
        "/**\n * definitions\n */",
        "/**\n * models\n */",
    ];
    let positions: Vec<usize> = order.iter().map(|s| js.find(s).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");

    assert!(js.contains(
        "const ErrorObject$message = [((v) => typeof v === \"string\")/* string */];"
    ));
    assert!(js.contains("const pattern$2 = new RegExp(\"(/[^/]*)+\", \"\");"));
    assert!(js.contains(
        "(v) => APIError$status.every((fn) => wrap(fn(field(v, \"status\"))))"
    ));
    assert!(js.contains("var alias$ErrorCode = [((v) => { if (599 <= 400)"));
    assert!(js.contains("var def$ErrorObject = (v) => members$ErrorObject.every((fn) => fn(v));"));
    assert!(js.contains("export var isAPIError = (v) => members$APIError.every((fn) => fn(v));"));
    assert!(js.contains("(() => alias$ErrorCode)"));
    assert!(js.contains("(() => def$ErrorObject)"));
}

#[test]
fn properties_are_read_from_own_keys_only() {
    let source = "model M {\n  constructor optional(string)\n  length optional(number)\n}";
    let schema = resolve_source(source).unwrap();
    let model = schema.model("M").unwrap();
    assert_eq!(model.validate(&json!({})), Ok(true));
    assert_eq!(model.validate(&json!({ "constructor": "x" })), Ok(true));
    assert_eq!(model.validate(&json!({ "constructor": 1 })), Ok(false));
    assert_eq!(model.validate(&json!([1, 2])), Ok(true));

    let js = compile(source).unwrap().validation;
    assert!(js.contains("Object.hasOwn(v, k) ? v[k] : undefined;"));
    assert!(js.contains("!Array.isArray(v)"));
    assert!(js.contains("wrap(fn(field(v, \"constructor\")))"));
    assert!(!js.contains("v?.["));
}

#[test]
fn globals_are_deduplicated() {
    let modules = compile("alias A match(\"a\")\nalias B A A").unwrap();
    let line = "const pattern$1 = new RegExp(\"a\", \"\");";
    assert_eq!(modules.validation.matches(line).count(), 1);
    assert!(modules
        .validation
        .contains("var alias$B = [((v) => typeof v === \"string\" && pattern$1.test(v))"));
}

#[test]
fn snake_case_models_use_underscore_guard() {
    let modules = compile("model api_error {\n  code number\n}").unwrap();
    assert!(modules.validation.contains("export var is_api_error = "));
    assert!(modules
        .declarations
        .contains("export declare const is_api_error: (v: unknown) => v is api_error;"));
    assert_eq!(binding_name(Role::Model, "ApiError"), "isApiError");
}

#[test]
fn formats_schema_canonically() {
    let formatted = format_schema(SCHEMA).unwrap();
    assert_eq!(
        formatted,
        r#"config {
    strict true
}

alias ErrorCode range(400, 599)

define ErrorObject {
    message string
    stack   string
}

model APIError {
    status   number ErrorCode
    message  string
    endpoint string match("(/[^/]*)+")
    error    ErrorObject
}
"#
    );
}

#[test]
fn formatting_is_idempotent_and_token_equivalent() {
    let source = "alias A   optional( range( 1 ,2))\n\nalias B string\nmodel M {\n  x A\n}\nconfig {\n  z 1\n}\n";
    let once = format_schema(source).unwrap();
    let twice = format_schema(&once).unwrap();
    assert_eq!(once, twice);
    assert_eq!(
        once,
        "config {\n    z 1\n}\n\nalias A optional(range(1, 2))\nalias B string\n\nmodel M {\n    x A\n}\n"
    );

    let mut before = significant(tokenize(source).unwrap());
    let mut reformatted = significant(tokenize(&once).unwrap());
    before.sort();
    reformatted.sort();
    assert_eq!(before, reformatted);
}

#[derive(Default)]
struct RecordingHooks {
    stages: RefCell<Vec<&'static str>>,
}

impl CompilerHooks for RecordingHooks {
    fn after_tokenize(&self, tokens: &mut Vec<Token>) {
        self.stages.borrow_mut().push("tokenize");
        tokens.retain(|token| token.kind != TokenKind::Comment);
    }

    fn after_parse(&self, _structs: &mut Vec<Struct>) {
        self.stages.borrow_mut().push("parse");
    }

    fn after_resolve(&self, schema: &mut ResolvedSchema) {
        self.stages.borrow_mut().push("resolve");
        schema.config.insert("hooked", Literal::Boolean(true));
    }

    fn after_emit(&self, modules: &mut EmittedModules) {
        self.stages.borrow_mut().push("emit");
        modules.validation.push_str("// end\n");
    }
}

#[test]
fn hooks_run_after_each_stage() {
    let hooks = RecordingHooks::default();
    let modules = compile_with_hooks("alias A string", INLINE_SOURCE, &hooks).unwrap();
    assert_eq!(
        *hooks.stages.borrow(),
        vec!["tokenize", "parse", "resolve", "emit"]
    );
    assert!(modules.validation.ends_with("// end\n"));
    assert!(modules.declarations.contains(" *     \"hooked\": true"));
}

#[test]
fn noop_hooks_match_plain_compile() {
    assert_eq!(
        compile_with_hooks(SCHEMA, INLINE_SOURCE, &NoopHooks).unwrap(),
        compile(SCHEMA).unwrap()
    );
}

fn even(call: &FactoryCall<'_>, args: Vec<Argument>) -> Result<Constraint, CompileError> {
    call.expect_arity(&args, 0, 0)?;
    Ok(Constraint::new(
        Check::Range {
            start: Some(0.0),
            stop: Some(1.0e9),
            step: Some(2.0),
        },
        TypeDescriptor::named("number"),
        "(v) => typeof v === \"number\" && v % 2 === 0",
    ))
}

#[test]
fn custom_builtins_can_be_injected() {
    let builtins = Builtins::standard().with_factory(Factory::new("even", even));
    let structs = parse(tokenize("model M {\n  n number even()\n}").unwrap()).unwrap();
    let schema = resolve_with(&builtins, structs).unwrap();
    let model = schema.model("M").unwrap();
    assert_eq!(model.validate(&json!({ "n": 4 })), Ok(true));
    assert_eq!(model.validate(&json!({ "n": 3 })), Ok(false));

    let structs = parse(tokenize("model M {\n  n even()\n}").unwrap()).unwrap();
    let err = resolve(structs).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Reference);

    let structs = parse(tokenize("alias A string").unwrap()).unwrap();
    let err = resolve_with(&Builtins::empty(), structs).unwrap_err();
    assert_eq!(err.message, "Identifier 'string' does not exist");
}

#[test]
fn manifest_describes_emitted_files() {
    let modules = compile(SCHEMA).unwrap();
    let manifest: serde_json::Value = serde_json::from_str(&modules.manifest()).unwrap();
    assert_eq!(manifest["main"], VALIDATION_FILE);
    assert_eq!(manifest["typings"], DECLARATION_FILE);
}
