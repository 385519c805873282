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

//! Builtin primitives and parametric constraint factories.
//!
//! Primitives:
//! - `string`, `number`, `boolean`, `bigint`, `symbol`
//!
//! Factories:
//! - `range(start?, stop?, step?)`
//! - `match(pattern, flags?)`
//! - `min/max(bound, exclusive?)`
//! - `minlength/maxlength(bound, exclusive?)`
//! - `optional(constraint)`

use super::*;
use crate::constraint::{
    Limit, Primitive, RANGE_INVERTED, RANGE_NEGATIVE_STRING, RANGE_NO_ARGUMENTS,
    RANGE_NON_POSITIVE_STEP, RANGE_STEP_ON_STRING,
};
use once_cell::sync::Lazy;
use regex::RegexBuilder;

static SHARED: Lazy<Builtins> = Lazy::new(Builtins::standard);

/// Signature of a factory implementation.
pub type FactoryFn = fn(&FactoryCall<'_>, Vec<Argument>) -> Result<Constraint, CompileError>;

/// A named parametric constructor of constraints.
#[derive(Debug, Clone)]
pub struct Factory {
    name: String,
    build: FactoryFn,
}

impl Factory {
    pub fn new(name: impl Into<String>, build: FactoryFn) -> Self {
        Self {
            name: name.into(),
            build,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn invoke(
        &self,
        call: &FactoryCall<'_>,
        args: Vec<Argument>,
    ) -> Result<Constraint, CompileError> {
        (self.build)(call, args)
    }
}

/// One factory argument: a literal or a resolved constraint.
#[derive(Debug, Clone)]
pub enum Argument {
    Literal(Literal),
    Constraint(Constraint),
}

impl Argument {
    fn describe(&self) -> &'static str {
        match self {
            Argument::Literal(literal) => literal.type_name(),
            Argument::Constraint(_) => "constraint",
        }
    }
}

/// Invocation site handed to a factory.
pub struct FactoryCall<'a> {
    /// Factory name token, used to anchor diagnostics.
    pub token: &'a Token,
    /// Unique id of this invocation within the schema.
    pub id: usize,
}

impl FactoryCall<'_> {
    pub fn name(&self) -> &str {
        &self.token.text
    }

    /// Builds a declaration-time type-conversion error at the call site.
    pub fn error(&self, message: impl Into<String>) -> CompileError {
        self.token.error(ErrorKind::TypeConversion, message)
    }

    /// Validates the argument count.
    pub fn expect_arity(
        &self,
        args: &[Argument],
        min: usize,
        max: usize,
    ) -> Result<(), CompileError> {
        if (min..=max).contains(&args.len()) {
            return Ok(());
        }
        let expected = if min == max {
            format!("exactly {min}")
        } else {
            format!("{min}-{max}")
        };
        Err(self.error(format!(
            "{} expects {expected} argument(s), found {}",
            self.name(),
            args.len()
        )))
    }

    pub fn number(&self, args: &[Argument], index: usize) -> Result<Option<f64>, CompileError> {
        match args.get(index) {
            None => Ok(None),
            Some(Argument::Literal(Literal::Number(n))) => Ok(Some(*n)),
            Some(other) => Err(self.mismatch(index, "a number", other)),
        }
    }

    pub fn boolean(&self, args: &[Argument], index: usize) -> Result<Option<bool>, CompileError> {
        match args.get(index) {
            None => Ok(None),
            Some(Argument::Literal(Literal::Boolean(b))) => Ok(Some(*b)),
            Some(other) => Err(self.mismatch(index, "a boolean", other)),
        }
    }

    pub fn string<'a>(
        &self,
        args: &'a [Argument],
        index: usize,
    ) -> Result<Option<&'a str>, CompileError> {
        match args.get(index) {
            None => Ok(None),
            Some(Argument::Literal(Literal::String(s))) => Ok(Some(s.as_str())),
            Some(other) => Err(self.mismatch(index, "a string", other)),
        }
    }

    fn mismatch(&self, index: usize, expected: &str, found: &Argument) -> CompileError {
        self.error(format!(
            "{} expects {expected} as argument {}, got {}",
            self.name(),
            index + 1,
            found.describe()
        ))
    }
}

/// Immutable registry of builtin primitives and factories.
#[derive(Debug, Clone, Default)]
pub struct Builtins {
    primitives: HashMap<String, Constraint>,
    factories: HashMap<String, Factory>,
}

impl Builtins {
    /// Registry with no builtins at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard primitives and factories.
    pub fn standard() -> Self {
        let mut builtins = Self::empty();
        for primitive in Primitive::ALL {
            builtins = builtins.with_primitive(primitive.name(), primitive_constraint(primitive));
        }
        builtins
            .with_factory(Factory::new("range", range))
            .with_factory(Factory::new("match", pattern))
            .with_factory(Factory::new("min", min))
            .with_factory(Factory::new("max", max))
            .with_factory(Factory::new("minlength", min_length))
            .with_factory(Factory::new("maxlength", max_length))
            .with_factory(Factory::new("optional", optional))
    }

    /// Process-wide standard registry, built once on first use.
    pub fn shared() -> &'static Builtins {
        &SHARED
    }

    pub fn with_primitive(mut self, name: impl Into<String>, constraint: Constraint) -> Self {
        self.primitives.insert(name.into(), constraint);
        self
    }

    pub fn with_factory(mut self, factory: Factory) -> Self {
        self.factories.insert(factory.name.clone(), factory);
        self
    }

    pub fn primitive(&self, name: &str) -> Option<&Constraint> {
        self.primitives.get(name)
    }

    pub fn factory(&self, name: &str) -> Option<&Factory> {
        self.factories.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.primitives.contains_key(name) || self.factories.contains_key(name)
    }
}

fn primitive_constraint(primitive: Primitive) -> Constraint {
    let name = primitive.name();
    Constraint::new(
        Check::Primitive(primitive),
        TypeDescriptor::named(name),
        format!("(v) => typeof v === \"{name}\""),
    )
}

/// `range(start?, stop?, step?)`.
fn range(call: &FactoryCall<'_>, args: Vec<Argument>) -> Result<Constraint, CompileError> {
    call.expect_arity(&args, 0, 3)?;
    let start = call.number(&args, 0)?;
    let stop = call.number(&args, 1)?;
    let step = call.number(&args, 2)?;

    let code = match (start, stop, step) {
        (Some(start), Some(stop), Some(step)) => format!(
            "(v) => {{ if (typeof v === \"string\") return new RangeError(\"{RANGE_STEP_ON_STRING}\"); \
             if ({stop} <= {start}) return new RangeError(\"{RANGE_INVERTED}\"); \
             if ({step} <= 0) return new RangeError(\"{RANGE_NON_POSITIVE_STEP}\"); \
             return typeof v === \"number\" && v >= {start} && v <= {stop} && (v - {start}) % {step} === 0; }}"
        ),
        (Some(start), Some(stop), None) => format!(
            "(v) => {{ if ({stop} <= {start}) return new RangeError(\"{RANGE_INVERTED}\"); \
             if (typeof v === \"string\") return v.length >= {start} && v.length <= {stop}; \
             return typeof v === \"number\" && v >= {start} && v <= {stop}; }}"
        ),
        (Some(end), None, None) if end < 0.0 => format!(
            "(v) => {{ if (typeof v === \"string\") throw new RangeError(\"{RANGE_NEGATIVE_STRING}\"); \
             return typeof v === \"number\" && v >= {end}; }}"
        ),
        (Some(end), None, None) => format!(
            "(v) => {{ if (typeof v === \"string\") return v.length <= {end}; \
             return typeof v === \"number\" && v >= 0 && v <= {end}; }}"
        ),
        _ => format!("(v) => {{ throw new TypeError(\"{RANGE_NO_ARGUMENTS}\"); }}"),
    };

    Ok(Constraint::new(
        Check::Range { start, stop, step },
        TypeDescriptor::of(&["string", "number"]),
        code,
    ))
}

/// `match(pattern, flags?)`.
fn pattern(call: &FactoryCall<'_>, args: Vec<Argument>) -> Result<Constraint, CompileError> {
    call.expect_arity(&args, 1, 2)?;
    let source = call.string(&args, 0)?.unwrap_or_default();
    if source.is_empty() {
        return Err(call.error("match expects a non-empty pattern"));
    }
    let flags = call.string(&args, 1)?.unwrap_or_default();

    let mut builder = RegexBuilder::new(source);
    let mut seen = String::new();
    for flag in flags.chars() {
        if seen.contains(flag) {
            return Err(call.error(format!("Duplicate regular expression flag '{flag}'")));
        }
        seen.push(flag);
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            // Global and sticky make `RegExp.test` stateful; they are dropped.
            'g' | 'y' | 'u' => {}
            other => {
                return Err(call.error(format!("Invalid regular expression flag '{other}'")));
            }
        }
    }
    let regex = builder
        .build()
        .map_err(|err| call.error(format!("Invalid regular expression: {err}")))?;

    let emitted_flags: String = flags.chars().filter(|f| !matches!(f, 'g' | 'y')).collect();
    // Keyed by invocation id alone; identifiers cannot start with a digit,
    // so no property array can take this name.
    let symbol = format!("pattern${}", call.id);
    let preamble = format!(
        "const {symbol} = new RegExp({}, {});",
        js_string(source),
        js_string(&emitted_flags)
    );
    Ok(Constraint::new(
        Check::Pattern(regex),
        TypeDescriptor::named("string"),
        format!("(v) => typeof v === \"string\" && {symbol}.test(v)"),
    )
    .with_preamble(preamble))
}

fn min(call: &FactoryCall<'_>, args: Vec<Argument>) -> Result<Constraint, CompileError> {
    limit(call, args, false, false)
}

fn max(call: &FactoryCall<'_>, args: Vec<Argument>) -> Result<Constraint, CompileError> {
    limit(call, args, true, false)
}

fn min_length(call: &FactoryCall<'_>, args: Vec<Argument>) -> Result<Constraint, CompileError> {
    limit(call, args, false, true)
}

fn max_length(call: &FactoryCall<'_>, args: Vec<Argument>) -> Result<Constraint, CompileError> {
    limit(call, args, true, true)
}

/// Shared body of the four bound factories.
fn limit(
    call: &FactoryCall<'_>,
    args: Vec<Argument>,
    upper: bool,
    length: bool,
) -> Result<Constraint, CompileError> {
    call.expect_arity(&args, 1, 2)?;
    let bound = call
        .number(&args, 0)?
        .ok_or_else(|| call.error(format!("{} expects a number as argument 1", call.name())))?;
    let exclusive = call.boolean(&args, 1)?.unwrap_or(false);

    let operator = match (upper, exclusive) {
        (false, false) => ">=",
        (false, true) => ">",
        (true, false) => "<=",
        (true, true) => "<",
    };
    let (ty, code) = if length {
        (
            "string",
            format!("(v) => typeof v === \"string\" && v.length {operator} {bound}"),
        )
    } else {
        (
            "number",
            format!("(v) => typeof v === \"number\" && v {operator} {bound}"),
        )
    };

    Ok(Constraint::new(
        Check::Limit(Limit {
            bound,
            exclusive,
            upper,
            length,
        }),
        TypeDescriptor::named(ty),
        code,
    ))
}

/// `optional(constraint)`: the inner constraint, or an absent value.
fn optional(call: &FactoryCall<'_>, mut args: Vec<Argument>) -> Result<Constraint, CompileError> {
    call.expect_arity(&args, 1, 1)?;
    let inner = match args.remove(0) {
        Argument::Constraint(inner) => inner,
        other => return Err(call.mismatch(0, "a constraint", &other)),
    };

    let mut ty = inner.ty.clone();
    ty.extend(&TypeDescriptor::named("undefined"));
    let symbol = format!("{{{{ name }}}}$optional{}", call.id);
    let code = format!(
        "(v) => {{ const result = {symbol}()(v); return result === false && v === undefined ? true : result; }}"
    );
    Ok(Constraint::new(Check::Optional(Box::new(inner.clone())), ty, code)
        .with_dependency(symbol, DependencyTarget::Inline(Box::new(inner))))
}

/// Renders a JavaScript string literal.
fn js_string(text: &str) -> String {
    serde_json::Value::from(text).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call_site() -> Token {
        Token::new(TokenKind::Identifier, "range", 3, 9)
    }

    fn numbers(values: &[f64]) -> Vec<Argument> {
        values
            .iter()
            .map(|n| Argument::Literal(Literal::Number(*n)))
            .collect()
    }

    #[test]
    fn shared_registry_has_standard_names() {
        let builtins = Builtins::shared();
        for name in ["string", "number", "boolean", "bigint", "symbol"] {
            assert!(builtins.primitive(name).is_some(), "{name}");
        }
        for name in ["range", "match", "min", "max", "minlength", "maxlength", "optional"] {
            assert!(builtins.factory(name).is_some(), "{name}");
        }
        assert!(!builtins.contains("Range"));
    }

    #[test]
    fn range_rejects_too_many_arguments() {
        let token = call_site();
        let call = FactoryCall { token: &token, id: 1 };
        let err = range(&call, numbers(&[1.0, 2.0, 3.0, 4.0])).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeConversion);
        assert_eq!((err.line, err.column), (3, 9));
    }

    #[test]
    fn range_rejects_non_numeric_arguments() {
        let token = call_site();
        let call = FactoryCall { token: &token, id: 1 };
        let args = vec![Argument::Literal(Literal::String("a".into()))];
        let err = range(&call, args).unwrap_err();
        assert_eq!(err.message, "range expects a number as argument 1, got string");
    }

    #[test]
    fn match_rejects_empty_pattern_and_bad_flags() {
        let token = Token::new(TokenKind::Identifier, "match", 1, 1);
        let call = FactoryCall { token: &token, id: 1 };
        let empty = vec![Argument::Literal(Literal::String(String::new()))];
        assert_eq!(pattern(&call, empty).unwrap_err().kind, ErrorKind::TypeConversion);

        let flagged = vec![
            Argument::Literal(Literal::String("a".into())),
            Argument::Literal(Literal::String("x".into())),
        ];
        assert!(pattern(&call, flagged).unwrap_err().message.contains("flag 'x'"));
    }

    #[test]
    fn match_emits_pattern_global_keyed_by_invocation() {
        let token = Token::new(TokenKind::Identifier, "match", 1, 1);
        let call = FactoryCall { token: &token, id: 7 };
        let args = vec![
            Argument::Literal(Literal::String("^a\"b".into())),
            Argument::Literal(Literal::String("gi".into())),
        ];
        let constraint = pattern(&call, args).unwrap();
        assert_eq!(
            constraint.preamble.as_deref(),
            Some(r#"const pattern$7 = new RegExp("^a\"b", "i");"#)
        );
        assert!(constraint.test(&serde_json::json!("A\"B")).unwrap());
    }

    #[test]
    fn optional_requires_a_constraint() {
        let token = Token::new(TokenKind::Identifier, "optional", 1, 1);
        let call = FactoryCall { token: &token, id: 1 };
        let err = optional(&call, numbers(&[1.0])).unwrap_err();
        assert_eq!(
            err.message,
            "optional expects a constraint as argument 1, got number"
        );
    }
}
