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

//! Constraint value objects and their evaluation.
//!
//! A [`Constraint`] carries two things: an executable [`Check`] evaluated
//! against JSON values, and the JavaScript code text (plus optional global
//! preamble and lazily bound dependencies) that the emitter writes out.

use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub(crate) const RANGE_STEP_ON_STRING: &str =
    "String values cannot use the step parameter for the range factory.";
pub(crate) const RANGE_INVERTED: &str =
    "Stop parameter must be greater than the start parameter in the range factory.";
pub(crate) const RANGE_NON_POSITIVE_STEP: &str =
    "Step parameter for the range factory must be positive.";
pub(crate) const RANGE_NEGATIVE_STRING: &str =
    "String values cannot use a negative end parameter in the range factory.";
pub(crate) const RANGE_NO_ARGUMENTS: &str =
    "Expected 1-3 arguments for the range factory, got none.";

/// Set-union of type names, kept in first-contribution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeDescriptor(Vec<String>);

impl TypeDescriptor {
    pub fn named(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    pub fn of(names: &[&str]) -> Self {
        let mut union = Self::default();
        for name in names {
            union.extend(&Self::named(*name));
        }
        union
    }

    /// Union of several descriptors, dropping repeated members.
    pub fn union<'a>(parts: impl IntoIterator<Item = &'a TypeDescriptor>) -> Self {
        let mut union = Self::default();
        for part in parts {
            union.extend(part);
        }
        union
    }

    pub fn extend(&mut self, other: &TypeDescriptor) {
        for member in &other.0 {
            if !self.0.contains(member) {
                self.0.push(member.clone());
            }
        }
    }

    pub fn members(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("unknown");
        }
        f.write_str(&self.0.join(" | "))
    }
}

/// Outcome of a single constraint against one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
    /// Not a pass; escalated to a fault by composition.
    Diagnostic(String),
}

impl From<bool> for Verdict {
    fn from(passed: bool) -> Self {
        if passed { Verdict::Pass } else { Verdict::Fail }
    }
}

/// Runtime fault raised while validating a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationFault {
    #[error("{context}: {message}")]
    Diagnostic { context: String, message: String },
    #[error("RangeError: {0}")]
    Range(String),
    #[error("TypeError: {0}")]
    TypeConversion(String),
}

/// Builtin primitive type checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    String,
    Number,
    Boolean,
    BigInt,
    Symbol,
}

impl Primitive {
    pub const ALL: [Primitive; 5] = [
        Primitive::String,
        Primitive::Number,
        Primitive::Boolean,
        Primitive::BigInt,
        Primitive::Symbol,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Primitive::String => "string",
            Primitive::Number => "number",
            Primitive::Boolean => "boolean",
            Primitive::BigInt => "bigint",
            Primitive::Symbol => "symbol",
        }
    }

    /// JSON input has no bigint or symbol values, so those never match.
    fn matches(self, value: Option<&Value>) -> bool {
        match (self, value) {
            (Primitive::String, Some(Value::String(_))) => true,
            (Primitive::Number, Some(Value::Number(_))) => true,
            (Primitive::Boolean, Some(Value::Bool(_))) => true,
            _ => false,
        }
    }
}

/// Lower or upper bound on a number or on a string length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limit {
    pub bound: f64,
    pub exclusive: bool,
    pub upper: bool,
    /// Compare string length instead of the numeric value.
    pub length: bool,
}

impl Limit {
    fn admits(&self, value: Option<&Value>) -> bool {
        let measured = if self.length {
            string_length(value)
        } else {
            number(value)
        };
        measured.is_some_and(|m| match (self.upper, self.exclusive) {
            (false, false) => m >= self.bound,
            (false, true) => m > self.bound,
            (true, false) => m <= self.bound,
            (true, true) => m < self.bound,
        })
    }
}

/// Executable part of a constraint.
#[derive(Debug, Clone)]
pub enum Check {
    Primitive(Primitive),
    /// `range(...)`; arguments are filled left to right.
    Range {
        start: Option<f64>,
        stop: Option<f64>,
        step: Option<f64>,
    },
    Pattern(Regex),
    Limit(Limit),
    /// Inner constraint, or the value is absent.
    Optional(Box<Constraint>),
    /// Conjunction of an alias's constraints.
    All(Vec<Constraint>),
    Composite(Arc<Composite>),
}

impl Check {
    fn evaluate(&self, value: Option<&Value>) -> Result<Verdict, EvaluationFault> {
        match self {
            Check::Primitive(primitive) => Ok(primitive.matches(value).into()),
            Check::Range { start, stop, step } => evaluate_range(*start, *stop, *step, value),
            Check::Pattern(regex) => Ok(match value {
                Some(Value::String(text)) => regex.is_match(text).into(),
                _ => Verdict::Fail,
            }),
            Check::Limit(limit) => Ok(limit.admits(value).into()),
            Check::Optional(inner) => Ok(match inner.evaluate(value)? {
                Verdict::Fail if value.is_none() => Verdict::Pass,
                verdict => verdict,
            }),
            Check::All(constraints) => {
                for constraint in constraints {
                    match constraint.evaluate(value)? {
                        Verdict::Pass => {}
                        verdict => return Ok(verdict),
                    }
                }
                Ok(Verdict::Pass)
            }
            Check::Composite(composite) => Ok(composite.evaluate(value)?.into()),
        }
    }
}

fn number(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64)
}

/// String length in UTF-16 code units.
fn string_length(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::String(text)) => Some(text.encode_utf16().count() as f64),
        _ => None,
    }
}

fn evaluate_range(
    start: Option<f64>,
    stop: Option<f64>,
    step: Option<f64>,
    value: Option<&Value>,
) -> Result<Verdict, EvaluationFault> {
    let diagnostic = |message: &str| Ok(Verdict::Diagnostic(message.to_string()));
    let is_string = matches!(value, Some(Value::String(_)));

    match (start, stop, step) {
        (Some(start), Some(stop), Some(step)) => {
            if is_string {
                return diagnostic(RANGE_STEP_ON_STRING);
            }
            if stop <= start {
                return diagnostic(RANGE_INVERTED);
            }
            if step <= 0.0 {
                return diagnostic(RANGE_NON_POSITIVE_STEP);
            }
            Ok(number(value)
                .is_some_and(|v| v >= start && v <= stop && (v - start) % step == 0.0)
                .into())
        }
        (Some(start), Some(stop), None) => {
            if stop <= start {
                return diagnostic(RANGE_INVERTED);
            }
            let measured = if is_string {
                string_length(value)
            } else {
                number(value)
            };
            Ok(measured.is_some_and(|m| m >= start && m <= stop).into())
        }
        (Some(end), None, None) if end < 0.0 => {
            if is_string {
                return Err(EvaluationFault::Range(RANGE_NEGATIVE_STRING.to_string()));
            }
            Ok(number(value).is_some_and(|v| v >= end).into())
        }
        (Some(end), None, None) => Ok(if is_string {
            string_length(value).is_some_and(|len| len <= end)
        } else {
            number(value).is_some_and(|v| v >= 0.0 && v <= end)
        }
        .into()),
        _ => Err(EvaluationFault::TypeConversion(
            RANGE_NO_ARGUMENTS.to_string(),
        )),
    }
}

/// Where a dependency's value comes from.
#[derive(Debug, Clone)]
pub enum DependencyTarget {
    /// A top-level binding emitted elsewhere (`alias$X`, `def$X`, `isX`).
    Binding(String),
    /// A constraint generated in place.
    Inline(Box<Constraint>),
}

/// A lazily retrieved value referenced by generated code.
#[derive(Debug, Clone)]
pub struct Dependency {
    /// Accessor name; may contain the `{{ name }}` placeholder.
    pub symbol: String,
    pub target: DependencyTarget,
}

/// A validation predicate plus its code-generation template.
#[derive(Debug, Clone)]
pub struct Constraint {
    pub check: Check,
    pub ty: TypeDescriptor,
    /// Single-line JavaScript predicate, may contain `{{ name }}`.
    pub code: String,
    /// Global statement emitted once before the predicate is used.
    pub preamble: Option<String>,
    pub dependencies: Vec<Dependency>,
}

impl Constraint {
    pub fn new(check: Check, ty: TypeDescriptor, code: impl Into<String>) -> Self {
        Self {
            check,
            ty,
            code: code.into(),
            preamble: None,
            dependencies: Vec::new(),
        }
    }

    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = Some(preamble.into());
        self
    }

    pub fn with_dependency(mut self, symbol: impl Into<String>, target: DependencyTarget) -> Self {
        self.dependencies.push(Dependency {
            symbol: symbol.into(),
            target,
        });
        self
    }

    /// Evaluates against a possibly absent value.
    pub fn evaluate(&self, value: Option<&Value>) -> Result<Verdict, EvaluationFault> {
        self.check.evaluate(value)
    }

    /// Evaluates against a present value, escalating diagnostics.
    pub fn test(&self, value: &Value) -> Result<bool, EvaluationFault> {
        match self.evaluate(Some(value))? {
            Verdict::Pass => Ok(true),
            Verdict::Fail => Ok(false),
            Verdict::Diagnostic(message) => Err(EvaluationFault::Diagnostic {
                context: "value".to_string(),
                message,
            }),
        }
    }
}

/// One resolved property of a definition or model.
#[derive(Debug, Clone)]
pub struct Property {
    pub name: String,
    pub ty: TypeDescriptor,
    pub constraints: Vec<Constraint>,
}

impl Property {
    /// All constraints must pass. Diagnostics are escalated to faults.
    fn evaluate(&self, owner: &str, value: Option<&Value>) -> Result<bool, EvaluationFault> {
        for constraint in &self.constraints {
            match constraint.evaluate(value)? {
                Verdict::Pass => {}
                Verdict::Fail => return Ok(false),
                Verdict::Diagnostic(message) => {
                    return Err(EvaluationFault::Diagnostic {
                        context: format!("{owner}.{}", self.name),
                        message,
                    });
                }
            }
        }
        Ok(true)
    }
}

/// Structural predicate built from a definition or model body.
#[derive(Debug, Clone)]
pub struct Composite {
    pub name: String,
    pub properties: Vec<Property>,
}

impl Composite {
    /// Validates a value against every property in declaration order.
    pub fn validate(&self, value: &Value) -> Result<bool, EvaluationFault> {
        self.evaluate(Some(value))
    }

    fn evaluate(&self, value: Option<&Value>) -> Result<bool, EvaluationFault> {
        let object = value.and_then(Value::as_object);
        for property in &self.properties {
            let field = object.and_then(|object| object.get(&property.name));
            if !property.evaluate(&self.name, field)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
