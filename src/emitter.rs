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

//! Code generation: the JavaScript validation module and the TypeScript
//! declaration module.
//!
//! Every constraint carries a single-line code template. Instantiation
//! substitutes the `{{ name }}` placeholder with the binding context, hoists
//! the preamble into the globals section, and wraps constraints that have
//! dependencies in an IIFE exposing one memoized accessor per dependency.

use crate::constraint::{Constraint, DependencyTarget, Property};
use crate::resolver::{ConfigMap, ResolvedSchema, Role, StructEntry, binding_name};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Placeholder substituted with the binding context name.
pub(crate) const NAME_PLACEHOLDER: &str = "{{ name }}";

/// File name of the validation module.
pub const VALIDATION_FILE: &str = "index.js";
/// File name of the declaration module.
pub const DECLARATION_FILE: &str = "index.d.ts";

/// `wrap` rethrows diagnostics; `field` reads own properties of plain objects.
const RUNTIME_HELPERS: &str = "\
const wrap = (e) => {
    if (e instanceof Error) throw e;

    return e;
};
const field = (v, k) =>
    v !== null && typeof v === \"object\" && !Array.isArray(v) && Object.hasOwn(v, k) ? v[k] : undefined;";

/// The two generated output texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedModules {
    /// JavaScript validation module.
    pub validation: String,
    /// TypeScript declaration module.
    pub declarations: String,
}

#[derive(Serialize)]
struct Manifest {
    name: String,
    version: &'static str,
    description: &'static str,
    main: &'static str,
    typings: &'static str,
}

impl EmittedModules {
    /// Package manifest describing the two emitted files.
    pub fn manifest(&self) -> String {
        let manifest = Manifest {
            name: format!(".{}", env!("CARGO_PKG_NAME")),
            version: env!("CARGO_PKG_VERSION"),
            description: "Generated type guards",
            main: VALIDATION_FILE,
            typings: DECLARATION_FILE,
        };
        serde_json::to_string_pretty(&manifest).unwrap_or_default()
    }
}

/// Renders both output modules from a resolved schema.
pub fn emit(schema: &ResolvedSchema) -> EmittedModules {
    let modules = EmittedModules {
        validation: validation_module(schema),
        declarations: declaration_module(schema),
    };
    debug!(
        validation_bytes = modules.validation.len(),
        declaration_bytes = modules.declarations.len(),
        "emitted modules"
    );
    modules
}

/// Instantiates a constraint under the binding context `name`.
///
/// Preamble statements are appended to `globals`, one per line.
pub(crate) fn instantiate(name: &str, constraint: &Constraint, globals: &mut String) -> String {
    let substitute = |text: &str| text.replace(NAME_PLACEHOLDER, name);

    if let Some(preamble) = &constraint.preamble {
        globals.push('\n');
        globals.push_str(&substitute(preamble));
    }
    let body = substitute(&constraint.code);
    if constraint.dependencies.is_empty() {
        return format!("({body})/* {} */", constraint.ty);
    }

    let mut params = Vec::new();
    let mut accessors = String::new();
    let mut targets = Vec::new();
    for dependency in &constraint.dependencies {
        let symbol = substitute(&dependency.symbol);
        params.push(format!("retrieve${symbol}"));
        accessors.push_str(&format!(
            "let cached${symbol}; const {symbol} = () => cached${symbol} ?? (cached${symbol} = retrieve${symbol}()); "
        ));
        let target = match &dependency.target {
            DependencyTarget::Binding(binding) => binding.clone(),
            DependencyTarget::Inline(inner) => instantiate(name, inner, globals),
        };
        targets.push(format!("() => {target}"));
    }
    format!(
        "(({}) => {{ {accessors}return ({body}); }})({})/* {} */",
        params.join(", "),
        targets.join(", "),
        constraint.ty
    )
}

fn validation_module(schema: &ResolvedSchema) -> String {
    let mut globals = schema.preamble.clone();
    let aliases: Vec<String> = schema
        .aliases
        .iter()
        .map(|alias| {
            let binding = binding_name(Role::Alias, &alias.name);
            let items: Vec<String> = alias
                .constraints
                .iter()
                .map(|constraint| instantiate(&binding, constraint, &mut globals))
                .collect();
            format!("var {binding} = [{}];", items.join(", "))
        })
        .collect();

    let mut seen = HashSet::new();
    let globals: Vec<&str> = globals
        .lines()
        .filter(|line| !line.is_empty() && seen.insert(*line))
        .collect();

    let definitions = struct_bindings(&schema.definitions, Role::Definition, "var");
    let models = struct_bindings(&schema.models, Role::Model, "export var");

    module([
        banner(),
        config_comment(&schema.config),
        RUNTIME_HELPERS.to_string(),
        section("globals", &globals),
        section("aliases", &aliases),
        section("definitions", &definitions),
        section("models", &models),
    ])
}

fn struct_bindings(entries: &[StructEntry], role: Role, declare: &str) -> Vec<String> {
    entries
        .iter()
        .map(|entry| {
            format!(
                "{declare} {} = {};",
                binding_name(role, &entry.name),
                entry.constraint.code
            )
        })
        .collect()
}

fn declaration_module(schema: &ResolvedSchema) -> String {
    let aliases: Vec<String> = schema
        .aliases
        .iter()
        .map(|alias| format!("type {} = {};", alias.name, alias.ty()))
        .collect();
    let interfaces: Vec<String> = schema
        .definitions
        .iter()
        .map(|entry| interface("interface", entry))
        .collect();
    let exported: Vec<String> = schema
        .models
        .iter()
        .map(|entry| interface("export interface", entry))
        .collect();
    let guards: Vec<String> = schema
        .models
        .iter()
        .map(|entry| {
            format!(
                "export declare const {}: (v: unknown) => v is {};",
                binding_name(Role::Model, &entry.name),
                entry.name
            )
        })
        .collect();

    module([
        banner(),
        config_comment(&schema.config),
        section("type aliases", &aliases),
        section("interfaces", &interfaces),
        section("exported interfaces", &exported),
        section("type guards", &guards),
    ])
}

fn interface(declare: &str, entry: &StructEntry) -> String {
    let mut text = format!("{declare} {} {{\n", entry.name);
    for Property { name, ty, .. } in entry.properties() {
        text.push_str(&format!("    {name}: {ty};\n"));
    }
    text.push('}');
    text
}

fn module<const N: usize>(blocks: [String; N]) -> String {
    let mut text = blocks.join("\n\n");
    text.push('\n');
    text
}

fn banner() -> String {
    format!(
        "/**\n * {} - Type Guard Compiler\n *\n * version {}\n *\n * AUTO-GENERATED FILE DO NOT EDIT DIRECTLY\n */",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    )
}

/// Configuration as a 4-space pretty JSON block comment.
fn config_comment(config: &ConfigMap) -> String {
    let mut buffer = Vec::new();
    let written = {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        config.serialize(&mut serializer).is_ok()
    };
    let json = match String::from_utf8(buffer) {
        Ok(json) if written => json,
        _ => "{}".to_string(),
    };

    let mut text = String::from("/**\n * config\n");
    for line in json.lines() {
        text.push_str(" * ");
        text.push_str(line);
        text.push('\n');
    }
    text.push_str(" */");
    text
}

fn section<S: AsRef<str>>(title: &str, lines: &[S]) -> String {
    let mut text = format!("/**\n * {title}\n */");
    for line in lines {
        text.push('\n');
        text.push_str(line.as_ref());
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{Check, Primitive, TypeDescriptor};

    fn string_check() -> Constraint {
        Constraint::new(
            Check::Primitive(Primitive::String),
            TypeDescriptor::named("string"),
            "(v) => typeof v === \"string\"",
        )
    }

    #[test]
    fn instantiate_without_dependencies_annotates_type() {
        let mut globals = String::new();
        let code = instantiate("X$p", &string_check(), &mut globals);
        assert_eq!(code, "((v) => typeof v === \"string\")/* string */");
        assert!(globals.is_empty());
    }

    #[test]
    fn instantiate_substitutes_placeholder_and_hoists_preamble() {
        let constraint = Constraint::new(
            Check::Primitive(Primitive::String),
            TypeDescriptor::named("string"),
            "(v) => {{ name }}$re.test(v)",
        )
        .with_preamble("const {{ name }}$re = /a/;");
        let mut globals = String::new();
        let code = instantiate("X$p", &constraint, &mut globals);
        assert_eq!(code, "((v) => X$p$re.test(v))/* string */");
        assert_eq!(globals, "\nconst X$p$re = /a/;");
    }

    #[test]
    fn instantiate_wraps_dependencies_in_memoized_accessors() {
        let constraint = Constraint::new(
            Check::Primitive(Primitive::String),
            TypeDescriptor::named("Inner"),
            "(v) => dep$Inner()(v)",
        )
        .with_dependency("dep$Inner", DependencyTarget::Binding("def$Inner".into()));
        let mut globals = String::new();
        let code = instantiate("X$p", &constraint, &mut globals);
        assert_eq!(
            code,
            "((retrieve$dep$Inner) => { let cached$dep$Inner; \
             const dep$Inner = () => cached$dep$Inner ?? (cached$dep$Inner = retrieve$dep$Inner()); \
             return ((v) => dep$Inner()(v)); })(() => def$Inner)/* Inner */"
        );
    }

    #[test]
    fn empty_config_renders_empty_object() {
        assert_eq!(
            config_comment(&ConfigMap::default()),
            "/**\n * config\n * {}\n */"
        );
    }

    #[test]
    fn manifest_names_both_files() {
        let modules = EmittedModules {
            validation: String::new(),
            declarations: String::new(),
        };
        let manifest: serde_json::Value = serde_json::from_str(&modules.manifest()).unwrap();
        assert_eq!(manifest["main"], "index.js");
        assert_eq!(manifest["typings"], "index.d.ts");
        assert_eq!(manifest["version"], env!("CARGO_PKG_VERSION"));
    }
}
