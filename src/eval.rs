//! Safe evaluator for qualified annotation strings.
//!
//! Materializes a fully-qualified annotation (e.g.
//! `typing.Union[typing.Callable[[], builtins.int], builtins.int]`) into a
//! structured [`PyType`] value. Evaluation is capability-scoped: the only
//! operation ever performed is an attribute lookup against an explicit
//! allow-list of namespaces, checked through the whitelist provider. There is
//! no interpreter and no fallback to one.
//!
//! ## Grammar
//!
//! ```text
//! <type>      := <dotted> <subscript>? | "[" <args>? "]"
//! <subscript> := "[" <args> "]"
//! <args>      := <type> ("," <type>)*
//! <dotted>    := ident ("." ident)*
//! ```
//!
//! The bracketed-list production exists for `Callable`'s argument list,
//! which nests a bare `[...]` inside the subscript.

use std::fmt;

use serde::Serialize;
use winnow::ascii::multispace0;
use winnow::combinator::{alt, delimited, opt, preceded, repeat, terminated};
use winnow::error::{ErrMode, ParserError};
use winnow::prelude::*;
use winnow::token::take_while;
use winnow::ModalResult;

use crate::error::ValidationError;
use crate::registry::NamespaceProvider;

// ============================================================================
// Type Values
// ============================================================================

/// A materialized annotation value.
///
/// `Display` renders the canonical fully-qualified string form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PyType {
    /// A qualified type reference, e.g. `builtins.int`.
    Name {
        /// Dotted namespace path (empty only transiently during parsing;
        /// a successful evaluation never returns an empty namespace).
        namespace: String,
        /// The attribute name within the namespace.
        name: String,
    },
    /// A subscripted generic, e.g. `typing.Dict[builtins.str, builtins.int]`.
    Generic {
        base: Box<PyType>,
        args: Vec<PyType>,
    },
    /// A bracketed argument list, e.g. the `[]` inside `Callable[[], int]`.
    ArgList(Vec<PyType>),
}

impl fmt::Display for PyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PyType::Name { namespace, name } => {
                if namespace.is_empty() {
                    write!(f, "{name}")
                } else {
                    write!(f, "{namespace}.{name}")
                }
            }
            PyType::Generic { base, args } => {
                write!(f, "{base}[")?;
                write_args(f, args)?;
                write!(f, "]")
            }
            PyType::ArgList(args) => {
                write!(f, "[")?;
                write_args(f, args)?;
                write!(f, "]")
            }
        }
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[PyType]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{arg}")?;
    }
    Ok(())
}

// ============================================================================
// Evaluation
// ============================================================================

/// Evaluate a qualified annotation string against an allow-list.
///
/// Every name in the expression must be dotted, its namespace must be in
/// `allowed`, and the whitelist provider must confirm the namespace exports
/// the attribute. Bare names are rejected the way Python's `eval` would
/// reject an undefined name.
pub fn safe_evaluate<P: NamespaceProvider>(
    expr: &str,
    allowed: &[&str],
    provider: &P,
) -> Result<PyType, ValidationError> {
    let ty = terminated(parse_type, multispace0)
        .parse(expr)
        .map_err(|e| {
            ValidationError::evaluation(format!("invalid type expression '{expr}': {e:?}"))
        })?;
    check_type(&ty, allowed, provider)?;
    Ok(ty)
}

/// Verify every name in the tree against the allow-list and whitelist.
fn check_type<P: NamespaceProvider>(
    ty: &PyType,
    allowed: &[&str],
    provider: &P,
) -> Result<(), ValidationError> {
    match ty {
        PyType::Name { namespace, name } => {
            if namespace.is_empty() {
                return Err(ValidationError::evaluation(format!(
                    "name '{name}' is not defined"
                )));
            }
            if !allowed.contains(&namespace.as_str()) {
                return Err(ValidationError::evaluation(format!(
                    "namespace '{namespace}' is not in the allowed set"
                )));
            }
            if !provider.contains(namespace, name) {
                return Err(ValidationError::evaluation(format!(
                    "namespace '{namespace}' has no attribute '{name}'"
                )));
            }
            Ok(())
        }
        PyType::Generic { base, args } => {
            check_type(base, allowed, provider)?;
            args.iter().try_for_each(|arg| check_type(arg, allowed, provider))
        }
        PyType::ArgList(args) => {
            args.iter().try_for_each(|arg| check_type(arg, allowed, provider))
        }
    }
}

// ============================================================================
// Parser implementation using winnow
// ============================================================================

/// Parse a type expression (qualified name, generic, or bracketed list).
fn parse_type(input: &mut &str) -> ModalResult<PyType> {
    let _ = multispace0.parse_next(input)?;
    alt((parse_arg_list, parse_named)).parse_next(input)
}

/// Parse a bracketed argument list, possibly empty: `[]`, `[int, str]`.
fn parse_arg_list(input: &mut &str) -> ModalResult<PyType> {
    let args = delimited(('[', multispace0), opt(parse_args), (multispace0, ']'))
        .parse_next(input)?;
    Ok(PyType::ArgList(args.unwrap_or_default()))
}

/// Parse a dotted name with an optional subscript.
fn parse_named(input: &mut &str) -> ModalResult<PyType> {
    let first = parse_ident(input)?;
    let rest: Vec<&str> = repeat(0.., preceded('.', parse_ident)).parse_next(input)?;

    let base = if rest.is_empty() {
        PyType::Name {
            namespace: String::new(),
            name: first.to_string(),
        }
    } else {
        let mut segments = vec![first];
        segments.extend(rest);
        let name = segments[segments.len() - 1].to_string();
        let namespace = segments[..segments.len() - 1].join(".");
        PyType::Name { namespace, name }
    };

    let subscript = opt(preceded(multispace0, parse_subscript)).parse_next(input)?;
    Ok(match subscript {
        Some(args) => PyType::Generic {
            base: Box::new(base),
            args,
        },
        None => base,
    })
}

/// Parse a subscript: one or more comma-separated types in brackets.
fn parse_subscript(input: &mut &str) -> ModalResult<Vec<PyType>> {
    delimited(('[', multispace0), parse_args, (multispace0, ']')).parse_next(input)
}

/// Parse a comma-separated, non-empty type list.
fn parse_args(input: &mut &str) -> ModalResult<Vec<PyType>> {
    let first = parse_type(input)?;
    let rest: Vec<PyType> = repeat(
        0..,
        preceded((multispace0, ',', multispace0), parse_type),
    )
    .parse_next(input)?;

    let mut all = vec![first];
    all.extend(rest);
    Ok(all)
}

/// Parse one identifier segment (no leading digit).
fn parse_ident<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    let checkpoint = *input;
    let ident: &str =
        take_while(1.., |c: char| c.is_alphanumeric() || c == '_').parse_next(input)?;

    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        *input = checkpoint;
        return Err(ErrMode::from_input(input));
    }
    Ok(ident)
}

// ============================================================================
// Tests
// ============================================================================
