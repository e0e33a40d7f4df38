//! The validation pipeline and its report.
//!
//! [`TypeValidator`] runs the full pipeline over one annotation string:
//! scan → resolve → rewrite → evaluate → report. Each call is stateless and
//! idempotent; validators over different annotations never interfere.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::error::ValidationError;
use crate::eval::{safe_evaluate, PyType};
use crate::registry::{BuiltinRegistry, NamespaceProvider};
use crate::resolve::{resolve_names, TypeMap};
use crate::rewrite::qualify_annotation;
use crate::scan::{scan_annotation, NameToken};

// ============================================================================
// Validation Result
// ============================================================================

/// The immutable report produced by one validation run.
///
/// Errors are collected, never raised: a result is always constructed, and
/// callers distinguish total from partial failure by inspecting fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// The annotation with every resolvable name fully qualified. Partially
    /// qualified when some names failed; the raw input when the annotation
    /// was structurally malformed.
    pub validated_type: String,
    /// The materialized type value, present only when evaluation of
    /// `validated_type` succeeded.
    pub pytype: Option<PyType>,
    /// Every failure encountered, in pipeline order.
    pub errors: Vec<ValidationError>,
    /// Names with no safe namespace, in first-appearance order.
    pub invalid_names: Vec<String>,
    /// Finalized identifier → namespace map.
    pub type_map: TypeMap,
}

impl ValidationResult {
    /// Whether validation succeeded outright.
    ///
    /// Derived from the other fields: no invalid names and a materialized
    /// type value. Never independently settable.
    pub fn is_valid(&self) -> bool {
        self.invalid_names.is_empty() && self.pytype.is_some()
    }

    /// The resolved namespace of a single identifier, if it resolved.
    pub fn get_origin(&self, name: &str) -> Option<&str> {
        self.type_map.get(name).map(String::as_str)
    }
}

// ============================================================================
// Type Validator
// ============================================================================

/// Validates and qualifies one annotation string.
///
/// # Examples
///
/// ```
/// use tyval::TypeValidator;
///
/// let result = TypeValidator::new("Union[Callable[[], int], int]").validate_names();
/// assert!(result.is_valid());
/// assert_eq!(
///     result.validated_type,
///     "typing.Union[typing.Callable[[], builtins.int], builtins.int]"
/// );
/// assert_eq!(result.get_origin("Callable"), Some("typing"));
/// ```
#[derive(Debug, Clone)]
pub struct TypeValidator<P = BuiltinRegistry> {
    annotation: String,
    provider: P,
}

impl TypeValidator<BuiltinRegistry> {
    /// Create a validator over the default builtin whitelist.
    pub fn new(annotation: impl Into<String>) -> Self {
        TypeValidator::with_provider(annotation, BuiltinRegistry::new())
    }
}

impl<P: NamespaceProvider> TypeValidator<P> {
    /// Create a validator with an explicit whitelist provider.
    pub fn with_provider(annotation: impl Into<String>, provider: P) -> Self {
        TypeValidator {
            annotation: annotation.into(),
            provider,
        }
    }

    /// The annotation under validation.
    pub fn annotation(&self) -> &str {
        &self.annotation
    }

    /// Distinct bare type names in the annotation, first-appearance order.
    pub fn find_names(&self) -> Vec<String> {
        self.find_names_in(&self.annotation)
    }

    /// Distinct bare type names in an explicit annotation string.
    pub fn find_names_in(&self, annotation: &str) -> Vec<String> {
        dedup_names(&scan_annotation(annotation).tokens)
    }

    /// Run the full pipeline: scan, resolve, rewrite, evaluate, report.
    pub fn validate_names(&self) -> ValidationResult {
        let outcome = scan_annotation(&self.annotation);
        let names = dedup_names(&outcome.tokens);
        debug!(annotation = %self.annotation, names = ?names, "extracted type names");

        let mut errors = Vec::new();
        let structural = outcome.error;
        if let Some(err) = &structural {
            errors.push(err.clone());
        }

        let resolution = resolve_names(&names, &self.provider);
        errors.extend(resolution.errors);

        // A malformed annotation is passed through untouched; substitution
        // could otherwise corrupt structure.
        let validated_type = if structural.is_some() {
            self.annotation.clone()
        } else {
            qualify_annotation(&self.annotation, &outcome.tokens, &resolution.type_map)
        };
        debug!(validated_type = %validated_type, "rewrote annotation");

        let pytype = if structural.is_none() && resolution.invalid_names.is_empty() {
            let allowed = self.provider.namespaces();
            match safe_evaluate(&validated_type, &allowed, &self.provider) {
                Ok(ty) => Some(ty),
                Err(err) => {
                    debug!(error = %err, "evaluation failed");
                    errors.push(err);
                    None
                }
            }
        } else {
            None
        };

        ValidationResult {
            validated_type,
            pytype,
            errors,
            invalid_names: resolution.invalid_names,
            type_map: resolution.type_map,
        }
    }
}

/// Distinct token texts in first-appearance order.
fn dedup_names(tokens: &[NameToken]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for token in tokens {
        if seen.insert(token.text.as_str()) {
            names.push(token.text.clone());
        }
    }
    names
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod find_names {
        use super::*;

        #[test]
        fn dedup_preserves_first_appearance_order() {
            let validator = TypeValidator::new("Dict[int, Dict[str, int]]");
            assert_eq!(validator.find_names(), ["Dict", "int", "str"]);
        }

        #[test]
        fn explicit_argument_entry_point() {
            let validator = TypeValidator::new("int");
            assert_eq!(validator.find_names_in("List[str]"), ["List", "str"]);
        }

        #[test]
        fn type_map_keys_subset_of_found_names() {
            let validator = TypeValidator::new("Dict[str, Unknowable]");
            let found = validator.find_names();
            let result = validator.validate_names();
            assert!(result.type_map.len() <= found.len());
            for key in result.type_map.keys() {
                assert!(found.contains(key));
            }
        }
    }

    mod pipeline {
        use super::*;

        #[test]
        fn simple_builtin_round_trip() {
            let result = TypeValidator::new("list[str]").validate_names();
            assert!(result.is_valid());
            assert_eq!(result.validated_type, "builtins.list[builtins.str]");
            assert_eq!(result.get_origin("list"), Some("builtins"));
            assert_eq!(result.get_origin("str"), Some("builtins"));
            assert!(result.errors.is_empty());
        }

        #[test]
        fn union_with_callable() {
            let result = TypeValidator::new("Union[Callable[[], int], int]").validate_names();
            assert!(result.is_valid());
            assert_eq!(
                result.validated_type,
                "typing.Union[typing.Callable[[], builtins.int], builtins.int]"
            );
            assert_eq!(
                result.pytype.unwrap().to_string(),
                "typing.Union[typing.Callable[[], builtins.int], builtins.int]"
            );
        }

        #[test]
        fn unknown_name_invalidates() {
            let result = TypeValidator::new("InvalidType[str]").validate_names();
            assert!(!result.is_valid());
            assert_eq!(result.invalid_names, ["InvalidType"]);
            assert!(result.pytype.is_none());
            assert!(!result.errors.is_empty());
            // Partial qualification: the bad name stays visibly bare.
            assert_eq!(result.validated_type, "InvalidType[builtins.str]");
            assert_eq!(result.get_origin("InvalidType"), None);
        }

        #[test]
        fn structural_error_passes_raw_annotation_through() {
            let result = TypeValidator::new("List[int").validate_names();
            assert!(!result.is_valid());
            assert_eq!(result.validated_type, "List[int");
            assert!(matches!(
                result.errors[0],
                ValidationError::Structural { .. }
            ));
            assert!(result.pytype.is_none());
        }

        #[test]
        fn empty_annotation_is_invalid_not_a_panic() {
            let result = TypeValidator::new("").validate_names();
            assert!(!result.is_valid());
            assert_eq!(result.validated_type, "");
            assert!(!result.errors.is_empty());
        }

        #[test]
        fn idempotent_across_calls() {
            let validator = TypeValidator::new("Dict[str, Optional[List[int]]]");
            let first = validator.validate_names();
            let second = validator.validate_names();
            assert_eq!(first, second);
        }

        #[test]
        fn pre_qualified_names_pass_through() {
            let result = TypeValidator::new("typing.List[int]").validate_names();
            assert!(result.is_valid());
            assert_eq!(result.validated_type, "typing.List[builtins.int]");
            // Dotted names are never entered in the map.
            assert_eq!(result.get_origin("typing.List"), None);
        }

        #[test]
        fn ambiguous_name_origin_retrievable() {
            let result = TypeValidator::new("TypedDict").validate_names();
            assert!(result.is_valid());
            assert_eq!(result.get_origin("TypedDict"), Some("typing"));
        }
    }

    mod custom_provider {
        use super::*;

        #[test]
        fn registered_namespace_participates() {
            let mut registry = BuiltinRegistry::new();
            registry.register("mytypes", ["Money"]);
            let validator = TypeValidator::with_provider("List[Money]", registry);
            let result = validator.validate_names();
            assert!(result.is_valid());
            assert_eq!(result.validated_type, "typing.List[mytypes.Money]");
            assert_eq!(result.get_origin("Money"), Some("mytypes"));
        }
    }

    mod report {
        use super::*;

        #[test]
        fn serializes_to_json() {
            let result = TypeValidator::new("list[str]").validate_names();
            let json = serde_json::to_value(&result).unwrap();
            assert_eq!(json["validated_type"], "builtins.list[builtins.str]");
            assert_eq!(json["type_map"]["list"], "builtins");
            assert_eq!(json["invalid_names"], serde_json::json!([]));
        }

        #[test]
        fn is_valid_requires_both_conditions() {
            // Structural failure: no invalid names, but no pytype either.
            let result = TypeValidator::new("List[int").validate_names();
            assert!(result.invalid_names.is_empty());
            assert!(!result.is_valid());
        }
    }
}
