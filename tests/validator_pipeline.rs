//! End-to-end pipeline tests against the public API.

use tyval::{BuiltinRegistry, PyType, TypeValidator, ValidationError};

#[test]
fn round_trip_builtin_generic() {
    let result = TypeValidator::new("list[str]").validate_names();
    assert!(result.is_valid());
    assert_eq!(result.validated_type, "builtins.list[builtins.str]");
    assert_eq!(result.get_origin("list"), Some("builtins"));
    assert_eq!(result.get_origin("str"), Some("builtins"));
    assert_eq!(result.type_map.len(), 2);
}

#[test]
fn unknown_name_scenario() {
    let result = TypeValidator::new("InvalidType[str]").validate_names();
    assert_eq!(result.invalid_names, ["InvalidType"]);
    assert!(!result.is_valid());
    assert!(!result.errors.is_empty());
    assert!(result
        .errors
        .iter()
        .any(|e| matches!(e, ValidationError::Unresolved { name } if name == "InvalidType")));
}

#[test]
fn nested_generic_scenario() {
    let result = TypeValidator::new("Dict[str, Optional[List[int]]]").validate_names();
    assert!(result.is_valid());
    assert_eq!(
        result.validated_type,
        "typing.Dict[builtins.str, typing.Optional[typing.List[builtins.int]]]"
    );
    for name in ["Dict", "str", "Optional", "List", "int"] {
        assert!(result.get_origin(name).is_some(), "{name} should resolve");
    }

    // Bracket balance of the output.
    let mut depth = 0i64;
    for ch in result.validated_type.chars() {
        match ch {
            '[' => depth += 1,
            ']' => depth -= 1,
            _ => {}
        }
        assert!(depth >= 0);
    }
    assert_eq!(depth, 0);
}

#[test]
fn callable_with_empty_args_scenario() {
    let validator = TypeValidator::new("Callable[[], int]");
    assert_eq!(validator.find_names(), ["Callable", "int"]);

    let result = validator.validate_names();
    assert!(result.is_valid());
    assert_eq!(result.validated_type, "typing.Callable[[], builtins.int]");
    assert!(result.validated_type.contains("[[], "));
}

#[test]
fn validation_is_idempotent() {
    let validator = TypeValidator::new("Union[Callable[[], int], int]");
    assert_eq!(validator.validate_names(), validator.validate_names());
}

#[test]
fn structural_preservation() {
    // Removing all identifier characters leaves the same residual skeleton
    // in input and output.
    let annotation = "Union[Callable[[int, str], bool], Optional[bytes]]";
    let result = TypeValidator::new(annotation).validate_names();
    assert!(result.is_valid());

    let residual = |s: &str| -> String {
        s.chars()
            .filter(|c| matches!(c, '[' | ']' | ',') || c.is_whitespace())
            .collect()
    };
    assert_eq!(residual(annotation), residual(&result.validated_type));
}

#[test]
fn extraction_count_invariant() {
    for annotation in [
        "int",
        "list[str]",
        "Dict[str, Dict[str, int]]",
        "InvalidType[Unknowable, int]",
        "Callable[[], int]",
    ] {
        let validator = TypeValidator::new(annotation);
        let found = validator.find_names();
        let result = validator.validate_names();
        assert!(result.type_map.len() <= found.len());
        for key in result.type_map.keys() {
            assert!(found.contains(key), "{key} missing from find_names");
        }
        for invalid in &result.invalid_names {
            assert!(!result.type_map.contains_key(invalid));
        }
    }
}

#[test]
fn materialized_type_structure() {
    let result = TypeValidator::new("Callable[[], int]").validate_names();
    match result.pytype.expect("pytype should materialize") {
        PyType::Generic { base, args } => {
            assert_eq!(
                *base,
                PyType::Name {
                    namespace: "typing".to_string(),
                    name: "Callable".to_string()
                }
            );
            assert_eq!(args.len(), 2);
            assert_eq!(args[0], PyType::ArgList(vec![]));
        }
        other => panic!("expected Generic, got {other:?}"),
    }
}

#[test]
fn custom_namespace_whitelist() {
    let mut registry = BuiltinRegistry::new();
    registry.register("decimal", ["Decimal"]);

    let result =
        TypeValidator::with_provider("Optional[Decimal]", registry).validate_names();
    assert!(result.is_valid());
    assert_eq!(result.validated_type, "typing.Optional[decimal.Decimal]");
    assert_eq!(result.get_origin("Decimal"), Some("decimal"));
}

#[test]
fn report_serializes_completely() {
    let result = TypeValidator::new("InvalidType[str]").validate_names();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["invalid_names"][0], "InvalidType");
    assert_eq!(json["type_map"]["str"], "builtins");
    assert!(json["pytype"].is_null());
    assert_eq!(json["errors"][0]["kind"], "unresolved");
}
