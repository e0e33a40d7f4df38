//! tyval: safe validation and qualification of Python type annotations.
//!
//! Takes a textual annotation such as `Union[Callable[[], int], int]`,
//! extracts every bare identifier that denotes a type, resolves each one to
//! the safe namespace that defines it, rewrites the annotation fully
//! qualified, and materializes the result into a structured type value. The
//! outcome is a [`ValidationResult`] report: per-name resolution, every
//! failure, and a derived validity flag.
//!
//! The pipeline never executes annotation text. Resolution is a metadata
//! query against a whitelist ([`registry::NamespaceProvider`]) and
//! materialization is a capability-scoped evaluator that only performs
//! attribute lookups against an explicit namespace allow-list.
//!
//! # Example
//!
//! ```
//! use tyval::TypeValidator;
//!
//! let result = TypeValidator::new("list[str]").validate_names();
//! assert!(result.is_valid());
//! assert_eq!(result.validated_type, "builtins.list[builtins.str]");
//! assert_eq!(result.get_origin("list"), Some("builtins"));
//! ```
//!
//! Failures are collected, never raised — a malformed or unresolvable
//! annotation still yields a complete report:
//!
//! ```
//! use tyval::TypeValidator;
//!
//! let result = TypeValidator::new("InvalidType[str]").validate_names();
//! assert!(!result.is_valid());
//! assert_eq!(result.invalid_names, ["InvalidType"]);
//! assert_eq!(result.validated_type, "InvalidType[builtins.str]");
//! ```

pub mod error;
pub mod eval;
pub mod registry;
pub mod resolve;
pub mod rewrite;
pub mod scan;
pub mod validator;

pub use error::ValidationError;
pub use eval::{safe_evaluate, PyType};
pub use registry::{BuiltinRegistry, NamespaceProvider, NAMESPACE_PRECEDENCE};
pub use resolve::{resolve_names, Resolution, TypeMap};
pub use rewrite::qualify_annotation;
pub use scan::{scan_annotation, NameToken, ScanOutcome, Span};
pub use validator::{TypeValidator, ValidationResult};
