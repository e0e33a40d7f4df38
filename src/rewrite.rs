//! Annotation rewriter.
//!
//! Splices qualified names into the original annotation by token span:
//! every byte outside a token span is copied verbatim, so brackets, commas
//! and whitespace survive byte-identical. Names without a map entry are left
//! untouched — a failed name stays visibly bare in the output instead of
//! disappearing.

use crate::resolve::TypeMap;
use crate::scan::NameToken;

/// Rewrite an annotation with fully-qualified names.
///
/// `tokens` must be in ascending span order over `annotation` (the scanner's
/// output order). Runs even when some names are unresolved; partial
/// qualification is intentional.
///
/// # Examples
///
/// ```
/// use tyval::rewrite::qualify_annotation;
/// use tyval::scan::scan_annotation;
/// use tyval::resolve::TypeMap;
///
/// let annotation = "list[str]";
/// let tokens = scan_annotation(annotation).tokens;
/// let mut type_map = TypeMap::new();
/// type_map.insert("list".to_string(), "builtins".to_string());
/// type_map.insert("str".to_string(), "builtins".to_string());
///
/// let qualified = qualify_annotation(annotation, &tokens, &type_map);
/// assert_eq!(qualified, "builtins.list[builtins.str]");
/// ```
pub fn qualify_annotation(annotation: &str, tokens: &[NameToken], type_map: &TypeMap) -> String {
    let mut out = String::with_capacity(annotation.len() + tokens.len() * 8);
    let mut cursor = 0;

    for token in tokens {
        out.push_str(&annotation[cursor..token.span.start]);
        match type_map.get(&token.text) {
            Some(origin) => {
                out.push_str(origin);
                out.push('.');
                out.push_str(&token.text);
            }
            None => out.push_str(&token.text),
        }
        cursor = token.span.end;
    }

    out.push_str(&annotation[cursor..]);
    out
}

// ============================================================================
// Tests
// ============================================================================
