//! Annotation scanner and name extractor.
//!
//! Scans a raw annotation string left to right and produces the ordered
//! sequence of bare type names, one [`NameToken`] per occurrence. The scan is
//! flat: bracket depth is tracked only to validate balance, never to scope
//! extraction.
//!
//! Three classes of character runs exist between the structural characters
//! (`[`, `]`, `,`, whitespace):
//!
//! - **Bare identifiers** (`int`, `Callable`, `_T`) — emitted as tokens.
//! - **Dotted paths** (`typing.List`) — already qualified, passed through
//!   untouched and excluded from resolution.
//! - **Literals and other runs** (`3`, `'x'`) — never type names, passed
//!   through untouched.

use serde::Serialize;

use crate::error::ValidationError;

// ============================================================================
// Spans and Tokens
// ============================================================================

/// A byte range into the annotation string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// One occurrence of a bare type name in the annotation.
///
/// Tokens are produced in first-appearance order so the rewriter can splice
/// substitutions deterministically left to right.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameToken {
    /// The identifier text.
    pub text: String,
    /// Byte range of the occurrence in the original annotation.
    pub span: Span,
}

/// Result of scanning one annotation.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Tokens found, in source order. On a structural error this holds
    /// whatever was found before the imbalance.
    pub tokens: Vec<NameToken>,
    /// Structural error, if the annotation was malformed.
    pub error: Option<ValidationError>,
}

// ============================================================================
// Scanner
// ============================================================================

/// Scan an annotation string for bare type names.
///
/// Structural characters are `[`, `]`, `,` and whitespace; every maximal run
/// of other characters is a candidate token. Bracket balance is validated as
/// a side effect: a `]` with no open `[` stops the scan, unclosed `[` at the
/// end is reported after the full scan.
///
/// # Examples
///
/// ```
/// use tyval::scan::scan_annotation;
///
/// let outcome = scan_annotation("Dict[str, int]");
/// let names: Vec<&str> = outcome.tokens.iter().map(|t| t.text.as_str()).collect();
/// assert_eq!(names, ["Dict", "str", "int"]);
/// assert!(outcome.error.is_none());
/// ```
pub fn scan_annotation(annotation: &str) -> ScanOutcome {
    let mut tokens = Vec::new();

    if annotation.trim().is_empty() {
        return ScanOutcome {
            tokens,
            error: Some(ValidationError::structural("annotation cannot be empty")),
        };
    }

    let mut depth: usize = 0;
    let mut error = None;
    let mut run_start: Option<usize> = None;

    for (idx, ch) in annotation.char_indices() {
        let structural = matches!(ch, '[' | ']' | ',') || ch.is_whitespace();
        if !structural {
            if run_start.is_none() {
                run_start = Some(idx);
            }
            continue;
        }

        if let Some(start) = run_start.take() {
            flush_run(annotation, start, idx, &mut tokens);
        }

        match ch {
            '[' => depth += 1,
            ']' => {
                if depth == 0 {
                    error = Some(ValidationError::structural(format!(
                        "unbalanced brackets: unexpected ']' at byte {idx}"
                    )));
                    break;
                }
                depth -= 1;
            }
            _ => {}
        }
    }

    if error.is_none() {
        if let Some(start) = run_start {
            flush_run(annotation, start, annotation.len(), &mut tokens);
        }
        if depth != 0 {
            error = Some(ValidationError::structural(format!(
                "unbalanced brackets: {depth} unclosed '['"
            )));
        }
    }

    ScanOutcome { tokens, error }
}

/// Emit a token for the run if it is a bare identifier; dotted paths and
/// literal runs pass through unextracted.
fn flush_run(annotation: &str, start: usize, end: usize, tokens: &mut Vec<NameToken>) {
    let text = &annotation[start..end];
    if is_bare_identifier(text) {
        tokens.push(NameToken {
            text: text.to_string(),
            span: Span::new(start, end),
        });
    }
}

/// A bare identifier starts with a letter or underscore and contains only
/// alphanumerics and underscores. Anything dotted or literal-shaped fails.
fn is_bare_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

// ============================================================================
// Tests
// ============================================================================
