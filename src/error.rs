//! Error types for annotation validation.
//!
//! Validation never aborts: every failure is collected into the
//! [`ValidationError`] list carried by the final report. Callers distinguish
//! total from partial failure by inspecting the report fields, not by
//! catching an error from the pipeline.

use serde::Serialize;
use thiserror::Error;

/// A failure recorded while validating an annotation.
///
/// The three kinds mirror the three pipeline stages that can fail:
/// scanning (structure), resolution (names), and evaluation (materializing
/// the qualified string into a type value).
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    /// Malformed bracket/comma syntax in the input annotation.
    #[error("malformed annotation: {reason}")]
    Structural { reason: String },

    /// Identifier has no safe namespace in the whitelist.
    #[error("name '{name}' is not a known safe type")]
    Unresolved { name: String },

    /// The qualified annotation failed to parse or evaluate.
    #[error("evaluation failed: {message}")]
    Evaluation { message: String },
}

impl ValidationError {
    /// Create a structural error.
    pub fn structural(reason: impl Into<String>) -> Self {
        ValidationError::Structural {
            reason: reason.into(),
        }
    }

    /// Create an unresolved-name error.
    pub fn unresolved(name: impl Into<String>) -> Self {
        ValidationError::Unresolved { name: name.into() }
    }

    /// Create an evaluation error.
    pub fn evaluation(message: impl Into<String>) -> Self {
        ValidationError::Evaluation {
            message: message.into(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
