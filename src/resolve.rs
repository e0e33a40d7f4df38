//! Namespace resolution for extracted type names.
//!
//! Maps each identifier to exactly one namespace by querying the whitelist
//! provider. Ambiguity (a name safe in several namespaces) is resolved
//! silently by the explicit precedence table; names with no candidate become
//! invalid names and an error record.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::ValidationError;
use crate::registry::{precedence_rank, NamespaceProvider};

/// Identifier → resolved namespace. Invalid names have no entry.
pub type TypeMap = BTreeMap<String, String>;

/// Outcome of resolving a batch of names.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Finalized identifier → namespace map.
    pub type_map: TypeMap,
    /// Names with zero safe candidates, in input order.
    pub invalid_names: Vec<String>,
    /// One error per invalid name.
    pub errors: Vec<ValidationError>,
}

/// Resolve each name to a single namespace via the whitelist provider.
///
/// Pure query: only the provider's metadata is consulted, nothing is
/// imported or executed. Names are processed in input order so the invalid
/// list and error list are deterministic.
pub fn resolve_names<P: NamespaceProvider>(names: &[String], provider: &P) -> Resolution {
    let mut resolution = Resolution::default();

    for name in names {
        let mut candidates = provider.lookup(name);
        if candidates.is_empty() {
            warn!(name = %name, "no safe namespace exports this name");
            resolution.invalid_names.push(name.clone());
            resolution.errors.push(ValidationError::unresolved(name));
            continue;
        }

        // Deterministic tie-break: precedence table first, then namespace
        // name for anything past the table.
        candidates.sort_by_key(|ns| (precedence_rank(ns), *ns));
        let origin = candidates[0];
        if candidates.len() > 1 {
            debug!(name = %name, origin = %origin, candidates = ?candidates, "ambiguous name resolved by precedence");
        }
        resolution
            .type_map
            .insert(name.clone(), origin.to_string());
    }

    resolution
}

// ============================================================================
// Tests
// ============================================================================
