//! Whitelist of safe namespaces and the names they export.
//!
//! The resolver and evaluator never import or execute anything: they only
//! consult a [`NamespaceProvider`], a read-only metadata view of which type
//! names each safe namespace exports. [`BuiltinRegistry`] is the default
//! provider, covering `builtins`, `typing` and `typing_extensions`, with
//! room for caller-registered extra namespaces.

use std::collections::{BTreeMap, BTreeSet};

// ============================================================================
// Precedence
// ============================================================================

/// Namespace precedence for ambiguous names, checked in order.
///
/// A name exported by more than one namespace resolves to the highest-ranked
/// one. Namespaces not listed here rank after all of these, ordered
/// lexicographically for determinism.
pub const NAMESPACE_PRECEDENCE: &[&str] = &["builtins", "typing", "typing_extensions"];

/// Rank of a namespace in the precedence table (lower wins).
///
/// Unlisted namespaces all share the rank past the table's end; ties among
/// them are broken by name.
pub fn precedence_rank(namespace: &str) -> usize {
    NAMESPACE_PRECEDENCE
        .iter()
        .position(|ns| *ns == namespace)
        .unwrap_or(NAMESPACE_PRECEDENCE.len())
}

// ============================================================================
// Provider Trait
// ============================================================================

/// Read-only view of the safe-namespace whitelist.
///
/// Implementations must be pure queries: no imports, no code execution, and
/// never an error — unknown names yield an empty candidate list. The default
/// implementation is safe for concurrent reads.
pub trait NamespaceProvider {
    /// All namespaces that export `name` as a safe type. Empty for unknown
    /// or unsafe names.
    fn lookup(&self, name: &str) -> Vec<&str>;

    /// Whether `namespace` exports `name`.
    fn contains(&self, namespace: &str, name: &str) -> bool;

    /// All namespaces known to this provider, highest precedence first.
    fn namespaces(&self) -> Vec<&str>;
}

// ============================================================================
// Builtin Registry
// ============================================================================

/// Type names exported by `builtins` that are meaningful in annotations.
const BUILTINS_TYPES: &[&str] = &[
    "bool",
    "bytearray",
    "bytes",
    "complex",
    "dict",
    "float",
    "frozenset",
    "int",
    "list",
    "memoryview",
    "object",
    "range",
    "set",
    "slice",
    "str",
    "tuple",
    "type",
];

/// Type names exported by `typing`.
const TYPING_TYPES: &[&str] = &[
    "AbstractSet",
    "Annotated",
    "Any",
    "AnyStr",
    "AsyncContextManager",
    "AsyncGenerator",
    "AsyncIterable",
    "AsyncIterator",
    "Awaitable",
    "Callable",
    "ClassVar",
    "Concatenate",
    "ContextManager",
    "Coroutine",
    "Counter",
    "DefaultDict",
    "Deque",
    "Dict",
    "Final",
    "FrozenSet",
    "Generator",
    "Generic",
    "Hashable",
    "ItemsView",
    "Iterable",
    "Iterator",
    "KeysView",
    "List",
    "Literal",
    "LiteralString",
    "Mapping",
    "MappingView",
    "MutableMapping",
    "MutableSequence",
    "MutableSet",
    "Never",
    "NoReturn",
    "NotRequired",
    "Optional",
    "OrderedDict",
    "ParamSpec",
    "Protocol",
    "Required",
    "Reversible",
    "Self",
    "Sequence",
    "Set",
    "Sized",
    "Text",
    "Tuple",
    "Type",
    "TypeAlias",
    "TypeGuard",
    "TypeVar",
    "TypeVarTuple",
    "TypedDict",
    "Union",
    "Unpack",
    "ValuesView",
];

/// Type names exported by `typing_extensions`. Many overlap with `typing`;
/// precedence resolves the overlap toward `typing`.
const TYPING_EXTENSIONS_TYPES: &[&str] = &[
    "Annotated",
    "Buffer",
    "Concatenate",
    "Doc",
    "Final",
    "Literal",
    "LiteralString",
    "Never",
    "NotRequired",
    "ParamSpec",
    "Protocol",
    "ReadOnly",
    "Required",
    "Self",
    "TypeAlias",
    "TypeAliasType",
    "TypeGuard",
    "TypeIs",
    "TypeVarTuple",
    "TypedDict",
    "Unpack",
];

/// The default in-memory whitelist.
///
/// Covers the three builtin namespaces via static tables; extra namespaces
/// can be registered per instance for project-specific whitelists.
#[derive(Debug, Clone, Default)]
pub struct BuiltinRegistry {
    /// Caller-registered namespaces beyond the static tables.
    extra: BTreeMap<String, BTreeSet<String>>,
}

impl BuiltinRegistry {
    /// Create a registry over the builtin namespace tables.
    pub fn new() -> Self {
        BuiltinRegistry::default()
    }

    /// Register an extra whitelisted namespace and the names it exports.
    ///
    /// Registered namespaces rank after the builtin three in precedence.
    pub fn register<I, S>(&mut self, namespace: impl Into<String>, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self.extra.entry(namespace.into()).or_default();
        for name in names {
            entry.insert(name.into());
        }
    }

    fn static_table(namespace: &str) -> Option<&'static [&'static str]> {
        match namespace {
            "builtins" => Some(BUILTINS_TYPES),
            "typing" => Some(TYPING_TYPES),
            "typing_extensions" => Some(TYPING_EXTENSIONS_TYPES),
            _ => None,
        }
    }
}

impl NamespaceProvider for BuiltinRegistry {
    fn lookup(&self, name: &str) -> Vec<&str> {
        let mut found = Vec::new();
        for namespace in NAMESPACE_PRECEDENCE {
            if self.contains(namespace, name) {
                found.push(*namespace);
            }
        }
        for (namespace, names) in &self.extra {
            if names.contains(name) {
                found.push(namespace.as_str());
            }
        }
        found
    }

    fn contains(&self, namespace: &str, name: &str) -> bool {
        if let Some(table) = BuiltinRegistry::static_table(namespace) {
            return table.contains(&name);
        }
        self.extra
            .get(namespace)
            .is_some_and(|names| names.contains(name))
    }

    fn namespaces(&self) -> Vec<&str> {
        let mut all: Vec<&str> = NAMESPACE_PRECEDENCE.to_vec();
        all.extend(self.extra.keys().map(String::as_str));
        all
    }
}

// ============================================================================
// Tests
// ============================================================================
