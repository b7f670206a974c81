//! Callable functions indexed by class and the type they produce.

use llkv_types::builtins::{CATEGORY_COMPATIBILITY, FunctionClass, FunctionDefinition, Overload};
use llkv_types::{TypeOid, is_non_array_family};
use rustc_hash::FxHashMap;

/// Definition excluded outright because calling it stalls or crashes the
/// session under test.
const SLEEP_FUNCTION: &str = "pg_sleep";
/// Name fragment of internal debug functions that force errors or retries.
const FORCE_FUNCTION_MARKER: &str = "crdb_internal.force_";
/// Documentation marker of overloads known to be broken.
const NOT_USABLE_MARKER: &str = "Not usable";

/// One function overload usable to produce a value of a given type.
#[derive(Debug, Clone, Copy)]
pub struct FunctionEntry {
    pub def: &'static FunctionDefinition,
    pub overload: &'static Overload,
}

/// Generatable function overloads keyed by `(class, return type OID)`.
///
/// Built once and never mutated, so it can be shared across threads without
/// locking.
#[derive(Debug, Clone, Default)]
pub struct FunctionCatalog {
    by_class: FxHashMap<FunctionClass, FxHashMap<TypeOid, Vec<FunctionEntry>>>,
}

impl FunctionCatalog {
    /// Build the catalog from the engine's builtin function registry.
    pub fn build() -> Self {
        Self::from_registry(llkv_types::builtins::function_definitions())
    }

    /// Build the catalog from an explicit registry, applying the
    /// generation filters to every definition and overload.
    pub fn from_registry(registry: &'static [FunctionDefinition]) -> Self {
        let mut by_class: FxHashMap<FunctionClass, FxHashMap<TypeOid, Vec<FunctionEntry>>> =
            FxHashMap::default();
        for def in registry {
            if !definition_allowed(def) {
                continue;
            }
            for overload in def.overloads {
                if !overload_allowed(overload) {
                    continue;
                }
                by_class
                    .entry(def.class)
                    .or_default()
                    .entry(overload.fixed_return_type().oid)
                    .or_default()
                    .push(FunctionEntry { def, overload });
            }
        }
        Self { by_class }
    }

    /// Overloads of `class` producing `return_type`; empty when there are none.
    pub fn returning(&self, class: FunctionClass, return_type: TypeOid) -> &[FunctionEntry] {
        self.by_class
            .get(&class)
            .and_then(|by_type| by_type.get(&return_type))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every `(class, return type)` key with at least one overload.
    pub fn keys(&self) -> impl Iterator<Item = (FunctionClass, TypeOid)> + '_ {
        self.by_class
            .iter()
            .flat_map(|(class, by_type)| by_type.keys().map(move |oid| (*class, *oid)))
    }

    /// Total number of overloads in the catalog.
    pub fn len(&self) -> usize {
        self.by_class
            .values()
            .flat_map(|by_type| by_type.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_class.is_empty()
    }
}

fn definition_allowed(def: &FunctionDefinition) -> bool {
    if def.name == SLEEP_FUNCTION || def.name.contains(FORCE_FUNCTION_MARKER) {
        return false;
    }
    // Compatibility shims are mostly unimplemented.
    if def.category == CATEGORY_COMPATIBILITY {
        return false;
    }
    !def.private
}

fn overload_allowed(overload: &Overload) -> bool {
    if overload.info.contains(NOT_USABLE_MARKER) {
        return false;
    }
    is_non_array_family(overload.fixed_return_type().family)
}
