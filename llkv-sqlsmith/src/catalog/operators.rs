//! Binary operators indexed by the type they produce.

use llkv_types::TypeOid;
use llkv_types::builtins::{BinaryOperator, BinaryOperatorDef, BinaryOverload};
use rustc_hash::FxHashMap;

/// One operator overload usable to produce a value of a given type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorEntry {
    pub operator: BinaryOperator,
    pub overload: &'static BinaryOverload,
}

/// Every binary operator overload keyed by return type OID.
///
/// Built once and never mutated, so it can be shared across threads without
/// locking.
#[derive(Debug, Clone, Default)]
pub struct OperatorCatalog {
    by_return_type: FxHashMap<TypeOid, Vec<OperatorEntry>>,
}

impl OperatorCatalog {
    /// Build the catalog from the engine's builtin operator registry.
    pub fn build() -> Self {
        Self::from_registry(llkv_types::builtins::binary_operators())
    }

    /// Build the catalog from an explicit registry.
    ///
    /// Every overload is included exactly once, under its own return type.
    pub fn from_registry(registry: &'static [BinaryOperatorDef]) -> Self {
        let mut by_return_type: FxHashMap<TypeOid, Vec<OperatorEntry>> = FxHashMap::default();
        for def in registry {
            for overload in def.overloads {
                by_return_type
                    .entry(overload.return_type.oid)
                    .or_default()
                    .push(OperatorEntry {
                        operator: def.operator,
                        overload,
                    });
            }
        }
        Self { by_return_type }
    }

    /// Operators producing `return_type`; empty when there are none.
    pub fn returning(&self, return_type: TypeOid) -> &[OperatorEntry] {
        self.by_return_type
            .get(&return_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn return_types(&self) -> impl Iterator<Item = TypeOid> + '_ {
        self.by_return_type.keys().copied()
    }

    /// Total number of overloads in the catalog.
    pub fn len(&self) -> usize {
        self.by_return_type.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_return_type.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use llkv_types::SqlType;
    use llkv_types::builtins::binary_operators;

    #[test]
    fn every_overload_appears_once() {
        let catalog = OperatorCatalog::build();
        let registered: usize = binary_operators().iter().map(|def| def.overloads.len()).sum();
        assert_eq!(catalog.len(), registered);
    }

    #[test]
    fn overloads_are_keyed_by_their_own_return_type() {
        let catalog = OperatorCatalog::build();
        for oid in catalog.return_types() {
            for entry in catalog.returning(oid) {
                assert_eq!(entry.overload.return_type.oid, oid);
            }
        }

        let concat_in = |ty: SqlType| {
            catalog
                .returning(ty.oid)
                .iter()
                .any(|entry| entry.operator == BinaryOperator::Concat)
        };
        assert!(concat_in(SqlType::STRING));
        assert!(concat_in(SqlType::BYTES));
        assert!(concat_in(SqlType::INT_ARRAY));
    }

    #[test]
    fn missing_return_type_is_empty() {
        let catalog = OperatorCatalog::build();
        assert!(catalog.returning(SqlType::UUID.oid).is_empty());
    }
}
