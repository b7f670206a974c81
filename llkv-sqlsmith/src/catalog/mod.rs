//! Read-only operator and function catalogs.
//!
//! Both catalogs are derived from the static builtin registry and never
//! change after construction, so generators share them through an `Arc`
//! without any synchronization.

pub mod functions;
pub mod operators;

pub use functions::{FunctionCatalog, FunctionEntry};
pub use operators::{OperatorCatalog, OperatorEntry};

/// The operator and function catalogs used by expression generation.
#[derive(Debug, Clone, Default)]
pub struct SmithCatalogs {
    pub operators: OperatorCatalog,
    pub functions: FunctionCatalog,
}

impl SmithCatalogs {
    pub fn build() -> Self {
        let operators = OperatorCatalog::build();
        let functions = FunctionCatalog::build();
        tracing::debug!(
            operator_overloads = operators.len(),
            function_overloads = functions.len(),
            "built smith catalogs"
        );
        Self {
            operators,
            functions,
        }
    }
}
