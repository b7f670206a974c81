//! Static registry of the engine's builtin binary operators and functions.
//!
//! The registry is plain `'static` data. Consumers (the smith catalogs)
//! read it once at startup and never mutate it.

mod functions;
mod operators;

pub use functions::{
    CATEGORY_COMPATIBILITY, FunctionClass, FunctionDefinition, Overload, ReturnType,
    function_definitions,
};
pub use operators::{BinaryOperator, BinaryOperatorDef, BinaryOverload, binary_operators};
