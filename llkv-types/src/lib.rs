//! SQL type system and builtin registry shared by the LLKV smith crates.
//!
//! This crate is the read-only oracle the smith consults when deciding what
//! expressions it may generate:
//!
//! - [`SqlType`] / [`TypeFamily`] / [`TypeOid`]: semantic types and the
//!   identifiers the catalogs are keyed by.
//! - [`type_from_name`]: resolves an introspected type name to a [`SqlType`].
//! - [`builtins`]: every binary operator overload and function definition the
//!   target engine exposes.

pub mod builtins;
pub mod sql_type;

pub use sql_type::{ANY_NON_ARRAY, SqlType, TypeFamily, TypeOid, is_non_array_family, type_from_name};
