//! Error types and result definitions for the LLKV SQL smith.
//!
//! This crate provides the unified error type ([`Error`]) and result alias
//! ([`Result<T>`]) used by every smith crate. Operations that talk to the
//! collaborator database, decode its rows, or resolve its type names return
//! `Result<T>` and propagate failures with `?`.
//!
//! # Error Categories
//!
//! - **Query failures** ([`Error::Query`]): the connection could not run a statement
//! - **Decode failures** ([`Error::RowDecode`]): a row did not have the expected shape
//! - **Type lookup failures** ([`Error::UnknownTypeName`]): an introspected type name is unknown
//! - **User input errors** ([`Error::InvalidArgumentError`]): bad configuration
//! - **Internal errors** ([`Error::Internal`]): bugs or unexpected states
//!
//! None of these are retried internally. Retry policy belongs to the
//! statement generator or its caller.

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;
