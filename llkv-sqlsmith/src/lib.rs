//! Schema and catalog layer of the LLKV SQL smith.
//!
//! Statement generators need two kinds of knowledge about the database under
//! test:
//!
//! - **What exists**: tables, their columns and their indexes. This is
//!   discovered by introspection and held in a [`SchemaCache`] that can be
//!   refreshed while generators keep reading from it.
//! - **What can be called**: binary operators and functions keyed by the type
//!   they produce. These come from the static builtin registry in
//!   `llkv-types` and are built once at startup into [`SmithCatalogs`],
//!   which callers share by `Arc`.
//!
//! The database is reached only through the [`SqlConnection`] trait. With the
//! `postgres` feature it is implemented for `postgres::Client`.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod connection;
pub mod indexes;
pub mod schema;

pub use cache::{IndexPick, SchemaCache};
pub use catalog::{FunctionCatalog, FunctionEntry, OperatorCatalog, OperatorEntry, SmithCatalogs};
pub use config::SchemaCacheConfig;
pub use connection::{SqlConnection, SqlRow, SqlValue};
pub use indexes::{
    Direction, IndexCatalog, IndexColumn, IndexDef, IndexRow, TableIndexName, TableIndexes,
};
pub use llkv_result::{Error, Result};
pub use schema::{ColumnDef, ColumnRow, TableName, TableRef};
