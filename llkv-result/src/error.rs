use std::fmt;
use thiserror::Error;

/// Unified error type for the schema-and-catalog layer.
///
/// Every fallible operation in the smith crates returns this enum. The
/// variants separate failures of the collaborator connection from failures
/// to interpret what it returned, so callers can tell a dead connection from
/// an introspection query that no longer matches the engine's catalog shape.
///
/// # Not-found is not an error
///
/// Empty outcomes (no tables, no indexes on a table) are never reported
/// through this type. Random-pick operations return explicit "not found"
/// values instead so the statement generator can retry with a different
/// choice.
///
/// # Thread Safety
///
/// `Error` implements `Send` and `Sync`, so a failed refresh on one thread
/// can be reported on another.
#[derive(Error, Debug)]
pub enum Error {
    /// The connection failed to execute a statement.
    ///
    /// Raised for both the column-metadata query and the per-table index
    /// queries. The message is the collaborator's own error text, surfaced
    /// verbatim. A refresh that hits this error leaves the cache untouched.
    #[error("query failed: {0}")]
    Query(String),

    /// A returned row could not be read as the expected shape.
    ///
    /// This covers a value of the wrong type, a NULL where a value is
    /// required, and a row that is shorter than the introspection query's
    /// projection. It is treated exactly like [`Error::Query`] by the
    /// refresh path.
    #[error("row decode error at column {column}: expected {expected}, found {found}")]
    RowDecode {
        column: usize,
        expected: &'static str,
        found: String,
    },

    /// An introspected type name has no entry in the type-name lookup table.
    ///
    /// This signals a mismatch between the introspection query and the type
    /// system, not a runtime condition. It is not expected in normal
    /// operation and aborts the refresh.
    #[error("unrecognized SQL type name '{0}'")]
    UnknownTypeName(String),

    /// Invalid configuration or caller input.
    #[error("Invalid argument: {0}")]
    InvalidArgumentError(String),

    /// Internal error indicating a bug or unexpected state.
    ///
    /// Poisoned locks on the refresh path surface here.
    #[error("An internal operation failed: {0}")]
    Internal(String),
}

impl Error {
    /// Create a query error from any displayable error.
    ///
    /// # Examples
    ///
    /// ```
    /// use llkv_result::Error;
    ///
    /// let err = Error::query("connection reset by peer");
    /// assert!(matches!(err, Error::Query(msg) if msg.contains("reset")));
    /// ```
    #[inline]
    pub fn query<E: fmt::Display>(err: E) -> Self {
        Error::Query(err.to_string())
    }

    /// Create a row decode error for `column`.
    #[inline]
    pub fn row_decode(column: usize, expected: &'static str, found: impl Into<String>) -> Self {
        Error::RowDecode {
            column,
            expected,
            found: found.into(),
        }
    }
}

#[cfg(feature = "postgres")]
impl From<postgres::Error> for Error {
    fn from(err: postgres::Error) -> Self {
        Error::query(err)
    }
}
