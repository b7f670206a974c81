//! Connection seam between the schema cache and the database under test.
//!
//! The cache only ever issues read-only introspection queries and reads
//! booleans and strings back, so the seam is a single method returning fully
//! materialized rows.

use std::fmt;

use llkv_result::{Error, Result};

/// A value in a returned row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("NULL"),
            SqlValue::Bool(b) => write!(f, "{b}"),
            SqlValue::Int(i) => write!(f, "{i}"),
            SqlValue::Text(s) => write!(f, "'{s}'"),
        }
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

/// One row returned by [`SqlConnection::query`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlRow {
    values: Vec<SqlValue>,
}

impl SqlRow {
    pub fn new(values: Vec<SqlValue>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    fn value(&self, idx: usize, expected: &'static str) -> Result<&SqlValue> {
        self.values
            .get(idx)
            .ok_or_else(|| Error::row_decode(idx, expected, format!("row of width {}", self.len())))
    }

    /// Read column `idx` as a non-NULL string.
    pub fn get_str(&self, idx: usize) -> Result<&str> {
        match self.value(idx, "string")? {
            SqlValue::Text(s) => Ok(s.as_str()),
            other => Err(Error::row_decode(idx, "string", format!("{other:?}"))),
        }
    }

    /// Read column `idx` as a non-NULL boolean.
    ///
    /// Engines that render booleans as text are accepted: `true`/`false`,
    /// `t`/`f` and `YES`/`NO`, case-insensitively.
    pub fn get_bool(&self, idx: usize) -> Result<bool> {
        match self.value(idx, "bool")? {
            SqlValue::Bool(b) => Ok(*b),
            SqlValue::Text(s) => match s.to_ascii_lowercase().as_str() {
                "true" | "t" | "yes" => Ok(true),
                "false" | "f" | "no" => Ok(false),
                _ => Err(Error::row_decode(idx, "bool", format!("Text({s:?})"))),
            },
            other => Err(Error::row_decode(idx, "bool", format!("{other:?}"))),
        }
    }
}

impl From<Vec<SqlValue>> for SqlRow {
    fn from(values: Vec<SqlValue>) -> Self {
        Self::new(values)
    }
}

/// Query execution capability of the database under test.
///
/// Implementations run `sql` to completion and return every row. Timeouts
/// and retries are the implementation's concern; the schema cache calls
/// this synchronously and propagates any error unchanged.
pub trait SqlConnection: Send {
    fn query(&mut self, sql: &str) -> Result<Vec<SqlRow>>;
}

impl<C: SqlConnection + ?Sized> SqlConnection for Box<C> {
    fn query(&mut self, sql: &str) -> Result<Vec<SqlRow>> {
        (**self).query(sql)
    }
}

#[cfg(feature = "postgres")]
mod pg {
    use postgres::types::Type;

    use super::{SqlConnection, SqlRow, SqlValue};
    use llkv_result::{Error, Result};

    impl SqlConnection for postgres::Client {
        fn query(&mut self, sql: &str) -> Result<Vec<SqlRow>> {
            let rows = postgres::Client::query(self, sql, &[])?;
            rows.iter().map(decode_row).collect()
        }
    }

    fn decode_row(row: &postgres::Row) -> Result<SqlRow> {
        let mut values = Vec::with_capacity(row.len());
        for (idx, column) in row.columns().iter().enumerate() {
            let ty = column.type_();
            let value = if *ty == Type::BOOL {
                row.try_get::<_, Option<bool>>(idx)
                    .map(|v| v.map_or(SqlValue::Null, SqlValue::Bool))
            } else if *ty == Type::INT8 {
                row.try_get::<_, Option<i64>>(idx)
                    .map(|v| v.map_or(SqlValue::Null, SqlValue::Int))
            } else if *ty == Type::INT4 {
                row.try_get::<_, Option<i32>>(idx)
                    .map(|v| v.map_or(SqlValue::Null, |i| SqlValue::Int(i64::from(i))))
            } else if *ty == Type::INT2 {
                row.try_get::<_, Option<i16>>(idx)
                    .map(|v| v.map_or(SqlValue::Null, |i| SqlValue::Int(i64::from(i))))
            } else {
                row.try_get::<_, Option<String>>(idx)
                    .map(|v| v.map_or(SqlValue::Null, SqlValue::Text))
            };
            values.push(value.map_err(|err| Error::row_decode(idx, "text", err.to_string()))?);
        }
        Ok(SqlRow::new(values))
    }
}
