//! In-memory [`SqlConnection`] answering from a script of canned responses.
//!
//! A response is registered against a fragment of SQL text. A query is
//! answered by the most recently registered fragment it contains, so a test
//! can re-script a connection between refreshes by registering the same
//! fragment again. Queries that match nothing fail, which surfaces missing
//! script entries as test failures instead of silently empty results.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use llkv_result::{Error, Result};
use llkv_sqlsmith::connection::{SqlConnection, SqlRow, SqlValue};
use llkv_sqlsmith::indexes::indexes_query;
use llkv_sqlsmith::schema::TableName;

#[derive(Debug, Clone)]
enum Response {
    Rows(Vec<SqlRow>),
    Fail(String),
}

#[derive(Debug, Default)]
struct Script {
    responses: Vec<(String, Response)>,
    statements: Vec<String>,
}

/// Scripted connection. Clones share one script, so a test keeps a clone as
/// a handle after moving the connection into a cache.
#[derive(Debug, Clone, Default)]
pub struct ScriptedConnection {
    script: Arc<Mutex<Script>>,
}

impl ScriptedConnection {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Answer queries containing `fragment` with `rows`.
    pub fn on(&self, fragment: impl Into<String>, rows: Vec<SqlRow>) -> &Self {
        self.script()
            .responses
            .push((fragment.into(), Response::Rows(rows)));
        self
    }

    /// Fail queries containing `fragment` with `message`.
    pub fn fail_on(&self, fragment: impl Into<String>, message: impl Into<String>) -> &Self {
        self.script()
            .responses
            .push((fragment.into(), Response::Fail(message.into())));
        self
    }

    /// Answer the column-metadata query with `rows`.
    pub fn on_columns(&self, rows: Vec<SqlRow>) -> &Self {
        self.on("information_schema.columns", rows)
    }

    /// Answer the index-metadata query of `table` with `rows`.
    pub fn on_indexes(&self, table: &TableName, rows: Vec<SqlRow>) -> &Self {
        self.on(index_fragment(table), rows)
    }

    /// Fail the index-metadata query of `table`.
    pub fn fail_indexes(&self, table: &TableName, message: impl Into<String>) -> &Self {
        self.fail_on(index_fragment(table), message)
    }

    /// Every statement issued so far, in order.
    pub fn statements(&self) -> Vec<String> {
        self.script().statements.clone()
    }

    pub fn clear_statements(&self) {
        self.script().statements.clear();
    }
}

fn index_fragment(table: &TableName) -> String {
    // Up to the closing bracket so `t1` never matches `t10`.
    let sql = indexes_query(table);
    match sql.find("[SHOW INDEXES") {
        Some(start) => sql[start..].to_string(),
        None => sql,
    }
}

impl SqlConnection for ScriptedConnection {
    fn query(&mut self, sql: &str) -> Result<Vec<SqlRow>> {
        let mut script = self.script();
        script.statements.push(sql.to_string());
        let response = script
            .responses
            .iter()
            .rev()
            .find(|(fragment, _)| sql.contains(fragment.as_str()))
            .map(|(_, response)| response.clone());
        match response {
            Some(Response::Rows(rows)) => Ok(rows),
            Some(Response::Fail(message)) => Err(Error::query(message)),
            None => Err(Error::query(format!("no scripted response for: {sql}"))),
        }
    }
}

/// A row shaped like the column-metadata query output.
pub fn column_row(
    table: &TableName,
    column: &str,
    type_name: &str,
    nullable: bool,
    hidden: bool,
) -> SqlRow {
    SqlRow::new(vec![
        SqlValue::from(table.catalog.as_str()),
        SqlValue::from(table.schema.as_str()),
        SqlValue::from(table.name.as_str()),
        SqlValue::from(column),
        SqlValue::from(type_name),
        SqlValue::Bool(false),
        SqlValue::Bool(nullable),
        SqlValue::Bool(hidden),
    ])
}

/// A row shaped like the index-metadata query output.
pub fn index_row(index: &str, column: &str, storing: bool, ascending: bool) -> SqlRow {
    SqlRow::new(vec![
        SqlValue::from(index),
        SqlValue::from(column),
        SqlValue::Bool(storing),
        SqlValue::Bool(ascending),
    ])
}
