//! Index discovery: folds `SHOW INDEXES` rows into [`IndexDef`]s.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use llkv_result::Result;
use rustc_hash::FxHashMap;

use crate::connection::{SqlConnection, SqlRow};
use crate::schema::{TableName, TableRef, quote_ident};

/// Sort direction of an index key column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Ascending,
    Descending,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Ascending => f.write_str("ASC"),
            Direction::Descending => f.write_str("DESC"),
        }
    }
}

/// One key column of an index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexColumn {
    pub column: String,
    pub direction: Direction,
}

/// Definition of one index on one table.
///
/// Rendered through `Display` as the `CREATE INDEX` statement that would
/// recreate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDef {
    pub name: String,
    pub table: TableName,
    /// Key columns in key order.
    pub key_columns: Vec<IndexColumn>,
    /// Columns stored in the index payload without being part of the key.
    pub storing_columns: Vec<String>,
}

impl IndexDef {
    pub fn new(name: impl Into<String>, table: TableName) -> Self {
        Self {
            name: name.into(),
            table,
            key_columns: Vec::new(),
            storing_columns: Vec::new(),
        }
    }

    /// Fold one metadata row into this definition.
    fn push(&mut self, row: IndexRow) {
        if row.storing {
            self.storing_columns.push(row.column);
        } else {
            let direction = if row.ascending {
                Direction::Ascending
            } else {
                Direction::Descending
            };
            self.key_columns.push(IndexColumn {
                column: row.column,
                direction,
            });
        }
    }
}

impl fmt::Display for IndexDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CREATE INDEX {} ON {} (", quote_ident(&self.name), self.table)?;
        for (i, key) in self.key_columns.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} {}", quote_ident(&key.column), key.direction)?;
        }
        f.write_str(")")?;
        if !self.storing_columns.is_empty() {
            let storing: Vec<_> = self.storing_columns.iter().map(|c| quote_ident(c)).collect();
            write!(f, " STORING ({})", storing.join(", "))?;
        }
        Ok(())
    }
}

/// A fully qualified reference to one index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableIndexName {
    pub table: TableName,
    pub index: String,
}

impl fmt::Display for TableIndexName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.table, quote_ident(&self.index))
    }
}

/// Indexes of one table keyed by index name.
pub type TableIndexes = BTreeMap<String, IndexDef>;

/// Indexes of every discovered table.
pub type IndexCatalog = FxHashMap<TableName, Arc<TableIndexes>>;

/// One row of the per-table index-metadata query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    pub index: String,
    pub column: String,
    pub storing: bool,
    pub ascending: bool,
}

impl IndexRow {
    /// Decode a row of [`indexes_query`] output.
    pub fn decode(row: &SqlRow) -> Result<Self> {
        Ok(Self {
            index: row.get_str(0)?.to_string(),
            column: row.get_str(1)?.to_string(),
            storing: row.get_bool(2)?,
            ascending: row.get_bool(3)?,
        })
    }
}

/// Index-metadata query for `table`.
pub fn indexes_query(table: &TableName) -> String {
    format!(
        "SELECT index_name, column_name, storing, direction = 'ASC' FROM [SHOW INDEXES FROM {table}]"
    )
}

/// Fold the index rows of one table into one [`IndexDef`] per index name.
///
/// A storing row only contributes to `storing_columns`; every other row is
/// appended to `key_columns` in arrival order.
pub fn fold_index_rows<I>(table: &TableName, rows: I) -> TableIndexes
where
    I: IntoIterator<Item = IndexRow>,
{
    let mut indexes = TableIndexes::new();
    for row in rows {
        indexes
            .entry(row.index.clone())
            .or_insert_with(|| IndexDef::new(row.index.clone(), table.clone()))
            .push(row);
    }
    indexes
}

/// Query and assemble the indexes of every table in `tables`.
///
/// Tables whose query returns no rows are left out of the result. The first
/// query or decode failure aborts the whole assembly and nothing is
/// returned for the tables processed before it.
pub fn assemble_indexes<C>(conn: &mut C, tables: &[Arc<TableRef>]) -> Result<IndexCatalog>
where
    C: SqlConnection + ?Sized,
{
    let mut catalog = IndexCatalog::default();
    for table in tables {
        let sql = indexes_query(&table.name);
        tracing::debug!(table = %table.name, "querying indexes");
        let rows = conn
            .query(&sql)?
            .iter()
            .map(IndexRow::decode)
            .collect::<Result<Vec<_>>>()?;
        if rows.is_empty() {
            continue;
        }
        let indexes = fold_index_rows(&table.name, rows);
        tracing::debug!(table = %table.name, index_count = indexes.len(), "assembled indexes");
        catalog.insert(table.name.clone(), Arc::new(indexes));
    }
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx_row(index: &str, column: &str, storing: bool, ascending: bool) -> IndexRow {
        IndexRow {
            index: index.into(),
            column: column.into(),
            storing,
            ascending,
        }
    }

    fn t1() -> TableName {
        TableName::new("db", "public", "t1")
    }

    #[test]
    fn storing_rows_only_feed_storing_columns() {
        let indexes = fold_index_rows(
            &t1(),
            vec![idx_row("idx1", "a", false, true), idx_row("idx1", "b", true, false)],
        );

        assert_eq!(indexes.len(), 1);
        let idx1 = &indexes["idx1"];
        assert_eq!(idx1.name, "idx1");
        assert_eq!(idx1.table, t1());
        assert_eq!(
            idx1.key_columns,
            vec![IndexColumn {
                column: "a".into(),
                direction: Direction::Ascending,
            }]
        );
        assert_eq!(idx1.storing_columns, vec!["b".to_string()]);
    }

    #[test]
    fn key_columns_keep_order_and_direction() {
        let indexes = fold_index_rows(
            &t1(),
            vec![
                idx_row("primary", "id", false, true),
                idx_row("by_ts", "ts", false, false),
                idx_row("by_ts", "id", false, true),
                idx_row("by_ts", "payload", true, true),
                idx_row("by_ts", "note", true, false),
            ],
        );

        assert_eq!(indexes.len(), 2);
        let by_ts = &indexes["by_ts"];
        let keys: Vec<_> = by_ts
            .key_columns
            .iter()
            .map(|k| (k.column.as_str(), k.direction))
            .collect();
        assert_eq!(
            keys,
            vec![("ts", Direction::Descending), ("id", Direction::Ascending)]
        );
        assert_eq!(by_ts.storing_columns, vec!["payload", "note"]);
        assert_eq!(indexes["primary"].key_columns.len(), 1);
    }

    #[test]
    fn renders_create_index_statement() {
        let indexes = fold_index_rows(
            &t1(),
            vec![
                idx_row("by_ts", "ts", false, false),
                idx_row("by_ts", "payload", true, true),
            ],
        );
        assert_eq!(
            indexes["by_ts"].to_string(),
            "CREATE INDEX by_ts ON db.public.t1 (ts DESC) STORING (payload)"
        );
        let name = TableIndexName {
            table: t1(),
            index: "by_ts".into(),
        };
        assert_eq!(name.to_string(), "db.public.t1@by_ts");
    }

    #[test]
    fn decodes_show_indexes_row() {
        let row = SqlRow::new(vec!["idx".into(), "a".into(), false.into(), true.into()]);
        assert_eq!(IndexRow::decode(&row).unwrap(), idx_row("idx", "a", false, true));
        assert!(indexes_query(&t1()).ends_with("[SHOW INDEXES FROM db.public.t1]"));
    }
}
