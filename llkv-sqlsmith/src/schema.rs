//! Table discovery: turns the ordered `information_schema.columns` stream
//! into per-table [`TableRef`]s.

use std::fmt;

use llkv_result::Result;
use llkv_types::{SqlType, type_from_name};

use crate::connection::SqlRow;

/// Schema-qualified table identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableName {
    pub catalog: String,
    pub schema: String,
    pub name: String,
}

impl TableName {
    pub fn new(
        catalog: impl Into<String>,
        schema: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            catalog: catalog.into(),
            schema: schema.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            quote_ident(&self.catalog),
            quote_ident(&self.schema),
            quote_ident(&self.name)
        )
    }
}

/// One column of a discovered table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub ty: SqlType,
    pub nullable: bool,
    /// Derived from a generation expression; not writable.
    pub computed: bool,
}

impl fmt::Display for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", quote_ident(&self.name), self.ty)?;
        if self.nullable {
            f.write_str(" NULL")?;
        } else {
            f.write_str(" NOT NULL")?;
        }
        Ok(())
    }
}

/// A discovered table and its visible columns in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub name: TableName,
    pub columns: Vec<ColumnDef>,
}

impl TableRef {
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|col| col.name == name)
    }

    /// Columns a generated `INSERT`/`UPDATE` may target.
    pub fn writable_columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|col| !col.computed)
    }
}

/// Split off the first table, returning it and the remaining tables.
pub fn pop_table(tables: &[TableRef]) -> Option<(&TableRef, &[TableRef])> {
    tables.split_first()
}

/// One row of the column-metadata query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRow {
    pub catalog: String,
    pub schema: String,
    pub table: String,
    pub column: String,
    pub type_name: String,
    pub computed: bool,
    pub nullable: bool,
    pub hidden: bool,
}

impl ColumnRow {
    /// Decode a row of [`columns_query`] output.
    pub fn decode(row: &SqlRow) -> Result<Self> {
        Ok(Self {
            catalog: row.get_str(0)?.to_string(),
            schema: row.get_str(1)?.to_string(),
            table: row.get_str(2)?.to_string(),
            column: row.get_str(3)?.to_string(),
            type_name: row.get_str(4)?.to_string(),
            computed: row.get_bool(5)?,
            nullable: row.get_bool(6)?,
            hidden: row.get_bool(7)?,
        })
    }

    fn same_table(&self, catalog: &str, schema: &str, table: &str) -> bool {
        self.catalog == catalog && self.schema == schema && self.table == table
    }
}

/// Column-metadata query for `schema`, ordered so each table's rows are
/// contiguous.
pub fn columns_query(schema: &str) -> String {
    format!(
        "SELECT
	table_catalog,
	table_schema,
	table_name,
	column_name,
	crdb_sql_type,
	generation_expression != '' AS computed,
	is_nullable = 'YES' AS nullable,
	is_hidden = 'YES' AS hidden
FROM
	information_schema.columns
WHERE
	table_schema = {}
ORDER BY
	table_catalog, table_schema, table_name",
        quote_literal(schema)
    )
}

/// Run-length grouping state: the key of the table being collected and the
/// columns gathered for it so far.
struct Pending {
    catalog: String,
    schema: String,
    table: String,
    columns: Vec<ColumnDef>,
}

impl Pending {
    fn start(row: &ColumnRow) -> Self {
        Self {
            catalog: row.catalog.clone(),
            schema: row.schema.clone(),
            table: row.table.clone(),
            columns: Vec::new(),
        }
    }

    fn emit(self, target_schema: &str, tables: &mut Vec<TableRef>) {
        if self.schema != target_schema {
            return;
        }
        tables.push(TableRef {
            name: TableName::new(self.catalog, self.schema, self.table),
            columns: self.columns,
        });
    }
}

/// Group an ordered column-metadata stream into tables.
///
/// Rows must arrive ordered by `(catalog, schema, table)`. Hidden columns are
/// dropped before grouping, so a table whose columns are all hidden is never
/// emitted. Runs from schemas other than `target_schema` are consumed but not
/// emitted. Column order within a table is arrival order.
///
/// # Errors
///
/// Fails on the first column whose type name is not recognized.
pub fn group_columns<I>(rows: I, target_schema: &str) -> Result<Vec<TableRef>>
where
    I: IntoIterator<Item = ColumnRow>,
{
    let mut tables = Vec::new();
    let mut pending: Option<Pending> = None;

    for row in rows {
        if row.hidden {
            continue;
        }

        let boundary = match &pending {
            Some(current) => !row.same_table(&current.catalog, &current.schema, &current.table),
            None => true,
        };
        if boundary {
            if let Some(done) = pending.take() {
                done.emit(target_schema, &mut tables);
            }
            pending = Some(Pending::start(&row));
        }

        let ty = type_from_name(&row.type_name)?;
        if let Some(current) = pending.as_mut() {
            current.columns.push(ColumnDef {
                name: row.column,
                ty,
                nullable: row.nullable,
                computed: row.computed,
            });
        }
    }

    if let Some(done) = pending {
        done.emit(target_schema, &mut tables);
    }
    Ok(tables)
}

/// Reserved keywords that can never appear as bare identifiers. Sorted for
/// `binary_search`.
const RESERVED_KEYWORDS: &[&str] = &[
    "all",
    "analyse",
    "analyze",
    "and",
    "any",
    "array",
    "as",
    "asc",
    "asymmetric",
    "both",
    "case",
    "cast",
    "check",
    "collate",
    "column",
    "concurrently",
    "constraint",
    "create",
    "current_catalog",
    "current_date",
    "current_role",
    "current_schema",
    "current_time",
    "current_timestamp",
    "current_user",
    "default",
    "deferrable",
    "desc",
    "distinct",
    "do",
    "else",
    "end",
    "except",
    "false",
    "fetch",
    "for",
    "foreign",
    "from",
    "grant",
    "group",
    "having",
    "in",
    "index",
    "initially",
    "intersect",
    "into",
    "lateral",
    "leading",
    "limit",
    "localtime",
    "localtimestamp",
    "not",
    "nothing",
    "null",
    "offset",
    "on",
    "only",
    "or",
    "order",
    "placing",
    "primary",
    "references",
    "returning",
    "select",
    "session_user",
    "some",
    "symmetric",
    "table",
    "then",
    "to",
    "trailing",
    "true",
    "union",
    "unique",
    "user",
    "using",
    "variadic",
    "when",
    "where",
    "window",
    "with",
];

fn is_reserved_keyword(ident: &str) -> bool {
    RESERVED_KEYWORDS.binary_search(&ident).is_ok()
}

/// Quote `ident` unless it is a plain lower-case identifier that is not a
/// reserved keyword.
pub fn quote_ident(ident: &str) -> String {
    let plain = !is_reserved_keyword(ident)
        && ident
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c == '_')
        && ident
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if plain {
        ident.to_string()
    } else {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }
}

/// Render `value` as a single-quoted SQL string literal.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
