use std::collections::BTreeSet;

use llkv_result::Error;
use llkv_sqlsmith::{IndexPick, SchemaCache, SchemaCacheConfig, TableName};
use llkv_test_utils::{ScriptedConnection, column_row, index_row};
use llkv_types::SqlType;

fn t1() -> TableName {
    TableName::new("db", "public", "t1")
}

fn t2() -> TableName {
    TableName::new("db", "public", "t2")
}

/// Two tables: t1 with `idx1 (a ASC) STORING (b)`, t2 without indexes.
fn scripted_two_tables() -> ScriptedConnection {
    let conn = ScriptedConnection::new();
    conn.on_columns(vec![
        column_row(&t1(), "a", "INT8", false, false),
        column_row(&t1(), "b", "STRING", true, false),
        column_row(&t1(), "rowid", "INT8", false, true),
        column_row(&t2(), "c", "BOOL", true, false),
    ]);
    conn.on_indexes(
        &t1(),
        vec![
            index_row("idx1", "a", false, true),
            index_row("idx1", "b", true, false),
        ],
    );
    conn.on_indexes(&t2(), vec![]);
    conn
}

fn seeded(seed: u64) -> SchemaCacheConfig {
    SchemaCacheConfig::default().with_seed(seed)
}

#[test]
fn refresh_populates_tables_and_indexes() {
    let conn = scripted_two_tables();
    let cache = SchemaCache::new(conn.clone(), seeded(1));
    cache.refresh().expect("refresh");

    let tables = cache.tables();
    let names: Vec<_> = tables.iter().map(|t| t.name.clone()).collect();
    assert_eq!(names, vec![t1(), t2()]);
    assert_eq!(tables[0].columns.len(), 2);
    assert_eq!(tables[0].columns[0].ty, SqlType::INT);
    assert!(tables[0].column("rowid").is_none());

    let idx = cache.indexes_for(&t1());
    assert_eq!(idx.len(), 1);
    assert_eq!(idx["idx1"].key_columns.len(), 1);
    assert_eq!(idx["idx1"].storing_columns, vec!["b".to_string()]);
    assert!(cache.indexes_for(&t2()).is_empty());

    // One column query, then one index query per table.
    let statements = conn.statements();
    assert_eq!(statements.len(), 3);
    assert!(statements[0].contains("information_schema.columns"));
    assert!(statements[1].ends_with("[SHOW INDEXES FROM db.public.t1]"));
    assert!(statements[2].ends_with("[SHOW INDEXES FROM db.public.t2]"));
}

#[test]
fn index_picks_distinguish_empty_outcomes() {
    let cache = SchemaCache::new(scripted_two_tables(), seeded(7));
    cache.refresh().expect("refresh");

    match cache.pick_random_index_on(&t1()) {
        IndexPick::Found(name, def) => {
            assert_eq!(name.table, t1());
            assert_eq!(name.index, "idx1");
            assert_eq!(def.name, "idx1");
        }
        other => panic!("expected an index on t1, got {other:?}"),
    }
    assert_eq!(cache.pick_random_index_on(&t2()), IndexPick::NoIndexes(t2()));

    let unknown = TableName::new("db", "public", "nope");
    assert_eq!(
        cache.pick_random_index_on(&unknown),
        IndexPick::NoIndexes(unknown.clone())
    );

    let mut saw_found = false;
    let mut saw_empty = false;
    for _ in 0..200 {
        match cache.pick_random_index() {
            IndexPick::Found(name, _) => {
                assert_eq!(name.table, t1());
                saw_found = true;
            }
            IndexPick::NoIndexes(table) => {
                assert_eq!(table, t2());
                saw_empty = true;
            }
            IndexPick::NoTables => panic!("cache has tables"),
        }
    }
    assert!(saw_found && saw_empty);
}

#[test]
fn random_table_picks_cover_every_table() {
    let cache = SchemaCache::new(scripted_two_tables(), seeded(3));
    cache.refresh().expect("refresh");

    let picked: BTreeSet<_> = (0..200)
        .filter_map(|_| cache.pick_random_table())
        .map(|t| t.name.name.clone())
        .collect();
    assert_eq!(
        picked.into_iter().collect::<Vec<_>>(),
        vec!["t1".to_string(), "t2".to_string()]
    );
}

#[test]
fn seeded_caches_pick_identically() {
    let a = SchemaCache::new(scripted_two_tables(), seeded(42));
    let b = SchemaCache::new(scripted_two_tables(), seeded(42));
    a.refresh().expect("refresh a");
    b.refresh().expect("refresh b");

    for _ in 0..50 {
        let left = a.pick_random_table().map(|t| t.name.clone());
        let right = b.pick_random_table().map(|t| t.name.clone());
        assert_eq!(left, right);
        assert_eq!(a.pick_random_index(), b.pick_random_index());
    }
}

#[test]
fn failed_index_query_keeps_previous_state() {
    let conn = scripted_two_tables();
    let cache = SchemaCache::new(conn.clone(), seeded(1));
    cache.refresh().expect("first refresh");
    let before_tables = cache.tables();
    let before_t1 = cache.indexes_for(&t1());

    // Second generation adds t3 and fails on the second table's indexes.
    let t3 = TableName::new("db", "public", "t3");
    conn.on_columns(vec![
        column_row(&t1(), "a", "INT8", false, false),
        column_row(&t2(), "c", "BOOL", true, false),
        column_row(&t3, "d", "DATE", true, false),
    ]);
    conn.on_indexes(&t1(), vec![index_row("idx_new", "a", false, false)]);
    conn.fail_indexes(&t2(), "connection reset");

    let err = cache.refresh().expect_err("second refresh fails");
    assert!(matches!(err, Error::Query(ref msg) if msg == "connection reset"));

    assert_eq!(cache.tables(), before_tables);
    assert_eq!(cache.indexes_for(&t1()), before_t1);
    assert!(cache.indexes_for(&t1()).contains_key("idx1"));
    assert!(!cache.indexes_for(&t1()).contains_key("idx_new"));
    assert!(cache.indexes_for(&t3).is_empty());
}

#[test]
fn failed_column_query_keeps_previous_state() {
    let conn = scripted_two_tables();
    let cache = SchemaCache::new(conn.clone(), seeded(1));
    cache.refresh().expect("first refresh");

    conn.fail_on("information_schema.columns", "permission denied");
    conn.clear_statements();
    assert!(cache.refresh().is_err());
    assert_eq!(conn.statements().len(), 1);
    assert_eq!(cache.table_count(), 2);
}

#[test]
fn unknown_type_aborts_refresh() {
    let conn = scripted_two_tables();
    let cache = SchemaCache::new(conn.clone(), seeded(1));
    cache.refresh().expect("first refresh");

    conn.on_columns(vec![column_row(&t1(), "g", "GEOMETRY", true, false)]);
    let err = cache.refresh().expect_err("unknown type");
    assert!(matches!(err, Error::UnknownTypeName(_)));
    assert_eq!(cache.table_count(), 2);
}

#[test]
fn malformed_rows_abort_refresh() {
    let conn = ScriptedConnection::new();
    conn.on_columns(vec![llkv_sqlsmith::SqlRow::new(vec!["db".into()])]);
    let cache = SchemaCache::new(conn, seeded(1));

    let err = cache.refresh().expect_err("short row");
    assert!(matches!(err, Error::RowDecode { .. }));
    assert!(cache.pick_random_table().is_none());
}

#[test]
fn refresh_replaces_dropped_tables() {
    let conn = scripted_two_tables();
    let cache = SchemaCache::new(conn.clone(), seeded(1));
    cache.refresh().expect("first refresh");

    conn.on_columns(vec![column_row(&t2(), "c", "BOOL", true, false)]);
    cache.refresh().expect("second refresh");

    let names: Vec<_> = cache.tables().iter().map(|t| t.name.clone()).collect();
    assert_eq!(names, vec![t2()]);
    assert!(cache.indexes_for(&t1()).is_empty());
    assert_eq!(cache.pick_random_index(), IndexPick::NoIndexes(t2()));
}

#[test]
fn empty_schema_reports_no_tables() {
    let conn = ScriptedConnection::new();
    conn.on_columns(vec![]);
    let cache = SchemaCache::new(conn.clone(), seeded(1));
    cache.refresh().expect("refresh");

    assert!(cache.pick_random_table().is_none());
    assert_eq!(cache.pick_random_index(), IndexPick::NoTables);
    assert_eq!(conn.statements().len(), 1);
}

#[test]
fn target_schema_is_queried_and_filtered() {
    let audit = TableName::new("db", "audit", "log");
    let conn = ScriptedConnection::new();
    conn.on_columns(vec![
        column_row(&audit, "id", "INT8", false, false),
        column_row(&t1(), "a", "INT8", false, false),
    ]);
    conn.on_indexes(&audit, vec![]);
    let cache = SchemaCache::new(conn.clone(), seeded(1).with_target_schema("audit"));
    cache.refresh().expect("refresh");

    assert!(conn.statements()[0].contains("table_schema = 'audit'"));
    let names: Vec<_> = cache.tables().iter().map(|t| t.name.clone()).collect();
    assert_eq!(names, vec![audit]);
}

#[test]
fn keyword_named_tables_are_quoted_in_index_queries() {
    let order = TableName::new("db", "public", "order");
    let conn = ScriptedConnection::new();
    conn.on_columns(vec![column_row(&order, "id", "INT8", false, false)]);
    conn.on(
        "[SHOW INDEXES FROM db.public.\"order\"]",
        vec![index_row("primary", "id", false, true)],
    );
    let cache = SchemaCache::new(conn.clone(), seeded(1));
    cache.refresh().expect("refresh");

    let statements = conn.statements();
    assert!(statements[1].ends_with("[SHOW INDEXES FROM db.public.\"order\"]"));
    match cache.pick_random_index_on(&order) {
        IndexPick::Found(name, _) => {
            assert_eq!(name.to_string(), "db.public.\"order\"@\"primary\"");
        }
        other => panic!("expected the primary index, got {other:?}"),
    }
}
