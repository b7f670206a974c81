//! Process-wide schema state shared by statement generators.
//!
//! # Concurrency
//!
//! [`SchemaCache::refresh`] is the only mutator. It takes the write lock for
//! its whole duration, including both introspection round trips, so
//! concurrent refreshes are serialized and readers never observe a table
//! list from one generation paired with indexes from another. Readers take
//! the read lock and may run concurrently with each other.
//!
//! A refresh builds the new table list and index catalog into locals and
//! only swaps them in once every query and decode has succeeded; a failure
//! anywhere leaves the previous state in place.
//!
//! The random source sits behind its own mutex and is only locked while the
//! state lock is held, so a seeded cache yields the same pick sequence for
//! the same state.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use llkv_result::{Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SchemaCacheConfig;
use crate::connection::SqlConnection;
use crate::indexes::{IndexCatalog, IndexDef, TableIndexName, TableIndexes, assemble_indexes};
use crate::schema::{ColumnRow, TableName, TableRef, columns_query, group_columns};

/// Outcome of a random index pick.
///
/// The empty outcomes are not errors; callers typically retry with another
/// table or fall back to a plain table scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexPick {
    Found(TableIndexName, IndexDef),
    /// The cache holds no tables.
    NoTables,
    /// The chosen table has no indexes.
    NoIndexes(TableName),
}

impl IndexPick {
    pub fn found(self) -> Option<(TableIndexName, IndexDef)> {
        match self {
            IndexPick::Found(name, def) => Some((name, def)),
            IndexPick::NoTables | IndexPick::NoIndexes(_) => None,
        }
    }
}

#[derive(Debug, Default)]
struct SchemaState {
    tables: Vec<Arc<TableRef>>,
    indexes: IndexCatalog,
}

/// Current tables and indexes of the database under test.
pub struct SchemaCache {
    state: RwLock<SchemaState>,
    rng: Mutex<StdRng>,
    conn: Mutex<Option<Box<dyn SqlConnection>>>,
    config: SchemaCacheConfig,
}

impl std::fmt::Debug for SchemaCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaCache")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SchemaCache {
    /// Create an empty cache that refreshes through `conn`.
    ///
    /// Nothing is queried until the first [`refresh`](Self::refresh).
    pub fn new<C>(conn: C, config: SchemaCacheConfig) -> Self
    where
        C: SqlConnection + 'static,
    {
        Self::with_connection(Some(Box::new(conn)), config)
    }

    /// Create a cache with no connection. Refreshing it succeeds without
    /// doing anything and it stays empty.
    pub fn without_connection(config: SchemaCacheConfig) -> Self {
        Self::with_connection(None, config)
    }

    fn with_connection(conn: Option<Box<dyn SqlConnection>>, config: SchemaCacheConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            state: RwLock::new(SchemaState::default()),
            rng: Mutex::new(rng),
            conn: Mutex::new(conn),
            config,
        }
    }

    pub fn config(&self) -> &SchemaCacheConfig {
        &self.config
    }

    /// Reload every table and index of the target schema.
    ///
    /// # Errors
    ///
    /// Returns the first query, decode or type-name failure unchanged. The
    /// cache then still holds exactly what it held before the call.
    pub fn refresh(&self) -> Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| Error::Internal("schema cache lock poisoned".into()))?;
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| Error::Internal("schema cache connection lock poisoned".into()))?;
        let Some(conn) = conn.as_mut() else {
            tracing::debug!("schema cache has no connection; refresh skipped");
            return Ok(());
        };

        match self.load(&mut **conn) {
            Ok(fresh) => {
                tracing::info!(
                    schema = %self.config.target_schema,
                    tables = fresh.tables.len(),
                    indexed_tables = fresh.indexes.len(),
                    "schema cache refreshed"
                );
                *state = fresh;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    schema = %self.config.target_schema,
                    error = %err,
                    "schema cache refresh failed; keeping previous state"
                );
                Err(err)
            }
        }
    }

    fn load<C>(&self, conn: &mut C) -> Result<SchemaState>
    where
        C: SqlConnection + ?Sized,
    {
        let sql = columns_query(&self.config.target_schema);
        tracing::debug!(schema = %self.config.target_schema, "querying columns");
        let rows = conn
            .query(&sql)?
            .iter()
            .map(ColumnRow::decode)
            .collect::<Result<Vec<_>>>()?;
        let tables: Vec<Arc<TableRef>> = group_columns(rows, &self.config.target_schema)?
            .into_iter()
            .map(Arc::new)
            .collect();
        let indexes = assemble_indexes(conn, &tables)?;
        Ok(SchemaState { tables, indexes })
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, SchemaState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Uniform index in `0..len`; `len` must be non-zero.
    fn pick(&self, len: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.random_range(0..len)
    }

    /// A uniformly chosen table, or `None` when the cache holds no tables.
    pub fn pick_random_table(&self) -> Option<Arc<TableRef>> {
        let state = self.read_state();
        if state.tables.is_empty() {
            return None;
        }
        let idx = self.pick(state.tables.len());
        Some(Arc::clone(&state.tables[idx]))
    }

    /// Indexes of `table` keyed by index name; empty when it has none or is
    /// unknown.
    pub fn indexes_for(&self, table: &TableName) -> Arc<TableIndexes> {
        let state = self.read_state();
        state
            .indexes
            .get(table)
            .map(Arc::clone)
            .unwrap_or_default()
    }

    /// A uniformly chosen index of a uniformly chosen table.
    ///
    /// The table is chosen first, so a table without indexes yields
    /// [`IndexPick::NoIndexes`] even when other tables have some.
    pub fn pick_random_index(&self) -> IndexPick {
        let state = self.read_state();
        if state.tables.is_empty() {
            return IndexPick::NoTables;
        }
        let table = &state.tables[self.pick(state.tables.len())];
        self.pick_index_in(&state, &table.name)
    }

    /// A uniformly chosen index of `table`.
    pub fn pick_random_index_on(&self, table: &TableName) -> IndexPick {
        let state = self.read_state();
        self.pick_index_in(&state, table)
    }

    fn pick_index_in(&self, state: &SchemaState, table: &TableName) -> IndexPick {
        let Some(indexes) = state.indexes.get(table).filter(|idx| !idx.is_empty()) else {
            return IndexPick::NoIndexes(table.clone());
        };
        let nth = self.pick(indexes.len());
        debug_assert!(nth < indexes.len(), "index pick {nth} out of range for {table}");
        if let Some((name, def)) = indexes.iter().nth(nth) {
            return IndexPick::Found(
                TableIndexName {
                    table: table.clone(),
                    index: name.clone(),
                },
                def.clone(),
            );
        }
        // Unreachable: `pick` stays below `indexes.len()`.
        IndexPick::NoIndexes(table.clone())
    }

    /// Snapshot of the current table list.
    pub fn tables(&self) -> Vec<Arc<TableRef>> {
        self.read_state().tables.clone()
    }

    pub fn table_count(&self) -> usize {
        self.read_state().tables.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cache_reports_no_tables() {
        let cache = SchemaCache::without_connection(SchemaCacheConfig::default().with_seed(1));
        assert!(cache.pick_random_table().is_none());
        assert_eq!(cache.pick_random_index(), IndexPick::NoTables);
        let t = TableName::new("db", "public", "t");
        assert_eq!(cache.pick_random_index_on(&t), IndexPick::NoIndexes(t.clone()));
        assert!(cache.indexes_for(&t).is_empty());
    }

    #[test]
    fn schema_less_refresh_is_a_no_op() {
        let cache = SchemaCache::without_connection(SchemaCacheConfig::default());
        cache.refresh().unwrap();
        cache.refresh().unwrap();
        assert!(cache.tables().is_empty());
    }

    #[test]
    fn index_picks_stay_in_range() {
        let t = TableName::new("db", "public", "t");
        let mut indexes = TableIndexes::new();
        for name in ["a", "b", "c"] {
            indexes.insert(name.into(), IndexDef::new(name, t.clone()));
        }
        let mut state = SchemaState::default();
        state.indexes.insert(t.clone(), Arc::new(indexes));
        let cache = SchemaCache::without_connection(SchemaCacheConfig::default().with_seed(9));

        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..100 {
            match cache.pick_index_in(&state, &t) {
                IndexPick::Found(name, def) => {
                    assert_eq!(name.index, def.name);
                    seen.insert(name.index);
                }
                other => panic!("every pick should land on an index, got {other:?}"),
            }
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn found_unwraps_only_found_picks() {
        let t = TableName::new("db", "public", "t");
        assert!(IndexPick::NoTables.found().is_none());
        assert!(IndexPick::NoIndexes(t.clone()).found().is_none());
        let name = TableIndexName {
            table: t.clone(),
            index: "i".into(),
        };
        let pick = IndexPick::Found(name.clone(), IndexDef::new("i", t));
        assert_eq!(pick.found().map(|(n, _)| n), Some(name));
    }
}
