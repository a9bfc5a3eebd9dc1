// Copyright 2025 Coleman Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Table manager: the engine's coordinator
//!
//! Owns the tables map, the WAL, the snapshot store and the concurrency
//! discipline. Every mutation is appended to the WAL before the in-memory
//! state changes; reads run under a shared lock against a stable view.
//!
//! One coarse reader-writer lock covers the tables map and table contents.
//! `scan`/`filter`/`aggregate`/`table_count`/`table_names` take it shared;
//! `create_table`/`drop_table`/`add_record` take it exclusive. The WAL has
//! its own mutex, so records stay totally ordered regardless.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::core::{AggregateFunction, Error, Result, Row, Schema, Value};
use crate::storage::aggregate;
use crate::storage::config::Config;
use crate::storage::predicate::{filter_table, Predicate};
use crate::storage::snapshot::SnapshotStore;
use crate::storage::table::Table;
use crate::storage::wal::{Wal, WalEntry};

#[derive(Debug)]
struct ManagerState {
    tables: FxHashMap<String, Table>,
    records_since_snapshot: u64,
}

/// Multi-table coordinator with WAL-first durability
///
/// All operations run to completion; there are no cancellation points.
#[derive(Debug)]
pub struct TableManager {
    state: RwLock<ManagerState>,
    wal: Wal,
    snapshots: SnapshotStore,
    config: Config,
}

impl TableManager {
    /// Open the engine, running crash recovery
    ///
    /// Recovery sequence: open (and if needed create) the WAL, load the
    /// latest snapshot into the tables map, replay the WAL tail in
    /// sequence order, reset the snapshot accounting.
    pub fn open(config: Config) -> Result<Self> {
        let wal = Wal::open(&config.wal_path)?;
        let snapshots = SnapshotStore::new(&config.snapshot_dir);

        let mut tables: FxHashMap<String, Table> = FxHashMap::default();

        if snapshots.exists() {
            let mut loaded = 0usize;
            snapshots.load(|table| {
                tables.insert(table.name().to_string(), table);
                loaded += 1;
                Ok(())
            })?;
            log::info!("loaded snapshot with {} tables", loaded);
        }

        let mut replayed = 0u64;
        wal.replay(|seq, entry| {
            Self::apply_replayed(&mut tables, seq, entry)?;
            replayed += 1;
            Ok(())
        })?;
        if replayed > 0 {
            log::info!(
                "replayed {} WAL records through sequence {}",
                replayed,
                wal.current_seq()
            );
        }

        Ok(Self {
            state: RwLock::new(ManagerState {
                tables,
                records_since_snapshot: 0,
            }),
            wal,
            snapshots,
            config,
        })
    }

    /// Apply one replayed WAL entry to the recovering tables map
    ///
    /// A CreateTable for an existing table or an AddRecord for a missing
    /// table means the log disagrees with the snapshot: fatal. A record
    /// whose in-memory apply is rejected with a validation error
    /// reproduces the rejection the original process returned to its
    /// caller; recovery keeps going.
    fn apply_replayed(
        tables: &mut FxHashMap<String, Table>,
        seq: u64,
        entry: WalEntry,
    ) -> Result<()> {
        match entry {
            WalEntry::CreateTable { table_name, schema } => {
                if tables.contains_key(&table_name) {
                    return Err(Error::TableAlreadyExists(table_name));
                }
                let table = Table::new(table_name.clone(), schema);
                tables.insert(table_name, table);
                Ok(())
            }
            WalEntry::AddRecord { table_name, values } => {
                let table = tables
                    .get_mut(&table_name)
                    .ok_or(Error::TableNotFound(table_name))?;
                match table.append_record(values) {
                    Ok(()) => Ok(()),
                    Err(e) if e.is_validation() => {
                        log::warn!(
                            "WAL record {} for table '{}' was rejected on the original run too: {}",
                            seq,
                            table.name(),
                            e
                        );
                        Ok(())
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }

    /// Create a table
    pub fn create_table(&self, name: &str, schema: Schema) -> Result<()> {
        let mut state = self.state.write();
        if state.tables.contains_key(name) {
            return Err(Error::TableAlreadyExists(name.to_string()));
        }

        self.wal.append(&WalEntry::CreateTable {
            table_name: name.to_string(),
            schema: schema.clone(),
        })?;

        state.tables.insert(name.to_string(), Table::new(name, schema));
        state.records_since_snapshot += 1;
        self.maybe_snapshot(&mut state)
    }

    /// Drop a table
    ///
    /// Not WAL-logged: recovery cannot reproduce a drop, so a table dropped
    /// after the last snapshot reappears on restart.
    pub fn drop_table(&self, name: &str) -> Result<()> {
        let mut state = self.state.write();
        state
            .tables
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Error::TableNotFound(name.to_string()))
    }

    /// Append a record to a table
    ///
    /// The record is logged before it is applied. Validation errors from
    /// the in-memory append surface to the caller even though a WAL record
    /// was already written; replay reproduces the same rejection.
    pub fn add_record(&self, name: &str, values: Vec<Value>) -> Result<()> {
        let mut state = self.state.write();
        if !state.tables.contains_key(name) {
            return Err(Error::TableNotFound(name.to_string()));
        }

        self.wal.append(&WalEntry::AddRecord {
            table_name: name.to_string(),
            values: values.clone(),
        })?;

        let table = state
            .tables
            .get_mut(name)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))?;
        table.append_record(values)?;

        state.records_since_snapshot += 1;
        self.maybe_snapshot(&mut state)
    }

    /// Return every row of a table in insertion order
    pub fn scan(&self, name: &str) -> Result<Vec<Row>> {
        let state = self.state.read();
        let table = Self::table(&state, name)?;
        let rows = (0..table.row_count())
            .filter_map(|r| table.get_row(r))
            .collect();
        Ok(rows)
    }

    /// Return the rows satisfying every predicate, in insertion order
    pub fn filter(&self, name: &str, predicates: &[Predicate]) -> Result<Vec<Row>> {
        let state = self.state.read();
        let table = Self::table(&state, name)?;
        let indices = filter_table(table, predicates)?;
        let rows = indices.into_iter().filter_map(|r| table.get_row(r)).collect();
        Ok(rows)
    }

    /// Compute a scalar aggregate over the rows matching the predicates
    pub fn aggregate(
        &self,
        name: &str,
        column: &str,
        function: AggregateFunction,
        predicates: &[Predicate],
    ) -> Result<Value> {
        let state = self.state.read();
        let table = Self::table(&state, name)?;
        aggregate::aggregate(table, column, function, predicates)
    }

    /// Number of tables
    pub fn table_count(&self) -> usize {
        self.state.read().tables.len()
    }

    /// Table names, sorted
    pub fn table_names(&self) -> Vec<String> {
        let state = self.state.read();
        let mut names: Vec<String> = state.tables.keys().cloned().collect();
        names.sort();
        names
    }

    /// The schema of a table
    pub fn table_schema(&self, name: &str) -> Result<Schema> {
        let state = self.state.read();
        Ok(Self::table(&state, name)?.schema().clone())
    }

    /// The engine's configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn table<'a>(state: &'a ManagerState, name: &str) -> Result<&'a Table> {
        state
            .tables
            .get(name)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))
    }

    /// Checkpoint when the configured policy says so
    ///
    /// A failed save propagates without truncating the WAL or resetting
    /// the accounting, so the log stays authoritative.
    fn maybe_snapshot(&self, state: &mut ManagerState) -> Result<()> {
        let over_records = state.records_since_snapshot >= self.config.snapshot_record_threshold;
        let over_wal_size = self.wal.size()? >= self.config.snapshot_wal_size_threshold;
        if !over_records && !over_wal_size {
            return Ok(());
        }

        self.snapshots.save(&state.tables)?;
        self.wal.truncate()?;
        log::info!(
            "snapshot committed ({} tables, {} records since last)",
            state.tables.len(),
            state.records_since_snapshot
        );
        state.records_since_snapshot = 0;
        Ok(())
    }
}
