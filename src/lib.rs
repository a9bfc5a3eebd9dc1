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

//! # Coleman - embeddable columnar table engine
//!
//! Coleman is a single-node, in-memory columnar table engine with durable
//! on-disk persistence. It exposes a small set of analytical operations
//! over strongly-typed tables and guarantees that committed writes survive
//! a crash via a write-ahead log and periodic snapshots.
//!
//! ## Key properties
//!
//! - **WAL-first writes** - every mutation is on durable storage before
//!   the in-memory state changes
//! - **Atomic snapshots** - full-dump checkpoints committed by rename,
//!   with WAL truncation
//! - **Typed columnar tables** - int64, float64, string and bool columns
//!   with all-or-nothing row appends
//! - **Predicate scans and aggregates** - conjunctive filters and
//!   COUNT/SUM over filtered selections
//! - **Coarse reader-writer concurrency** - shared reads, exclusive
//!   writes, one lock over the whole tables map
//!
//! ## Quick start
//!
//! ```no_run
//! use coleman::{
//!     AggregateFunction, ColumnDef, ColumnType, Config, Predicate, Schema, TableManager, Value,
//! };
//!
//! let manager = TableManager::open(Config::with_data_dir("data")).unwrap();
//!
//! manager
//!     .create_table(
//!         "users",
//!         Schema::new(vec![
//!             ColumnDef::new("id", ColumnType::Int64),
//!             ColumnDef::new("name", ColumnType::String),
//!             ColumnDef::new("age", ColumnType::Int64),
//!         ]),
//!     )
//!     .unwrap();
//!
//! manager
//!     .add_record(
//!         "users",
//!         vec![Value::int64(1), Value::string("Alice"), Value::int64(30)],
//!     )
//!     .unwrap();
//!
//! let adults = manager
//!     .filter("users", &[Predicate::gte("age", 18i64)])
//!     .unwrap();
//! let count = manager
//!     .aggregate("users", "id", AggregateFunction::Count, &[])
//!     .unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`core`] - fundamental types ([`Value`], [`Schema`], [`Error`])
//! - [`storage`] - columnar tables, predicate evaluation, WAL, snapshots,
//!   and the [`TableManager`] coordinator

pub mod core;
pub mod storage;

// Re-export main types for convenience
pub use crate::core::{
    AggregateFunction, ColumnDef, ColumnType, CompareOp, Error, Result, Row, Schema, Value,
};
pub use crate::storage::{
    filter_table, Column, Config, Predicate, SnapshotStore, Table, TableManager, Wal, WalEntry,
};
