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

//! Storage module for Coleman
//!
//! This module contains the storage layer components:
//! - Columnar table representation ([`Column`], [`Table`])
//! - Predicate evaluation and aggregation
//! - Write-ahead log ([`Wal`], [`WalEntry`])
//! - Snapshot store ([`SnapshotStore`])
//! - The coordinating [`TableManager`]
//! - Configuration types

pub mod aggregate;
pub mod codec;
pub mod column;
pub mod config;
pub mod manager;
pub mod predicate;
pub mod snapshot;
pub mod table;
pub mod wal;

// Re-export main types for convenience
pub use aggregate::aggregate;
pub use column::Column;
pub use config::Config;
pub use manager::TableManager;
pub use predicate::{filter_table, Predicate};
pub use snapshot::{SnapshotStore, SNAPSHOT_FILE, SNAPSHOT_MAGIC, SNAPSHOT_VERSION};
pub use table::Table;
pub use wal::{Wal, WalEntry, WAL_HEADER_SIZE, WAL_MAGIC, WAL_VERSION};
