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

//! Core types and definitions for Coleman
//!
//! This module contains the fundamental types used throughout the engine:
//!
//! - [`ColumnType`] - column data types (int64, float64, string, bool)
//! - [`CompareOp`] - predicate comparison operators (=, !=, <, <=, >, >=)
//! - [`AggregateFunction`] - scalar aggregates (COUNT, SUM)
//! - [`Value`] - runtime values with type information
//! - [`Schema`] / [`ColumnDef`] - table schema definition
//! - [`Error`] - error types for all engine operations

pub mod error;
pub mod schema;
pub mod types;
pub mod value;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use schema::{ColumnDef, Schema};
pub use types::{AggregateFunction, ColumnType, CompareOp};
pub use value::Value;

/// A materialized table row (fully owned values)
pub type Row = Vec<Value>;
