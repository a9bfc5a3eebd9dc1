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

//! Columnar storage containers
//!
//! One homogeneous append-only container per column type, keyed by the
//! same tag as [`Value`]. String columns own their contents as `Arc<str>`,
//! so values handed out of a column are fully owned.

use std::sync::Arc;

use crate::core::{ColumnType, Error, Result, Value};

/// Per-type homogeneous column container
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// 64-bit signed integers
    Int64(Vec<i64>),

    /// 64-bit floats
    Float64(Vec<f64>),

    /// UTF-8 strings
    String(Vec<Arc<str>>),

    /// Booleans
    Bool(Vec<bool>),
}

impl Column {
    /// Create an empty column of the given type
    pub fn new(column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::Int64 => Column::Int64(Vec::new()),
            ColumnType::Float64 => Column::Float64(Vec::new()),
            ColumnType::String => Column::String(Vec::new()),
            ColumnType::Bool => Column::Bool(Vec::new()),
        }
    }

    /// The type of values this column holds
    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::Int64(_) => ColumnType::Int64,
            Column::Float64(_) => ColumnType::Float64,
            Column::String(_) => ColumnType::String,
            Column::Bool(_) => ColumnType::Bool,
        }
    }

    /// Number of values in the column
    pub fn len(&self) -> usize {
        match self {
            Column::Int64(v) => v.len(),
            Column::Float64(v) => v.len(),
            Column::String(v) => v.len(),
            Column::Bool(v) => v.len(),
        }
    }

    /// True when the column holds no values
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a value to the column
    ///
    /// The value tag must match the column type; the Table boundary
    /// validates every value of a record before any column is touched.
    pub fn push(&mut self, value: Value) -> Result<()> {
        match (self, value) {
            (Column::Int64(v), Value::Int64(x)) => v.push(x),
            (Column::Float64(v), Value::Float64(x)) => v.push(x),
            (Column::String(v), Value::String(x)) => v.push(x),
            (Column::Bool(v), Value::Bool(x)) => v.push(x),
            _ => return Err(Error::InvalidColumnType),
        }
        Ok(())
    }

    /// Get the value at the given row index
    pub fn get(&self, index: usize) -> Option<Value> {
        match self {
            Column::Int64(v) => v.get(index).copied().map(Value::Int64),
            Column::Float64(v) => v.get(index).copied().map(Value::Float64),
            Column::String(v) => v.get(index).map(|s| Value::String(Arc::clone(s))),
            Column::Bool(v) => v.get(index).copied().map(Value::Bool),
        }
    }
}
