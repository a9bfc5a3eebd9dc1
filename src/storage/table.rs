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

//! Columnar table: a named schema plus one column container per entry
//!
//! Structural invariant: every column's length equals `row_count`.
//! `append_record` validates the whole record before mutating any column,
//! so a rejected row never leaves columns at unequal lengths.

use crate::core::{Error, Result, Row, Schema, Value};
use crate::storage::column::Column;

/// An in-memory columnar table
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    schema: Schema,
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Create an empty table with the given name and schema
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        let columns = schema
            .columns()
            .map(|col| Column::new(col.column_type))
            .collect();
        Self {
            name: name.into(),
            schema,
            columns,
            row_count: 0,
        }
    }

    /// Table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Table schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Get the column container at the given index
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Append a record to the table
    ///
    /// The record is validated in full (count, then every value tag)
    /// before any column is mutated.
    pub fn append_record(&mut self, values: Vec<Value>) -> Result<()> {
        if values.len() != self.schema.column_count() {
            return Err(Error::column_count_mismatch(
                self.schema.column_count(),
                values.len(),
            ));
        }

        for (i, value) in values.iter().enumerate() {
            let expected = self.schema.column_type(i)?;
            let got = value.column_type();
            if got != expected {
                let column = self.schema.column(i).map(|c| c.name.as_str()).unwrap_or("");
                return Err(Error::type_mismatch(column, expected, got));
            }
        }

        for (i, value) in values.into_iter().enumerate() {
            self.columns[i].push(value)?;
        }
        self.row_count += 1;
        Ok(())
    }

    /// Get a single value, bounds-checked on both axes
    pub fn get_value(&self, row: usize, col: usize) -> Option<Value> {
        if row >= self.row_count {
            return None;
        }
        self.columns.get(col).and_then(|c| c.get(row))
    }

    /// Materialize an owned row
    pub fn get_row(&self, row: usize) -> Option<Row> {
        if row >= self.row_count {
            return None;
        }
        let mut out = Vec::with_capacity(self.columns.len());
        for col in &self.columns {
            out.push(col.get(row)?);
        }
        Some(out)
    }
}
