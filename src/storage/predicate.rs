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

//! Predicate evaluation over columnar tables
//!
//! Predicates form a pure conjunction; disjunction is not supported.
//! Column names and value payloads are validated against the schema before
//! any row is visited, so a malformed predicate list fails fast.

use crate::core::{CompareOp, Error, Result, Value};
use crate::storage::table::Table;

/// A single comparison predicate: `column op value`
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Target column name
    pub column: String,

    /// Comparison operator
    pub op: CompareOp,

    /// Right-hand value; a predicate without one is invalid
    pub value: Option<Value>,
}

impl Predicate {
    /// Create a new predicate
    pub fn new(column: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            op,
            value: Some(value.into()),
        }
    }

    /// `column = value`
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, CompareOp::Eq, value)
    }

    /// `column != value`
    pub fn ne(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, CompareOp::Ne, value)
    }

    /// `column < value`
    pub fn lt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, CompareOp::Lt, value)
    }

    /// `column <= value`
    pub fn lte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, CompareOp::Lte, value)
    }

    /// `column > value`
    pub fn gt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, CompareOp::Gt, value)
    }

    /// `column >= value`
    pub fn gte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, CompareOp::Gte, value)
    }
}

/// A predicate resolved against a schema, ready for row evaluation
struct ResolvedPredicate<'a> {
    column_index: usize,
    op: CompareOp,
    value: &'a Value,
}

fn resolve<'a>(table: &Table, predicates: &'a [Predicate]) -> Result<Vec<ResolvedPredicate<'a>>> {
    let mut resolved = Vec::with_capacity(predicates.len());
    for pred in predicates {
        let column_index = table
            .schema()
            .find(&pred.column)
            .ok_or_else(|| Error::ColumnNotFound(pred.column.clone()))?;
        let value = pred.value.as_ref().ok_or_else(|| {
            Error::invalid_predicate(format!("predicate on column '{}' has no value", pred.column))
        })?;
        resolved.push(ResolvedPredicate {
            column_index,
            op: pred.op,
            value,
        });
    }
    Ok(resolved)
}

/// Return the indices of the rows satisfying every predicate, ascending
///
/// An empty predicate list selects every row. A predicate whose value tag
/// does not match the column type never matches (no error is raised).
pub fn filter_table(table: &Table, predicates: &[Predicate]) -> Result<Vec<usize>> {
    if predicates.is_empty() {
        return Ok((0..table.row_count()).collect());
    }

    let resolved = resolve(table, predicates)?;
    let mut matches = Vec::new();
    'rows: for row in 0..table.row_count() {
        for pred in &resolved {
            let cell = match table.get_value(row, pred.column_index) {
                Some(v) => v,
                None => continue 'rows,
            };
            if !cell.compare_with(pred.op, pred.value) {
                continue 'rows;
            }
        }
        matches.push(row);
    }
    Ok(matches)
}
