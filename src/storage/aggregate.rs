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

//! Scalar aggregation over filtered row selections

use crate::core::{AggregateFunction, Error, Result, Value};
use crate::storage::column::Column;
use crate::storage::predicate::{filter_table, Predicate};
use crate::storage::table::Table;

/// Compute a scalar aggregate over the rows matching the predicates
///
/// COUNT is valid on any column (only the name is resolved; values are not
/// read). SUM requires a numeric column: Int64 columns sum with wrapping
/// two's-complement addition, Float64 columns follow IEEE-754. An empty
/// selection yields the additive identity.
pub fn aggregate(
    table: &Table,
    column_name: &str,
    function: AggregateFunction,
    predicates: &[Predicate],
) -> Result<Value> {
    let column_index = table
        .schema()
        .find(column_name)
        .ok_or_else(|| Error::ColumnNotFound(column_name.to_string()))?;

    let rows = filter_table(table, predicates)?;

    match function {
        AggregateFunction::Count => Ok(Value::Int64(rows.len() as i64)),
        AggregateFunction::Sum => match table.column(column_index) {
            Some(Column::Int64(values)) => {
                let sum = rows
                    .iter()
                    .fold(0i64, |acc, &row| acc.wrapping_add(values[row]));
                Ok(Value::Int64(sum))
            }
            Some(Column::Float64(values)) => {
                let sum = rows.iter().map(|&row| values[row]).sum();
                Ok(Value::Float64(sum))
            }
            _ => Err(Error::InvalidColumnType),
        },
    }
}
