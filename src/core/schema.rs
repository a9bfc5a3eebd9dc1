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

//! Schema types for Coleman - column definitions and table schemas

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;

use super::error::{Error, Result};
use super::types::ColumnType;

/// A column definition in a table schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column name
    pub name: String,

    /// Data type of the column
    pub column_type: ColumnType,
}

impl ColumnDef {
    /// Create a new column definition
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

impl fmt::Display for ColumnDef {
    /// Render as `name:type`, backslash-escaping the delimiter characters
    /// (`:`, `,`, `\`) so free-form names survive the text form
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in self.name.chars() {
            if matches!(ch, ':' | ',' | '\\') {
                write!(f, "\\")?;
            }
            write!(f, "{}", ch)?;
        }
        write!(f, ":{}", self.column_type)
    }
}

/// Table schema: an ordered list of named, typed columns
///
/// Immutable once attached to a table. Column name uniqueness is not
/// enforced; lookups resolve to the first match.
#[derive(Debug, Clone)]
pub struct Schema {
    /// Column definitions, in declaration order
    columns: Vec<ColumnDef>,

    /// name -> index lookup (first occurrence wins)
    index_by_name: FxHashMap<String, usize>,
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        // Structural equality over the ordered column list; the lookup map
        // is derived state.
        self.columns == other.columns
    }
}

impl Eq for Schema {}

impl Schema {
    /// Create a new schema from column definitions
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        let mut index_by_name = FxHashMap::default();
        for (i, col) in columns.iter().enumerate() {
            index_by_name.entry(col.name.clone()).or_insert(i);
        }
        Self {
            columns,
            index_by_name,
        }
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Check if the schema has any columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Find the index of a column by name (first match wins)
    pub fn find(&self, name: &str) -> Option<usize> {
        self.index_by_name.get(name).copied()
    }

    /// Get a column definition by index
    pub fn column(&self, index: usize) -> Option<&ColumnDef> {
        self.columns.get(index)
    }

    /// Get the data type of the column at the given index
    pub fn column_type(&self, index: usize) -> Result<ColumnType> {
        self.columns
            .get(index)
            .map(|col| col.column_type)
            .ok_or(Error::ColumnIndexOutOfBounds { index })
    }

    /// Iterate over the column definitions in declaration order
    pub fn columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter()
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", col)?;
        }
        Ok(())
    }
}

impl FromStr for Schema {
    type Err = Error;

    /// Parse the textual schema form: `"id:int64, name:string"`
    ///
    /// The inverse of `Display`: a backslash escapes the next character,
    /// the first unescaped `:` in a segment separates name from type, and
    /// unescaped `,` separates columns (one following space is the
    /// separator, not part of the next name).
    fn from_str(s: &str) -> Result<Self> {
        let mut columns = Vec::new();
        let mut name = String::new();
        let mut type_token = String::new();
        let mut in_type = false;
        let mut escaped = false;
        let mut skip_space = false;

        let mut finish = |name: &mut String, type_token: &mut String| -> Result<()> {
            let column_type = type_token.trim().parse::<ColumnType>()?;
            columns.push(ColumnDef::new(std::mem::take(name), column_type));
            type_token.clear();
            Ok(())
        };

        for ch in s.chars() {
            if skip_space {
                skip_space = false;
                if ch == ' ' {
                    continue;
                }
            }
            if escaped {
                escaped = false;
                if in_type {
                    type_token.push(ch);
                } else {
                    name.push(ch);
                }
                continue;
            }
            match ch {
                '\\' => escaped = true,
                ':' if !in_type => in_type = true,
                ',' => {
                    if !in_type {
                        return Err(Error::corrupt(format!(
                            "malformed column definition: '{}'",
                            name
                        )));
                    }
                    finish(&mut name, &mut type_token)?;
                    in_type = false;
                    skip_space = true;
                }
                _ => {
                    if in_type {
                        type_token.push(ch);
                    } else {
                        name.push(ch);
                    }
                }
            }
        }

        if escaped {
            return Err(Error::corrupt("dangling escape in schema"));
        }
        if in_type {
            finish(&mut name, &mut type_token)?;
        } else if !name.is_empty() {
            return Err(Error::corrupt(format!(
                "malformed column definition: '{}'",
                name
            )));
        }

        Ok(Schema::new(columns))
    }
}
