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

//! Shared binary codec for WAL records and snapshot rows
//!
//! Values, strings and schemas use one encoding in both on-disk formats.
//! All integers are little-endian.
//!
//! Value encoding: `u8 tag | payload` with tags 1=Int64 (i64), 2=Float64
//! (f64 bit pattern), 3=String (u32 len + bytes), 4=Bool (1 byte 0/1).
//!
//! Schema encoding: `u32 col_count | { u32 name_len | name | u8 col_type }
//! x col_count`. The column-type byte is the ColumnType discriminant.

use std::sync::Arc;

use crate::core::{ColumnDef, ColumnType, Error, Result, Schema, Value};

/// On-disk value tag for Int64
pub const VALUE_TAG_INT64: u8 = 1;
/// On-disk value tag for Float64
pub const VALUE_TAG_FLOAT64: u8 = 2;
/// On-disk value tag for String
pub const VALUE_TAG_STRING: u8 = 3;
/// On-disk value tag for Bool
pub const VALUE_TAG_BOOL: u8 = 4;

// ============================================================================
// Writers
// ============================================================================

/// Append a length-prefixed string (u32 len + bytes)
pub fn put_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u32).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
}

/// Append an encoded value (tag + payload)
pub fn put_value(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Int64(v) => {
            buf.push(VALUE_TAG_INT64);
            buf.extend_from_slice(&v.to_le_bytes());
        }
        Value::Float64(v) => {
            buf.push(VALUE_TAG_FLOAT64);
            buf.extend_from_slice(&v.to_le_bytes());
        }
        Value::String(s) => {
            buf.push(VALUE_TAG_STRING);
            put_str(buf, s);
        }
        Value::Bool(b) => {
            buf.push(VALUE_TAG_BOOL);
            buf.push(u8::from(*b));
        }
    }
}

/// Append an encoded schema (column count + per-column name and type byte)
pub fn put_schema(buf: &mut Vec<u8>, schema: &Schema) {
    buf.extend_from_slice(&(schema.column_count() as u32).to_le_bytes());
    for col in schema.columns() {
        put_str(buf, &col.name);
        buf.push(col.column_type.as_u8());
    }
}

// ============================================================================
// Reader
// ============================================================================

/// Position-tracking reader over a byte slice with bounds-checked reads
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader over the given slice
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current read position
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of unread bytes
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// True when every byte has been consumed
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, n: usize, what: &str) -> Result<&'a [u8]> {
        if self.pos + n > self.data.len() {
            return Err(Error::corrupt(format!("unexpected end of data reading {}", what)));
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read a single byte
    pub fn read_u8(&mut self, what: &str) -> Result<u8> {
        Ok(self.take(1, what)?[0])
    }

    /// Read a little-endian u32
    pub fn read_u32(&mut self, what: &str) -> Result<u32> {
        Ok(u32::from_le_bytes(self.take(4, what)?.try_into().unwrap()))
    }

    /// Read a little-endian u64
    pub fn read_u64(&mut self, what: &str) -> Result<u64> {
        Ok(u64::from_le_bytes(self.take(8, what)?.try_into().unwrap()))
    }

    /// Read a little-endian i64
    pub fn read_i64(&mut self, what: &str) -> Result<i64> {
        Ok(i64::from_le_bytes(self.take(8, what)?.try_into().unwrap()))
    }

    /// Read a little-endian f64 bit pattern
    pub fn read_f64(&mut self, what: &str) -> Result<f64> {
        Ok(f64::from_le_bytes(self.take(8, what)?.try_into().unwrap()))
    }

    /// Read a length-prefixed UTF-8 string
    pub fn read_str(&mut self, what: &str) -> Result<String> {
        let len = self.read_u32(what)? as usize;
        let bytes = self.take(len, what)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::corrupt(format!("invalid UTF-8 in {}: {}", what, e)))
    }

    /// Read an encoded value (tag + payload)
    pub fn read_value(&mut self) -> Result<Value> {
        let tag = self.read_u8("value tag")?;
        match tag {
            VALUE_TAG_INT64 => Ok(Value::Int64(self.read_i64("int64 value")?)),
            VALUE_TAG_FLOAT64 => Ok(Value::Float64(self.read_f64("float64 value")?)),
            VALUE_TAG_STRING => {
                let s = self.read_str("string value")?;
                Ok(Value::String(Arc::from(s.as_str())))
            }
            VALUE_TAG_BOOL => Ok(Value::Bool(self.read_u8("bool value")? != 0)),
            other => Err(Error::InvalidValueType(other)),
        }
    }

    /// Read an encoded schema
    pub fn read_schema(&mut self) -> Result<Schema> {
        let col_count = self.read_u32("column count")? as usize;
        let mut columns = Vec::with_capacity(col_count);
        for _ in 0..col_count {
            let name = self.read_str("column name")?;
            let type_byte = self.read_u8("column type")?;
            let column_type =
                ColumnType::from_u8(type_byte).ok_or(Error::InvalidColumnType)?;
            columns.push(ColumnDef::new(name, column_type));
        }
        Ok(Schema::new(columns))
    }
}
