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

//! Error types for Coleman
//!
//! This module defines all error types used throughout the storage engine.

use thiserror::Error;

use super::types::ColumnType;

/// Result type alias for Coleman operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Coleman storage operations
///
/// This enum covers all error cases including both sentinel errors
/// and structured errors with context.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // =========================================================================
    // Table errors
    // =========================================================================
    /// Table not found in the engine
    #[error("table '{0}' not found")]
    TableNotFound(String),

    /// Table already exists when trying to create
    #[error("table '{0}' already exists")]
    TableAlreadyExists(String),

    /// Record value count does not match the table's column count
    #[error("column count mismatch, expected {expected}, got {got}")]
    ColumnCountMismatch { expected: usize, got: usize },

    // =========================================================================
    // Column errors
    // =========================================================================
    /// Column not found in table schema
    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    /// Column index out of bounds
    #[error("column index {index} out of bounds")]
    ColumnIndexOutOfBounds { index: usize },

    /// Invalid column type for operation (e.g. SUM over a string column)
    #[error("invalid column type")]
    InvalidColumnType,

    // =========================================================================
    // Value errors
    // =========================================================================
    /// Value tag does not match the column's declared type
    #[error("type mismatch for column '{column}', expected {expected}, got {got}")]
    TypeMismatch {
        column: String,
        expected: ColumnType,
        got: ColumnType,
    },

    /// Predicate is malformed (e.g. missing its comparison value)
    #[error("invalid predicate: {0}")]
    InvalidPredicate(String),

    // =========================================================================
    // WAL errors
    // =========================================================================
    /// WAL file does not start with the expected magic bytes
    #[error("invalid WAL magic")]
    InvalidWalMagic,

    /// WAL file version is not supported
    #[error("invalid WAL version {version}")]
    InvalidWalVersion { version: u32 },

    /// WAL record failed its CRC32 check during replay
    #[error("WAL corruption at sequence {seq}: checksum mismatch")]
    WalCorruption { seq: u64 },

    /// Unknown WAL entry tag byte
    #[error("invalid WAL entry type {0:#04x}")]
    InvalidEntryType(u8),

    /// Unknown value tag byte in a WAL record or snapshot row
    #[error("invalid value type {0:#04x}")]
    InvalidValueType(u8),

    // =========================================================================
    // Snapshot errors
    // =========================================================================
    /// Snapshot file does not start with the expected magic bytes
    #[error("invalid snapshot magic")]
    InvalidSnapshotMagic,

    /// Snapshot file version is not supported
    #[error("invalid snapshot version {version}")]
    InvalidSnapshotVersion { version: u32 },

    // =========================================================================
    // Other errors
    // =========================================================================
    /// Truncated or otherwise undecodable on-disk data
    #[error("corrupt data: {0}")]
    Corrupt(String),

    /// IO error (wrapped)
    #[error("IO error: {message}")]
    Io { message: String },
}

impl Error {
    /// Create a new ColumnCountMismatch error
    pub fn column_count_mismatch(expected: usize, got: usize) -> Self {
        Error::ColumnCountMismatch { expected, got }
    }

    /// Create a new TypeMismatch error
    pub fn type_mismatch(
        column: impl Into<String>,
        expected: ColumnType,
        got: ColumnType,
    ) -> Self {
        Error::TypeMismatch {
            column: column.into(),
            expected,
            got,
        }
    }

    /// Create a new InvalidPredicate error
    pub fn invalid_predicate(message: impl Into<String>) -> Self {
        Error::InvalidPredicate(message.into())
    }

    /// Create a new Corrupt error
    pub fn corrupt(message: impl Into<String>) -> Self {
        Error::Corrupt(message.into())
    }

    /// Create a new IO error
    pub fn io(message: impl Into<String>) -> Self {
        Error::Io {
            message: message.into(),
        }
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::TableNotFound(_) | Error::ColumnNotFound(_))
    }

    /// Check if this is a record validation error
    ///
    /// Validation errors can surface after the mutation was already logged
    /// to the WAL; replay reproduces the same rejection.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::ColumnCountMismatch { .. } | Error::TypeMismatch { .. }
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::TableNotFound("users".to_string()).to_string(),
            "table 'users' not found"
        );
        assert_eq!(
            Error::TableAlreadyExists("users".to_string()).to_string(),
            "table 'users' already exists"
        );
        assert_eq!(
            Error::ColumnNotFound("email".to_string()).to_string(),
            "column 'email' not found"
        );
        assert_eq!(Error::InvalidColumnType.to_string(), "invalid column type");
        assert_eq!(Error::InvalidWalMagic.to_string(), "invalid WAL magic");
        assert_eq!(
            Error::WalCorruption { seq: 7 }.to_string(),
            "WAL corruption at sequence 7: checksum mismatch"
        );
    }

    #[test]
    fn test_structured_error_display() {
        let err = Error::column_count_mismatch(4, 3);
        assert_eq!(err.to_string(), "column count mismatch, expected 4, got 3");

        let err = Error::type_mismatch("age", ColumnType::Int64, ColumnType::String);
        assert_eq!(
            err.to_string(),
            "type mismatch for column 'age', expected int64, got string"
        );

        let err = Error::InvalidEntryType(0x7f);
        assert_eq!(err.to_string(), "invalid WAL entry type 0x7f");
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::TableNotFound("t".to_string()).is_not_found());
        assert!(Error::ColumnNotFound("c".to_string()).is_not_found());
        assert!(!Error::InvalidColumnType.is_not_found());

        assert!(Error::column_count_mismatch(2, 1).is_validation());
        assert!(Error::type_mismatch("c", ColumnType::Bool, ColumnType::Float64).is_validation());
        assert!(!Error::TableNotFound("t".to_string()).is_validation());
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(
            Error::TableNotFound("t".to_string()),
            Error::TableNotFound("t".to_string())
        );
        assert_ne!(
            Error::TableNotFound("t".to_string()),
            Error::TableAlreadyExists("t".to_string())
        );
        assert_ne!(
            Error::column_count_mismatch(2, 1),
            Error::column_count_mismatch(2, 3)
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().contains("file not found"));
    }
}
