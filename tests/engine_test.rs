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

//! Engine Tests
//!
//! End-to-end tests of the table manager surface: create, scan, filter,
//! and aggregate.

use coleman::{
    AggregateFunction, ColumnDef, ColumnType, Config, Error, Predicate, Schema, TableManager,
    Value,
};
use tempfile::{tempdir, TempDir};

fn open_manager() -> (TempDir, TableManager) {
    let dir = tempdir().expect("Failed to create temp dir");
    let manager =
        TableManager::open(Config::with_data_dir(dir.path())).expect("Failed to open engine");
    (dir, manager)
}

fn setup_users(manager: &TableManager) {
    manager
        .create_table(
            "users",
            Schema::new(vec![
                ColumnDef::new("id", ColumnType::Int64),
                ColumnDef::new("name", ColumnType::String),
                ColumnDef::new("age", ColumnType::Int64),
                ColumnDef::new("score", ColumnType::Float64),
            ]),
        )
        .expect("Failed to create table");

    let rows: [(i64, &str, i64, f64); 3] = [
        (1, "Alice", 30, 95.5),
        (2, "Bob", 25, 87.3),
        (3, "Charlie", 35, 92.1),
    ];
    for (id, name, age, score) in rows {
        manager
            .add_record(
                "users",
                vec![
                    Value::int64(id),
                    Value::string(name),
                    Value::int64(age),
                    Value::float64(score),
                ],
            )
            .expect("Failed to insert row");
    }
}

fn user_row(id: i64, name: &str, age: i64, score: f64) -> Vec<Value> {
    vec![
        Value::int64(id),
        Value::string(name),
        Value::int64(age),
        Value::float64(score),
    ]
}

#[test]
fn test_create_and_scan() {
    let (_dir, manager) = open_manager();
    setup_users(&manager);

    let rows = manager.scan("users").unwrap();
    assert_eq!(
        rows,
        vec![
            user_row(1, "Alice", 30, 95.5),
            user_row(2, "Bob", 25, 87.3),
            user_row(3, "Charlie", 35, 92.1),
        ]
    );
}

#[test]
fn test_predicate_filter() {
    let (_dir, manager) = open_manager();
    setup_users(&manager);

    let rows = manager
        .filter("users", &[Predicate::gt("age", 25i64)])
        .unwrap();
    assert_eq!(
        rows,
        vec![
            user_row(1, "Alice", 30, 95.5),
            user_row(3, "Charlie", 35, 92.1),
        ]
    );
}

#[test]
fn test_string_equality_filter() {
    let (_dir, manager) = open_manager();
    manager
        .create_table(
            "people",
            Schema::new(vec![ColumnDef::new("name", ColumnType::String)]),
        )
        .unwrap();
    for name in ["Alice", "Bob", "Alice"] {
        manager
            .add_record("people", vec![Value::string(name)])
            .unwrap();
    }

    let rows = manager
        .filter("people", &[Predicate::eq("name", "Alice")])
        .unwrap();
    assert_eq!(rows.len(), 2);
    for row in rows {
        assert_eq!(row, vec![Value::string("Alice")]);
    }
}

#[test]
fn test_filter_with_empty_predicates_is_scan() {
    let (_dir, manager) = open_manager();
    setup_users(&manager);

    let filtered = manager.filter("users", &[]).unwrap();
    let scanned = manager.scan("users").unwrap();
    assert_eq!(filtered, scanned);
}

#[test]
fn test_count_with_predicate() {
    let (_dir, manager) = open_manager();
    manager
        .create_table(
            "scores",
            Schema::new(vec![
                ColumnDef::new("id", ColumnType::Int64),
                ColumnDef::new("score", ColumnType::Int64),
            ]),
        )
        .unwrap();
    for (id, score) in [(1i64, 50i64), (2, 75), (3, 90)] {
        manager
            .add_record("scores", vec![Value::int64(id), Value::int64(score)])
            .unwrap();
    }

    let result = manager
        .aggregate(
            "scores",
            "score",
            AggregateFunction::Count,
            &[Predicate::gt("score", 60i64)],
        )
        .unwrap();
    assert_eq!(result, Value::int64(2));
}

#[test]
fn test_sum_with_predicate() {
    let (_dir, manager) = open_manager();
    manager
        .create_table(
            "sales",
            Schema::new(vec![
                ColumnDef::new("id", ColumnType::Int64),
                ColumnDef::new("category", ColumnType::Int64),
                ColumnDef::new("amount", ColumnType::Int64),
            ]),
        )
        .unwrap();
    for (id, category, amount) in [(1i64, 1i64, 100i64), (2, 2, 200), (3, 1, 150)] {
        manager
            .add_record(
                "sales",
                vec![
                    Value::int64(id),
                    Value::int64(category),
                    Value::int64(amount),
                ],
            )
            .unwrap();
    }

    let result = manager
        .aggregate(
            "sales",
            "amount",
            AggregateFunction::Sum,
            &[Predicate::eq("category", 1i64)],
        )
        .unwrap();
    assert_eq!(result, Value::int64(250));
}

#[test]
fn test_sum_type_rejection() {
    let (_dir, manager) = open_manager();
    setup_users(&manager);

    assert_eq!(
        manager.aggregate("users", "name", AggregateFunction::Sum, &[]),
        Err(Error::InvalidColumnType)
    );
}

#[test]
fn test_aggregate_consistency_with_filter() {
    let (_dir, manager) = open_manager();
    setup_users(&manager);

    let predicates = [Predicate::gte("score", 90.0)];
    let rows = manager.filter("users", &predicates).unwrap();

    let count = manager
        .aggregate("users", "id", AggregateFunction::Count, &predicates)
        .unwrap();
    assert_eq!(count, Value::int64(rows.len() as i64));

    let sum = manager
        .aggregate("users", "age", AggregateFunction::Sum, &predicates)
        .unwrap();
    let expected: i64 = rows.iter().map(|r| r[2].as_int64().unwrap()).sum();
    assert_eq!(sum, Value::int64(expected));

    let float_sum = manager
        .aggregate("users", "score", AggregateFunction::Sum, &predicates)
        .unwrap();
    let expected: f64 = rows.iter().map(|r| r[3].as_float64().unwrap()).sum();
    assert_eq!(float_sum, Value::float64(expected));
}

#[test]
fn test_filter_unknown_column() {
    let (_dir, manager) = open_manager();
    setup_users(&manager);

    assert_eq!(
        manager.filter("users", &[Predicate::eq("salary", 1i64)]),
        Err(Error::ColumnNotFound("salary".to_string()))
    );
    assert_eq!(
        manager.aggregate("users", "salary", AggregateFunction::Count, &[]),
        Err(Error::ColumnNotFound("salary".to_string()))
    );
}

#[test]
fn test_rejected_record_leaves_no_trace_in_reads() {
    let (_dir, manager) = open_manager();
    setup_users(&manager);

    let err = manager
        .add_record("users", vec![Value::int64(4), Value::string("Dave")])
        .unwrap_err();
    assert_eq!(err, Error::column_count_mismatch(4, 2));

    manager
        .add_record("users", user_row(4, "Dave", 40, 1.0))
        .unwrap();

    // A type mismatch mid-row must not grow any column.
    let err = manager
        .add_record(
            "users",
            vec![
                Value::int64(5),
                Value::string("Eve"),
                Value::float64(28.0), // wrong tag
                Value::float64(50.0),
            ],
        )
        .unwrap_err();
    assert_eq!(
        err,
        Error::type_mismatch("age", ColumnType::Int64, ColumnType::Float64)
    );

    let rows = manager.scan("users").unwrap();
    assert_eq!(rows.len(), 4);
    for row in rows {
        assert_eq!(row.len(), 4);
    }
}

#[test]
fn test_schema_is_preserved() {
    let (_dir, manager) = open_manager();
    setup_users(&manager);

    let schema = manager.table_schema("users").unwrap();
    assert_eq!(schema.column_count(), 4);
    assert_eq!(schema.find("score"), Some(3));
    assert_eq!(
        schema.to_string(),
        "id:int64, name:string, age:int64, score:float64"
    );
}
