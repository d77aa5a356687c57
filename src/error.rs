use crate::SqlType;
use thiserror::Error;

/// Failures detected while deriving a table or condition schema from an
/// entity description. Fatal to that build, never retried.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("column type {ty:?} of {table}.{column} is not supported by the {dialect} dialect")]
    UnsupportedColumnType {
        table: String,
        column: String,
        ty: SqlType,
        dialect: &'static str,
    },
    #[error("table {table} does not have a primary key; mark a field as key or name it \"Id\"")]
    InvalidPrimaryKey { table: String },
    #[error("table {table} cannot generate a primary key; it requires a single Int32 or Int64 key column")]
    CannotGeneratePrimaryKey { table: String },
    #[error("ambiguous condition field '{field}' on table {table}")]
    AmbiguousConditionField { field: String, table: String },
    #[error("table {table} does not have a column matching condition field '{field}'")]
    UnknownConditionField { field: String, table: String },
}

/// Invalid caller arguments, detected before any SQL text is emitted.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ArgumentError {
    pub message: String,
}

impl ArgumentError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Wrong number of rows while consuming a result.
#[derive(Debug, Error)]
pub enum CardinalityError {
    #[error("the result was empty but exactly one row was expected")]
    NoRows,
    #[error("the result contained more than one row but at most one was expected")]
    TooManyRows,
}

/// Misuse of the sequential reader. Programming errors, fatal, never retried.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("the reader has been disposed; this can happen after all results have been consumed")]
    ReaderDisposed,
    #[error("query results must be consumed in order, and each result can only be consumed once")]
    OutOfOrderConsumption,
}

/// Post-write verification failure: the statement ran but touched the wrong
/// number of rows.
#[derive(Debug, Error)]
#[error("expected {expected} rows to be affected, but was actually {actual}")]
pub struct AffectedRowCountError {
    pub expected: u64,
    pub actual: u64,
}
