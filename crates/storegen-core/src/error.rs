//! # Error Types
//!
//! Defines `StoregenError`, the unified error enum for every failure mode in
//! the storegen pipeline. Every variant includes enough context (table name,
//! column name, row index, SQL snippet) to debug immediately without digging
//! through logs.

use thiserror::Error;

/// All errors that can occur in storegen operations.
#[derive(Error, Debug)]
pub enum StoregenError {
    #[error("Database connection failed: {message}\n  Connection string: {connection_hint}\n  Cause: {source}")]
    Connection {
        message: String,
        connection_hint: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("No database URL provided. storegen looks for a connection in this order:\n  1. --db flag\n  2. DATABASE_URL environment variable\n  3. .env file with DATABASE_URL\n  4. storegen.toml [database] section\n\nExample: storegen generate --db sqlite://ecommerce.db")]
    NoDatabaseUrl,

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to generate unique value for {table}.{column} at row {row_index}: {max_retries} retries exhausted\n  Consider reducing the requested row count or widening the value pool")]
    UniqueExhausted {
        table: String,
        column: String,
        row_index: usize,
        max_retries: usize,
    },

    #[error("Referential integrity violated: {table}.{column} needs a row from {target}, but none were generated\n  This indicates broken stage ordering and is a bug in storegen, not a configuration mistake")]
    ReferentialIntegrity {
        table: String,
        column: String,
        target: String,
    },

    #[error("Insert failed on {table} row {row_index}: {message}\n  SQL: {sql_preview}\n  DB error: {source}")]
    InsertFailed {
        table: String,
        row_index: usize,
        message: String,
        sql_preview: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Output error: {message}: {source}")]
    Output {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, StoregenError>;
