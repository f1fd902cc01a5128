//! Direct insertion into a live SQLite database via sqlx.
//!
//! Drops and recreates the schema (this tool owns its database), inserts each
//! table inside its own transaction with batched multi-row statements, then
//! creates indexes last so inserts aren't slowed by index maintenance.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::dataset::Dataset;
use crate::error::{Result, StoregenError};
use crate::schema;

use super::{build_batched_insert, truncate_sql, INSERT_BATCH_SIZE};

/// Progress callback: `(table_name, rows_inserted_so_far, total_rows)`.
pub type ProgressCallback<'a> = Option<&'a (dyn Fn(&str, usize, usize) + Send + Sync)>;

/// Open a pool against the given URL, creating the database file if needed.
pub async fn connect(db_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(db_url)
        .map_err(|e| StoregenError::Connection {
            message: "Invalid SQLite connection string".to_string(),
            connection_hint: db_url.to_string(),
            source: e,
        })?
        .create_if_missing(true);

    // A single held connection: inserts are sequential, and in-memory
    // databases live exactly as long as their connection.
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .connect_with(options)
        .await
        .map_err(|e| StoregenError::Connection {
            message: "Could not open SQLite database".to_string(),
            connection_hint: db_url.to_string(),
            source: e,
        })
}

/// Drop and recreate all tables, then insert the full dataset.
pub async fn insert_dataset(
    dataset: &Dataset,
    pool: &SqlitePool,
    progress: ProgressCallback<'_>,
) -> Result<()> {
    recreate_schema(pool).await?;

    let total = dataset.total_rows();
    let mut inserted = 0;

    for table in dataset.rendered_tables() {
        let mut txn = pool.begin().await.map_err(|e| StoregenError::InsertFailed {
            table: table.name.to_string(),
            row_index: 0,
            message: "Could not begin transaction".to_string(),
            sql_preview: "BEGIN".to_string(),
            source: e,
        })?;

        for (chunk_index, chunk) in table.rows.chunks(INSERT_BATCH_SIZE).enumerate() {
            let sql = build_batched_insert(table.name, table.columns, chunk);
            sqlx::query(&sql)
                .execute(&mut *txn)
                .await
                .map_err(|e| StoregenError::InsertFailed {
                    table: table.name.to_string(),
                    row_index: chunk_index * INSERT_BATCH_SIZE,
                    message: format!("Batch of {} rows rejected", chunk.len()),
                    sql_preview: truncate_sql(&sql, 200),
                    source: e,
                })?;

            inserted += chunk.len();
            if let Some(cb) = progress {
                cb(table.name, inserted, total);
            }
        }

        txn.commit().await.map_err(|e| StoregenError::InsertFailed {
            table: table.name.to_string(),
            row_index: table.rows.len(),
            message: "Could not commit transaction".to_string(),
            sql_preview: "COMMIT".to_string(),
            source: e,
        })?;

        tracing::debug!(table = table.name, rows = table.rows.len(), "table inserted");
    }

    create_indexes(pool).await?;
    tracing::info!(total_rows = total, "dataset persisted");
    Ok(())
}

/// Drop existing tables (children first) and run the DDL.
async fn recreate_schema(pool: &SqlitePool) -> Result<()> {
    for statement in schema::drop_statements() {
        run_ddl(pool, &statement).await?;
    }
    for table in schema::TABLES {
        run_ddl(pool, table.ddl).await?;
    }
    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<()> {
    for index in schema::INDEXES {
        run_ddl(pool, index).await?;
    }
    Ok(())
}

async fn run_ddl(pool: &SqlitePool, sql: &str) -> Result<()> {
    sqlx::query(sql)
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(|e| StoregenError::InsertFailed {
            table: "(schema)".to_string(),
            row_index: 0,
            message: "DDL statement failed".to_string(),
            sql_preview: truncate_sql(sql, 200),
            source: e,
        })
}
