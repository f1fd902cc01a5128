//! Render a dataset as a standalone SQL script.
//!
//! The script is self-contained: schema DDL, per-table transactions with
//! batched inserts, then indexes. Piping it through `sqlite3 store.db`
//! reproduces exactly what the direct sqlite backend writes.

use std::io;

use crate::dataset::Dataset;
use crate::error::{Result, StoregenError};
use crate::schema;

use super::{build_batched_insert, INSERT_BATCH_SIZE};

/// Render the complete script to a string. Infallible — all the data is
/// already in memory.
pub fn render_script(dataset: &Dataset) -> String {
    let mut out = String::new();
    out.push_str("-- storegen dataset\n");
    out.push_str("PRAGMA foreign_keys = ON;\n\n");
    for drop in schema::drop_statements() {
        out.push_str(&drop);
        out.push_str(";\n");
    }
    out.push('\n');
    for table in &schema::TABLES {
        out.push_str(table.ddl);
        out.push_str(";\n\n");
    }

    for table in dataset.rendered_tables() {
        if table.rows.is_empty() {
            continue;
        }
        out.push_str(&format!("-- {} ({} rows)\n", table.name, table.rows.len()));
        out.push_str("BEGIN;\n");
        for chunk in table.rows.chunks(INSERT_BATCH_SIZE) {
            out.push_str(&build_batched_insert(table.name, table.columns, chunk));
            out.push_str(";\n");
        }
        out.push_str("COMMIT;\n\n");
    }

    for index in schema::INDEXES {
        out.push_str(index);
        out.push_str(";\n");
    }

    out
}

/// Render and write the script to any writer (file, stdout).
pub fn write_script<W: io::Write>(dataset: &Dataset, writer: &mut W) -> Result<()> {
    writer
        .write_all(render_script(dataset).as_bytes())
        .map_err(|e| StoregenError::Output {
            message: "Failed to write SQL script".to_string(),
            source: e,
        })
}
