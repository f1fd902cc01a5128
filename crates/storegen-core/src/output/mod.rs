//! # Output Layer
//!
//! Renders generated rows into SQL and persists them. Two backends:
//!
//! - `sqlite` — direct insertion into a live SQLite database, one
//!   transaction per table so a mid-table failure rolls the whole table back.
//! - `sql` — a plain `.sql` script (DDL + batched inserts) for piping into
//!   `sqlite3` or checking into a fixtures directory.
//!
//! Both backends build batched multi-row `INSERT` statements from typed rows
//! via the [`TableRow`] trait, which every row struct in `crate::model`
//! implements.

pub mod sql;
pub mod sqlite;

use chrono::{NaiveDate, NaiveDateTime};

/// Batch size for multi-row INSERT statements.
pub(crate) const INSERT_BATCH_SIZE: usize = 100;

/// A single column value rendered for SQL output.
///
/// SQLite has no native boolean or date types; booleans are stored as 0/1
/// integers and temporal values as ISO-8601 text, matching the DDL in
/// `crate::schema`.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl SqlValue {
    /// Convert to a SQL literal suitable for INSERT statements.
    pub fn to_literal(&self) -> String {
        match self {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Bool(b) => {
                if *b {
                    "1".to_string()
                } else {
                    "0".to_string()
                }
            }
            SqlValue::Int(i) => i.to_string(),
            SqlValue::Float(f) => format!("{}", f),
            SqlValue::Text(s) => format!("'{}'", s.replace('\'', "''")),
            SqlValue::Date(d) => format!("'{}'", d.format("%Y-%m-%d")),
            SqlValue::DateTime(ts) => format!("'{}'", ts.format("%Y-%m-%d %H:%M:%S")),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

impl std::fmt::Display for SqlValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Bool(b) => write!(f, "{}", b),
            SqlValue::Int(i) => write!(f, "{}", i),
            SqlValue::Float(fl) => write!(f, "{}", fl),
            SqlValue::Text(s) => write!(f, "{}", s),
            SqlValue::Date(d) => write!(f, "{}", d),
            SqlValue::DateTime(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// A typed row that knows its table name, column order, and SQL rendering.
///
/// Column order must match the table's DDL in `crate::schema`.
pub trait TableRow {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];
    fn values(&self) -> Vec<SqlValue>;
}

/// Build a batched multi-row INSERT statement for one chunk of rows.
///
/// Produces: `INSERT INTO "table" ("col1", "col2") VALUES (v1, v2), (v3, v4);`
pub fn build_batched_insert(table: &str, columns: &[&str], rows: &[Vec<SqlValue>]) -> String {
    let col_list = columns
        .iter()
        .map(|c| format!("\"{}\"", c))
        .collect::<Vec<_>>()
        .join(", ");
    let mut sql = format!("INSERT INTO \"{}\" ({}) VALUES ", table, col_list);

    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push('(');
        for (j, value) in row.iter().enumerate() {
            if j > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&value.to_literal());
        }
        sql.push(')');
    }

    sql
}

/// Truncate a SQL string for error messages.
pub(crate) fn truncate_sql(sql: &str, max_len: usize) -> String {
    if sql.len() <= max_len {
        sql.to_string()
    } else {
        format!("{}...", &sql[..max_len])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_escaping() {
        let v = SqlValue::Text("O'Brien".to_string());
        assert_eq!(v.to_literal(), "'O''Brien'");
    }

    #[test]
    fn test_bool_renders_as_integer() {
        assert_eq!(SqlValue::Bool(true).to_literal(), "1");
        assert_eq!(SqlValue::Bool(false).to_literal(), "0");
    }

    #[test]
    fn test_datetime_literal_format() {
        let ts = chrono::NaiveDate::from_ymd_opt(2025, 6, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(
            SqlValue::DateTime(ts).to_literal(),
            "'2025-06-15 09:30:00'"
        );
    }

    #[test]
    fn test_build_batched_insert() {
        let rows = vec![
            vec![SqlValue::Int(1), SqlValue::Text("Alice".to_string())],
            vec![SqlValue::Int(2), SqlValue::Text("Bob".to_string())],
        ];
        let sql = build_batched_insert("users", &["id", "name"], &rows);
        assert!(sql.starts_with("INSERT INTO \"users\" (\"id\", \"name\") VALUES "));
        assert!(sql.contains("(1, 'Alice')"));
        assert!(sql.contains("(2, 'Bob')"));
    }

    #[test]
    fn test_truncate_sql_long() {
        let sql = "A".repeat(300);
        let truncated = truncate_sql(&sql, 200);
        assert_eq!(truncated.len(), 203);
        assert!(truncated.ends_with("..."));
    }
}
