//! Shared fixtures for storegen integration tests.
//!
//! Tests pin the base date so datasets regenerate byte-identically no matter
//! when the suite runs, and use scaled-down counts to keep them fast.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use storegen_core::GeneratorConfig;

/// The pinned "now" all integration tests generate against.
pub fn fixed_base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

/// A scaled-down configuration: every table populated, runs in well under a
/// second, base date pinned for reproducibility.
pub fn small_config() -> GeneratorConfig {
    let mut config = GeneratorConfig::default();
    config.window.base_date = Some(fixed_base_date());
    config.counts.departments = 6;
    config.counts.employees = 30;
    config.counts.customers = 120;
    config.counts.suppliers = 15;
    config.counts.categories = 12;
    config.counts.products = 80;
    config.counts.orders = 250;
    config.counts.reviews = 120;
    config.counts.promotions = 8;
    config
}

/// An in-memory SQLite pool for insertion tests.
pub async fn memory_pool() -> SqlitePool {
    storegen_core::output::sqlite::connect("sqlite::memory:")
        .await
        .expect("in-memory SQLite should always open")
}
