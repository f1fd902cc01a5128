//! End-to-end tests: generate a dataset, insert it into SQLite, and verify
//! the persisted rows with SQL — the same queries a downstream analyst would
//! run against the database.

use sqlx::Row;
use storegen_core::generate::generate_dataset;
use storegen_core::output::sqlite::insert_dataset;
use storegen_testutil::{memory_pool, small_config};

async fn count(pool: &sqlx::SqlitePool, sql: &str) -> i64 {
    sqlx::query_scalar(sql).fetch_one(pool).await.unwrap()
}

#[tokio::test]
async fn inserted_counts_match_dataset() {
    let config = small_config();
    let dataset = generate_dataset(&config, None).unwrap();
    let pool = memory_pool().await;
    insert_dataset(&dataset, &pool, None).await.unwrap();

    for (table, rows) in dataset.row_counts() {
        let persisted = count(&pool, &format!("SELECT COUNT(*) FROM \"{}\"", table)).await;
        assert_eq!(persisted, rows as i64, "table {}", table);
    }
}

#[tokio::test]
async fn no_orphan_rows_after_insert() {
    let config = small_config();
    let dataset = generate_dataset(&config, None).unwrap();
    let pool = memory_pool().await;
    insert_dataset(&dataset, &pool, None).await.unwrap();

    let orphan_queries = [
        "SELECT COUNT(*) FROM orders o LEFT JOIN customers c ON o.customer_id = c.customer_id WHERE c.customer_id IS NULL",
        "SELECT COUNT(*) FROM order_items i LEFT JOIN orders o ON i.order_id = o.order_id WHERE o.order_id IS NULL",
        "SELECT COUNT(*) FROM order_items i LEFT JOIN products p ON i.product_id = p.product_id WHERE p.product_id IS NULL",
        "SELECT COUNT(*) FROM payments p LEFT JOIN orders o ON p.order_id = o.order_id WHERE o.order_id IS NULL",
        "SELECT COUNT(*) FROM shipping s LEFT JOIN orders o ON s.order_id = o.order_id WHERE o.order_id IS NULL",
        "SELECT COUNT(*) FROM product_reviews r LEFT JOIN products p ON r.product_id = p.product_id WHERE p.product_id IS NULL",
        "SELECT COUNT(*) FROM returns r LEFT JOIN orders o ON r.order_id = o.order_id WHERE o.order_id IS NULL",
        "SELECT COUNT(*) FROM employees e LEFT JOIN departments d ON e.department_id = d.department_id WHERE d.department_id IS NULL",
    ];
    for sql in orphan_queries {
        assert_eq!(count(&pool, sql).await, 0, "orphans found: {}", sql);
    }
}

#[tokio::test]
async fn analytics_queries_return_sensible_shapes() {
    let config = small_config();
    let dataset = generate_dataset(&config, None).unwrap();
    let pool = memory_pool().await;
    insert_dataset(&dataset, &pool, None).await.unwrap();

    // Low-stock report has rows to show
    let low_stock = count(
        &pool,
        "SELECT COUNT(*) FROM inventory WHERE quantity_on_hand <= reorder_level",
    )
    .await;
    assert!(low_stock > 0);

    // Deliveries never precede shipment, and some arrive late
    let inverted = count(
        &pool,
        "SELECT COUNT(*) FROM shipping WHERE actual_delivery IS NOT NULL AND actual_delivery < shipping_date",
    )
    .await;
    assert_eq!(inverted, 0);
    let late = count(
        &pool,
        "SELECT COUNT(*) FROM shipping WHERE actual_delivery > estimated_delivery",
    )
    .await;
    assert!(late > 0);

    // Completed payments settle charged orders exactly
    let unsettled: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM orders o
         WHERE o.order_status IN ('Processing', 'Shipped', 'Delivered')
           AND ROUND(o.total_amount - (
             SELECT COALESCE(SUM(p.amount), 0) FROM payments p
             WHERE p.order_id = o.order_id AND p.payment_status = 'Completed'
           ), 2) != 0",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(unsettled, 0);

    // Every order has at least one line item
    let empty_orders = count(
        &pool,
        "SELECT COUNT(*) FROM orders o WHERE NOT EXISTS (
           SELECT 1 FROM order_items i WHERE i.order_id = o.order_id)",
    )
    .await;
    assert_eq!(empty_orders, 0);
}

#[tokio::test]
async fn unique_constraints_hold_in_db() {
    let config = small_config();
    let dataset = generate_dataset(&config, None).unwrap();
    let pool = memory_pool().await;
    insert_dataset(&dataset, &pool, None).await.unwrap();

    for (table, column) in [
        ("customers", "email"),
        ("employees", "email"),
        ("products", "sku"),
        ("payments", "transaction_id"),
        ("promotions", "promotion_code"),
    ] {
        let total = count(&pool, &format!("SELECT COUNT({}) FROM {}", column, table)).await;
        let distinct =
            count(&pool, &format!("SELECT COUNT(DISTINCT {}) FROM {}", column, table)).await;
        assert_eq!(total, distinct, "{}.{}", table, column);
    }
}

#[tokio::test]
async fn regeneration_with_same_seed_is_identical() {
    let config = small_config();
    let a = generate_dataset(&config, None).unwrap();
    let b = generate_dataset(&config, None).unwrap();
    assert_eq!(a.fingerprint(), b.fingerprint());

    let pool = memory_pool().await;
    insert_dataset(&a, &pool, None).await.unwrap();
    // Re-inserting drops and recreates the schema cleanly
    insert_dataset(&b, &pool, None).await.unwrap();
    let customers = count(&pool, "SELECT COUNT(*) FROM customers").await;
    assert_eq!(customers, b.customers.len() as i64);
}

#[tokio::test]
async fn progress_callback_reaches_total() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let config = small_config();
    let dataset = generate_dataset(&config, None).unwrap();
    let pool = memory_pool().await;

    let seen = AtomicUsize::new(0);
    let cb = |_table: &str, done: usize, total: usize| {
        assert!(done <= total);
        seen.store(done, Ordering::SeqCst);
    };
    insert_dataset(&dataset, &pool, Some(&cb)).await.unwrap();
    assert_eq!(seen.load(Ordering::SeqCst), dataset.total_rows());
}

#[test]
fn default_counts_scenario_holds_shape() {
    use std::collections::HashSet;

    // Full-size run: seed 42, stock counts, pinned date
    let mut config = storegen_core::GeneratorConfig::default();
    config.window.base_date = Some(storegen_testutil::fixed_base_date());
    let dataset = generate_dataset(&config, None).unwrap();

    assert_eq!(dataset.departments.len(), 8);
    assert_eq!(dataset.customers.len(), 2000);
    assert_eq!(dataset.products.len(), 500);
    assert_eq!(dataset.orders.len(), 3000);

    let emails: HashSet<_> = dataset.customers.iter().map(|c| &c.email).collect();
    assert_eq!(emails.len(), 2000);
    let skus: HashSet<_> = dataset.products.iter().map(|p| &p.sku).collect();
    assert_eq!(skus.len(), 500);

    let order_ids: HashSet<_> = dataset.orders.iter().map(|o| o.order_id).collect();
    let product_ids: HashSet<_> = dataset.products.iter().map(|p| p.product_id).collect();
    for item in &dataset.order_items {
        assert!(order_ids.contains(&item.order_id));
        assert!(product_ids.contains(&item.product_id));
    }
}

#[test]
fn small_name_pool_without_duplicates_is_an_error() {
    let mut config = small_config();
    config.counts.departments = 8;
    config.reference.department_names = vec![
        "Sales".to_string(),
        "Marketing".to_string(),
        "IT".to_string(),
        "Finance".to_string(),
        "Operations".to_string(),
    ];
    config.reference.allow_duplicate_names = false;
    let err = generate_dataset(&config, None).unwrap_err();
    assert!(matches!(err, storegen_core::StoregenError::Config { .. }));
}

#[tokio::test]
async fn check_constraints_enforced_by_schema() {
    let pool = memory_pool().await;
    let config = small_config();
    let dataset = generate_dataset(&config, None).unwrap();
    insert_dataset(&dataset, &pool, None).await.unwrap();

    // Ratings outside 1..5 are rejected by the DDL, not just the generator
    let result = sqlx::query(
        "INSERT INTO product_reviews
         (review_id, product_id, customer_id, rating, review_title, review_text,
          is_verified_purchase, review_date, helpful_count)
         VALUES (999999, 1, 1, 9, 't', 't', 0, '2025-01-01 00:00:00', 0)",
    )
    .execute(&pool)
    .await;
    assert!(result.is_err());

    let row = sqlx::query("SELECT MIN(rating) AS lo, MAX(rating) AS hi FROM product_reviews")
        .fetch_one(&pool)
        .await
        .unwrap();
    let lo: i64 = row.get("lo");
    let hi: i64 = row.get("hi");
    assert!(lo >= 1 && hi <= 5);
}
