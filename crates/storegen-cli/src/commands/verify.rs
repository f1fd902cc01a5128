use anyhow::{bail, Context, Result};
use serde::Serialize;

use storegen_core::output::sqlite::connect;
use storegen_core::StoregenError;

use crate::args::VerifyArgs;

/// Each check is a COUNT(*) query where any nonzero result is a violation.
const CHECKS: &[(&str, &str)] = &[
    (
        "orders reference existing customers",
        "SELECT COUNT(*) FROM orders o LEFT JOIN customers c ON o.customer_id = c.customer_id WHERE c.customer_id IS NULL",
    ),
    (
        "order items reference existing orders",
        "SELECT COUNT(*) FROM order_items i LEFT JOIN orders o ON i.order_id = o.order_id WHERE o.order_id IS NULL",
    ),
    (
        "order items reference existing products",
        "SELECT COUNT(*) FROM order_items i LEFT JOIN products p ON i.product_id = p.product_id WHERE p.product_id IS NULL",
    ),
    (
        "payments reference existing orders",
        "SELECT COUNT(*) FROM payments p LEFT JOIN orders o ON p.order_id = o.order_id WHERE o.order_id IS NULL",
    ),
    (
        "every order has at least one item",
        "SELECT COUNT(*) FROM orders o WHERE NOT EXISTS (SELECT 1 FROM order_items i WHERE i.order_id = o.order_id)",
    ),
    (
        "customer emails are unique",
        "SELECT COUNT(*) - COUNT(DISTINCT email) FROM customers",
    ),
    (
        "product SKUs are unique",
        "SELECT COUNT(*) - COUNT(DISTINCT sku) FROM products",
    ),
    (
        "line subtotals match quantity x price x discount",
        "SELECT COUNT(*) FROM order_items WHERE ROUND(subtotal - ROUND(quantity * unit_price * (1 - discount), 2), 2) != 0",
    ),
    (
        "completed payments settle charged orders exactly",
        "SELECT COUNT(*) FROM orders o
         WHERE o.order_status IN ('Processing', 'Shipped', 'Delivered')
           AND ROUND(o.total_amount - (
             SELECT COALESCE(SUM(p.amount), 0) FROM payments p
             WHERE p.order_id = o.order_id AND p.payment_status = 'Completed'
           ), 2) != 0",
    ),
    (
        "every order has at least one payment row",
        "SELECT COUNT(*) FROM orders o WHERE NOT EXISTS (SELECT 1 FROM payments p WHERE p.order_id = o.order_id)",
    ),
    (
        "cancelled orders carry no completed payment",
        "SELECT COUNT(*) FROM orders o JOIN payments p ON p.order_id = o.order_id
         WHERE o.order_status = 'Cancelled' AND p.payment_status = 'Completed'",
    ),
    (
        "orders never predate customer registration",
        "SELECT COUNT(*) FROM orders o JOIN customers c ON o.customer_id = c.customer_id WHERE o.order_date < c.registration_date",
    ),
    (
        "deliveries never precede shipment",
        "SELECT COUNT(*) FROM shipping WHERE actual_delivery IS NOT NULL AND actual_delivery < shipping_date",
    ),
    (
        "shipping rows only exist for shipped orders",
        "SELECT COUNT(*) FROM shipping s JOIN orders o ON s.order_id = o.order_id
         WHERE o.order_status NOT IN ('Shipped', 'Delivered')",
    ),
    (
        "returns never precede delivery",
        "SELECT COUNT(*) FROM returns r JOIN shipping s ON r.order_id = s.order_id
         WHERE s.actual_delivery IS NOT NULL AND r.return_date <= s.actual_delivery",
    ),
    (
        "promotion usage stays within limits",
        "SELECT COUNT(*) FROM promotions WHERE times_used > usage_limit",
    ),
];

#[derive(Debug, Serialize)]
struct CheckResult {
    name: String,
    violations: i64,
}

#[derive(Debug, Serialize)]
struct VerifyReport {
    database: String,
    checks: Vec<CheckResult>,
    total_violations: i64,
}

pub async fn run(args: &VerifyArgs) -> Result<()> {
    let db_url = args
        .db
        .clone()
        .ok_or(StoregenError::NoDatabaseUrl)?;
    let pool = connect(&db_url).await?;

    let mut checks = Vec::with_capacity(CHECKS.len());
    let mut total_violations = 0;
    for (name, sql) in CHECKS {
        let violations: i64 = sqlx::query_scalar(sql)
            .fetch_one(&pool)
            .await
            .with_context(|| format!("Check query failed: {}", name))?;
        total_violations += violations;
        checks.push(CheckResult {
            name: name.to_string(),
            violations,
        });
    }

    let report = VerifyReport {
        database: db_url,
        checks,
        total_violations,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Verifying {}\n", report.database);
        for check in &report.checks {
            let marker = if check.violations == 0 { "✓" } else { "✗" };
            println!("  {} {} ({} violations)", marker, check.name, check.violations);
        }
        println!();
    }

    if total_violations > 0 {
        bail!(
            "{} integrity violation(s) found across {} checks",
            total_violations,
            report.checks.len()
        );
    }
    if !args.json {
        println!("All {} checks passed", report.checks.len());
    }
    Ok(())
}
