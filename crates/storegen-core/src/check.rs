//! # Dataset Audit
//!
//! Verifies the structural and semantic invariants of a generated dataset
//! before (or instead of) touching a database: referential integrity,
//! uniqueness, temporal ordering, and money arithmetic. Violations here mean
//! a generator bug, so the report is built to pinpoint rather than summarize
//! — each finding names the check, the offending row, and the observed
//! values, capped at a handful of examples per check.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::config::GeneratorConfig;
use crate::dataset::Dataset;
use crate::model::{round2, OrderStatus, PaymentStatus};

/// Max example violations reported per check; the count is still exact.
const MAX_EXAMPLES: usize = 10;

#[derive(Debug, Serialize)]
pub struct Violation {
    pub check: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AuditReport {
    pub checks_run: usize,
    pub violation_count: usize,
    pub violations: Vec<Violation>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.violation_count == 0
    }

    pub fn summary(&self) -> String {
        if self.is_clean() {
            format!("All {} checks passed", self.checks_run)
        } else {
            format!(
                "{} of {} checks found {} violation(s)",
                self.violations
                    .iter()
                    .map(|v| v.check.as_str())
                    .collect::<HashSet<_>>()
                    .len(),
                self.checks_run,
                self.violation_count
            )
        }
    }
}

struct Auditor {
    checks_run: usize,
    violation_count: usize,
    violations: Vec<Violation>,
    current_examples: usize,
}

impl Auditor {
    fn new() -> Self {
        Self {
            checks_run: 0,
            violation_count: 0,
            violations: Vec::new(),
            current_examples: 0,
        }
    }

    fn begin(&mut self) {
        self.checks_run += 1;
        self.current_examples = 0;
    }

    fn flag(&mut self, check: &str, message: String) {
        self.violation_count += 1;
        if self.current_examples < MAX_EXAMPLES {
            self.current_examples += 1;
            self.violations.push(Violation {
                check: check.to_string(),
                message,
            });
        }
    }

    fn finish(self) -> AuditReport {
        AuditReport {
            checks_run: self.checks_run,
            violation_count: self.violation_count,
            violations: self.violations,
        }
    }
}

/// Run every audit check against an in-memory dataset.
pub fn audit(dataset: &Dataset, config: &GeneratorConfig) -> AuditReport {
    let mut a = Auditor::new();

    check_foreign_keys(&mut a, dataset);
    check_unique_columns(&mut a, dataset);
    check_temporal_order(&mut a, dataset);
    check_money(&mut a, dataset, config);
    check_payments(&mut a, dataset);
    check_ranges(&mut a, dataset);
    check_shape(&mut a, dataset, config);

    a.finish()
}

fn check_foreign_keys(a: &mut Auditor, ds: &Dataset) {
    let departments: HashSet<i64> = ds.departments.iter().map(|d| d.department_id).collect();
    let employees: HashSet<i64> = ds.employees.iter().map(|e| e.employee_id).collect();
    let customers: HashSet<i64> = ds.customers.iter().map(|c| c.customer_id).collect();
    let suppliers: HashSet<i64> = ds.suppliers.iter().map(|s| s.supplier_id).collect();
    let categories: HashSet<i64> = ds.categories.iter().map(|c| c.category_id).collect();
    let products: HashSet<i64> = ds.products.iter().map(|p| p.product_id).collect();
    let orders: HashSet<i64> = ds.orders.iter().map(|o| o.order_id).collect();

    a.begin();
    let check = "foreign_keys";
    for e in &ds.employees {
        if !departments.contains(&e.department_id) {
            a.flag(check, format!("employees.{}: department {} missing", e.employee_id, e.department_id));
        }
        if let Some(m) = e.manager_id {
            if !employees.contains(&m) {
                a.flag(check, format!("employees.{}: manager {} missing", e.employee_id, m));
            }
        }
    }
    for c in &ds.categories {
        if let Some(p) = c.parent_category_id {
            if !categories.contains(&p) {
                a.flag(check, format!("categories.{}: parent {} missing", c.category_id, p));
            }
        }
    }
    for p in &ds.products {
        if !categories.contains(&p.category_id) {
            a.flag(check, format!("products.{}: category {} missing", p.product_id, p.category_id));
        }
        if !suppliers.contains(&p.supplier_id) {
            a.flag(check, format!("products.{}: supplier {} missing", p.product_id, p.supplier_id));
        }
    }
    for r in &ds.inventory {
        if !products.contains(&r.product_id) {
            a.flag(check, format!("inventory.{}: product {} missing", r.inventory_id, r.product_id));
        }
    }
    for o in &ds.orders {
        if !customers.contains(&o.customer_id) {
            a.flag(check, format!("orders.{}: customer {} missing", o.order_id, o.customer_id));
        }
        if let Some(e) = o.employee_id {
            if !employees.contains(&e) {
                a.flag(check, format!("orders.{}: employee {} missing", o.order_id, e));
            }
        }
    }
    for i in &ds.order_items {
        if !orders.contains(&i.order_id) {
            a.flag(check, format!("order_items.{}: order {} missing", i.order_item_id, i.order_id));
        }
        if !products.contains(&i.product_id) {
            a.flag(check, format!("order_items.{}: product {} missing", i.order_item_id, i.product_id));
        }
    }
    for p in &ds.payments {
        if !orders.contains(&p.order_id) {
            a.flag(check, format!("payments.{}: order {} missing", p.payment_id, p.order_id));
        }
    }
    for s in &ds.shipping {
        if !orders.contains(&s.order_id) {
            a.flag(check, format!("shipping.{}: order {} missing", s.shipping_id, s.order_id));
        }
    }
    for r in &ds.product_reviews {
        if !products.contains(&r.product_id) || !customers.contains(&r.customer_id) {
            a.flag(check, format!("product_reviews.{}: dangling reference", r.review_id));
        }
    }
    for addr in &ds.customer_addresses {
        if !customers.contains(&addr.customer_id) {
            a.flag(check, format!("customer_addresses.{}: customer {} missing", addr.address_id, addr.customer_id));
        }
    }
    for r in &ds.returns {
        if !orders.contains(&r.order_id) || !products.contains(&r.product_id) {
            a.flag(check, format!("returns.{}: dangling reference", r.return_id));
        }
    }
}

fn check_unique_columns(a: &mut Auditor, ds: &Dataset) {
    fn unique<'a>(
        a: &mut Auditor,
        check: &str,
        label: &str,
        values: impl Iterator<Item = &'a str>,
    ) {
        let mut seen = HashSet::new();
        for v in values {
            if !seen.insert(v) {
                a.flag(check, format!("duplicate {}: {}", label, v));
            }
        }
    }

    a.begin();
    let check = "unique_columns";
    unique(a, check, "employee email", ds.employees.iter().map(|e| e.email.as_str()));
    unique(a, check, "customer email", ds.customers.iter().map(|c| c.email.as_str()));
    unique(a, check, "sku", ds.products.iter().map(|p| p.sku.as_str()));
    unique(a, check, "transaction_id", ds.payments.iter().map(|p| p.transaction_id.as_str()));
    unique(a, check, "tracking_number", ds.shipping.iter().map(|s| s.tracking_number.as_str()));
    unique(a, check, "promotion_code", ds.promotions.iter().map(|p| p.promotion_code.as_str()));
    unique(a, check, "department_name", ds.departments.iter().map(|d| d.department_name.as_str()));

    let mut inv_products = HashSet::new();
    for r in &ds.inventory {
        if !inv_products.insert(r.product_id) {
            a.flag(check, format!("product {} has multiple inventory rows", r.product_id));
        }
    }
    let mut item_pairs = HashSet::new();
    for i in &ds.order_items {
        if !item_pairs.insert((i.order_id, i.product_id)) {
            a.flag(check, format!("order {} repeats product {}", i.order_id, i.product_id));
        }
    }
}

fn check_temporal_order(a: &mut Auditor, ds: &Dataset) {
    let registration: HashMap<i64, chrono::NaiveDateTime> = ds
        .customers
        .iter()
        .map(|c| (c.customer_id, c.registration_date))
        .collect();
    let order_dates: HashMap<i64, chrono::NaiveDateTime> =
        ds.orders.iter().map(|o| (o.order_id, o.order_date)).collect();
    let delivery: HashMap<i64, chrono::NaiveDate> = ds
        .shipping
        .iter()
        .filter_map(|s| s.actual_delivery.map(|d| (s.order_id, d)))
        .collect();

    a.begin();
    let check = "temporal_order";
    for c in &ds.customers {
        if c.last_login < c.registration_date {
            a.flag(check, format!("customer {}: last_login before registration", c.customer_id));
        }
    }
    for o in &ds.orders {
        if let Some(reg) = registration.get(&o.customer_id) {
            if o.order_date < *reg {
                a.flag(check, format!("order {}: predates customer registration", o.order_id));
            }
        }
        if let Some(shipped) = o.shipped_date {
            if shipped < o.order_date {
                a.flag(check, format!("order {}: shipped before ordered", o.order_id));
            }
        }
        if o.required_date <= o.order_date {
            a.flag(check, format!("order {}: required_date not after order_date", o.order_id));
        }
    }
    for s in &ds.shipping {
        if s.estimated_delivery <= s.shipping_date {
            a.flag(check, format!("shipping {}: estimate not after ship date", s.shipping_id));
        }
        if let Some(actual) = s.actual_delivery {
            if actual < s.shipping_date {
                a.flag(check, format!("shipping {}: delivered before shipped", s.shipping_id));
            }
        }
    }
    for p in &ds.payments {
        if let Some(ordered) = order_dates.get(&p.order_id) {
            if p.payment_date < *ordered {
                a.flag(check, format!("payment {}: predates its order", p.payment_id));
            }
        }
    }
    for r in &ds.returns {
        if let Some(delivered) = delivery.get(&r.order_id) {
            if r.return_date <= *delivered {
                a.flag(check, format!("return {}: not after delivery", r.return_id));
            }
        }
    }
}

fn check_money(a: &mut Auditor, ds: &Dataset, config: &GeneratorConfig) {
    a.begin();
    let check = "money_arithmetic";
    let mut sums: HashMap<i64, f64> = HashMap::new();
    for i in &ds.order_items {
        if i.subtotal != i.computed_subtotal() {
            a.flag(
                check,
                format!(
                    "order_item {}: subtotal {} != {}",
                    i.order_item_id,
                    i.subtotal,
                    i.computed_subtotal()
                ),
            );
        }
        let entry = sums.entry(i.order_id).or_insert(0.0);
        *entry = round2(*entry + i.subtotal);
    }
    for o in &ds.orders {
        let item_sum = sums.get(&o.order_id).copied().unwrap_or(0.0);
        let expected_tax = round2(item_sum * config.pricing.tax_rate);
        let expected_total =
            round2(item_sum + expected_tax + o.shipping_fee - o.discount_amount);
        if o.tax_amount != expected_tax {
            a.flag(check, format!("order {}: tax {} != {}", o.order_id, o.tax_amount, expected_tax));
        }
        if o.total_amount != expected_total {
            a.flag(
                check,
                format!("order {}: total {} != {}", o.order_id, o.total_amount, expected_total),
            );
        }
    }
}

fn check_payments(a: &mut Auditor, ds: &Dataset) {
    a.begin();
    let check = "payment_settlement";
    let mut completed: HashMap<i64, f64> = HashMap::new();
    let mut attempts: HashMap<i64, usize> = HashMap::new();
    for p in &ds.payments {
        *attempts.entry(p.order_id).or_insert(0) += 1;
        if p.payment_status == PaymentStatus::Completed {
            let entry = completed.entry(p.order_id).or_insert(0.0);
            *entry = round2(*entry + p.amount);
        }
    }
    for o in &ds.orders {
        let paid = completed.get(&o.order_id).copied();
        match o.order_status {
            s if s.is_charged() => {
                if paid != Some(o.total_amount) {
                    a.flag(
                        check,
                        format!(
                            "order {} ({}): completed payments {:?} != total {}",
                            o.order_id,
                            s.as_str(),
                            paid,
                            o.total_amount
                        ),
                    );
                }
            }
            OrderStatus::Cancelled => {
                if paid.is_some() {
                    a.flag(check, format!("cancelled order {}: has completed payment", o.order_id));
                }
                if attempts.get(&o.order_id) != Some(&1) {
                    a.flag(
                        check,
                        format!("cancelled order {}: expected exactly one payment attempt", o.order_id),
                    );
                }
            }
            _ => {
                if paid.is_some() {
                    a.flag(check, format!("pending order {}: has completed payment", o.order_id));
                }
                if attempts.get(&o.order_id) != Some(&1) {
                    a.flag(
                        check,
                        format!("pending order {}: expected exactly one pending payment", o.order_id),
                    );
                }
            }
        }
    }
}

fn check_ranges(a: &mut Auditor, ds: &Dataset) {
    a.begin();
    let check = "value_ranges";
    for p in &ds.products {
        if p.unit_price <= p.cost_price || p.cost_price <= 0.0 {
            a.flag(check, format!("product {}: non-positive margin", p.product_id));
        }
    }
    for s in &ds.suppliers {
        if !(3.0..=5.0).contains(&s.rating) {
            a.flag(check, format!("supplier {}: rating {} out of range", s.supplier_id, s.rating));
        }
    }
    for r in &ds.inventory {
        if r.quantity_on_hand < 0 {
            a.flag(check, format!("inventory {}: negative quantity", r.inventory_id));
        }
    }
    for i in &ds.order_items {
        if i.quantity < 1 {
            a.flag(check, format!("order_item {}: quantity {}", i.order_item_id, i.quantity));
        }
        if !(0.0..=1.0).contains(&i.discount) {
            a.flag(check, format!("order_item {}: discount {}", i.order_item_id, i.discount));
        }
    }
    for r in &ds.product_reviews {
        if !(1..=5).contains(&r.rating) {
            a.flag(check, format!("review {}: rating {}", r.review_id, r.rating));
        }
    }
    for p in &ds.promotions {
        if p.times_used > p.usage_limit {
            a.flag(
                check,
                format!("promotion {}: used {} > limit {}", p.promotion_id, p.times_used, p.usage_limit),
            );
        }
        if p.end_date <= p.start_date {
            a.flag(check, format!("promotion {}: end not after start", p.promotion_id));
        }
    }
    let items: HashMap<(i64, i64), &crate::model::OrderItem> = ds
        .order_items
        .iter()
        .map(|i| ((i.order_id, i.product_id), i))
        .collect();
    for r in &ds.returns {
        match items.get(&(r.order_id, r.product_id)) {
            Some(item) => {
                if r.quantity < 1 || r.quantity > item.quantity {
                    a.flag(check, format!("return {}: quantity {} out of range", r.return_id, r.quantity));
                }
                if r.refund_amount > item.subtotal + 1e-9 {
                    a.flag(
                        check,
                        format!("return {}: refund {} exceeds line subtotal {}", r.return_id, r.refund_amount, item.subtotal),
                    );
                }
            }
            None => {
                a.flag(check, format!("return {}: no matching line item", r.return_id));
            }
        }
    }
}

fn check_shape(a: &mut Auditor, ds: &Dataset, config: &GeneratorConfig) {
    a.begin();
    let check = "dataset_shape";
    let with_items: HashSet<i64> = ds.order_items.iter().map(|i| i.order_id).collect();
    let shipped_rows: HashSet<i64> = ds.shipping.iter().map(|s| s.order_id).collect();
    for o in &ds.orders {
        if !with_items.contains(&o.order_id) {
            a.flag(check, format!("order {}: no line items", o.order_id));
        }
        let should_ship = o.order_status.has_shipped();
        if should_ship != shipped_rows.contains(&o.order_id) {
            a.flag(
                check,
                format!(
                    "order {} ({}): shipping row {}",
                    o.order_id,
                    o.order_status.as_str(),
                    if should_ship { "missing" } else { "unexpected" }
                ),
            );
        }
    }

    let mut defaults: HashMap<i64, usize> = HashMap::new();
    for addr in ds.customer_addresses.iter().filter(|addr| addr.is_default) {
        *defaults.entry(addr.customer_id).or_insert(0) += 1;
    }
    for c in &ds.customers {
        if defaults.get(&c.customer_id) != Some(&1) {
            a.flag(
                check,
                format!("customer {}: expected exactly one default address", c.customer_id),
            );
        }
    }

    // Only meaningful when the catalog is big enough for the configured
    // fraction to force at least one row
    let expected_low =
        (ds.inventory.len() as f64 * config.inventory.low_stock_fraction).round() as usize;
    if expected_low >= 1
        && !ds
            .inventory
            .iter()
            .any(|r| r.quantity_on_hand <= r.reorder_level)
    {
        a.flag(check, "no low-stock inventory rows generated".to_string());
    }
}
