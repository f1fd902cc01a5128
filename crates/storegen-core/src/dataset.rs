//! The in-memory dataset: every generated row for all fifteen tables, plus
//! a table-generic rendered view the output backends and preview iterate.

use sha2::{Digest, Sha256};

use crate::model::{
    Category, Customer, CustomerAddress, Department, Employee, InventoryRecord, Order, OrderItem,
    Payment, Product, ProductReview, Promotion, ReturnRecord, ShippingRecord, Supplier,
};
use crate::output::{SqlValue, TableRow};

/// Full generation output, field order matching the insertion order in
/// `crate::schema::TABLES` (parents before children).
#[derive(Debug)]
pub struct Dataset {
    pub departments: Vec<Department>,
    pub employees: Vec<Employee>,
    pub customers: Vec<Customer>,
    pub suppliers: Vec<Supplier>,
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    pub inventory: Vec<InventoryRecord>,
    pub orders: Vec<Order>,
    pub order_items: Vec<OrderItem>,
    pub payments: Vec<Payment>,
    pub shipping: Vec<ShippingRecord>,
    pub product_reviews: Vec<ProductReview>,
    pub promotions: Vec<Promotion>,
    pub customer_addresses: Vec<CustomerAddress>,
    pub returns: Vec<ReturnRecord>,
}

/// One table flattened to rendered values, so callers can handle all fifteen
/// heterogeneous tables through a single shape.
#[derive(Debug)]
pub struct RenderedTable {
    pub name: &'static str,
    pub columns: &'static [&'static str],
    pub rows: Vec<Vec<SqlValue>>,
}

impl RenderedTable {
    pub fn from_rows<T: TableRow>(rows: &[T]) -> Self {
        Self {
            name: T::TABLE,
            columns: T::COLUMNS,
            rows: rows.iter().map(|r| r.values()).collect(),
        }
    }
}

impl Dataset {
    /// All tables rendered to values, in insertion order.
    pub fn rendered_tables(&self) -> Vec<RenderedTable> {
        vec![
            RenderedTable::from_rows(&self.departments),
            RenderedTable::from_rows(&self.employees),
            RenderedTable::from_rows(&self.customers),
            RenderedTable::from_rows(&self.suppliers),
            RenderedTable::from_rows(&self.categories),
            RenderedTable::from_rows(&self.products),
            RenderedTable::from_rows(&self.inventory),
            RenderedTable::from_rows(&self.orders),
            RenderedTable::from_rows(&self.order_items),
            RenderedTable::from_rows(&self.payments),
            RenderedTable::from_rows(&self.shipping),
            RenderedTable::from_rows(&self.product_reviews),
            RenderedTable::from_rows(&self.promotions),
            RenderedTable::from_rows(&self.customer_addresses),
            RenderedTable::from_rows(&self.returns),
        ]
    }

    /// `(table, row count)` in insertion order.
    pub fn row_counts(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("departments", self.departments.len()),
            ("employees", self.employees.len()),
            ("customers", self.customers.len()),
            ("suppliers", self.suppliers.len()),
            ("categories", self.categories.len()),
            ("products", self.products.len()),
            ("inventory", self.inventory.len()),
            ("orders", self.orders.len()),
            ("order_items", self.order_items.len()),
            ("payments", self.payments.len()),
            ("shipping", self.shipping.len()),
            ("product_reviews", self.product_reviews.len()),
            ("promotions", self.promotions.len()),
            ("customer_addresses", self.customer_addresses.len()),
            ("returns", self.returns.len()),
        ]
    }

    pub fn total_rows(&self) -> usize {
        self.row_counts().iter().map(|(_, n)| n).sum()
    }

    /// SHA-256 over the full rendered SQL script. Two datasets with the same
    /// fingerprint are identical row for row, which is how determinism is
    /// asserted in tests and reported by the CLI.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(crate::output::sql::render_script(self).as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
