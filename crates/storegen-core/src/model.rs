//! Typed row structs for the fifteen tables, plus the status enums used by
//! the generation pipeline. Surrogate IDs are `i64` assigned by insertion
//! order starting at 1; monetary values are `f64` rounded to 2 decimals via
//! [`round2`], matching the REAL columns in the DDL.

use chrono::{NaiveDate, NaiveDateTime};

use crate::output::{SqlValue, TableRow};

/// Round a monetary value to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0_f64).round() / 100.0_f64
}

fn opt_int(v: Option<i64>) -> SqlValue {
    v.map(SqlValue::Int).unwrap_or(SqlValue::Null)
}

fn opt_float(v: Option<f64>) -> SqlValue {
    v.map(SqlValue::Float).unwrap_or(SqlValue::Null)
}

fn opt_date(v: Option<NaiveDate>) -> SqlValue {
    v.map(SqlValue::Date).unwrap_or(SqlValue::Null)
}

fn opt_datetime(v: Option<NaiveDateTime>) -> SqlValue {
    v.map(SqlValue::DateTime).unwrap_or(SqlValue::Null)
}

// ---------------------------------------------------------------------------
// Status enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Orders in these states have been charged in full.
    pub fn is_charged(&self) -> bool {
        matches!(
            self,
            OrderStatus::Processing | OrderStatus::Shipped | OrderStatus::Delivered
        )
    }

    pub fn has_shipped(&self) -> bool {
        matches!(self, OrderStatus::Shipped | OrderStatus::Delivered)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Completed => "Completed",
            PaymentStatus::Failed => "Failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShippingStatus {
    InTransit,
    Delivered,
}

impl ShippingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShippingStatus::InTransit => "In Transit",
            ShippingStatus::Delivered => "Delivered",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountType {
    Percentage,
    FixedAmount,
    FreeShipping,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "Percentage",
            DiscountType::FixedAmount => "Fixed Amount",
            DiscountType::FreeShipping => "Free Shipping",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressType {
    Billing,
    Shipping,
}

impl AddressType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressType::Billing => "Billing",
            AddressType::Shipping => "Shipping",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnStatus {
    Requested,
    Approved,
    Refunded,
    Rejected,
}

impl ReturnStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnStatus::Requested => "Requested",
            ReturnStatus::Approved => "Approved",
            ReturnStatus::Refunded => "Refunded",
            ReturnStatus::Rejected => "Rejected",
        }
    }
}

// ---------------------------------------------------------------------------
// Row structs, in insertion order
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Department {
    pub department_id: i64,
    pub department_name: String,
    pub budget: f64,
}

#[derive(Debug, Clone)]
pub struct Employee {
    pub employee_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub hire_date: NaiveDate,
    pub department_id: i64,
    pub position: String,
    pub salary: f64,
    pub manager_id: Option<i64>,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct Customer {
    pub customer_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub registration_date: NaiveDateTime,
    pub last_login: NaiveDateTime,
    pub loyalty_points: i64,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct Supplier {
    pub supplier_id: i64,
    pub supplier_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub rating: f64,
}

#[derive(Debug, Clone)]
pub struct Category {
    pub category_id: i64,
    pub category_name: String,
    pub parent_category_id: Option<i64>,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct Product {
    pub product_id: i64,
    pub product_name: String,
    pub sku: String,
    pub category_id: i64,
    pub supplier_id: i64,
    pub description: String,
    pub unit_price: f64,
    pub cost_price: f64,
    pub weight: f64,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct InventoryRecord {
    pub inventory_id: i64,
    pub product_id: i64,
    pub warehouse_location: String,
    pub quantity_on_hand: i64,
    pub reorder_level: i64,
    pub reorder_quantity: i64,
    pub last_restock_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub order_id: i64,
    pub customer_id: i64,
    pub employee_id: Option<i64>,
    pub order_date: NaiveDateTime,
    pub required_date: NaiveDateTime,
    pub shipped_date: Option<NaiveDateTime>,
    pub ship_address: String,
    pub ship_city: String,
    pub ship_state: String,
    pub ship_country: String,
    pub ship_postal_code: String,
    pub order_status: OrderStatus,
    pub payment_method: String,
    pub total_amount: f64,
    pub tax_amount: f64,
    pub shipping_fee: f64,
    pub discount_amount: f64,
}

#[derive(Debug, Clone)]
pub struct OrderItem {
    pub order_item_id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
    /// Line discount as a fraction in [0, 0.30], not a percentage.
    pub discount: f64,
    pub subtotal: f64,
}

impl OrderItem {
    /// The subtotal this line should carry per its quantity/price/discount.
    pub fn computed_subtotal(&self) -> f64 {
        round2(self.quantity as f64 * self.unit_price * (1.0 - self.discount))
    }
}

#[derive(Debug, Clone)]
pub struct Payment {
    pub payment_id: i64,
    pub order_id: i64,
    pub payment_date: NaiveDateTime,
    pub payment_method: String,
    pub amount: f64,
    pub transaction_id: String,
    pub payment_status: PaymentStatus,
}

#[derive(Debug, Clone)]
pub struct ShippingRecord {
    pub shipping_id: i64,
    pub order_id: i64,
    pub carrier: String,
    pub tracking_number: String,
    pub shipping_date: NaiveDate,
    pub estimated_delivery: NaiveDate,
    pub actual_delivery: Option<NaiveDate>,
    pub shipping_status: ShippingStatus,
    pub shipping_cost: f64,
}

#[derive(Debug, Clone)]
pub struct ProductReview {
    pub review_id: i64,
    pub product_id: i64,
    pub customer_id: i64,
    pub rating: i64,
    pub review_title: String,
    pub review_text: String,
    pub is_verified_purchase: bool,
    pub review_date: NaiveDateTime,
    pub helpful_count: i64,
}

#[derive(Debug, Clone)]
pub struct Promotion {
    pub promotion_id: i64,
    pub promotion_name: String,
    pub promotion_code: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub min_purchase_amount: f64,
    pub max_discount_amount: Option<f64>,
    pub usage_limit: i64,
    pub times_used: i64,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct CustomerAddress {
    pub address_id: i64,
    pub customer_id: i64,
    pub address_type: AddressType,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub is_default: bool,
}

#[derive(Debug, Clone)]
pub struct ReturnRecord {
    pub return_id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub reason: String,
    pub return_date: NaiveDate,
    pub refund_amount: f64,
    pub return_status: ReturnStatus,
}

// ---------------------------------------------------------------------------
// SQL rendering — column order must match the DDL in crate::schema
// ---------------------------------------------------------------------------

impl TableRow for Department {
    const TABLE: &'static str = "departments";
    const COLUMNS: &'static [&'static str] = &["department_id", "department_name", "budget"];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Int(self.department_id),
            SqlValue::Text(self.department_name.clone()),
            SqlValue::Float(self.budget),
        ]
    }
}

impl TableRow for Employee {
    const TABLE: &'static str = "employees";
    const COLUMNS: &'static [&'static str] = &[
        "employee_id",
        "first_name",
        "last_name",
        "email",
        "phone",
        "hire_date",
        "department_id",
        "position",
        "salary",
        "manager_id",
        "is_active",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Int(self.employee_id),
            SqlValue::Text(self.first_name.clone()),
            SqlValue::Text(self.last_name.clone()),
            SqlValue::Text(self.email.clone()),
            SqlValue::Text(self.phone.clone()),
            SqlValue::Date(self.hire_date),
            SqlValue::Int(self.department_id),
            SqlValue::Text(self.position.clone()),
            SqlValue::Float(self.salary),
            opt_int(self.manager_id),
            SqlValue::Bool(self.is_active),
        ]
    }
}

impl TableRow for Customer {
    const TABLE: &'static str = "customers";
    const COLUMNS: &'static [&'static str] = &[
        "customer_id",
        "first_name",
        "last_name",
        "email",
        "phone",
        "address",
        "city",
        "state",
        "country",
        "postal_code",
        "registration_date",
        "last_login",
        "loyalty_points",
        "is_active",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Int(self.customer_id),
            SqlValue::Text(self.first_name.clone()),
            SqlValue::Text(self.last_name.clone()),
            SqlValue::Text(self.email.clone()),
            SqlValue::Text(self.phone.clone()),
            SqlValue::Text(self.address.clone()),
            SqlValue::Text(self.city.clone()),
            SqlValue::Text(self.state.clone()),
            SqlValue::Text(self.country.clone()),
            SqlValue::Text(self.postal_code.clone()),
            SqlValue::DateTime(self.registration_date),
            SqlValue::DateTime(self.last_login),
            SqlValue::Int(self.loyalty_points),
            SqlValue::Bool(self.is_active),
        ]
    }
}

impl TableRow for Supplier {
    const TABLE: &'static str = "suppliers";
    const COLUMNS: &'static [&'static str] = &[
        "supplier_id",
        "supplier_name",
        "contact_name",
        "email",
        "phone",
        "address",
        "city",
        "country",
        "rating",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Int(self.supplier_id),
            SqlValue::Text(self.supplier_name.clone()),
            SqlValue::Text(self.contact_name.clone()),
            SqlValue::Text(self.email.clone()),
            SqlValue::Text(self.phone.clone()),
            SqlValue::Text(self.address.clone()),
            SqlValue::Text(self.city.clone()),
            SqlValue::Text(self.country.clone()),
            SqlValue::Float(self.rating),
        ]
    }
}

impl TableRow for Category {
    const TABLE: &'static str = "categories";
    const COLUMNS: &'static [&'static str] = &[
        "category_id",
        "category_name",
        "parent_category_id",
        "description",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Int(self.category_id),
            SqlValue::Text(self.category_name.clone()),
            opt_int(self.parent_category_id),
            SqlValue::Text(self.description.clone()),
        ]
    }
}

impl TableRow for Product {
    const TABLE: &'static str = "products";
    const COLUMNS: &'static [&'static str] = &[
        "product_id",
        "product_name",
        "sku",
        "category_id",
        "supplier_id",
        "description",
        "unit_price",
        "cost_price",
        "weight",
        "is_active",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Int(self.product_id),
            SqlValue::Text(self.product_name.clone()),
            SqlValue::Text(self.sku.clone()),
            SqlValue::Int(self.category_id),
            SqlValue::Int(self.supplier_id),
            SqlValue::Text(self.description.clone()),
            SqlValue::Float(self.unit_price),
            SqlValue::Float(self.cost_price),
            SqlValue::Float(self.weight),
            SqlValue::Bool(self.is_active),
        ]
    }
}

impl TableRow for InventoryRecord {
    const TABLE: &'static str = "inventory";
    const COLUMNS: &'static [&'static str] = &[
        "inventory_id",
        "product_id",
        "warehouse_location",
        "quantity_on_hand",
        "reorder_level",
        "reorder_quantity",
        "last_restock_date",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Int(self.inventory_id),
            SqlValue::Int(self.product_id),
            SqlValue::Text(self.warehouse_location.clone()),
            SqlValue::Int(self.quantity_on_hand),
            SqlValue::Int(self.reorder_level),
            SqlValue::Int(self.reorder_quantity),
            SqlValue::Date(self.last_restock_date),
        ]
    }
}

impl TableRow for Order {
    const TABLE: &'static str = "orders";
    const COLUMNS: &'static [&'static str] = &[
        "order_id",
        "customer_id",
        "employee_id",
        "order_date",
        "required_date",
        "shipped_date",
        "ship_address",
        "ship_city",
        "ship_state",
        "ship_country",
        "ship_postal_code",
        "order_status",
        "payment_method",
        "total_amount",
        "tax_amount",
        "shipping_fee",
        "discount_amount",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Int(self.order_id),
            SqlValue::Int(self.customer_id),
            opt_int(self.employee_id),
            SqlValue::DateTime(self.order_date),
            SqlValue::DateTime(self.required_date),
            opt_datetime(self.shipped_date),
            SqlValue::Text(self.ship_address.clone()),
            SqlValue::Text(self.ship_city.clone()),
            SqlValue::Text(self.ship_state.clone()),
            SqlValue::Text(self.ship_country.clone()),
            SqlValue::Text(self.ship_postal_code.clone()),
            SqlValue::Text(self.order_status.as_str().to_string()),
            SqlValue::Text(self.payment_method.clone()),
            SqlValue::Float(self.total_amount),
            SqlValue::Float(self.tax_amount),
            SqlValue::Float(self.shipping_fee),
            SqlValue::Float(self.discount_amount),
        ]
    }
}

impl TableRow for OrderItem {
    const TABLE: &'static str = "order_items";
    const COLUMNS: &'static [&'static str] = &[
        "order_item_id",
        "order_id",
        "product_id",
        "quantity",
        "unit_price",
        "discount",
        "subtotal",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Int(self.order_item_id),
            SqlValue::Int(self.order_id),
            SqlValue::Int(self.product_id),
            SqlValue::Int(self.quantity),
            SqlValue::Float(self.unit_price),
            SqlValue::Float(self.discount),
            SqlValue::Float(self.subtotal),
        ]
    }
}

impl TableRow for Payment {
    const TABLE: &'static str = "payments";
    const COLUMNS: &'static [&'static str] = &[
        "payment_id",
        "order_id",
        "payment_date",
        "payment_method",
        "amount",
        "transaction_id",
        "payment_status",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Int(self.payment_id),
            SqlValue::Int(self.order_id),
            SqlValue::DateTime(self.payment_date),
            SqlValue::Text(self.payment_method.clone()),
            SqlValue::Float(self.amount),
            SqlValue::Text(self.transaction_id.clone()),
            SqlValue::Text(self.payment_status.as_str().to_string()),
        ]
    }
}

impl TableRow for ShippingRecord {
    const TABLE: &'static str = "shipping";
    const COLUMNS: &'static [&'static str] = &[
        "shipping_id",
        "order_id",
        "carrier",
        "tracking_number",
        "shipping_date",
        "estimated_delivery",
        "actual_delivery",
        "shipping_status",
        "shipping_cost",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Int(self.shipping_id),
            SqlValue::Int(self.order_id),
            SqlValue::Text(self.carrier.clone()),
            SqlValue::Text(self.tracking_number.clone()),
            SqlValue::Date(self.shipping_date),
            SqlValue::Date(self.estimated_delivery),
            opt_date(self.actual_delivery),
            SqlValue::Text(self.shipping_status.as_str().to_string()),
            SqlValue::Float(self.shipping_cost),
        ]
    }
}

impl TableRow for ProductReview {
    const TABLE: &'static str = "product_reviews";
    const COLUMNS: &'static [&'static str] = &[
        "review_id",
        "product_id",
        "customer_id",
        "rating",
        "review_title",
        "review_text",
        "is_verified_purchase",
        "review_date",
        "helpful_count",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Int(self.review_id),
            SqlValue::Int(self.product_id),
            SqlValue::Int(self.customer_id),
            SqlValue::Int(self.rating),
            SqlValue::Text(self.review_title.clone()),
            SqlValue::Text(self.review_text.clone()),
            SqlValue::Bool(self.is_verified_purchase),
            SqlValue::DateTime(self.review_date),
            SqlValue::Int(self.helpful_count),
        ]
    }
}

impl TableRow for Promotion {
    const TABLE: &'static str = "promotions";
    const COLUMNS: &'static [&'static str] = &[
        "promotion_id",
        "promotion_name",
        "promotion_code",
        "discount_type",
        "discount_value",
        "start_date",
        "end_date",
        "min_purchase_amount",
        "max_discount_amount",
        "usage_limit",
        "times_used",
        "is_active",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Int(self.promotion_id),
            SqlValue::Text(self.promotion_name.clone()),
            SqlValue::Text(self.promotion_code.clone()),
            SqlValue::Text(self.discount_type.as_str().to_string()),
            SqlValue::Float(self.discount_value),
            SqlValue::Date(self.start_date),
            SqlValue::Date(self.end_date),
            SqlValue::Float(self.min_purchase_amount),
            opt_float(self.max_discount_amount),
            SqlValue::Int(self.usage_limit),
            SqlValue::Int(self.times_used),
            SqlValue::Bool(self.is_active),
        ]
    }
}

impl TableRow for CustomerAddress {
    const TABLE: &'static str = "customer_addresses";
    const COLUMNS: &'static [&'static str] = &[
        "address_id",
        "customer_id",
        "address_type",
        "street_address",
        "city",
        "state",
        "country",
        "postal_code",
        "is_default",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Int(self.address_id),
            SqlValue::Int(self.customer_id),
            SqlValue::Text(self.address_type.as_str().to_string()),
            SqlValue::Text(self.street_address.clone()),
            SqlValue::Text(self.city.clone()),
            SqlValue::Text(self.state.clone()),
            SqlValue::Text(self.country.clone()),
            SqlValue::Text(self.postal_code.clone()),
            SqlValue::Bool(self.is_default),
        ]
    }
}

impl TableRow for ReturnRecord {
    const TABLE: &'static str = "returns";
    const COLUMNS: &'static [&'static str] = &[
        "return_id",
        "order_id",
        "product_id",
        "quantity",
        "reason",
        "return_date",
        "refund_amount",
        "return_status",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Int(self.return_id),
            SqlValue::Int(self.order_id),
            SqlValue::Int(self.product_id),
            SqlValue::Int(self.quantity),
            SqlValue::Text(self.reason.clone()),
            SqlValue::Date(self.return_date),
            SqlValue::Float(self.refund_amount),
            SqlValue::Text(self.return_status.as_str().to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(10.005), 10.01);
        assert_eq!(round2(10.004), 10.0);
        assert_eq!(round2(0.1 + 0.2), 0.3);
    }

    #[test]
    fn test_computed_subtotal_matches_formula() {
        let item = OrderItem {
            order_item_id: 1,
            order_id: 1,
            product_id: 1,
            quantity: 3,
            unit_price: 19.99,
            discount: 0.15,
            subtotal: 0.0,
        };
        assert_eq!(item.computed_subtotal(), round2(3.0 * 19.99 * 0.85));
    }

    #[test]
    fn test_row_values_match_column_count() {
        let dept = Department {
            department_id: 1,
            department_name: "Sales".to_string(),
            budget: 500_000.0,
        };
        assert_eq!(dept.values().len(), Department::COLUMNS.len());

        let order = Order {
            order_id: 1,
            customer_id: 1,
            employee_id: None,
            order_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            required_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 8)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            shipped_date: None,
            ship_address: String::new(),
            ship_city: String::new(),
            ship_state: String::new(),
            ship_country: String::new(),
            ship_postal_code: String::new(),
            order_status: OrderStatus::Pending,
            payment_method: "PayPal".to_string(),
            total_amount: 0.0,
            tax_amount: 0.0,
            shipping_fee: 0.0,
            discount_amount: 0.0,
        };
        assert_eq!(order.values().len(), Order::COLUMNS.len());
    }

    #[test]
    fn test_status_round_trips() {
        for status in OrderStatus::ALL {
            assert!(!status.as_str().is_empty());
        }
        assert!(OrderStatus::Delivered.is_charged());
        assert!(!OrderStatus::Pending.is_charged());
        assert!(OrderStatus::Shipped.has_shipped());
        assert!(!OrderStatus::Cancelled.has_shipped());
    }
}
