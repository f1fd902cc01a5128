//! Stage 4 — transactions: orders, order items, payments, shipping.
//!
//! This stage carries most of the dataset's invariants:
//!  - an order never predates its customer's registration;
//!  - order status is conditioned on order age, so last-month orders skew
//!    Pending/Processing while older ones have overwhelmingly settled;
//!  - completed payments sum exactly to the order total (split payments use
//!    `round2(total - first)` for the remainder, so cents never drift);
//!  - every order carries at least one payment row: pending orders a single
//!    Pending charge, cancelled orders one Failed or Pending attempt;
//!  - shipping rows exist only for shipped/delivered orders, with
//!    carrier-specific delivery estimates and a configurable late fraction.
//!
//! Totals are computed here with the same formula the finalize stage
//! re-applies, so payment amounts generated now stay exact afterwards.

use chrono::{Duration, NaiveDateTime};
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::BTreeSet;

use crate::config::GeneratorConfig;
use crate::error::{Result, StoregenError};
use crate::model::{
    round2, Order, OrderItem, OrderStatus, Payment, PaymentStatus, ShippingRecord, ShippingStatus,
};

use super::actors::ActorData;
use super::catalog::CatalogData;
use super::providers;
use super::unique::UniqueSet;

pub const PAYMENT_METHODS: &[&str] =
    &["Credit Card", "Debit Card", "PayPal", "Bank Transfer", "Gift Card"];

/// Carrier and its typical delivery lead time in days.
const CARRIERS: &[(&str, i64)] = &[("FedEx", 3), ("UPS", 4), ("DHL", 5), ("USPS", 7)];

/// Fraction of orders handled by a sales rep (the rest are self-service).
const REP_ASSISTED_FRACTION: f64 = 0.7;

#[derive(Debug)]
pub struct TransactionData {
    pub orders: Vec<Order>,
    pub order_items: Vec<OrderItem>,
    pub payments: Vec<Payment>,
    pub shipping: Vec<ShippingRecord>,
}

pub fn generate(
    config: &GeneratorConfig,
    actors: &ActorData,
    catalog: &CatalogData,
    rng: &mut StdRng,
) -> Result<TransactionData> {
    if actors.customers.is_empty() {
        return Err(StoregenError::ReferentialIntegrity {
            table: "orders".to_string(),
            column: "customer_id".to_string(),
            target: "customers".to_string(),
        });
    }
    if catalog.products.is_empty() {
        return Err(StoregenError::ReferentialIntegrity {
            table: "order_items".to_string(),
            column: "product_id".to_string(),
            target: "products".to_string(),
        });
    }

    let base = config.window.base_time();
    let window_start = config.window.window_start(base);

    let mut orders = Vec::with_capacity(config.counts.orders);
    let mut order_items = Vec::new();
    let mut payments = Vec::new();
    let mut shipping = Vec::new();
    let mut transaction_ids = UniqueSet::new();

    let mut order_item_id: i64 = 0;
    let mut payment_id: i64 = 0;
    let mut shipping_id: i64 = 0;

    for i in 0..config.counts.orders {
        let order_id = i as i64 + 1;
        let customer = &actors.customers[rng.random_range(0..actors.customers.len())];

        // Customer must exist before they can buy
        let order_date =
            providers::datetime_between(rng, customer.registration_date.max(window_start), base);
        let age_days = (base - order_date).num_days();

        let weights = if age_days < config.orders.recent_days {
            &config.orders.recent_status_weights
        } else {
            &config.orders.settled_status_weights
        };
        let order_status = OrderStatus::ALL[providers::weighted_index(rng, weights)];

        let shipped_date = if order_status.has_shipped() {
            Some(ship_time(rng, order_date, base))
        } else {
            None
        };

        let employee_id = if !actors.sales_rep_ids.is_empty()
            && rng.random_bool(REP_ASSISTED_FRACTION)
        {
            Some(actors.sales_rep_ids[rng.random_range(0..actors.sales_rep_ids.len())])
        } else {
            None
        };

        // Line items: distinct products per order, contiguous in the output
        let item_count = rng.random_range(1..=config.orders.max_items_per_order);
        let mut picked = BTreeSet::new();
        while picked.len() < item_count.min(catalog.products.len()) {
            picked.insert(rng.random_range(0..catalog.products.len()));
        }

        let mut item_sum = 0.0;
        for idx in picked {
            let product = &catalog.products[idx];
            let max_discount = config.orders.max_line_discount;
            let discount = if max_discount > 0.0
                && rng.random_bool(config.orders.line_discount_fraction)
            {
                round2(rng.random_range(0.05_f64.min(max_discount)..=max_discount))
            } else {
                0.0
            };
            order_item_id += 1;
            let mut item = OrderItem {
                order_item_id,
                order_id,
                product_id: product.product_id,
                quantity: rng.random_range(1..=config.orders.max_quantity),
                unit_price: product.unit_price,
                discount,
                subtotal: 0.0,
            };
            item.subtotal = item.computed_subtotal();
            item_sum = round2(item_sum + item.subtotal);
            order_items.push(item);
        }

        let discount_amount = if rng.random_bool(config.orders.order_discount_fraction) {
            round2(item_sum * rng.random_range(0.05..=0.15))
        } else {
            0.0
        };
        let shipping_fee =
            config.pricing.shipping_fees[rng.random_range(0..config.pricing.shipping_fees.len())];
        let tax_amount = round2(item_sum * config.pricing.tax_rate);
        let total_amount = round2(item_sum + tax_amount + shipping_fee - discount_amount);

        let payment_method = PAYMENT_METHODS[rng.random_range(0..PAYMENT_METHODS.len())].to_string();

        // Payments. Every order gets at least one row: charged orders settle
        // in full, pending orders carry a single not-yet-settled charge, and
        // cancelled orders keep the audit trail of the attempt that didn't
        // stick.
        if order_status.is_charged() {
            let pay_date = providers::datetime_between(
                rng,
                order_date,
                (order_date + Duration::days(2)).min(base),
            );
            let split = total_amount > 1.0
                && rng.random_bool(config.orders.split_payment_probability);
            if split {
                let first = round2(total_amount * rng.random_range(0.3..=0.7));
                let second = round2(total_amount - first);
                for amount in [first, second] {
                    payment_id += 1;
                    payments.push(Payment {
                        payment_id,
                        order_id,
                        payment_date: pay_date,
                        payment_method: payment_method.clone(),
                        amount,
                        transaction_id: transaction_ids.draw(
                            "payments",
                            "transaction_id",
                            payment_id as usize,
                            || providers::seeded_uuid(rng),
                        )?,
                        payment_status: PaymentStatus::Completed,
                    });
                }
            } else {
                payment_id += 1;
                payments.push(Payment {
                    payment_id,
                    order_id,
                    payment_date: pay_date,
                    payment_method: payment_method.clone(),
                    amount: total_amount,
                    transaction_id: transaction_ids.draw(
                        "payments",
                        "transaction_id",
                        payment_id as usize,
                        || providers::seeded_uuid(rng),
                    )?,
                    payment_status: PaymentStatus::Completed,
                });
            }
        } else {
            let payment_status = if order_status == OrderStatus::Cancelled {
                if rng.random_bool(0.7) {
                    PaymentStatus::Failed
                } else {
                    PaymentStatus::Pending
                }
            } else {
                PaymentStatus::Pending
            };
            payment_id += 1;
            payments.push(Payment {
                payment_id,
                order_id,
                payment_date: providers::datetime_between(
                    rng,
                    order_date,
                    (order_date + Duration::days(1)).min(base),
                ),
                payment_method: payment_method.clone(),
                amount: total_amount,
                transaction_id: transaction_ids.draw(
                    "payments",
                    "transaction_id",
                    payment_id as usize,
                    || providers::seeded_uuid(rng),
                )?,
                payment_status,
            });
        }

        // Shipping record for anything that left the warehouse
        if let Some(shipped) = shipped_date {
            let (carrier, lead_days) = CARRIERS[rng.random_range(0..CARRIERS.len())];
            let shipping_date = shipped.date();
            let estimated_delivery = shipping_date + Duration::days(lead_days);

            let (actual_delivery, shipping_status) = if order_status == OrderStatus::Delivered {
                let late = rng.random_bool(config.orders.late_delivery_fraction);
                let raw = if late {
                    estimated_delivery + Duration::days(rng.random_range(1..=4))
                } else {
                    providers::date_between(rng, shipping_date, estimated_delivery)
                };
                // Deliveries can't land in the future of the base date
                let actual = raw.min(base.date()).max(shipping_date);
                (Some(actual), ShippingStatus::Delivered)
            } else {
                (None, ShippingStatus::InTransit)
            };

            shipping_id += 1;
            shipping.push(ShippingRecord {
                shipping_id,
                order_id,
                carrier: carrier.to_string(),
                tracking_number: providers::tracking_number(rng),
                shipping_date,
                estimated_delivery,
                actual_delivery,
                shipping_status,
                shipping_cost: shipping_fee,
            });
        }

        orders.push(Order {
            order_id,
            customer_id: customer.customer_id,
            employee_id,
            order_date,
            required_date: order_date + Duration::days(rng.random_range(3..=14)),
            shipped_date,
            ship_address: customer.address.clone(),
            ship_city: customer.city.clone(),
            ship_state: customer.state.clone(),
            ship_country: customer.country.clone(),
            ship_postal_code: customer.postal_code.clone(),
            order_status,
            payment_method,
            total_amount,
            tax_amount,
            shipping_fee,
            discount_amount,
        });
    }

    Ok(TransactionData {
        orders,
        order_items,
        payments,
        shipping,
    })
}

/// Ship time between one hour and five days after the order, never beyond
/// the base date.
fn ship_time(rng: &mut StdRng, order_date: NaiveDateTime, base: NaiveDateTime) -> NaiveDateTime {
    let lower = (order_date + Duration::hours(1)).min(base);
    let upper = (order_date + Duration::days(5)).min(base);
    providers::datetime_between(rng, lower, upper.max(lower))
}
