//! Stage 6 — engagement: reviews, promotions, addresses, returns.
//!
//! Runs last because most of it derives from delivered orders: verified
//! reviews come from real (customer, product) purchase pairs, and returns
//! are drawn from delivered line items with refunds capped at what was paid.

use chrono::Duration;
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::{HashMap, HashSet};

use crate::config::GeneratorConfig;
use crate::error::{Result, StoregenError};
use crate::model::{
    round2, AddressType, CustomerAddress, DiscountType, OrderStatus, ProductReview, Promotion,
    ReturnRecord, ReturnStatus,
};

use super::actors::ActorData;
use super::catalog::CatalogData;
use super::providers;
use super::transactions::TransactionData;
use super::unique::UniqueSet;

/// Retry cap when drawing an unused reviewer/product pair.
const MAX_PAIR_RETRIES: usize = 1000;

/// Review title pools indexed by rating − 1.
const REVIEW_TITLES: [&[&str]; 5] = [
    &["Terrible", "Waste of money", "Do not buy", "Broken on arrival"],
    &["Disappointed", "Not as described", "Poor quality", "Expected better"],
    &["It's okay", "Average product", "Decent", "As expected"],
    &["Very good", "Happy with purchase", "Good value", "Works great"],
    &["Excellent!", "Love it!", "Best purchase ever", "Highly recommend", "Amazing quality"],
];

const RETURN_REASONS: &[&str] = &[
    "Defective",
    "Wrong item shipped",
    "Changed mind",
    "Not as described",
    "Better price elsewhere",
    "Arrived too late",
];

const PROMOTION_NAMES: &[&str] = &[
    "Summer Sale",
    "Winter Clearance",
    "Black Friday",
    "Cyber Monday",
    "Spring Refresh",
    "Back to School",
    "Holiday Special",
    "Flash Deal",
    "Member Exclusive",
    "New Year Kickoff",
    "Anniversary Event",
    "Weekend Blowout",
];

#[derive(Debug)]
pub struct EngagementData {
    pub reviews: Vec<ProductReview>,
    pub promotions: Vec<Promotion>,
    pub addresses: Vec<CustomerAddress>,
    pub returns: Vec<ReturnRecord>,
}

pub fn generate(
    config: &GeneratorConfig,
    actors: &ActorData,
    catalog: &CatalogData,
    txn: &TransactionData,
    rng: &mut StdRng,
) -> Result<EngagementData> {
    // actual delivery date per delivered order, for reviews and returns
    let delivery_dates: HashMap<i64, chrono::NaiveDate> = txn
        .shipping
        .iter()
        .filter_map(|s| s.actual_delivery.map(|d| (s.order_id, d)))
        .collect();

    let reviews = generate_reviews(config, actors, catalog, txn, &delivery_dates, rng)?;
    let promotions = generate_promotions(config, rng)?;
    let addresses = generate_addresses(config, actors, rng);
    let returns = generate_returns(config, txn, &delivery_dates, rng);

    Ok(EngagementData {
        reviews,
        promotions,
        addresses,
        returns,
    })
}

fn generate_reviews(
    config: &GeneratorConfig,
    actors: &ActorData,
    catalog: &CatalogData,
    txn: &TransactionData,
    delivery_dates: &HashMap<i64, chrono::NaiveDate>,
    rng: &mut StdRng,
) -> Result<Vec<ProductReview>> {
    let base = config.window.base_time();
    let count = config.counts.reviews;

    // Distinct (customer, product) pairs from delivered orders, with the
    // delivery date the review must postdate. Sorted for determinism, then
    // partially shuffled so verified reviews sample uniformly.
    let mut pair_dates: HashMap<(i64, i64), chrono::NaiveDate> = HashMap::new();
    for order in &txn.orders {
        if order.order_status != OrderStatus::Delivered {
            continue;
        }
        let Some(delivered) = delivery_dates.get(&order.order_id) else {
            continue;
        };
        for item in txn.order_items.iter().filter(|i| i.order_id == order.order_id) {
            pair_dates
                .entry((order.customer_id, item.product_id))
                .and_modify(|d| *d = (*d).min(*delivered))
                .or_insert(*delivered);
        }
    }
    let mut verified_pool: Vec<((i64, i64), chrono::NaiveDate)> =
        pair_dates.into_iter().collect();
    verified_pool.sort_by_key(|(pair, _)| *pair);

    let verified_target =
        ((count as f64) * config.engagement.verified_review_fraction).round() as usize;
    let verified_count = verified_target.min(verified_pool.len());
    if verified_count < verified_target {
        tracing::warn!(
            "Only {} delivered customer/product pairs available for {} verified reviews; \
             the remainder will be unverified",
            verified_pool.len(),
            verified_target
        );
    }
    // Partial Fisher–Yates: the first verified_count slots end up a uniform
    // sample without shuffling the whole pool
    for i in 0..verified_count {
        let j = rng.random_range(i..verified_pool.len());
        verified_pool.swap(i, j);
    }

    let mut used_pairs: HashSet<(i64, i64)> =
        verified_pool[..verified_count].iter().map(|(p, _)| *p).collect();

    let mut reviews = Vec::with_capacity(count);
    for i in 0..count {
        let review_id = i as i64 + 1;
        let (customer_id, product_id, is_verified, earliest) = if i < verified_count {
            let ((c, p), delivered) = verified_pool[i];
            let floor = delivered
                .and_hms_opt(0, 0, 0)
                .unwrap_or_else(|| config.window.window_start(base));
            (c, p, true, floor)
        } else {
            // Unverified: any customer, any product, no purchase required —
            // but never duplicate an existing reviewer/product pair. Bounded
            // retries so an over-asked review count fails instead of spinning.
            let mut drawn = None;
            for _ in 0..MAX_PAIR_RETRIES {
                let c =
                    actors.customers[rng.random_range(0..actors.customers.len())].customer_id;
                let p =
                    catalog.products[rng.random_range(0..catalog.products.len())].product_id;
                if used_pairs.insert((c, p)) {
                    drawn = Some((c, p));
                    break;
                }
            }
            let Some((c, p)) = drawn else {
                return Err(StoregenError::Config {
                    message: format!(
                        "counts.reviews = {} asks for more distinct reviewer/product pairs \
                         than {} customers x {} products can supply",
                        count,
                        actors.customers.len(),
                        catalog.products.len()
                    ),
                });
            };
            let registration =
                actors.customers[(c - 1) as usize].registration_date;
            (c, p, false, registration)
        };

        let rating =
            providers::weighted_index(rng, &config.engagement.rating_weights) as i64 + 1;
        let titles = REVIEW_TITLES[(rating - 1) as usize];

        reviews.push(ProductReview {
            review_id,
            product_id,
            customer_id,
            rating,
            review_title: titles[rng.random_range(0..titles.len())].to_string(),
            review_text: providers::paragraph(rng, 1..4),
            is_verified_purchase: is_verified,
            review_date: providers::datetime_between(rng, earliest.min(base), base),
            // Polarized reviews attract more votes than middling ones
            helpful_count: rng.random_range(0..=(20 + 50 * (rating - 3).abs())),
        });
    }

    Ok(reviews)
}

fn generate_promotions(config: &GeneratorConfig, rng: &mut StdRng) -> Result<Vec<Promotion>> {
    let base = config.window.base_time();
    let mut codes = UniqueSet::new();
    let mut promotions = Vec::with_capacity(config.counts.promotions);

    for i in 0..config.counts.promotions {
        let discount_type = match rng.random_range(0..10) {
            0..=5 => DiscountType::Percentage,
            6..=8 => DiscountType::FixedAmount,
            _ => DiscountType::FreeShipping,
        };
        let (code, discount_value, max_discount_amount) = match discount_type {
            DiscountType::Percentage => {
                let pct = rng.random_range(5..=50);
                let cap = if rng.random_bool(0.5) {
                    Some(round2(rng.random_range(20.0..=100.0)))
                } else {
                    None
                };
                (format!("SAVE{}", pct), pct as f64, cap)
            }
            DiscountType::FixedAmount => {
                let amount = rng.random_range(5..=100);
                (format!("GET{}OFF", amount), amount as f64, None)
            }
            DiscountType::FreeShipping => {
                (format!("FREESHIP{}", providers::alphanumeric(rng, 4)), 0.0, None)
            }
        };
        let code = codes.draw("promotions", "promotion_code", i, || {
            format!("{}{}", code, providers::alphanumeric(rng, 3))
        })?;

        // Campaigns start within the last year; late starters run past the
        // base date, so currently-valid promotions show up reliably.
        let start_date =
            providers::date_between(rng, base.date() - Duration::days(365), base.date());
        let end_date = start_date + Duration::days(rng.random_range(7..=180));
        let usage_limit = rng.random_range(50..=1000);

        let name = PROMOTION_NAMES[rng.random_range(0..PROMOTION_NAMES.len())];
        promotions.push(Promotion {
            promotion_id: i as i64 + 1,
            promotion_name: format!("{} {}", name, start_date.format("%Y")),
            promotion_code: code,
            discount_type,
            discount_value,
            start_date,
            end_date,
            min_purchase_amount: round2(rng.random_range(0.0..=200.0)),
            max_discount_amount,
            usage_limit,
            // never exceeds the limit by construction
            times_used: rng.random_range(0..=usage_limit),
            is_active: rng.random_bool(config.engagement.promotion_active_ratio),
        });
    }

    Ok(promotions)
}

/// Every customer gets a default shipping address mirroring their profile;
/// a configurable fraction gets a second, non-default billing address.
fn generate_addresses(
    config: &GeneratorConfig,
    actors: &ActorData,
    rng: &mut StdRng,
) -> Vec<CustomerAddress> {
    let mut addresses = Vec::with_capacity(actors.customers.len());
    let mut address_id = 0;

    for customer in &actors.customers {
        address_id += 1;
        addresses.push(CustomerAddress {
            address_id,
            customer_id: customer.customer_id,
            address_type: AddressType::Shipping,
            street_address: customer.address.clone(),
            city: customer.city.clone(),
            state: customer.state.clone(),
            country: customer.country.clone(),
            postal_code: customer.postal_code.clone(),
            is_default: true,
        });

        if rng.random_bool(config.engagement.second_address_fraction) {
            address_id += 1;
            addresses.push(CustomerAddress {
                address_id,
                customer_id: customer.customer_id,
                address_type: AddressType::Billing,
                street_address: providers::street_address(rng),
                city: providers::city(rng),
                state: providers::state(rng),
                country: customer.country.clone(),
                postal_code: providers::postal_code(rng),
                is_default: false,
            });
        }
    }

    addresses
}

/// Returns sample delivered line items. The refund never exceeds what the
/// line actually charged, and the return date always postdates delivery.
fn generate_returns(
    config: &GeneratorConfig,
    txn: &TransactionData,
    delivery_dates: &HashMap<i64, chrono::NaiveDate>,
    rng: &mut StdRng,
) -> Vec<ReturnRecord> {
    let base_date = config.window.base_time().date();
    let delivered_orders: HashSet<i64> = txn
        .orders
        .iter()
        .filter(|o| o.order_status == OrderStatus::Delivered)
        .map(|o| o.order_id)
        .collect();

    let mut returns = Vec::new();
    for item in &txn.order_items {
        if !delivered_orders.contains(&item.order_id) {
            continue;
        }
        if !rng.random_bool(config.engagement.return_rate) {
            continue;
        }
        let Some(delivered) = delivery_dates.get(&item.order_id) else {
            continue;
        };
        let return_date = *delivered + Duration::days(rng.random_range(1..=30));
        if return_date > base_date {
            // Too recent to have come back yet
            continue;
        }

        let quantity = rng.random_range(1..=item.quantity);
        let refund = round2(quantity as f64 * item.unit_price * (1.0 - item.discount));
        let return_status = match providers::weighted_index(rng, &[1.0, 2.0, 6.0, 1.0]) {
            0 => ReturnStatus::Requested,
            1 => ReturnStatus::Approved,
            2 => ReturnStatus::Refunded,
            _ => ReturnStatus::Rejected,
        };

        returns.push(ReturnRecord {
            return_id: returns.len() as i64 + 1,
            order_id: item.order_id,
            product_id: item.product_id,
            quantity,
            reason: RETURN_REASONS[rng.random_range(0..RETURN_REASONS.len())].to_string(),
            return_date,
            refund_amount: refund.min(item.subtotal),
            return_status,
        });
    }

    returns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::{actors, catalog, reference, transactions};
    use chrono::NaiveDate;
    use rand::SeedableRng;

    struct Fixture {
        config: GeneratorConfig,
        actors: ActorData,
        txn: TransactionData,
        engagement: EngagementData,
    }

    fn run() -> Fixture {
        let mut config = GeneratorConfig::default();
        config.window.base_date = NaiveDate::from_ymd_opt(2025, 6, 15);
        config.counts.employees = 30;
        config.counts.customers = 150;
        config.counts.products = 100;
        config.counts.orders = 400;
        config.counts.reviews = 200;
        let mut rng = StdRng::seed_from_u64(42);
        let refs = reference::generate(&config, &mut rng).unwrap();
        let actors = actors::generate(&config, &refs, &mut rng).unwrap();
        let catalog = catalog::generate(&config, &refs, &mut rng).unwrap();
        let txn = transactions::generate(&config, &actors, &catalog, &mut rng).unwrap();
        let engagement = generate(&config, &actors, &catalog, &txn, &mut rng).unwrap();
        Fixture {
            config,
            actors,
            txn,
            engagement,
        }
    }

    #[test]
    fn test_verified_reviews_trace_to_delivered_purchases() {
        let f = run();
        let delivered: HashSet<i64> = f
            .txn
            .orders
            .iter()
            .filter(|o| o.order_status == OrderStatus::Delivered)
            .map(|o| o.order_id)
            .collect();
        let purchased: HashSet<(i64, i64)> = f
            .txn
            .order_items
            .iter()
            .filter(|i| delivered.contains(&i.order_id))
            .map(|i| {
                let order = &f.txn.orders[(i.order_id - 1) as usize];
                (order.customer_id, i.product_id)
            })
            .collect();
        for review in f.engagement.reviews.iter().filter(|r| r.is_verified_purchase) {
            assert!(purchased.contains(&(review.customer_id, review.product_id)));
        }
        let verified = f
            .engagement
            .reviews
            .iter()
            .filter(|r| r.is_verified_purchase)
            .count();
        assert!(verified > 0);
    }

    #[test]
    fn test_no_duplicate_reviewer_product_pairs() {
        let f = run();
        let mut seen = HashSet::new();
        for r in &f.engagement.reviews {
            assert!(seen.insert((r.customer_id, r.product_id)));
        }
    }

    #[test]
    fn test_ratings_right_skewed() {
        let f = run();
        let high = f.engagement.reviews.iter().filter(|r| r.rating >= 4).count();
        let low = f.engagement.reviews.iter().filter(|r| r.rating <= 2).count();
        assert!(high > low);
        for r in &f.engagement.reviews {
            assert!((1..=5).contains(&r.rating));
        }
    }

    #[test]
    fn test_review_pair_saturation_terminates() {
        // Every possible reviewer/product pair gets used exactly once.
        let mut config = GeneratorConfig::default();
        config.window.base_date = NaiveDate::from_ymd_opt(2025, 6, 15);
        config.counts.employees = 10;
        config.counts.customers = 5;
        config.counts.products = 5;
        config.counts.orders = 20;
        config.counts.reviews = 25;
        let mut rng = StdRng::seed_from_u64(7);
        let refs = reference::generate(&config, &mut rng).unwrap();
        let actors = actors::generate(&config, &refs, &mut rng).unwrap();
        let catalog = catalog::generate(&config, &refs, &mut rng).unwrap();
        let txn = transactions::generate(&config, &actors, &catalog, &mut rng).unwrap();
        let engagement = generate(&config, &actors, &catalog, &txn, &mut rng).unwrap();
        assert_eq!(engagement.reviews.len(), 25);
        let pairs: HashSet<(i64, i64)> = engagement
            .reviews
            .iter()
            .map(|r| (r.customer_id, r.product_id))
            .collect();
        assert_eq!(pairs.len(), 25);
    }

    #[test]
    fn test_helpful_count_tracks_rating_extremity() {
        let f = run();
        for r in &f.engagement.reviews {
            assert!(r.helpful_count <= 20 + 50 * (r.rating - 3).abs());
        }
        // Extreme ratings can exceed the cap a neutral review is held to
        assert!(f
            .engagement
            .reviews
            .iter()
            .any(|r| (r.rating - 3).abs() == 2 && r.helpful_count > 20));
    }

    #[test]
    fn test_promotion_usage_within_limit() {
        let f = run();
        assert_eq!(f.engagement.promotions.len(), f.config.counts.promotions);
        for p in &f.engagement.promotions {
            assert!(p.times_used <= p.usage_limit);
            assert!(p.end_date > p.start_date);
            if p.discount_type == DiscountType::FreeShipping {
                assert_eq!(p.discount_value, 0.0);
            } else {
                assert!(p.discount_value > 0.0);
            }
        }
        let mut codes: Vec<_> = f.engagement.promotions.iter().map(|p| &p.promotion_code).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), f.engagement.promotions.len());
    }

    #[test]
    fn test_promotions_are_recent_campaigns() {
        let f = run();
        let base = f.config.window.base_time().date();
        for p in &f.engagement.promotions {
            assert!(p.start_date >= base - Duration::days(365));
            assert!(p.start_date <= base);
        }
        // A mix of expired and still-running campaigns
        assert!(f.engagement.promotions.iter().any(|p| p.end_date > base));
        assert!(f.engagement.promotions.iter().any(|p| p.end_date <= base));
    }

    #[test]
    fn test_every_customer_has_default_shipping_address() {
        let f = run();
        for customer in &f.actors.customers {
            let defaults: Vec<_> = f
                .engagement
                .addresses
                .iter()
                .filter(|a| a.customer_id == customer.customer_id && a.is_default)
                .collect();
            assert_eq!(defaults.len(), 1);
            assert_eq!(defaults[0].address_type, AddressType::Shipping);
        }
        assert!(f.engagement.addresses.len() >= f.actors.customers.len());
    }

    #[test]
    fn test_returns_reference_delivered_items_with_capped_refund() {
        let f = run();
        for ret in &f.engagement.returns {
            let order = &f.txn.orders[(ret.order_id - 1) as usize];
            assert_eq!(order.order_status, OrderStatus::Delivered);
            let item = f
                .txn
                .order_items
                .iter()
                .find(|i| i.order_id == ret.order_id && i.product_id == ret.product_id)
                .expect("return must match a line item");
            assert!(ret.quantity >= 1 && ret.quantity <= item.quantity);
            assert!(ret.refund_amount <= item.subtotal + 1e-9);

            let delivery = f
                .txn
                .shipping
                .iter()
                .find(|s| s.order_id == ret.order_id)
                .and_then(|s| s.actual_delivery)
                .expect("delivered order has a delivery date");
            assert!(ret.return_date > delivery);
        }
        assert!(!f.engagement.returns.is_empty());
    }
}
