//! # Dataset Generation Pipeline
//!
//! Produces the full relational dataset in six dependency-ordered stages, all
//! driven by one seeded RNG:
//!
//! 1. **reference** — departments, categories, suppliers
//! 2. **actors** — employees, customers
//! 3. **catalog** — products, inventory
//! 4. **transactions** — orders, order items, payments, shipping
//! 5. **finalize** — re-derive order totals from line items
//! 6. **engagement** — reviews, promotions, addresses, returns
//!
//! Each stage receives the previous stages' output by reference, so a foreign
//! key can only ever point at a row that already exists. The RNG is a single
//! `StdRng` threaded `&mut` through every stage in a fixed order: the same
//! seed and pinned base date reproduce the dataset byte for byte.

pub mod actors;
pub mod catalog;
pub mod engagement;
pub mod finalize;
pub mod providers;
pub mod reference;
pub mod transactions;
pub mod unique;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::GeneratorConfig;
use crate::dataset::Dataset;
use crate::error::Result;

/// Stage names in execution order, for progress reporting.
pub const STAGES: [&str; 6] = [
    "reference",
    "actors",
    "catalog",
    "transactions",
    "finalize",
    "engagement",
];

/// Callback invoked as each stage begins: `(stage_index, stage_name)`.
pub type StageCallback<'a> = Option<&'a (dyn Fn(usize, &str) + Send + Sync)>;

/// Run the full pipeline and assemble the in-memory dataset.
pub fn generate_dataset(config: &GeneratorConfig, on_stage: StageCallback) -> Result<Dataset> {
    config.validate()?;

    let base = config.window.base_time();
    tracing::info!(
        seed = config.seed,
        base_date = %base.date(),
        years_back = config.window.years_back,
        "starting generation"
    );

    let mut rng = StdRng::seed_from_u64(config.seed);
    let notify = |index: usize| {
        if let Some(cb) = on_stage {
            cb(index, STAGES[index]);
        }
        tracing::info!(stage = STAGES[index], "generating");
    };

    notify(0);
    let reference = reference::generate(config, &mut rng)?;

    notify(1);
    let actors = actors::generate(config, &reference, &mut rng)?;

    notify(2);
    let catalog = catalog::generate(config, &reference, &mut rng)?;

    notify(3);
    let mut txn = transactions::generate(config, &actors, &catalog, &mut rng)?;

    notify(4);
    finalize::finalize_totals(config, &mut txn);

    notify(5);
    let engagement = engagement::generate(config, &actors, &catalog, &txn, &mut rng)?;

    let dataset = Dataset {
        departments: reference.departments,
        employees: actors.employees,
        customers: actors.customers,
        suppliers: reference.suppliers,
        categories: reference.categories,
        products: catalog.products,
        inventory: catalog.inventory,
        orders: txn.orders,
        order_items: txn.order_items,
        payments: txn.payments,
        shipping: txn.shipping,
        product_reviews: engagement.reviews,
        promotions: engagement.promotions,
        customer_addresses: engagement.addresses,
        returns: engagement.returns,
    };

    tracing::info!(total_rows = dataset.total_rows(), "generation complete");
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn small_config() -> GeneratorConfig {
        let mut config = GeneratorConfig::default();
        config.window.base_date = NaiveDate::from_ymd_opt(2025, 6, 15);
        config.counts.employees = 25;
        config.counts.customers = 80;
        config.counts.products = 60;
        config.counts.orders = 150;
        config.counts.reviews = 90;
        config.counts.promotions = 10;
        config
    }

    #[test]
    fn test_pipeline_produces_all_tables() {
        let config = small_config();
        let dataset = generate_dataset(&config, None).unwrap();
        assert_eq!(dataset.departments.len(), config.counts.departments);
        assert_eq!(dataset.customers.len(), 80);
        assert_eq!(dataset.products.len(), 60);
        assert_eq!(dataset.inventory.len(), 60);
        assert_eq!(dataset.orders.len(), 150);
        assert!(!dataset.order_items.is_empty());
        assert!(!dataset.payments.is_empty());
        assert!(!dataset.shipping.is_empty());
        assert_eq!(dataset.product_reviews.len(), 90);
        assert_eq!(dataset.promotions.len(), 10);
        assert!(dataset.customer_addresses.len() >= 80);
    }

    #[test]
    fn test_stage_callback_fires_in_order() {
        let config = small_config();
        let counter = AtomicUsize::new(0);
        let cb = |index: usize, name: &str| {
            assert_eq!(index, counter.fetch_add(1, Ordering::SeqCst));
            assert_eq!(name, STAGES[index]);
        };
        generate_dataset(&config, Some(&cb)).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), STAGES.len());
    }

    #[test]
    fn test_same_seed_same_dataset() {
        let config = small_config();
        let a = generate_dataset(&config, None).unwrap();
        let b = generate_dataset(&config, None).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_different_seed_different_dataset() {
        let mut config = small_config();
        let a = generate_dataset(&config, None).unwrap();
        config.seed = 43;
        let b = generate_dataset(&config, None).unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_invalid_config_rejected_before_generation() {
        let mut config = small_config();
        config.pricing.markup_min = 0.5;
        assert!(generate_dataset(&config, None).is_err());
    }
}
