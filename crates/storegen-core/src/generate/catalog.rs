//! Stage 3 — catalog: products and inventory.
//!
//! Pricing is cost-first: draw a cost, then a markup above 1.0, so
//! `unit_price > cost_price` holds for every product without a fixup pass.
//! Each product gets exactly one inventory row, and a configurable slice of
//! the catalog is forced to or below its reorder level so low-stock reports
//! have something to show.

use chrono::Duration;
use rand::rngs::StdRng;
use rand::Rng;

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::model::{round2, InventoryRecord, Product};

use super::providers;
use super::reference::ReferenceData;
use super::unique::UniqueSet;

const NAME_PREFIXES: &[&str] = &[
    "Premium", "Deluxe", "Professional", "Classic", "Modern", "Compact", "Wireless", "Smart",
    "Portable", "Heavy-Duty", "Eco-Friendly", "Ultra",
];

const PRODUCT_TYPES: &[&str] = &[
    "Laptop",
    "Headphones",
    "Keyboard",
    "Monitor",
    "Desk Chair",
    "Backpack",
    "Water Bottle",
    "Running Shoes",
    "Jacket",
    "Coffee Maker",
    "Blender",
    "Desk Lamp",
    "Notebook",
    "Yoga Mat",
    "Tent",
    "Camera",
    "Speaker",
    "Charger",
    "Toolkit",
    "Board Game",
];

const WAREHOUSES: &[&str] = &["Warehouse A", "Warehouse B", "Warehouse C", "Distribution Center"];

#[derive(Debug)]
pub struct CatalogData {
    pub products: Vec<Product>,
    pub inventory: Vec<InventoryRecord>,
}

pub fn generate(
    config: &GeneratorConfig,
    reference: &ReferenceData,
    rng: &mut StdRng,
) -> Result<CatalogData> {
    let products = generate_products(config, reference, rng)?;
    let inventory = generate_inventory(config, &products, rng);
    Ok(CatalogData { products, inventory })
}

fn generate_products(
    config: &GeneratorConfig,
    reference: &ReferenceData,
    rng: &mut StdRng,
) -> Result<Vec<Product>> {
    let mut skus = UniqueSet::new();
    let mut products = Vec::with_capacity(config.counts.products);

    for i in 0..config.counts.products {
        let prefix = NAME_PREFIXES[rng.random_range(0..NAME_PREFIXES.len())];
        let kind = PRODUCT_TYPES[rng.random_range(0..PRODUCT_TYPES.len())];
        let sku = skus.draw("products", "sku", i, || providers::sku(rng))?;

        let cost = round2(rng.random_range(config.pricing.cost_min..=config.pricing.cost_max));
        let markup = rng.random_range(config.pricing.markup_min..=config.pricing.markup_max);

        products.push(Product {
            product_id: i as i64 + 1,
            product_name: format!("{} {}", prefix, kind),
            sku,
            category_id: reference.categories[rng.random_range(0..reference.categories.len())]
                .category_id,
            supplier_id: reference.suppliers[rng.random_range(0..reference.suppliers.len())]
                .supplier_id,
            description: providers::paragraph(rng, 1..3),
            unit_price: round2(cost * markup),
            cost_price: cost,
            weight: round2(rng.random_range(0.1..=50.0)),
            is_active: rng.random_bool(0.9),
        });
    }

    Ok(products)
}

fn generate_inventory(
    config: &GeneratorConfig,
    products: &[Product],
    rng: &mut StdRng,
) -> Vec<InventoryRecord> {
    let inv = &config.inventory;
    let low_stock_count =
        ((products.len() as f64) * inv.low_stock_fraction).round() as usize;
    let base = config.window.base_time().date();
    let restock_start = base - Duration::days(180);

    let mut records = Vec::with_capacity(products.len());
    for (i, product) in products.iter().enumerate() {
        let reorder_level = rng.random_range(inv.reorder_min..=inv.reorder_max);
        // The first `low_stock_count` products are pinned at or below their
        // reorder level; everyone else stocks above it when the range allows.
        let quantity_on_hand = if i < low_stock_count {
            rng.random_range(0..=reorder_level)
        } else {
            let floor = (reorder_level + 1).min(inv.quantity_max).max(inv.quantity_min);
            rng.random_range(floor..=inv.quantity_max.max(floor))
        };

        records.push(InventoryRecord {
            inventory_id: i as i64 + 1,
            product_id: product.product_id,
            warehouse_location: WAREHOUSES[rng.random_range(0..WAREHOUSES.len())].to_string(),
            quantity_on_hand,
            reorder_level,
            reorder_quantity: reorder_level * rng.random_range(2..=5),
            last_restock_date: providers::date_between(rng, restock_start, base),
        });
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::reference;
    use chrono::NaiveDate;
    use rand::SeedableRng;

    fn run() -> (GeneratorConfig, CatalogData) {
        let mut config = GeneratorConfig::default();
        config.window.base_date = NaiveDate::from_ymd_opt(2025, 6, 15);
        config.counts.products = 200;
        let mut rng = StdRng::seed_from_u64(42);
        let refs = reference::generate(&config, &mut rng).unwrap();
        let catalog = generate(&config, &refs, &mut rng).unwrap();
        (config, catalog)
    }

    #[test]
    fn test_margin_always_positive() {
        let (_, catalog) = run();
        for p in &catalog.products {
            assert!(p.unit_price > p.cost_price, "{} <= {}", p.unit_price, p.cost_price);
            assert!(p.cost_price > 0.0);
        }
    }

    #[test]
    fn test_skus_unique() {
        let (_, catalog) = run();
        let mut skus: Vec<_> = catalog.products.iter().map(|p| &p.sku).collect();
        skus.sort();
        skus.dedup();
        assert_eq!(skus.len(), catalog.products.len());
    }

    #[test]
    fn test_one_inventory_row_per_product() {
        let (_, catalog) = run();
        assert_eq!(catalog.inventory.len(), catalog.products.len());
        for (inv, p) in catalog.inventory.iter().zip(&catalog.products) {
            assert_eq!(inv.product_id, p.product_id);
        }
    }

    #[test]
    fn test_low_stock_slice_exists() {
        let (config, catalog) = run();
        let low = catalog
            .inventory
            .iter()
            .filter(|r| r.quantity_on_hand <= r.reorder_level)
            .count();
        let expected =
            ((catalog.products.len() as f64) * config.inventory.low_stock_fraction).round() as usize;
        assert!(low >= expected, "{} < {}", low, expected);
    }

    #[test]
    fn test_inventory_quantities_non_negative() {
        let (config, catalog) = run();
        for r in &catalog.inventory {
            assert!(r.quantity_on_hand >= 0);
            assert!(r.quantity_on_hand <= config.inventory.quantity_max);
            assert!(r.reorder_level >= config.inventory.reorder_min);
            assert!(r.reorder_quantity >= r.reorder_level * 2);
        }
    }

    #[test]
    fn test_category_and_supplier_references_valid() {
        let (config, catalog) = run();
        for p in &catalog.products {
            assert!(p.category_id >= 1 && p.category_id <= config.counts.categories as i64);
            assert!(p.supplier_id >= 1 && p.supplier_id <= config.counts.suppliers as i64);
        }
    }
}
