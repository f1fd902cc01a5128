//! # Configuration File Parser
//!
//! Reads and parses `storegen.toml`, the optional user configuration file
//! that customizes the generator without requiring CLI flags. Every knob has
//! a default, so an empty file (or no file) produces the standard dataset.
//!
//! Example `storegen.toml`:
//!
//! ```toml
//! seed = 42
//!
//! [database]
//! url = "sqlite://ecommerce.db"
//!
//! [counts]
//! customers = 2000
//! orders = 3000
//!
//! [window]
//! years_back = 3
//! base_date = "2025-06-15"
//!
//! [pricing]
//! markup_min = 1.2
//! markup_max = 2.5
//! tax_rate = 0.08
//!
//! [orders]
//! split_payment_probability = 0.1
//!
//! [engagement]
//! verified_review_fraction = 0.7
//! ```

use std::path::Path;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::error::{Result, StoregenError};

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "storegen.toml";

/// Top-level storegen.toml structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Random seed. Same seed (and pinned base date) reproduces the dataset
    /// byte for byte.
    pub seed: u64,
    pub database: DatabaseConfig,
    pub counts: CountsConfig,
    pub window: WindowConfig,
    pub reference: ReferenceConfig,
    pub actors: ActorsConfig,
    pub pricing: PricingConfig,
    pub inventory: InventoryConfig,
    pub orders: OrdersConfig,
    pub engagement: EngagementConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            database: DatabaseConfig::default(),
            counts: CountsConfig::default(),
            window: WindowConfig::default(),
            reference: ReferenceConfig::default(),
            actors: ActorsConfig::default(),
            pricing: PricingConfig::default(),
            inventory: InventoryConfig::default(),
            orders: OrdersConfig::default(),
            engagement: EngagementConfig::default(),
        }
    }
}

/// Database connection configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database URL (e.g., "sqlite://ecommerce.db").
    pub url: Option<String>,
}

/// Record counts per table. Dependent tables (inventory, order_items,
/// payments, shipping, addresses, returns) derive their sizes from these.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CountsConfig {
    pub departments: usize,
    pub employees: usize,
    pub customers: usize,
    pub suppliers: usize,
    pub categories: usize,
    pub products: usize,
    pub orders: usize,
    pub reviews: usize,
    pub promotions: usize,
}

impl Default for CountsConfig {
    fn default() -> Self {
        Self {
            departments: 8,
            employees: 150,
            customers: 2000,
            suppliers: 50,
            categories: 20,
            products: 500,
            orders: 3000,
            reviews: 1500,
            promotions: 25,
        }
    }
}

/// The historical window all timestamps are sampled from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// How many years before the base date the window opens.
    pub years_back: u32,
    /// Pinned generation "now". Unset, it defaults to today — pin it when
    /// byte-identical regeneration across days matters (tests always do).
    pub base_date: Option<NaiveDate>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            years_back: 3,
            base_date: None,
        }
    }
}

impl WindowConfig {
    /// The wall-clock anchor every temporal value derives from.
    pub fn base_time(&self) -> NaiveDateTime {
        let date = self
            .base_date
            .unwrap_or_else(|| chrono::Utc::now().date_naive());
        // Noon, so same-day sampling has room on both sides.
        date.and_hms_opt(12, 0, 0).unwrap_or_else(|| {
            date.and_time(chrono::NaiveTime::default())
        })
    }

    /// Opening edge of the historical window.
    pub fn window_start(&self, base: NaiveDateTime) -> NaiveDateTime {
        base - Duration::days(self.years_back as i64 * 365)
    }
}

/// Reference-data knobs: departments, categories, suppliers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// Curated department name pool, drawn without replacement.
    pub department_names: Vec<String>,
    /// Allow reusing pool names (with a numeric suffix) when the requested
    /// department count exceeds the pool.
    pub allow_duplicate_names: bool,
    /// How many categories are top-level (NULL parent).
    pub top_level_categories: usize,
    pub budget_min: f64,
    pub budget_max: f64,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            department_names: [
                "Sales",
                "Marketing",
                "IT",
                "Human Resources",
                "Finance",
                "Operations",
                "Customer Service",
                "Logistics",
                "Legal",
                "Procurement",
                "Product",
                "Engineering",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            allow_duplicate_names: false,
            top_level_categories: 10,
            budget_min: 100_000.0,
            budget_max: 1_000_000.0,
        }
    }
}

/// Employee and customer knobs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ActorsConfig {
    pub employee_active_ratio: f64,
    pub customer_active_ratio: f64,
    /// Employees are hired uniformly over this many years before the base
    /// date, independent of the order window.
    pub employment_years: u32,
}

impl Default for ActorsConfig {
    fn default() -> Self {
        Self {
            employee_active_ratio: 0.75,
            customer_active_ratio: 0.9,
            employment_years: 10,
        }
    }
}

/// Product pricing. `unit_price` is always `cost_price × markup`, so margins
/// can never go negative as long as `markup_min > 1`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub cost_min: f64,
    pub cost_max: f64,
    pub markup_min: f64,
    pub markup_max: f64,
    pub tax_rate: f64,
    /// Flat shipping fee pool, sampled uniformly per order.
    pub shipping_fees: Vec<f64>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            cost_min: 10.0,
            cost_max: 500.0,
            markup_min: 1.2,
            markup_max: 2.5,
            tax_rate: 0.08,
            shipping_fees: vec![0.0, 5.99, 9.99, 14.99],
        }
    }
}

/// Inventory knobs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    pub quantity_min: i64,
    pub quantity_max: i64,
    pub reorder_min: i64,
    pub reorder_max: i64,
    /// Fraction of products deliberately forced to or below their reorder
    /// level so low-stock-alert queries return rows.
    pub low_stock_fraction: f64,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            quantity_min: 0,
            quantity_max: 500,
            reorder_min: 10,
            reorder_max: 50,
            low_stock_fraction: 0.08,
        }
    }
}

/// Transaction knobs: orders, items, payments, shipping.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OrdersConfig {
    pub max_items_per_order: usize,
    pub max_quantity: i64,
    /// Fraction of line items that get a discount.
    pub line_discount_fraction: f64,
    /// Largest line discount, as a fraction of the line price.
    pub max_line_discount: f64,
    /// Fraction of orders with an order-level discount_amount.
    pub order_discount_fraction: f64,
    /// Orders younger than this many days use `recent_status_weights`.
    pub recent_days: i64,
    /// Weights over [Pending, Processing, Shipped, Delivered, Cancelled]
    /// for recent orders.
    pub recent_status_weights: [f64; 5],
    /// Weights for orders old enough to have settled.
    pub settled_status_weights: [f64; 5],
    /// Probability a charged order is split across two payments.
    pub split_payment_probability: f64,
    /// Fraction of delivered orders that arrive after the carrier estimate.
    pub late_delivery_fraction: f64,
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            max_items_per_order: 8,
            max_quantity: 10,
            line_discount_fraction: 0.3,
            max_line_discount: 0.30,
            order_discount_fraction: 0.1,
            recent_days: 30,
            recent_status_weights: [30.0, 30.0, 20.0, 10.0, 10.0],
            settled_status_weights: [2.0, 5.0, 13.0, 72.0, 8.0],
            split_payment_probability: 0.1,
            late_delivery_fraction: 0.2,
        }
    }
}

/// Engagement knobs: reviews, promotions, addresses, returns.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngagementConfig {
    /// Fraction of reviews drawn from real delivered (customer, product)
    /// pairs and flagged as verified purchases.
    pub verified_review_fraction: f64,
    /// Weights over ratings 1..=5, right-skewed like real review data.
    pub rating_weights: [f64; 5],
    /// Fraction of customers with a second (billing) address.
    pub second_address_fraction: f64,
    /// Fraction of delivered order items that come back as returns.
    pub return_rate: f64,
    /// Fraction of promotions flagged active.
    pub promotion_active_ratio: f64,
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            verified_review_fraction: 0.7,
            rating_weights: [2.0, 3.0, 10.0, 35.0, 50.0],
            second_address_fraction: 0.3,
            return_rate: 0.05,
            promotion_active_ratio: 0.67,
        }
    }
}

/// Read and parse a storegen.toml file from the given directory.
///
/// Returns `None` if the file doesn't exist (config is optional).
/// Returns an error if the file exists but can't be parsed or validated.
pub fn read_config(dir: &Path) -> Result<Option<GeneratorConfig>> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path).map_err(|e| StoregenError::Config {
        message: format!("Failed to read {}: {}", path.display(), e),
    })?;

    let config: GeneratorConfig = toml::from_str(&content).map_err(|e| StoregenError::Config {
        message: format!("Failed to parse {}: {}", path.display(), e),
    })?;

    config.validate()?;

    Ok(Some(config))
}

impl GeneratorConfig {
    /// Validate semantic constraints that serde cannot enforce.
    ///
    /// Call this immediately after parsing (and before generation). Catches
    /// configuration mistakes before any rows are produced.
    pub fn validate(&self) -> Result<()> {
        fn fraction(name: &str, value: f64) -> Result<()> {
            if !(0.0..=1.0).contains(&value) {
                return Err(StoregenError::Config {
                    message: format!("{} must be between 0 and 1, got {}", name, value),
                });
            }
            Ok(())
        }

        if self.pricing.markup_min <= 1.0 {
            return Err(StoregenError::Config {
                message: format!(
                    "pricing.markup_min must be > 1.0 so unit_price stays above cost_price, got {}",
                    self.pricing.markup_min
                ),
            });
        }
        if self.pricing.markup_min > self.pricing.markup_max {
            return Err(StoregenError::Config {
                message: format!(
                    "pricing.markup_min ({}) exceeds pricing.markup_max ({})",
                    self.pricing.markup_min, self.pricing.markup_max
                ),
            });
        }
        if self.pricing.cost_min <= 0.0 || self.pricing.cost_min >= self.pricing.cost_max {
            return Err(StoregenError::Config {
                message: format!(
                    "pricing cost range [{}, {}] must be positive and ascending",
                    self.pricing.cost_min, self.pricing.cost_max
                ),
            });
        }
        if self.pricing.shipping_fees.is_empty() {
            return Err(StoregenError::Config {
                message: "pricing.shipping_fees must not be empty".to_string(),
            });
        }

        if self.counts.departments == 0
            || self.counts.customers == 0
            || self.counts.suppliers == 0
            || self.counts.categories == 0
            || self.counts.products == 0
        {
            return Err(StoregenError::Config {
                message: "counts for departments, customers, suppliers, categories, and products must be nonzero — later stages sample foreign keys from them".to_string(),
            });
        }
        if self.counts.reviews > self.counts.customers * self.counts.products {
            return Err(StoregenError::Config {
                message: format!(
                    "counts.reviews ({}) exceeds the distinct reviewer/product pairs available \
                     ({} customers x {} products) — reviews never repeat a pair",
                    self.counts.reviews, self.counts.customers, self.counts.products
                ),
            });
        }
        if self.reference.top_level_categories == 0
            || self.reference.top_level_categories > self.counts.categories
        {
            return Err(StoregenError::Config {
                message: format!(
                    "reference.top_level_categories ({}) must be between 1 and counts.categories ({})",
                    self.reference.top_level_categories, self.counts.categories
                ),
            });
        }

        if self.window.years_back == 0 {
            return Err(StoregenError::Config {
                message: "window.years_back must be at least 1".to_string(),
            });
        }
        if self.actors.employment_years == 0 {
            return Err(StoregenError::Config {
                message: "actors.employment_years must be at least 1".to_string(),
            });
        }

        if self.inventory.quantity_min < 0 || self.inventory.quantity_min > self.inventory.quantity_max {
            return Err(StoregenError::Config {
                message: format!(
                    "inventory quantity range [{}, {}] must be non-negative and ascending",
                    self.inventory.quantity_min, self.inventory.quantity_max
                ),
            });
        }
        if self.inventory.reorder_min <= 0 || self.inventory.reorder_min > self.inventory.reorder_max {
            return Err(StoregenError::Config {
                message: format!(
                    "inventory reorder range [{}, {}] must be positive and ascending",
                    self.inventory.reorder_min, self.inventory.reorder_max
                ),
            });
        }

        if self.orders.max_items_per_order == 0 || self.orders.max_quantity == 0 {
            return Err(StoregenError::Config {
                message: "orders.max_items_per_order and orders.max_quantity must be nonzero"
                    .to_string(),
            });
        }
        for weights in [
            &self.orders.recent_status_weights,
            &self.orders.settled_status_weights,
        ] {
            if weights.iter().any(|w| *w < 0.0) || weights.iter().sum::<f64>() <= 0.0 {
                return Err(StoregenError::Config {
                    message: "order status weights must be non-negative and sum to a positive value"
                        .to_string(),
                });
            }
        }
        if self.engagement.rating_weights.iter().any(|w| *w < 0.0)
            || self.engagement.rating_weights.iter().sum::<f64>() <= 0.0
        {
            return Err(StoregenError::Config {
                message: "engagement.rating_weights must be non-negative and sum to a positive value"
                    .to_string(),
            });
        }

        fraction("actors.employee_active_ratio", self.actors.employee_active_ratio)?;
        fraction("actors.customer_active_ratio", self.actors.customer_active_ratio)?;
        fraction("inventory.low_stock_fraction", self.inventory.low_stock_fraction)?;
        fraction("orders.line_discount_fraction", self.orders.line_discount_fraction)?;
        fraction("orders.max_line_discount", self.orders.max_line_discount)?;
        fraction("orders.order_discount_fraction", self.orders.order_discount_fraction)?;
        fraction(
            "orders.split_payment_probability",
            self.orders.split_payment_probability,
        )?;
        fraction("orders.late_delivery_fraction", self.orders.late_delivery_fraction)?;
        fraction(
            "engagement.verified_review_fraction",
            self.engagement.verified_review_fraction,
        )?;
        fraction(
            "engagement.second_address_fraction",
            self.engagement.second_address_fraction,
        )?;
        fraction("engagement.return_rate", self.engagement.return_rate)?;
        fraction(
            "engagement.promotion_active_ratio",
            self.engagement.promotion_active_ratio,
        )?;
        fraction("pricing.tax_rate", self.pricing.tax_rate)?;

        Ok(())
    }

    /// Apply `table=count` overrides (CLI `--counts` flag).
    ///
    /// Unknown table names are logged via `tracing::warn` and skipped, so a
    /// typo is visible instead of silently ignored.
    pub fn apply_count_overrides(&mut self, overrides: &std::collections::BTreeMap<String, usize>) {
        for (table, count) in overrides {
            match table.as_str() {
                "departments" => self.counts.departments = *count,
                "employees" => self.counts.employees = *count,
                "customers" => self.counts.customers = *count,
                "suppliers" => self.counts.suppliers = *count,
                "categories" => self.counts.categories = *count,
                "products" => self.counts.products = *count,
                "orders" => self.counts.orders = *count,
                "reviews" => self.counts.reviews = *count,
                "promotions" => self.counts.promotions = *count,
                other => {
                    tracing::warn!(
                        "Unknown table '{}' in count override. \
                         Countable tables: departments, employees, customers, suppliers, \
                         categories, products, orders, reviews, promotions. Ignoring.",
                        other
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GeneratorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.seed, 42);
        assert_eq!(config.counts.customers, 2000);
        assert_eq!(config.counts.orders, 3000);
    }

    #[test]
    fn test_parse_empty_config() {
        let config: GeneratorConfig = toml::from_str("").unwrap();
        assert_eq!(config.counts.departments, 8);
        assert_eq!(config.pricing.tax_rate, 0.08);
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
seed = 7

[database]
url = "sqlite://dev.db"

[counts]
customers = 100

[window]
years_back = 2
base_date = "2025-06-15"
"#;
        let config: GeneratorConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.database.url.as_deref(), Some("sqlite://dev.db"));
        assert_eq!(config.counts.customers, 100);
        // Untouched sections keep defaults
        assert_eq!(config.counts.orders, 3000);
        assert_eq!(config.window.years_back, 2);
        assert_eq!(
            config.window.base_date,
            NaiveDate::from_ymd_opt(2025, 6, 15)
        );
    }

    #[test]
    fn test_validate_rejects_markup_below_one() {
        let mut config = GeneratorConfig::default();
        config.pricing.markup_min = 0.9;
        let err = config.validate().unwrap_err();
        assert!(format!("{}", err).contains("markup_min"));
    }

    #[test]
    fn test_validate_rejects_bad_fraction() {
        let mut config = GeneratorConfig::default();
        config.engagement.return_rate = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_fk_targets() {
        let mut config = GeneratorConfig::default();
        config.counts.customers = 0;
        let err = config.validate().unwrap_err();
        assert!(format!("{}", err).contains("foreign keys"));
    }

    #[test]
    fn test_validate_rejects_more_reviews_than_pairs() {
        let mut config = GeneratorConfig::default();
        config.counts.customers = 2;
        config.counts.products = 2;
        config.counts.reviews = 10;
        let err = config.validate().unwrap_err();
        assert!(format!("{}", err).contains("reviewer/product pairs"));
    }

    #[test]
    fn test_validate_rejects_zero_weights() {
        let mut config = GeneratorConfig::default();
        config.orders.settled_status_weights = [0.0; 5];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_base_time_pinned() {
        let config = GeneratorConfig {
            window: WindowConfig {
                years_back: 3,
                base_date: NaiveDate::from_ymd_opt(2025, 6, 15),
            },
            ..Default::default()
        };
        let base = config.window.base_time();
        assert_eq!(base.date(), NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
        let start = config.window.window_start(base);
        assert_eq!((base - start).num_days(), 3 * 365);
    }

    #[test]
    fn test_apply_count_overrides() {
        let mut config = GeneratorConfig::default();
        let mut overrides = std::collections::BTreeMap::new();
        overrides.insert("customers".to_string(), 50usize);
        overrides.insert("no_such_table".to_string(), 9usize);
        config.apply_count_overrides(&overrides);
        assert_eq!(config.counts.customers, 50);
        // Typo is skipped, everything else untouched
        assert_eq!(config.counts.orders, 3000);
    }

    #[test]
    fn test_read_config_nonexistent() {
        let result = read_config(Path::new("/nonexistent/dir"));
        assert!(result.is_ok());
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn test_read_config_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("storegen.toml"),
            "seed = 99\n\n[counts]\norders = 12\n",
        )
        .unwrap();

        let config = read_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.seed, 99);
        assert_eq!(config.counts.orders, 12);
    }

    #[test]
    fn test_read_config_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("storegen.toml"), "this is not [[[toml").unwrap();
        assert!(read_config(dir.path()).is_err());
    }

    #[test]
    fn test_read_config_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("storegen.toml"),
            "[pricing]\nmarkup_min = 0.5\n",
        )
        .unwrap();
        assert!(read_config(dir.path()).is_err());
    }
}
