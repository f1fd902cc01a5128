//! Stage 1 — reference data: departments, categories, suppliers.
//!
//! These tables have no foreign keys into the rest of the dataset (categories
//! self-reference only), so they come first. Their IDs feed every later stage.

use rand::rngs::StdRng;
use rand::Rng;

use crate::config::GeneratorConfig;
use crate::error::{Result, StoregenError};
use crate::model::{round2, Category, Department, Supplier};

use super::providers;

/// Top-level category name pool. Children are derived from a parent name
/// plus a qualifier.
const CATEGORY_NAMES: &[&str] = &[
    "Electronics",
    "Clothing",
    "Home & Garden",
    "Sports & Outdoors",
    "Books",
    "Toys & Games",
    "Health & Beauty",
    "Automotive",
    "Food & Beverages",
    "Office Supplies",
    "Pet Supplies",
    "Jewelry",
    "Music",
    "Movies",
    "Garden Tools",
];

const SUBCATEGORY_QUALIFIERS: &[&str] = &[
    "Accessories",
    "Essentials",
    "Premium",
    "Basics",
    "Deluxe",
    "Pro",
    "Kids",
    "Outdoor",
    "Indoor",
    "Seasonal",
];

/// Reference-stage output, consumed by every later stage.
#[derive(Debug)]
pub struct ReferenceData {
    pub departments: Vec<Department>,
    pub categories: Vec<Category>,
    pub suppliers: Vec<Supplier>,
}

pub fn generate(config: &GeneratorConfig, rng: &mut StdRng) -> Result<ReferenceData> {
    let departments = generate_departments(config, rng)?;
    let categories = generate_categories(config, rng);
    let suppliers = generate_suppliers(config, rng);
    Ok(ReferenceData {
        departments,
        categories,
        suppliers,
    })
}

/// Departments draw names from the curated pool without replacement so
/// the UNIQUE constraint on department_name holds by construction.
fn generate_departments(config: &GeneratorConfig, rng: &mut StdRng) -> Result<Vec<Department>> {
    let pool = &config.reference.department_names;
    let count = config.counts.departments;

    if count > pool.len() && !config.reference.allow_duplicate_names {
        return Err(StoregenError::Config {
            message: format!(
                "counts.departments ({}) exceeds the {} names in reference.department_names. \
                 Add names to the pool or set reference.allow_duplicate_names = true.",
                count,
                pool.len()
            ),
        });
    }

    let mut departments = Vec::with_capacity(count);
    for i in 0..count {
        let name = if i < pool.len() {
            pool[i].clone()
        } else {
            // Overflow names get a numeric suffix to stay unique.
            format!("{} {}", pool[i % pool.len()], i / pool.len() + 1)
        };
        departments.push(Department {
            department_id: i as i64 + 1,
            department_name: name,
            budget: round2(rng.random_range(config.reference.budget_min..=config.reference.budget_max)),
        });
    }
    Ok(departments)
}

/// Two-level category tree. Top-level categories are generated first, so a
/// child's parent_category_id is always smaller than its own id and
/// parents-before-children ordering holds without a sort.
fn generate_categories(config: &GeneratorConfig, rng: &mut StdRng) -> Vec<Category> {
    let total = config.counts.categories;
    let top_level = config.reference.top_level_categories.min(total);

    let mut categories = Vec::with_capacity(total);
    for i in 0..top_level {
        let name = if i < CATEGORY_NAMES.len() {
            CATEGORY_NAMES[i].to_string()
        } else {
            format!("{} {}", CATEGORY_NAMES[i % CATEGORY_NAMES.len()], i / CATEGORY_NAMES.len() + 1)
        };
        categories.push(Category {
            category_id: i as i64 + 1,
            category_name: name,
            parent_category_id: None,
            description: providers::sentence(rng, 6..12),
        });
    }

    for i in top_level..total {
        let parent = &categories[rng.random_range(0..top_level)];
        let parent_id = parent.category_id;
        let qualifier = SUBCATEGORY_QUALIFIERS[rng.random_range(0..SUBCATEGORY_QUALIFIERS.len())];
        let name = format!("{} {}", parent.category_name, qualifier);
        categories.push(Category {
            category_id: i as i64 + 1,
            category_name: name,
            parent_category_id: Some(parent_id),
            description: providers::sentence(rng, 6..12),
        });
    }

    categories
}

fn generate_suppliers(config: &GeneratorConfig, rng: &mut StdRng) -> Vec<Supplier> {
    let mut suppliers = Vec::with_capacity(config.counts.suppliers);
    for i in 0..config.counts.suppliers {
        suppliers.push(Supplier {
            supplier_id: i as i64 + 1,
            supplier_name: providers::company_name(rng),
            contact_name: providers::full_name(rng),
            email: providers::safe_email(rng),
            phone: providers::phone_number(rng),
            address: providers::street_address(rng),
            city: providers::city(rng),
            country: "USA".to_string(),
            rating: round2(rng.random_range(3.0..=5.0)),
        });
    }
    suppliers
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn run(config: &GeneratorConfig) -> ReferenceData {
        let mut rng = StdRng::seed_from_u64(42);
        generate(config, &mut rng).unwrap()
    }

    #[test]
    fn test_counts() {
        let config = GeneratorConfig::default();
        let data = run(&config);
        assert_eq!(data.departments.len(), config.counts.departments);
        assert_eq!(data.categories.len(), config.counts.categories);
        assert_eq!(data.suppliers.len(), config.counts.suppliers);
    }

    #[test]
    fn test_department_names_unique() {
        let data = run(&GeneratorConfig::default());
        let mut names: Vec<_> = data.departments.iter().map(|d| &d.department_name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), data.departments.len());
    }

    #[test]
    fn test_department_pool_exhaustion_is_config_error() {
        let mut config = GeneratorConfig::default();
        config.counts.departments = config.reference.department_names.len() + 1;
        let mut rng = StdRng::seed_from_u64(42);
        let err = generate(&config, &mut rng).unwrap_err();
        assert!(format!("{}", err).contains("department_names"));
    }

    #[test]
    fn test_department_overflow_with_duplicates_allowed() {
        let mut config = GeneratorConfig::default();
        config.counts.departments = config.reference.department_names.len() + 3;
        config.reference.allow_duplicate_names = true;
        let data = run(&config);
        assert_eq!(data.departments.len(), config.counts.departments);
        let mut names: Vec<_> = data.departments.iter().map(|d| &d.department_name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), data.departments.len());
    }

    #[test]
    fn test_category_tree_shape() {
        let config = GeneratorConfig::default();
        let data = run(&config);
        let top = config.reference.top_level_categories;
        for (i, cat) in data.categories.iter().enumerate() {
            assert_eq!(cat.category_id, i as i64 + 1);
            if i < top {
                assert!(cat.parent_category_id.is_none());
            } else {
                // Parents precede children, so the id is always smaller
                let parent = cat.parent_category_id.unwrap();
                assert!(parent >= 1 && parent < cat.category_id);
                assert!(parent <= top as i64);
            }
        }
    }

    #[test]
    fn test_supplier_ratings_in_range() {
        let data = run(&GeneratorConfig::default());
        for s in &data.suppliers {
            assert!((3.0..=5.0).contains(&s.rating));
            assert_eq!(s.rating, crate::model::round2(s.rating));
        }
    }

    #[test]
    fn test_budgets_in_configured_range() {
        let config = GeneratorConfig::default();
        let data = run(&config);
        for d in &data.departments {
            assert!(d.budget >= config.reference.budget_min);
            assert!(d.budget <= config.reference.budget_max);
        }
    }
}
