use anyhow::{bail, Result};
use comfy_table::Table as ComfyTable;

use storegen_core::generate::generate_dataset;
use storegen_core::GeneratorConfig;

use crate::args::PreviewArgs;

/// Cell values longer than this are truncated for display.
const MAX_CELL_WIDTH: usize = 40;

/// Tables shown when no --table filter is given.
const DEFAULT_TABLES: &[&str] = &["customers", "products", "orders", "order_items", "payments"];

pub fn run(args: &PreviewArgs) -> Result<()> {
    // A deliberately tiny dataset: previews should be instant
    let mut config = GeneratorConfig::default();
    config.seed = args.seed;
    config.counts.departments = 5;
    config.counts.employees = 20;
    config.counts.customers = 50;
    config.counts.suppliers = 10;
    config.counts.categories = 12;
    config.counts.products = 40;
    config.counts.orders = 60;
    config.counts.reviews = 30;
    config.counts.promotions = 5;

    let dataset = generate_dataset(&config, None)?;
    let rendered = dataset.rendered_tables();
    let known: Vec<&str> = rendered.iter().map(|t| t.name).collect();

    let selected: Vec<&str> = if args.table.is_empty() {
        DEFAULT_TABLES.to_vec()
    } else {
        for name in &args.table {
            if !known.contains(&name.as_str()) {
                bail!(
                    "Unknown table '{}'. Available tables: {}",
                    name,
                    known.join(", ")
                );
            }
        }
        args.table.iter().map(|s| s.as_str()).collect()
    };

    for table in rendered.iter().filter(|t| selected.contains(&t.name)) {
        println!("\n=== {} ({} rows generated) ===", table.name, table.rows.len());

        let mut t = ComfyTable::new();
        t.set_header(table.columns.to_vec());
        for row in table.rows.iter().take(args.rows) {
            t.add_row(row.iter().map(|v| truncate(&v.to_string())));
        }
        println!("{}", t);
    }

    println!("\nSeed: {} (pass --seed to vary)", args.seed);
    Ok(())
}

fn truncate(value: &str) -> String {
    if value.chars().count() <= MAX_CELL_WIDTH {
        value.to_string()
    } else {
        let cut: String = value.chars().take(MAX_CELL_WIDTH - 3).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_value() {
        assert_eq!(truncate("hello"), "hello");
    }

    #[test]
    fn test_truncate_long_value() {
        let long = "x".repeat(100);
        let out = truncate(&long);
        assert_eq!(out.chars().count(), MAX_CELL_WIDTH);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_default_tables_exist_in_schema() {
        let names: Vec<&str> = storegen_core::schema::TABLES.iter().map(|t| t.name).collect();
        for table in DEFAULT_TABLES {
            assert!(names.contains(table), "{}", table);
        }
    }
}
