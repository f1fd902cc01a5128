use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{bail, Context, Result};
use comfy_table::Table as ComfyTable;
use indicatif::{ProgressBar, ProgressStyle};

use storegen_core::check::audit;
use storegen_core::config::read_config;
use storegen_core::generate::{generate_dataset, STAGES};
use storegen_core::output;
use storegen_core::{GeneratorConfig, StoregenError};

use crate::args::GenerateArgs;

pub async fn run(args: &GenerateArgs) -> Result<()> {
    // Load optional storegen.toml, then layer CLI flags on top
    let mut config = read_config(Path::new("."))?.unwrap_or_default();
    apply_overrides(&mut config, args)?;

    // Phase 1: Generate
    let pb = ProgressBar::new(STAGES.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [1/3] Generating {msg:12} {bar:30.cyan/dim} {pos}/{len}")
            .unwrap(),
    );
    let dataset = generate_dataset(
        &config,
        Some(&|index, stage| {
            pb.set_position(index as u64);
            pb.set_message(stage.to_string());
        }),
    )?;
    pb.finish_with_message(format!("done ({} rows)", dataset.total_rows()));

    // Phase 2: Audit
    if args.no_audit {
        eprintln!("  [2/3] Audit skipped (--no-audit)");
    } else {
        let report = audit(&dataset, &config);
        if !report.is_clean() {
            for violation in &report.violations {
                eprintln!("  {} — {}", violation.check, violation.message);
            }
            bail!(
                "generated dataset failed its audit ({}); this is a storegen bug",
                report.summary()
            );
        }
        eprintln!("  [2/3] Audit passed ({} checks)", report.checks_run);
    }

    // Phase 3: Output
    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            let mut writer = BufWriter::new(file);
            output::sql::write_script(&dataset, &mut writer)?;
            eprintln!(
                "  [3/3] Wrote {} rows across {} tables to {}",
                dataset.total_rows(),
                dataset.row_counts().len(),
                path
            );
        }
        None => {
            let db_url = resolve_db_url(args.db.as_deref(), &config)?;
            let pool = output::sqlite::connect(&db_url).await?;

            let pb = ProgressBar::new(dataset.total_rows() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.cyan} [3/3] Inserting... {bar:30.cyan/dim} {pos}/{len} ({eta})")
                    .unwrap()
                    .progress_chars("█▓░"),
            );
            output::sqlite::insert_dataset(
                &dataset,
                &pool,
                Some(&|_table, done, _total| {
                    pb.set_position(done as u64);
                }),
            )
            .await?;
            pb.finish_with_message("done");
            eprintln!(
                "\n✓ Inserted {} rows across {} tables into {}",
                dataset.total_rows(),
                dataset.row_counts().len(),
                db_url
            );
        }
    }

    print_summary(&dataset);
    println!("\nSeed: {}", config.seed);
    println!("Fingerprint: {}", dataset.fingerprint());
    Ok(())
}

fn apply_overrides(config: &mut GeneratorConfig, args: &GenerateArgs) -> Result<()> {
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(as_of) = args.as_of {
        config.window.base_date = Some(as_of);
    }
    if !args.counts.is_empty() {
        let mut overrides = BTreeMap::new();
        for entry in &args.counts {
            let (table, count) = entry
                .split_once('=')
                .with_context(|| format!("Invalid count override '{}', expected table=count", entry))?;
            let count: usize = count
                .parse()
                .with_context(|| format!("Invalid count in override '{}'", entry))?;
            overrides.insert(table.to_string(), count);
        }
        config.apply_count_overrides(&overrides);
    }
    Ok(())
}

fn resolve_db_url(flag: Option<&str>, config: &GeneratorConfig) -> Result<String> {
    // --db flag (clap also fills it from DATABASE_URL / .env), then
    // the [database] section of storegen.toml
    if let Some(url) = flag {
        return Ok(url.to_string());
    }
    if let Some(url) = &config.database.url {
        return Ok(url.clone());
    }
    Err(StoregenError::NoDatabaseUrl.into())
}

fn print_summary(dataset: &storegen_core::Dataset) {
    let mut table = ComfyTable::new();
    table.set_header(vec!["Table", "Rows"]);
    for (name, count) in dataset.row_counts() {
        table.add_row(vec![name.to_string(), count.to_string()]);
    }
    table.add_row(vec!["TOTAL".to_string(), dataset.total_rows().to_string()]);
    println!("\n{}", table);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: GenerateArgs,
    }

    fn parse(argv: &[&str]) -> GenerateArgs {
        let mut full = vec!["storegen"];
        full.extend(argv);
        Wrapper::try_parse_from(full).unwrap().args
    }

    #[test]
    fn test_overrides_layer_over_config() {
        let args = parse(&["--seed", "7", "--as-of", "2025-01-01", "--counts", "customers=10,orders=20"]);
        let mut config = GeneratorConfig::default();
        apply_overrides(&mut config, &args).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(
            config.window.base_date,
            chrono::NaiveDate::from_ymd_opt(2025, 1, 1)
        );
        assert_eq!(config.counts.customers, 10);
        assert_eq!(config.counts.orders, 20);
    }

    #[test]
    fn test_malformed_count_override_rejected() {
        let args = parse(&["--counts", "customers"]);
        let mut config = GeneratorConfig::default();
        assert!(apply_overrides(&mut config, &args).is_err());
    }

    #[test]
    fn test_db_url_resolution_order() {
        let mut config = GeneratorConfig::default();
        config.database.url = Some("sqlite://from-config.db".to_string());
        assert_eq!(
            resolve_db_url(Some("sqlite://from-flag.db"), &config).unwrap(),
            "sqlite://from-flag.db"
        );
        assert_eq!(
            resolve_db_url(None, &config).unwrap(),
            "sqlite://from-config.db"
        );
        config.database.url = None;
        assert!(resolve_db_url(None, &config).is_err());
    }
}
