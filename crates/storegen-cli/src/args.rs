use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "storegen",
    about = "Generate a consistent synthetic e-commerce dataset",
    version,
    after_help = "Examples:\n  storegen generate --db sqlite://ecommerce.db\n  storegen generate --seed 7 --output seed.sql\n  storegen generate --counts customers=500,orders=1000 --db sqlite://dev.db\n  storegen preview --table orders\n  storegen verify --db sqlite://ecommerce.db\n  storegen schema --apply --db sqlite://fresh.db"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate the dataset and insert it (or write a .sql script)
    Generate(GenerateArgs),

    /// Print sample rows without touching a database
    Preview(PreviewArgs),

    /// Run integrity checks against a populated database
    Verify(VerifyArgs),

    /// Print the schema DDL, or apply it to an empty database
    Schema(SchemaArgs),
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Database connection URL (sqlite://path or sqlite::memory:)
    /// Falls back to DATABASE_URL env var, .env file, then storegen.toml
    #[arg(long, env = "DATABASE_URL")]
    pub db: Option<String>,

    /// Write a SQL script to this path instead of inserting directly
    #[arg(short, long)]
    pub output: Option<String>,

    /// Random seed for deterministic generation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pin the generation date (YYYY-MM-DD) so reruns are byte-identical
    #[arg(long, value_name = "DATE")]
    pub as_of: Option<NaiveDate>,

    /// Per-table count overrides (e.g., customers=500,orders=2000)
    #[arg(long, value_delimiter = ',')]
    pub counts: Vec<String>,

    /// Skip the post-generation audit (faster, but unchecked)
    #[arg(long)]
    pub no_audit: bool,
}

#[derive(Parser, Debug)]
pub struct PreviewArgs {
    /// Only show these tables (default: a representative selection)
    #[arg(long, value_delimiter = ',')]
    pub table: Vec<String>,

    /// Rows to display per table
    #[arg(long, default_value = "5")]
    pub rows: usize,

    /// Random seed
    #[arg(long, default_value = "42")]
    pub seed: u64,
}

#[derive(Parser, Debug)]
pub struct VerifyArgs {
    /// Database connection URL
    #[arg(long, env = "DATABASE_URL")]
    pub db: Option<String>,

    /// Emit the report as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct SchemaArgs {
    /// Apply the DDL to this database instead of printing it
    #[arg(long)]
    pub apply: bool,

    /// Database connection URL (required with --apply)
    #[arg(long, env = "DATABASE_URL")]
    pub db: Option<String>,
}
