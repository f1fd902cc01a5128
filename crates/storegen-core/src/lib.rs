pub mod check;
pub mod config;
pub mod dataset;
pub mod error;
pub mod generate;
pub mod model;
pub mod output;
pub mod schema;

// Re-export key types for convenience
pub use config::GeneratorConfig;
pub use dataset::Dataset;
pub use error::{Result, StoregenError};
