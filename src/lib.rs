//! Job Postings ETL
//!
//! A small batch pipeline that generates synthetic job postings, stages them
//! as a CSV file and bulk-loads the file into a warehouse table.
//!
//! # Crates
//!
//! - `job_core` - Record, table definition and cell types
//! - `job_generator` - Seeded record generator
//! - `job_csv` - Atomic CSV staging writer and reader
//! - `warehouse_loader` - Bulk loader, warehouse backends and configuration
//!
//! # CLI Usage
//!
//! ```bash
//! # Generate 5000 postings into the default staging file
//! job-postings-etl generate --count 5000 --output data/generated/job_postings.csv
//!
//! # Load a staging file into PostgreSQL
//! WAREHOUSE_USER=loader WAREHOUSE_PASSWORD=... WAREHOUSE_ACCOUNT=db.internal:5432 \
//!   job-postings-etl load --file data/generated/job_postings.csv --table PUBLIC.JOB_POSTINGS
//!
//! # Whole pipeline, followed by a transformation command
//! job-postings-etl run --warehouse-config warehouse.toml \
//!   --transform-dir /opt/transform --transform dbt run
//! ```

use anyhow::Context;
use clap::Parser;
use job_core::{TableName, DEFAULT_TABLE_NAME};
use std::path::PathBuf;
use warehouse_loader::WarehouseConfig;

pub mod pipeline;

/// Number of postings generated when `--count` is not given.
pub const DEFAULT_COUNT: i64 = 5000;

/// Staging file written when `--output` is not given.
pub const DEFAULT_OUTPUT: &str = "data/generated/job_postings.csv";

/// Seed used when `--seed` is not given.
pub const DEFAULT_SEED: u64 = 42;

#[derive(Parser, Clone, Debug)]
pub struct GenerateOpts {
    /// Number of job postings to generate; zero or less writes a header-only file
    #[arg(long, default_value_t = DEFAULT_COUNT, allow_negative_numbers = true)]
    pub count: i64,

    /// Staging CSV file to write
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Random seed for reproducible batches
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

impl GenerateOpts {
    /// Number of records to generate, with non-positive counts meaning none.
    pub fn record_count(&self) -> u64 {
        u64::try_from(self.count).unwrap_or(0)
    }
}

/// Warehouse connection options.
///
/// Values come from flags or their environment variables, layered over an
/// optional TOML file.
#[derive(Parser, Clone, Default)]
pub struct WarehouseOpts {
    /// TOML file with warehouse settings; flags and environment variables override it
    #[arg(long, env = "WAREHOUSE_CONFIG")]
    pub warehouse_config: Option<PathBuf>,

    /// Warehouse user
    #[arg(long = "warehouse-user", env = "WAREHOUSE_USER")]
    pub user: Option<String>,

    /// Warehouse password
    #[arg(
        long = "warehouse-password",
        env = "WAREHOUSE_PASSWORD",
        hide_env_values = true
    )]
    pub password: Option<String>,

    /// Warehouse account endpoint (host[:port])
    #[arg(long = "warehouse-account", env = "WAREHOUSE_ACCOUNT")]
    pub account: Option<String>,

    /// Compute warehouse name [default: job_posting]
    #[arg(long = "warehouse-name", env = "WAREHOUSE_NAME")]
    pub warehouse: Option<String>,

    /// Warehouse database [default: JOB_POSTING_DATA]
    #[arg(long = "warehouse-database", env = "WAREHOUSE_DATABASE")]
    pub database: Option<String>,

    /// Warehouse schema [default: PUBLIC]
    #[arg(long = "warehouse-schema", env = "WAREHOUSE_SCHEMA")]
    pub schema: Option<String>,
}

impl WarehouseOpts {
    /// Build the warehouse configuration: the TOML file, if any, overlaid by flags.
    pub fn to_config(&self) -> anyhow::Result<WarehouseConfig> {
        let base = match &self.warehouse_config {
            Some(path) => WarehouseConfig::from_toml_file(path)
                .with_context(|| format!("Failed to load warehouse config from {path:?}"))?,
            None => WarehouseConfig::default(),
        };

        Ok(base.merge(WarehouseConfig {
            user: self.user.clone(),
            password: self.password.clone(),
            account: self.account.clone(),
            warehouse: self.warehouse.clone(),
            database: self.database.clone(),
            schema: self.schema.clone(),
        }))
    }
}

/// Where and how to load.
#[derive(Parser, Clone)]
pub struct TargetOpts {
    /// Target table, TABLE or SCHEMA.TABLE
    #[arg(long, default_value = DEFAULT_TABLE_NAME)]
    pub table: TableName,

    #[command(flatten)]
    pub warehouse: WarehouseOpts,

    /// Load into an in-process warehouse instead of a remote one
    #[arg(long)]
    pub dry_run: bool,
}

/// Transformation run after a successful load.
#[derive(Parser, Clone, Debug, Default)]
pub struct TransformOpts {
    /// Command (and arguments) to run after the load, e.g. `--transform dbt run`
    #[arg(long, value_name = "CMD", num_args = 1..)]
    pub transform: Vec<String>,

    /// Working directory for the transformation command
    #[arg(long, value_name = "DIR")]
    pub transform_dir: Option<PathBuf>,
}

impl TransformOpts {
    /// The configured transformation, if any.
    pub fn step(&self) -> Option<pipeline::TransformStep> {
        let (program, args) = self.transform.split_first()?;
        Some(pipeline::TransformStep {
            program: program.clone(),
            args: args.to_vec(),
            working_dir: self.transform_dir.clone(),
        })
    }
}
