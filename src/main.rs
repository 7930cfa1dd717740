//! Command-line interface for job-postings-etl
//!
//! # Usage Examples
//!
//! ## Generate
//! ```bash
//! job-postings-etl generate --count 5000 --seed 42 \
//!   --output data/generated/job_postings.csv
//! ```
//!
//! ## Load
//! ```bash
//! # Into PostgreSQL, settings from the environment
//! export WAREHOUSE_USER=loader WAREHOUSE_PASSWORD=secret WAREHOUSE_ACCOUNT=db.internal:5432
//! job-postings-etl load --file data/generated/job_postings.csv
//!
//! # Into an in-process warehouse, printing the statements that would run
//! RUST_LOG=info job-postings-etl load --file data/generated/job_postings.csv --dry-run
//! ```
//!
//! ## Run
//! ```bash
//! # Generate, load, then run the transformation project
//! job-postings-etl run --count 5000 --warehouse-config warehouse.toml \
//!   --transform-dir /opt/transform --transform dbt run
//! ```

use clap::{Parser, Subcommand};
use job_postings_etl::pipeline::{self, TransformStep};
use job_postings_etl::{GenerateOpts, TargetOpts, TransformOpts};
use std::path::PathBuf;
use warehouse_loader::{Loader, MemoryWarehouse, PostgresWarehouse, Warehouse};

#[derive(Parser)]
#[command(name = "job-postings-etl")]
#[command(about = "Generate synthetic job postings and bulk-load them into a warehouse")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a batch of job postings and write it to a staging CSV file
    Generate {
        #[command(flatten)]
        generate: GenerateOpts,
    },

    /// Load a staging CSV file into the warehouse
    Load {
        /// Staging CSV file to load
        #[arg(long)]
        file: PathBuf,

        #[command(flatten)]
        target: TargetOpts,
    },

    /// Generate, write and load a batch, then run the transformation
    Run {
        #[command(flatten)]
        generate: GenerateOpts,

        #[command(flatten)]
        target: TargetOpts,

        #[command(flatten)]
        transform: TransformOpts,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { generate } => {
            pipeline::generate(&generate)?;
        }
        Commands::Load { file, target } => {
            if target.dry_run {
                tracing::info!("Running in dry-run mode - loading into an in-process warehouse");
                let loader = Loader::new(MemoryWarehouse::new());
                pipeline::load(&loader, &file, &target.table).await?;
                log_dry_run_statements(&loader).await;
            } else {
                let loader = Loader::new(PostgresWarehouse::new(target.warehouse.to_config()?));
                pipeline::load(&loader, &file, &target.table).await?;
            }
        }
        Commands::Run {
            generate,
            target,
            transform,
        } => {
            let step = transform.step();
            if target.dry_run {
                tracing::info!("Running in dry-run mode - loading into an in-process warehouse");
                let loader = Loader::new(MemoryWarehouse::new());
                run_pipeline(&generate, &loader, &target, step.as_ref()).await?;
                log_dry_run_statements(&loader).await;
            } else {
                let loader = Loader::new(PostgresWarehouse::new(target.warehouse.to_config()?));
                run_pipeline(&generate, &loader, &target, step.as_ref()).await?;
            }
        }
    }

    Ok(())
}

async fn run_pipeline<W: Warehouse>(
    generate: &GenerateOpts,
    loader: &Loader<W>,
    target: &TargetOpts,
    step: Option<&TransformStep>,
) -> anyhow::Result<()> {
    let report = pipeline::run_pipeline(generate, loader, &target.table, step).await?;
    tracing::info!(
        "Pipeline finished: {} rows written, {} rows loaded, transformation {}",
        report.write.rows_written,
        report.load.rows_inserted,
        if report.transformed { "run" } else { "skipped" }
    );
    Ok(())
}

async fn log_dry_run_statements(loader: &Loader<MemoryWarehouse>) {
    for statement in loader.warehouse().statements().await {
        tracing::info!("[dry-run] {statement}");
    }
}
