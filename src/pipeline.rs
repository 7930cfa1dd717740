//! Pipeline steps.
//!
//! ```text
//! generate ──▶ write staging CSV ──▶ load ──▶ transform (optional)
//! ```
//!
//! Each step completes before the next starts and the first failure stops the
//! run. Nothing is retried.

use crate::GenerateOpts;
use anyhow::{bail, Context};
use job_core::TableName;
use job_csv::{write_records, WriteMetrics};
use job_generator::JobGenerator;
use std::path::{Path, PathBuf};
use tracing::info;
use warehouse_loader::{LoadSummary, Loader, Warehouse};

/// External command run after a successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformStep {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

/// What a full pipeline run did.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub write: WriteMetrics,
    pub load: LoadSummary,
    pub transformed: bool,
}

/// Generate a batch and write it to the staging file.
pub fn generate(opts: &GenerateOpts) -> anyhow::Result<WriteMetrics> {
    let records = JobGenerator::new(opts.seed).generate(opts.record_count());
    let metrics = write_records(&records, &opts.output)
        .with_context(|| format!("Failed to write staging file {:?}", opts.output))?;

    info!(
        "Wrote {} rows to {} ({:.0} rows/sec)",
        metrics.rows_written,
        opts.output.display(),
        metrics.rows_per_second()
    );
    Ok(metrics)
}

/// Load a staging file into `table`.
pub async fn load<W: Warehouse>(
    loader: &Loader<W>,
    file: &Path,
    table: &TableName,
) -> anyhow::Result<LoadSummary> {
    let summary = loader
        .load_file(file, table)
        .await
        .with_context(|| format!("Failed to load {} into {table}", file.display()))?;

    if summary.skipped {
        info!("No rows to load from {}", file.display());
    } else {
        info!("Loaded {} rows into {table}", summary.rows_inserted);
    }
    Ok(summary)
}

/// Run the transformation command and wait for it.
///
/// A non-zero exit status is an error.
pub async fn transform(step: &TransformStep) -> anyhow::Result<()> {
    info!("Running transformation: {} {}", step.program, step.args.join(" "));

    let mut command = tokio::process::Command::new(&step.program);
    command.args(&step.args);
    if let Some(dir) = &step.working_dir {
        command.current_dir(dir);
    }

    let status = command
        .status()
        .await
        .with_context(|| format!("Failed to start transformation '{}'", step.program))?;
    if !status.success() {
        bail!("Transformation '{}' failed with {status}", step.program);
    }

    info!("Transformation finished");
    Ok(())
}

/// Run generate, write, load and (if configured) transform in sequence.
pub async fn run_pipeline<W: Warehouse>(
    generate_opts: &GenerateOpts,
    loader: &Loader<W>,
    table: &TableName,
    transform_step: Option<&TransformStep>,
) -> anyhow::Result<PipelineReport> {
    let write = generate(generate_opts).context("Generate step failed")?;
    let load = load(loader, &generate_opts.output, table)
        .await
        .context("Load step failed")?;

    let transformed = match transform_step {
        Some(step) => {
            transform(step).await.context("Transform step failed")?;
            true
        }
        None => false,
    };

    Ok(PipelineReport {
        write,
        load,
        transformed,
    })
}
