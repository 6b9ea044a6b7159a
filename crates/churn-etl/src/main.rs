//! churn-etl binary.
//!
//! Reads `churn.toml` (or the path given with `--config`), opens the SQLite
//! warehouse, and runs the requested stage.
//!
//! ```text
//! churn-etl split --source WA_Fn-UseC_-Telco-Customer-Churn.csv
//! churn-etl run
//! churn-etl --json transform
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use churn_etl::{EtlConfig, Pipeline, RunSummary, split::split_combined};
use churn_store_sqlite::SqliteWarehouse;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Customer-churn warehouse loader")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, global = true, default_value = "churn.toml")]
  config: PathBuf,

  /// Print the run summary as JSON on stdout.
  #[arg(long, global = true)]
  json: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Extract both raw files, load staging, then transform and load core.
  Run,
  /// Transform and load core tables from the current staging contents.
  Transform,
  /// Split the combined Telco export into the two raw files.
  Split {
    /// The combined export.
    #[arg(long)]
    source:  PathBuf,
    /// Where to write the raw files.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let staged = match cli.command {
    Command::Split { source, out_dir } => {
      let summary = split_combined(&source, &out_dir)
        .with_context(|| format!("failed to split {}", source.display()))?;
      if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
      }
      return Ok(());
    }
    Command::Run => true,
    Command::Transform => false,
  };

  let cfg = EtlConfig::load(&cli.config).context("failed to read configuration")?;

  // Nothing is written if the warehouse cannot be opened.
  let database_path = cfg.database_path();
  let store = SqliteWarehouse::open(&database_path, cfg.busy_timeout())
    .await
    .with_context(|| format!("failed to open warehouse at {database_path:?}"))?;
  let pipeline = Pipeline::new(store);

  let summary = if staged {
    pipeline
      .run(&cfg.demographics_file, &cfg.services_file, cfg.truncate_staging)
      .await
  } else {
    pipeline.transform_and_load().await
  }
  .context("load run aborted")?;

  report(&summary, cli.json)?;
  Ok(())
}

fn report(summary: &RunSummary, json: bool) -> anyhow::Result<()> {
  if json {
    println!("{}", serde_json::to_string_pretty(summary)?);
    return Ok(());
  }

  let dim = &summary.dimension.report;
  let facts = &summary.facts.report;
  tracing::info!(
    run_id = %summary.run_id,
    customers = dim.persisted,
    customer_failures = dim.failed(),
    facts = facts.persisted,
    fact_failures = facts.failed(),
    unresolved = summary.facts.stats.unresolved,
    "load run finished"
  );
  Ok(())
}
