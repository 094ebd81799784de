pub mod analyze;
pub mod enrich;
pub mod init;
pub mod run;
pub mod validate;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::error::Result;
use crate::parser::read_sales_file;
use crate::settings::Settings;
use crate::validator::{validate_and_filter, FilterOutcome, Filters};

#[derive(Parser)]
#[command(
    name = "sales-analytics",
    about = "Validate, analyze and enrich pipe-delimited sales transaction logs."
)]
pub struct Cli {
    /// Settings file (default: ~/.config/sales-analytics/settings.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Clone, Default)]
pub struct InputArgs {
    /// Sales data file (pipe-delimited)
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Keep only transactions from this region (exact match)
    #[arg(long)]
    pub region: Option<String>,
    /// Minimum line amount (quantity x unit price), inclusive
    #[arg(long = "min-amount")]
    pub min_amount: Option<f64>,
    /// Maximum line amount, inclusive
    #[arg(long = "max-amount")]
    pub max_amount: Option<f64>,
}

impl InputArgs {
    pub fn filters(&self) -> Filters {
        Filters {
            region: self.region.clone(),
            min_amount: self.min_amount,
            max_amount: self.max_amount,
        }
    }

    pub fn input_path(&self, settings: &Settings) -> PathBuf {
        self.input
            .clone()
            .unwrap_or_else(|| PathBuf::from(&settings.input_file))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline: validate, analyze, enrich, write report files.
    Run {
        #[command(flatten)]
        input: InputArgs,
        /// Skip the catalog fetch; every transaction is left unmatched
        #[arg(long)]
        offline: bool,
    },
    /// Validate the sales file and show what was filtered out.
    Validate {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Print sales analytics tables.
    Analyze {
        #[command(flatten)]
        input: InputArgs,
        /// Number of top products to show
        #[arg(long)]
        top: Option<usize>,
        /// Low-performer quantity threshold
        #[arg(long)]
        threshold: Option<i64>,
    },
    /// Enrich validated transactions with catalog metadata.
    Enrich {
        #[command(flatten)]
        input: InputArgs,
        /// Enriched output file
        #[arg(long)]
        output: Option<PathBuf>,
        /// Skip the catalog fetch; every transaction is left unmatched
        #[arg(long)]
        offline: bool,
    },
    /// Write a default settings file.
    Init {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}

/// Parse and validate the input file with the filters from `args`.
pub(crate) fn load_transactions(path: &Path, args: &InputArgs) -> Result<FilterOutcome> {
    let filters = args.filters();
    filters.check_range()?;
    let parsed = read_sales_file(path)?;
    let outcome = validate_and_filter(parsed.rows, &filters);
    let s = &outcome.summary;
    log::info!(
        "validation: {} total, {} invalid, {} filtered by region, {} filtered by amount, {} kept",
        s.total_input,
        s.invalid,
        s.filtered_by_region,
        s.filtered_by_amount,
        s.final_count
    );
    Ok(outcome)
}
