use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::{load_transactions, InputArgs};
use crate::error::Result;
use crate::fmt::money;
use crate::settings::Settings;
use crate::validator::{dataset_overview, DatasetOverview, ValidationSummary};

pub fn run(settings: &Settings, input: &InputArgs) -> Result<()> {
    let path = input.input_path(settings);
    let outcome = load_transactions(&path, input)?;
    let overview = dataset_overview(&outcome.valid);

    println!("{}", format_summary(&outcome.summary));
    println!("{}", format_overview(&overview, &settings.currency_symbol));
    Ok(())
}

pub fn format_summary(summary: &ValidationSummary) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Stage", "Records"]);
    table.add_row(vec![Cell::new("Total input"), Cell::new(summary.total_input)]);
    table.add_row(vec![Cell::new("Invalid"), Cell::new(summary.invalid)]);
    table.add_row(vec![
        Cell::new("Filtered by region"),
        Cell::new(summary.filtered_by_region),
    ]);
    table.add_row(vec![
        Cell::new("Filtered by amount"),
        Cell::new(summary.filtered_by_amount),
    ]);
    table.add_row(vec![
        Cell::new("Kept".green().bold()),
        Cell::new(summary.final_count),
    ]);
    format!("Validation Summary\n{table}")
}

pub fn format_overview(overview: &DatasetOverview, currency: &str) -> String {
    let regions = if overview.regions.is_empty() {
        "(none)".to_string()
    } else {
        overview.regions.join(", ")
    };
    let range = match (overview.min_amount, overview.max_amount) {
        (Some(min), Some(max)) => format!("{} - {}", money(min, currency), money(max, currency)),
        _ => "N/A".to_string(),
    };
    format!("Regions:      {regions}\nAmount range: {range}")
}
