use std::path::PathBuf;

use colored::Colorize;

use crate::analytics;
use crate::catalog;
use crate::cli::enrich::load_catalog;
use crate::cli::validate::format_summary;
use crate::cli::{load_transactions, InputArgs};
use crate::error::Result;
use crate::export::save_enriched;
use crate::fmt::{money, percent};
use crate::report::{write_report, ReportInput};
use crate::settings::Settings;

pub fn run(settings: &Settings, input: &InputArgs, offline: bool) -> Result<()> {
    let path = input.input_path(settings);
    let outcome = load_transactions(&path, input)?;
    println!("{}", format_summary(&outcome.summary));

    let analysis = analytics::analyze(&outcome.valid, &settings.analytics_config());

    let mapping = load_catalog(settings, offline);
    let enriched = catalog::enrich(&outcome.valid, &mapping);
    let enrichment = catalog::summarize(&enriched);

    let enriched_path = PathBuf::from(&settings.enriched_file);
    save_enriched(&enriched_path, &enriched)?;

    let report_path = PathBuf::from(&settings.report_file);
    write_report(
        &report_path,
        &ReportInput {
            analysis: &analysis,
            enrichment: &enrichment,
            top_customers: settings.top_customers,
            currency: &settings.currency_symbol,
        },
    )?;

    println!();
    println!(
        "Total revenue:  {}",
        money(analysis.total_revenue, &settings.currency_symbol)
    );
    println!(
        "Enrichment:     {} of {} matched ({})",
        enrichment.matched,
        enrichment.total,
        percent(enrichment.success_rate)
    );
    println!("Enriched data:  {}", enriched_path.display());
    println!("Report:         {}", report_path.display());
    println!("{}", "Done.".green().bold());
    Ok(())
}
