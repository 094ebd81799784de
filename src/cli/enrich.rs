use std::path::PathBuf;

use crate::catalog::{self, CatalogMapping};
use crate::cli::{load_transactions, InputArgs};
use crate::error::Result;
use crate::export::save_enriched;
use crate::fmt::percent;
use crate::settings::Settings;

/// Build the catalog mapping, or an empty one when running offline.
pub(crate) fn load_catalog(settings: &Settings, offline: bool) -> CatalogMapping {
    if offline {
        log::info!("offline mode: skipping catalog fetch");
        return CatalogMapping::new();
    }
    let products = catalog::fetch_all_products(&settings.catalog_url, settings.catalog_timeout());
    let mapping = catalog::build_mapping(&products);
    log::info!("product mapping created for {} products", mapping.len());
    mapping
}

pub fn run(
    settings: &Settings,
    input: &InputArgs,
    output: Option<PathBuf>,
    offline: bool,
) -> Result<()> {
    let path = input.input_path(settings);
    let outcome = load_transactions(&path, input)?;
    let mapping = load_catalog(settings, offline);
    let enriched = catalog::enrich(&outcome.valid, &mapping);

    let output = output.unwrap_or_else(|| PathBuf::from(&settings.enriched_file));
    save_enriched(&output, &enriched)?;

    let summary = catalog::summarize(&enriched);
    println!(
        "{} of {} transactions matched ({})",
        summary.matched,
        summary.total,
        percent(summary.success_rate)
    );
    println!("Enriched data written to {}", output.display());
    Ok(())
}
