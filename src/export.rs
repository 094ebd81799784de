use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::models::EnrichedTransaction;

pub const ENRICHED_HEADERS: [&str; 12] = [
    "TransactionID",
    "Date",
    "ProductID",
    "ProductName",
    "Quantity",
    "UnitPrice",
    "CustomerID",
    "Region",
    "API_Category",
    "API_Brand",
    "API_Rating",
    "API_Match",
];

/// Decimal text with at least one fractional digit: 50 -> "50.0", 4.75 -> "4.75".
pub fn decimal_text(val: f64) -> String {
    if val.is_finite() && val.fract() == 0.0 && val.abs() < 1e16 {
        format!("{val:.1}")
    } else {
        format!("{val}")
    }
}

fn bool_text(val: bool) -> &'static str {
    if val {
        "True"
    } else {
        "False"
    }
}

fn row(e: &EnrichedTransaction) -> [String; 12] {
    let tx = &e.transaction;
    [
        tx.transaction_id.clone(),
        tx.date.clone(),
        tx.product_id.clone(),
        tx.product_name.clone(),
        tx.quantity.to_string(),
        decimal_text(tx.unit_price),
        tx.customer_id.clone(),
        tx.region.clone(),
        e.api_category.clone().unwrap_or_default(),
        e.api_brand.clone().unwrap_or_default(),
        e.api_rating.as_ref().map(ToString::to_string).unwrap_or_default(),
        bool_text(e.api_match).to_string(),
    ]
}

pub fn write_enriched<W: Write>(writer: W, enriched: &[EnrichedTransaction]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'|')
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(writer);
    wtr.write_record(ENRICHED_HEADERS)?;
    for e in enriched {
        wtr.write_record(row(e))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_enriched(path: &Path, enriched: &[EnrichedTransaction]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_enriched(std::io::BufWriter::new(file), enriched)?;
    log::info!("enriched data saved to {}", path.display());
    Ok(())
}
