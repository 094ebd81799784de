use std::path::Path;

use crate::error::Result;
use crate::models::RawTransaction;

const FIELD_COUNT: usize = 8;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A present column is always `Some`, even when blank. Blank values are
/// judged by the validator, not dropped here.
fn text(raw: &str) -> Option<String> {
    Some(raw.trim().to_string())
}

fn strip_commas(raw: &str) -> String {
    raw.replace(',', "")
}

pub fn parse_quantity(raw: &str) -> Option<i64> {
    strip_commas(raw).trim().parse().ok()
}

pub fn parse_price(raw: &str) -> Option<f64> {
    strip_commas(raw)
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Sales file parser
// ---------------------------------------------------------------------------

pub struct ParsedFile {
    pub rows: Vec<RawTransaction>,
    /// Lines dropped before validation because they had too few fields.
    pub skipped_lines: usize,
}

pub fn parse_record(record: &csv::StringRecord) -> RawTransaction {
    RawTransaction {
        transaction_id: text(&record[0]),
        date: text(&record[1]),
        product_id: text(&record[2]),
        product_name: text(&strip_commas(&record[3])),
        quantity: parse_quantity(&record[4]),
        unit_price: parse_price(&record[5]),
        customer_id: text(&record[6]),
        region: text(&record[7]),
    }
}

/// Parse pipe-delimited sales text. The first row is the header.
pub fn parse_sales(content: &str) -> ParsedFile {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'|')
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    let mut skipped_lines = 0usize;

    for result in rdr.records() {
        let Ok(record) = result else {
            skipped_lines += 1;
            continue;
        };
        if record.len() < FIELD_COUNT {
            skipped_lines += 1;
            continue;
        }
        rows.push(parse_record(&record));
    }

    ParsedFile {
        rows,
        skipped_lines,
    }
}

/// Read a sales file from disk. Invalid UTF-8 is replaced rather than rejected.
pub fn read_sales_file(file_path: &Path) -> Result<ParsedFile> {
    let bytes = std::fs::read(file_path)?;
    let content = String::from_utf8_lossy(&bytes);
    let parsed = parse_sales(&content);
    log::info!(
        "read {} records from {} ({} lines skipped)",
        parsed.rows.len(),
        file_path.display(),
        parsed.skipped_lines
    );
    Ok(parsed)
}
