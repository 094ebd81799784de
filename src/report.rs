use std::path::Path;

use chrono::NaiveDateTime;

use crate::analytics::SalesAnalysis;
use crate::catalog::EnrichmentSummary;
use crate::error::Result;
use crate::fmt::money;

const WIDTH: usize = 50;

pub struct ReportInput<'a> {
    pub analysis: &'a SalesAnalysis,
    pub enrichment: &'a EnrichmentSummary,
    pub top_customers: usize,
    pub currency: &'a str,
}

fn section(out: &mut String, title: &str) {
    out.push_str(&format!("{title}\n{}\n", "-".repeat(WIDTH)));
}

// ---------------------------------------------------------------------------
// Pure rendering (report data → String)
// ---------------------------------------------------------------------------

pub fn render_report(input: &ReportInput, generated: NaiveDateTime) -> String {
    let a = input.analysis;
    let cur = input.currency;
    let m = |v: f64| money(v, cur);
    let rule = "=".repeat(WIDTH);
    let mut out = String::new();

    out.push_str(&format!(
        "{rule}\n          SALES ANALYTICS REPORT\n        Generated: {}\n        Records Processed: {}\n{rule}\n\n",
        generated.format("%Y-%m-%d %H:%M:%S"),
        a.transaction_count
    ));

    section(&mut out, "OVERALL SUMMARY");
    let date_range = a
        .date_range()
        .map(|(from, to)| format!("{from} to {to}"))
        .unwrap_or_else(|| "N/A".to_string());
    out.push_str(&format!("Total Revenue:        {}\n", m(a.total_revenue)));
    out.push_str(&format!("Total Transactions:   {}\n", a.transaction_count));
    out.push_str(&format!("Average Order Value:  {}\n", m(a.average_order_value())));
    out.push_str(&format!("Date Range:           {date_range}\n\n"));

    section(&mut out, "REGION-WISE PERFORMANCE");
    out.push_str(&format!("{:<10}{:<15}{:<15}Transactions\n", "Region", "Sales", "% of Total"));
    for r in &a.regions {
        out.push_str(&format!(
            "{:<10}{:<15}{:>6.2}%        {}\n",
            r.region,
            m(r.total_sales),
            r.percentage,
            r.transaction_count
        ));
    }
    out.push('\n');

    section(&mut out, &format!("TOP {} PRODUCTS", a.top_products.len()));
    out.push_str(&format!("{:<6}{:<25}{:<12}Revenue\n", "Rank", "Product", "Qty Sold"));
    for (idx, p) in a.top_products.iter().enumerate() {
        out.push_str(&format!(
            "{:<6}{:<25}{:<12}{}\n",
            idx + 1,
            p.name,
            p.total_quantity,
            m(p.total_revenue)
        ));
    }
    out.push('\n');

    let customers: Vec<_> = a.customers.iter().take(input.top_customers).collect();
    section(&mut out, &format!("TOP {} CUSTOMERS", customers.len()));
    out.push_str(&format!("{:<6}{:<15}{:<15}Orders\n", "Rank", "Customer ID", "Total Spent"));
    for (idx, c) in customers.iter().enumerate() {
        out.push_str(&format!(
            "{:<6}{:<15}{:<15}{}\n",
            idx + 1,
            c.customer_id,
            m(c.total_spent),
            c.purchase_count
        ));
    }
    out.push('\n');

    section(&mut out, "DAILY SALES TREND");
    out.push_str(&format!("{:<12}{:<15}{:<10}Customers\n", "Date", "Revenue", "Txns"));
    for d in &a.daily {
        out.push_str(&format!(
            "{:<12}{:<15}{:<10}{}\n",
            d.date,
            m(d.revenue),
            d.transaction_count,
            d.unique_customers
        ));
    }
    out.push('\n');

    section(&mut out, "PRODUCT PERFORMANCE ANALYSIS");
    match &a.peak_day {
        Some(peak) => out.push_str(&format!(
            "Best Sales Day: {} | Revenue: {} | Orders: {}\n\n",
            peak.date,
            m(peak.revenue),
            peak.transaction_count
        )),
        None => out.push_str("Best Sales Day: N/A\n\n"),
    }
    out.push_str("Low Performing Products:\n");
    for p in &a.low_performers {
        out.push_str(&format!(
            "- {} (Qty: {}, Revenue: {})\n",
            p.name,
            p.total_quantity,
            m(p.total_revenue)
        ));
    }
    out.push('\n');

    let e = input.enrichment;
    section(&mut out, "API ENRICHMENT SUMMARY");
    out.push_str(&format!("Total Records Enriched: {}\n", e.matched));
    out.push_str(&format!("Enrichment Success Rate: {:.2}%\n", e.success_rate));
    out.push_str("Failed Product IDs:\n");
    for id in &e.unmatched_product_ids {
        out.push_str(&format!("- {id}\n"));
    }

    out
}

pub fn write_report(path: &Path, input: &ReportInput) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let body = render_report(input, chrono::Local::now().naive_local());
    std::fs::write(path, body)?;
    log::info!("report generated: {}", path.display());
    Ok(())
}
