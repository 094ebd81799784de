use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::analytics::{self, AnalyticsConfig, SalesAnalysis};
use crate::cli::{load_transactions, InputArgs};
use crate::error::Result;
use crate::fmt::{money, percent};
use crate::settings::Settings;

pub fn run(
    settings: &Settings,
    input: &InputArgs,
    top: Option<usize>,
    threshold: Option<i64>,
) -> Result<()> {
    let path = input.input_path(settings);
    let outcome = load_transactions(&path, input)?;
    let defaults = settings.analytics_config();
    let config = AnalyticsConfig {
        top_n: top.unwrap_or(defaults.top_n),
        low_threshold: threshold.unwrap_or(defaults.low_threshold),
    };

    if outcome.valid.is_empty() {
        println!("No valid transactions after filtering ({} invalid).", outcome.invalid_count);
        return Ok(());
    }

    let analysis = analytics::analyze(&outcome.valid, &config);
    println!("{}", format_analysis(&analysis, settings));
    Ok(())
}

// ---------------------------------------------------------------------------
// Pure formatting functions (analysis → String)
// ---------------------------------------------------------------------------

pub fn format_analysis(a: &SalesAnalysis, settings: &Settings) -> String {
    let cur = settings.currency_symbol.as_str();
    let mut sections = vec![
        format!(
            "{} {}  ({} transactions, avg {})",
            "Total Revenue:".bold(),
            money(a.total_revenue, cur),
            a.transaction_count,
            money(a.average_order_value(), cur)
        ),
        format_regions(a, cur),
        format_products(a, cur),
        format_customers(a, cur, settings.top_customers),
        format_daily(a, cur),
    ];
    sections.push(match &a.peak_day {
        Some(peak) => format!(
            "{} {} ({}, {} orders)",
            "Peak Sales Day:".bold(),
            peak.date,
            money(peak.revenue, cur),
            peak.transaction_count
        ),
        None => format!("{} N/A", "Peak Sales Day:".bold()),
    });
    sections.push(format_low_performers(a, cur));
    sections.join("\n\n")
}

fn format_regions(a: &SalesAnalysis, cur: &str) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Region", "Sales", "% of Total", "Transactions"]);
    for r in &a.regions {
        table.add_row(vec![
            Cell::new(&r.region),
            Cell::new(money(r.total_sales, cur)),
            Cell::new(percent(r.percentage)),
            Cell::new(r.transaction_count),
        ]);
    }
    format!("{}\n{table}", "Region-wise Sales".green().bold())
}

fn format_products(a: &SalesAnalysis, cur: &str) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Rank", "Product", "Qty Sold", "Revenue"]);
    for (idx, p) in a.top_products.iter().enumerate() {
        table.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(&p.name),
            Cell::new(p.total_quantity),
            Cell::new(money(p.total_revenue, cur)),
        ]);
    }
    format!("{}\n{table}", "Top Selling Products".green().bold())
}

fn format_customers(a: &SalesAnalysis, cur: &str, limit: usize) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Customer", "Total Spent", "Orders", "Avg Order", "Products"]);
    for c in a.customers.iter().take(limit) {
        table.add_row(vec![
            Cell::new(&c.customer_id),
            Cell::new(money(c.total_spent, cur)),
            Cell::new(c.purchase_count),
            Cell::new(money(c.average_order_value, cur)),
            Cell::new(c.products.join(", ")),
        ]);
    }
    format!("{}\n{table}", "Top Customers".green().bold())
}

fn format_daily(a: &SalesAnalysis, cur: &str) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Date", "Revenue", "Txns", "Customers"]);
    for d in &a.daily {
        table.add_row(vec![
            Cell::new(&d.date),
            Cell::new(money(d.revenue, cur)),
            Cell::new(d.transaction_count),
            Cell::new(d.unique_customers),
        ]);
    }
    format!("{}\n{table}", "Daily Sales Trend".green().bold())
}

fn format_low_performers(a: &SalesAnalysis, cur: &str) -> String {
    if a.low_performers.is_empty() {
        return format!("{} none", "Low Performing Products:".bold());
    }
    let mut table = Table::new();
    table.set_header(vec!["Product", "Qty Sold", "Revenue"]);
    for p in &a.low_performers {
        table.add_row(vec![
            Cell::new(&p.name),
            Cell::new(p.total_quantity.to_string().red()),
            Cell::new(money(p.total_revenue, cur)),
        ]);
    }
    format!("{}\n{table}", "Low Performing Products".red().bold())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Transaction;

    fn tx(region: &str, name: &str, qty: i64, price: f64) -> Transaction {
        Transaction {
            transaction_id: "T1".to_string(),
            date: "2024-12-01".to_string(),
            product_id: "P1".to_string(),
            product_name: name.to_string(),
            quantity: qty,
            unit_price: price,
            customer_id: "C7".to_string(),
            region: region.to_string(),
        }
    }

    #[test]
    fn test_format_analysis_contains_sections() {
        colored::control::set_override(false);
        let txns = vec![tx("North", "Laptop", 2, 1000.0), tx("South", "Cable", 30, 5.0)];
        let analysis = analytics::analyze(&txns, &AnalyticsConfig::default());
        let settings = Settings {
            currency_symbol: "$".to_string(),
            ..Settings::default()
        };
        let text = format_analysis(&analysis, &settings);
        assert!(text.contains("Total Revenue: $2,150.00"));
        assert!(text.contains("Region-wise Sales"));
        assert!(text.contains("Laptop"));
        assert!(text.contains("C7"));
        assert!(text.contains("Peak Sales Day: 2024-12-01"));
        assert!(text.contains("Low Performing Products"));
    }
}
