use std::collections::{BTreeSet, HashMap, HashSet};

use crate::models::Transaction;

pub const DEFAULT_TOP_N: usize = 5;
pub const DEFAULT_LOW_THRESHOLD: i64 = 10;

pub fn round2(val: f64) -> f64 {
    (val * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy)]
pub struct AnalyticsConfig {
    /// Number of products kept by `top_selling_products`.
    pub top_n: usize,
    /// Products selling strictly fewer units than this are low performers.
    pub low_threshold: i64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            low_threshold: DEFAULT_LOW_THRESHOLD,
        }
    }
}

// ---------------------------------------------------------------------------
// Grouping helper
// ---------------------------------------------------------------------------

/// Single pass over `transactions`, accumulating per key. Groups come back in
/// the order their key was first seen.
fn group_by<A, K, F>(transactions: &[Transaction], key: K, mut fold: F) -> Vec<(String, A)>
where
    A: Default,
    K: Fn(&Transaction) -> &str,
    F: FnMut(&mut A, &Transaction),
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, A)> = Vec::new();
    for tx in transactions {
        let k = key(tx);
        let slot = *index.entry(k).or_insert_with(|| {
            groups.push((k.to_string(), A::default()));
            groups.len() - 1
        });
        fold(&mut groups[slot].1, tx);
    }
    groups
}

// ---------------------------------------------------------------------------
// Revenue
// ---------------------------------------------------------------------------

pub fn total_revenue(transactions: &[Transaction]) -> f64 {
    transactions.iter().map(Transaction::line_amount).sum()
}

// ---------------------------------------------------------------------------
// Region-wise sales
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RegionSummary {
    pub region: String,
    pub total_sales: f64,
    pub transaction_count: usize,
    pub percentage: f64,
}

#[derive(Default)]
struct SalesAcc {
    total: f64,
    count: usize,
}

pub fn region_wise_sales(transactions: &[Transaction]) -> Vec<RegionSummary> {
    let grand_total = total_revenue(transactions);
    let mut groups = group_by(
        transactions,
        |tx| tx.region.as_str(),
        |acc: &mut SalesAcc, tx| {
            acc.total += tx.line_amount();
            acc.count += 1;
        },
    );
    groups.sort_by(|a, b| b.1.total.total_cmp(&a.1.total));

    groups
        .into_iter()
        .map(|(region, acc)| RegionSummary {
            region,
            total_sales: round2(acc.total),
            transaction_count: acc.count,
            percentage: if grand_total != 0.0 {
                round2(acc.total / grand_total * 100.0)
            } else {
                0.0
            },
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ProductRanking {
    pub name: String,
    pub total_quantity: i64,
    pub total_revenue: f64,
}

#[derive(Default)]
struct ProductAcc {
    quantity: i64,
    revenue: f64,
}

/// Quantities saturate at `i64::MAX` instead of overflowing.
fn product_totals(transactions: &[Transaction]) -> Vec<ProductRanking> {
    group_by(
        transactions,
        |tx| tx.product_name.as_str(),
        |acc: &mut ProductAcc, tx| {
            acc.quantity = acc.quantity.saturating_add(tx.quantity);
            acc.revenue += tx.line_amount();
        },
    )
    .into_iter()
    .map(|(name, acc)| ProductRanking {
        name,
        total_quantity: acc.quantity,
        total_revenue: round2(acc.revenue),
    })
    .collect()
}

pub fn top_selling_products(transactions: &[Transaction], n: usize) -> Vec<ProductRanking> {
    let mut products = product_totals(transactions);
    products.sort_by(|a, b| b.total_quantity.cmp(&a.total_quantity));
    products.truncate(n);
    products
}

pub fn low_performing_products(transactions: &[Transaction], threshold: i64) -> Vec<ProductRanking> {
    let mut products: Vec<ProductRanking> = product_totals(transactions)
        .into_iter()
        .filter(|p| p.total_quantity < threshold)
        .collect();
    products.sort_by_key(|p| p.total_quantity);
    products
}

// ---------------------------------------------------------------------------
// Customers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerSummary {
    pub customer_id: String,
    pub total_spent: f64,
    pub purchase_count: usize,
    pub average_order_value: f64,
    /// Distinct product names, alphabetical.
    pub products: Vec<String>,
}

#[derive(Default)]
struct CustomerAcc {
    spent: f64,
    count: usize,
    products: BTreeSet<String>,
}

pub fn customer_analysis(transactions: &[Transaction]) -> Vec<CustomerSummary> {
    let mut groups = group_by(
        transactions,
        |tx| tx.customer_id.as_str(),
        |acc: &mut CustomerAcc, tx| {
            acc.spent += tx.line_amount();
            acc.count += 1;
            acc.products.insert(tx.product_name.clone());
        },
    );
    groups.sort_by(|a, b| b.1.spent.total_cmp(&a.1.spent));

    groups
        .into_iter()
        .map(|(customer_id, acc)| CustomerSummary {
            customer_id,
            total_spent: round2(acc.spent),
            purchase_count: acc.count,
            average_order_value: round2(acc.spent / acc.count as f64),
            products: acc.products.into_iter().collect(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Daily trend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DailySummary {
    pub date: String,
    pub revenue: f64,
    pub transaction_count: usize,
    pub unique_customers: usize,
}

#[derive(Default)]
struct DayAcc {
    revenue: f64,
    count: usize,
    customers: HashSet<String>,
}

pub fn daily_sales_trend(transactions: &[Transaction]) -> Vec<DailySummary> {
    let mut days = group_by(
        transactions,
        |tx| tx.date.as_str(),
        |acc: &mut DayAcc, tx| {
            acc.revenue += tx.line_amount();
            acc.count += 1;
            acc.customers.insert(tx.customer_id.clone());
        },
    );
    days.sort_by(|a, b| a.0.cmp(&b.0));

    days.into_iter()
        .map(|(date, acc)| DailySummary {
            date,
            revenue: round2(acc.revenue),
            transaction_count: acc.count,
            unique_customers: acc.customers.len(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Peak day
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct PeakDay {
    pub date: String,
    pub revenue: f64,
    pub transaction_count: usize,
}

/// Date with the highest revenue. The first date reaching the maximum wins.
/// `None` for an empty input.
pub fn peak_sales_day(transactions: &[Transaction]) -> Option<PeakDay> {
    let days = group_by(
        transactions,
        |tx| tx.date.as_str(),
        |acc: &mut SalesAcc, tx| {
            acc.total += tx.line_amount();
            acc.count += 1;
        },
    );

    let mut peak: Option<(String, SalesAcc)> = None;
    for (date, acc) in days {
        let replace = match &peak {
            Some((_, best)) => acc.total > best.total,
            None => true,
        };
        if replace {
            peak = Some((date, acc));
        }
    }

    peak.map(|(date, acc)| PeakDay {
        date,
        revenue: round2(acc.total),
        transaction_count: acc.count,
    })
}

// ---------------------------------------------------------------------------
// Full analysis
// ---------------------------------------------------------------------------

pub struct SalesAnalysis {
    pub total_revenue: f64,
    pub transaction_count: usize,
    pub regions: Vec<RegionSummary>,
    pub top_products: Vec<ProductRanking>,
    pub customers: Vec<CustomerSummary>,
    pub daily: Vec<DailySummary>,
    pub peak_day: Option<PeakDay>,
    pub low_performers: Vec<ProductRanking>,
}

impl SalesAnalysis {
    pub fn average_order_value(&self) -> f64 {
        if self.transaction_count == 0 {
            0.0
        } else {
            self.total_revenue / self.transaction_count as f64
        }
    }

    /// First and last date of the daily trend.
    pub fn date_range(&self) -> Option<(&str, &str)> {
        let first = self.daily.first()?;
        let last = self.daily.last()?;
        Some((first.date.as_str(), last.date.as_str()))
    }
}

pub fn analyze(transactions: &[Transaction], config: &AnalyticsConfig) -> SalesAnalysis {
    SalesAnalysis {
        total_revenue: total_revenue(transactions),
        transaction_count: transactions.len(),
        regions: region_wise_sales(transactions),
        top_products: top_selling_products(transactions, config.top_n),
        customers: customer_analysis(transactions),
        daily: daily_sales_trend(transactions),
        peak_day: peak_sales_day(transactions),
        low_performers: low_performing_products(transactions, config.low_threshold),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: &str, date: &str, name: &str, qty: i64, price: f64, customer: &str, region: &str) -> Transaction {
        Transaction {
            transaction_id: id.to_string(),
            date: date.to_string(),
            product_id: "P101".to_string(),
            product_name: name.to_string(),
            quantity: qty,
            unit_price: price,
            customer_id: customer.to_string(),
            region: region.to_string(),
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx("T1", "2024-12-02", "Laptop", 2, 500.0, "C1", "North"),
            tx("T2", "2024-12-01", "Mouse", 10, 20.0, "C2", "South"),
            tx("T3", "2024-12-02", "Mouse", 5, 20.0, "C1", "South"),
            tx("T4", "2024-12-03", "Pen", 3, 5.0, "C3", "East"),
            tx("T5", "2024-12-01", "Laptop", 1, 450.0, "C2", "North"),
        ]
    }

    #[test]
    fn test_total_revenue() {
        let t = vec![tx("T1", "2024-01-01", "Widget", 2, 50.0, "C1", "North")];
        assert_eq!(total_revenue(&t), 100.0);
        assert_eq!(total_revenue(&[]), 0.0);
    }

    #[test]
    fn test_region_percentages_and_order() {
        let t = vec![
            tx("T1", "2024-01-01", "A", 1, 100.0, "C1", "North"),
            tx("T2", "2024-01-01", "B", 1, 300.0, "C2", "South"),
        ];
        let regions = region_wise_sales(&t);
        assert_eq!(regions[0].region, "South");
        assert_eq!(regions[0].percentage, 75.0);
        assert_eq!(regions[1].region, "North");
        assert_eq!(regions[1].percentage, 25.0);
    }

    #[test]
    fn test_region_totals_reconcile_with_revenue() {
        let t = sample();
        let regions = region_wise_sales(&t);
        let sum: f64 = regions.iter().map(|r| r.total_sales).sum();
        assert!((sum - total_revenue(&t)).abs() < 0.01);
        let pct: f64 = regions.iter().map(|r| r.percentage).sum();
        assert!((pct - 100.0).abs() < 0.05);
        assert!(regions.windows(2).all(|w| w[0].total_sales >= w[1].total_sales));
    }

    #[test]
    fn test_region_ties_keep_first_seen_order() {
        let t = vec![
            tx("T1", "2024-01-01", "A", 1, 100.0, "C1", "West"),
            tx("T2", "2024-01-01", "A", 1, 100.0, "C1", "East"),
        ];
        let regions = region_wise_sales(&t);
        assert_eq!(regions[0].region, "West");
        assert_eq!(regions[1].region, "East");
    }

    #[test]
    fn test_top_products_by_quantity() {
        let top = top_selling_products(&sample(), 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "Mouse");
        assert_eq!(top[0].total_quantity, 15);
        assert_eq!(top[0].total_revenue, 300.0);
        assert_eq!(top[1].name, "Laptop");
    }

    #[test]
    fn test_top_products_ties_keep_first_seen_order() {
        let t = vec![
            tx("T1", "2024-01-01", "Zebra", 4, 1.0, "C1", "North"),
            tx("T2", "2024-01-01", "Apple", 4, 1.0, "C1", "North"),
            tx("T3", "2024-01-01", "Mango", 9, 1.0, "C1", "North"),
        ];
        let top = top_selling_products(&t, DEFAULT_TOP_N);
        let names: Vec<&str> = top.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Mango", "Zebra", "Apple"]);
    }

    #[test]
    fn test_top_products_default_n_truncates() {
        let t: Vec<Transaction> = (1..=7)
            .map(|i| tx("T1", "2024-01-01", &format!("Item{i}"), i, 1.0, "C1", "North"))
            .collect();
        let top = top_selling_products(&t, DEFAULT_TOP_N);
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].name, "Item7");
        assert_eq!(top[4].name, "Item3");
    }

    #[test]
    fn test_product_quantity_saturates() {
        let big = i64::MAX / 2 + 1;
        let t = vec![
            tx("T1", "2024-01-01", "Bulk", big, 1.0, "C1", "North"),
            tx("T2", "2024-01-01", "Bulk", big, 1.0, "C1", "North"),
            tx("T3", "2024-01-01", "Small", 3, 1.0, "C1", "North"),
        ];
        let top = top_selling_products(&t, DEFAULT_TOP_N);
        assert_eq!(top[0].name, "Bulk");
        assert_eq!(top[0].total_quantity, i64::MAX);
        let low = low_performing_products(&t, DEFAULT_LOW_THRESHOLD);
        let names: Vec<&str> = low.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Small"]);
    }

    #[test]
    fn test_customer_ties_keep_first_seen_order() {
        let t = vec![
            tx("T1", "2024-01-01", "A", 1, 50.0, "C9", "North"),
            tx("T2", "2024-01-01", "A", 1, 50.0, "C2", "North"),
            tx("T3", "2024-01-01", "A", 1, 80.0, "C5", "North"),
        ];
        let ids: Vec<String> = customer_analysis(&t).into_iter().map(|c| c.customer_id).collect();
        assert_eq!(ids, vec!["C5", "C9", "C2"]);
    }

    #[test]
    fn test_customer_analysis() {
        let customers = customer_analysis(&sample());
        assert_eq!(customers[0].customer_id, "C1");
        assert_eq!(customers[0].total_spent, 1100.0);
        assert_eq!(customers[0].purchase_count, 2);
        assert_eq!(customers[0].average_order_value, 550.0);
        assert_eq!(customers[0].products, vec!["Laptop", "Mouse"]);
        assert_eq!(customers.last().unwrap().customer_id, "C3");
    }

    #[test]
    fn test_daily_trend_sorted_by_date() {
        let daily = daily_sales_trend(&sample());
        let dates: Vec<&str> = daily.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-12-01", "2024-12-02", "2024-12-03"]);
        assert_eq!(daily[0].revenue, 650.0);
        assert_eq!(daily[0].transaction_count, 2);
        assert_eq!(daily[0].unique_customers, 1);
        assert_eq!(daily[1].unique_customers, 1);
    }

    #[test]
    fn test_peak_day() {
        let peak = peak_sales_day(&sample()).unwrap();
        assert_eq!(peak.date, "2024-12-02");
        assert_eq!(peak.revenue, 1100.0);
        assert_eq!(peak.transaction_count, 2);
    }

    #[test]
    fn test_peak_day_first_maximum_wins() {
        let t = vec![
            tx("T1", "2024-01-05", "A", 1, 100.0, "C1", "North"),
            tx("T2", "2024-01-01", "A", 1, 100.0, "C1", "North"),
        ];
        assert_eq!(peak_sales_day(&t).unwrap().date, "2024-01-05");
    }

    #[test]
    fn test_peak_day_empty() {
        assert!(peak_sales_day(&[]).is_none());
    }

    #[test]
    fn test_low_performers_threshold() {
        let t = vec![
            tx("T1", "2024-01-01", "Slow", 5, 1.0, "C1", "North"),
            tx("T2", "2024-01-01", "Fast", 15, 1.0, "C1", "North"),
            tx("T3", "2024-01-01", "Slower", 2, 1.0, "C1", "North"),
        ];
        let low = low_performing_products(&t, 10);
        let names: Vec<&str> = low.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Slower", "Slow"]);
    }

    #[test]
    fn test_analyze_empty_input() {
        let analysis = analyze(&[], &AnalyticsConfig::default());
        assert_eq!(analysis.total_revenue, 0.0);
        assert!(analysis.regions.is_empty());
        assert!(analysis.customers.is_empty());
        assert!(analysis.peak_day.is_none());
        assert_eq!(analysis.average_order_value(), 0.0);
        assert!(analysis.date_range().is_none());
    }

    #[test]
    fn test_analyze_uses_config() {
        let config = AnalyticsConfig {
            top_n: 1,
            low_threshold: 4,
        };
        let analysis = analyze(&sample(), &config);
        assert_eq!(analysis.top_products.len(), 1);
        let low: Vec<&str> = analysis.low_performers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(low, vec!["Laptop", "Pen"]);
        assert_eq!(analysis.date_range(), Some(("2024-12-01", "2024-12-03")));
    }
}
