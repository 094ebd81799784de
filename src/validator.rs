use std::fmt;

use crate::error::{Result, SalesError};
use crate::models::{RawTransaction, Transaction};

#[derive(Debug, Clone, PartialEq)]
pub enum InvalidReason {
    MissingField(&'static str),
    BadTransactionId,
    BadProductId,
    BadCustomerId,
    NonPositiveQuantity,
    NonPositivePrice,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(name) => write!(f, "missing {name}"),
            Self::BadTransactionId => write!(f, "transaction id must start with 'T'"),
            Self::BadProductId => write!(f, "product id must start with 'P'"),
            Self::BadCustomerId => write!(f, "customer id must start with 'C'"),
            Self::NonPositiveQuantity => write!(f, "quantity must be positive"),
            Self::NonPositivePrice => write!(f, "unit price must be positive"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordCheck {
    Valid(Transaction),
    Invalid(InvalidReason),
}

fn required<T>(value: Option<T>, name: &'static str) -> std::result::Result<T, InvalidReason> {
    value.ok_or(InvalidReason::MissingField(name))
}

fn check_record(raw: RawTransaction) -> std::result::Result<Transaction, InvalidReason> {
    let transaction_id = required(raw.transaction_id, "TransactionID")?;
    let date = required(raw.date, "Date")?;
    let product_id = required(raw.product_id, "ProductID")?;
    let product_name = required(raw.product_name, "ProductName")?;
    let quantity = required(raw.quantity, "Quantity")?;
    let unit_price = required(raw.unit_price, "UnitPrice")?;
    let customer_id = required(raw.customer_id, "CustomerID")?;
    let region = required(raw.region, "Region")?;

    if !transaction_id.starts_with('T') {
        return Err(InvalidReason::BadTransactionId);
    }
    if !product_id.starts_with('P') {
        return Err(InvalidReason::BadProductId);
    }
    if !customer_id.starts_with('C') {
        return Err(InvalidReason::BadCustomerId);
    }
    if quantity <= 0 {
        return Err(InvalidReason::NonPositiveQuantity);
    }
    // NaN fails this comparison and is rejected with the non-positive prices.
    if !(unit_price > 0.0) {
        return Err(InvalidReason::NonPositivePrice);
    }
    if region.is_empty() {
        return Err(InvalidReason::MissingField("Region"));
    }

    Ok(Transaction {
        transaction_id,
        date,
        product_id,
        product_name,
        quantity,
        unit_price,
        customer_id,
        region,
    })
}

pub fn validate_record(raw: RawTransaction) -> RecordCheck {
    match check_record(raw) {
        Ok(tx) => RecordCheck::Valid(tx),
        Err(reason) => RecordCheck::Invalid(reason),
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Filters {
    /// Exact, case-sensitive region match.
    pub region: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
}

impl Filters {
    pub fn check_range(&self) -> Result<()> {
        if let (Some(min), Some(max)) = (self.min_amount, self.max_amount) {
            if min > max {
                return Err(SalesError::InvalidRange { min, max });
            }
        }
        Ok(())
    }

    fn amount_in_range(&self, amount: f64) -> bool {
        self.min_amount.map_or(true, |min| amount >= min)
            && self.max_amount.map_or(true, |max| amount <= max)
    }
}

/// Counters for one validation run. Region and amount removals are counted
/// against the set left by the previous stage, not the original input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationSummary {
    pub total_input: usize,
    pub invalid: usize,
    pub filtered_by_region: usize,
    pub filtered_by_amount: usize,
    pub final_count: usize,
}

pub struct FilterOutcome {
    pub valid: Vec<Transaction>,
    pub invalid_count: usize,
    pub summary: ValidationSummary,
}

pub fn validate_and_filter(records: Vec<RawTransaction>, filters: &Filters) -> FilterOutcome {
    let total_input = records.len();
    let mut valid = Vec::with_capacity(total_input);
    let mut invalid_count = 0usize;

    for raw in records {
        let id = raw.transaction_id.clone().unwrap_or_default();
        match validate_record(raw) {
            RecordCheck::Valid(tx) => valid.push(tx),
            RecordCheck::Invalid(reason) => {
                log::debug!("invalid record {id:?}: {reason}");
                invalid_count += 1;
            }
        }
    }

    let mut filtered_by_region = 0usize;
    if let Some(region) = &filters.region {
        let before = valid.len();
        valid.retain(|tx| &tx.region == region);
        filtered_by_region = before - valid.len();
    }

    let mut filtered_by_amount = 0usize;
    if filters.min_amount.is_some() || filters.max_amount.is_some() {
        let before = valid.len();
        valid.retain(|tx| filters.amount_in_range(tx.line_amount()));
        filtered_by_amount = before - valid.len();
    }

    let summary = ValidationSummary {
        total_input,
        invalid: invalid_count,
        filtered_by_region,
        filtered_by_amount,
        final_count: valid.len(),
    };

    FilterOutcome {
        valid,
        invalid_count,
        summary,
    }
}

// ---------------------------------------------------------------------------
// Dataset overview (display only)
// ---------------------------------------------------------------------------

pub struct DatasetOverview {
    pub regions: Vec<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
}

pub fn dataset_overview(transactions: &[Transaction]) -> DatasetOverview {
    let mut regions: Vec<String> = transactions.iter().map(|tx| tx.region.clone()).collect();
    regions.sort();
    regions.dedup();

    let amounts = transactions.iter().map(Transaction::line_amount);
    let min_amount = amounts.clone().reduce(f64::min);
    let max_amount = amounts.reduce(f64::max);

    DatasetOverview {
        regions,
        min_amount,
        max_amount,
    }
}
