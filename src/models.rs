/// Intermediate representation from the sales file parser before validation.
/// Numeric fields that failed to parse are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTransaction {
    pub transaction_id: Option<String>,
    pub date: Option<String>,
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub quantity: Option<i64>,
    pub unit_price: Option<f64>,
    pub customer_id: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub transaction_id: String,
    pub date: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub customer_id: String,
    pub region: String,
}

impl Transaction {
    pub fn line_amount(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

impl From<Transaction> for RawTransaction {
    fn from(tx: Transaction) -> Self {
        Self {
            transaction_id: Some(tx.transaction_id),
            date: Some(tx.date),
            product_id: Some(tx.product_id),
            product_name: Some(tx.product_name),
            quantity: Some(tx.quantity),
            unit_price: Some(tx.unit_price),
            customer_id: Some(tx.customer_id),
            region: Some(tx.region),
        }
    }
}

/// Product metadata keyed by numeric catalog id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogEntry {
    #[allow(dead_code)]
    pub title: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    /// Kept as the catalog's own JSON number so it is written back unchanged.
    pub rating: Option<serde_json::Number>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedTransaction {
    pub transaction: Transaction,
    pub api_category: Option<String>,
    pub api_brand: Option<String>,
    pub api_rating: Option<serde_json::Number>,
    pub api_match: bool,
}
