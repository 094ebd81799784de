//! Product catalog integration.
//!
//! Fetches the product list from the catalog API, builds a lookup keyed by
//! numeric product id, and joins it onto validated transactions.
//!
//! The catalog is optional: a failed or empty fetch leaves every transaction
//! unmatched instead of stopping the run.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, SalesError};
use crate::models::{CatalogEntry, EnrichedTransaction, Transaction};

pub const DEFAULT_CATALOG_URL: &str = "https://dummyjson.com/products?limit=100";

pub type CatalogMapping = HashMap<i64, CatalogEntry>;

/// One product as returned by the catalog API. Every field may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogProduct {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub rating: Option<serde_json::Number>,
}

#[derive(Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    products: Vec<serde_json::Value>,
}

/// Decode a catalog response body. Products that do not match the expected
/// shape are skipped.
pub fn parse_catalog_response(body: &str) -> Result<Vec<CatalogProduct>> {
    let response: CatalogResponse = serde_json::from_str(body)?;
    let mut products = Vec::with_capacity(response.products.len());
    for value in response.products {
        match serde_json::from_value::<CatalogProduct>(value) {
            Ok(product) => products.push(product),
            Err(e) => log::debug!("skipping malformed catalog product: {e}"),
        }
    }
    Ok(products)
}

// ---------------------------------------------------------------------------
// HTTP client
// ---------------------------------------------------------------------------

pub struct CatalogClient {
    client: reqwest::blocking::Client,
    url: String,
}

impl CatalogClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    pub fn fetch_products(&self) -> Result<Vec<CatalogProduct>> {
        let response = self.client.get(&self.url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SalesError::CatalogStatus(status.as_u16()));
        }
        let body = response.text()?;
        parse_catalog_response(&body)
    }
}

/// Fetch the full product list. Any failure is logged and yields an empty list.
pub fn fetch_all_products(url: &str, timeout: Duration) -> Vec<CatalogProduct> {
    let result = CatalogClient::new(url, timeout).and_then(|client| client.fetch_products());
    match result {
        Ok(products) => {
            log::info!("fetched {} products from catalog", products.len());
            products
        }
        Err(e) => {
            log::warn!("catalog fetch failed: {e}");
            Vec::new()
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping + enrichment
// ---------------------------------------------------------------------------

/// Later products with the same id replace earlier ones.
pub fn build_mapping(products: &[CatalogProduct]) -> CatalogMapping {
    let mut mapping = CatalogMapping::new();
    for product in products {
        let Some(id) = product.id else { continue };
        mapping.insert(
            id,
            CatalogEntry {
                title: product.title.clone(),
                category: product.category.clone(),
                brand: product.brand.clone(),
                rating: product.rating.clone(),
            },
        );
    }
    mapping
}

/// Concatenate every ASCII digit in `product_id` and parse the result.
/// `None` when there are no digits or the number does not fit.
pub fn extract_product_key(product_id: &str) -> Option<i64> {
    let digits: String = product_id.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

pub fn enrich_transaction(tx: &Transaction, mapping: &CatalogMapping) -> EnrichedTransaction {
    let entry = extract_product_key(&tx.product_id).and_then(|key| mapping.get(&key));
    match entry {
        Some(entry) => EnrichedTransaction {
            transaction: tx.clone(),
            api_category: entry.category.clone(),
            api_brand: entry.brand.clone(),
            api_rating: entry.rating.clone(),
            api_match: true,
        },
        None => EnrichedTransaction {
            transaction: tx.clone(),
            api_category: None,
            api_brand: None,
            api_rating: None,
            api_match: false,
        },
    }
}

pub fn enrich(transactions: &[Transaction], mapping: &CatalogMapping) -> Vec<EnrichedTransaction> {
    let enriched: Vec<EnrichedTransaction> = transactions
        .iter()
        .map(|tx| enrich_transaction(tx, mapping))
        .collect();
    log::info!(
        "enriched {} of {} transactions",
        enriched.iter().filter(|e| e.api_match).count(),
        enriched.len()
    );
    enriched
}

pub struct EnrichmentSummary {
    pub total: usize,
    pub matched: usize,
    /// Product ids of unmatched transactions, in transaction order.
    pub unmatched_product_ids: Vec<String>,
    pub success_rate: f64,
}

pub fn summarize(enriched: &[EnrichedTransaction]) -> EnrichmentSummary {
    let total = enriched.len();
    let matched = enriched.iter().filter(|e| e.api_match).count();
    let unmatched_product_ids = enriched
        .iter()
        .filter(|e| !e.api_match)
        .map(|e| e.transaction.product_id.clone())
        .collect();
    let success_rate = if total == 0 {
        0.0
    } else {
        matched as f64 / total as f64 * 100.0
    };
    EnrichmentSummary {
        total,
        matched,
        unmatched_product_ids,
        success_rate,
    }
}
