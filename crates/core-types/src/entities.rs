use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A customer of the platform. `email` is unique across the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub customer_id: i64,
    pub name: String,
    pub email: String,
}

/// A product being promoted. Owns landing pages and A/B tests.
///
/// `release_date` is stored as `YYYY-MM-DD` text, matching the schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub product_id: i64,
    pub product_name: String,
    pub category: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub release_date: String,
}

/// A landing page variant for a product (e.g. variant "A" vs "B").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct LandingPage {
    pub landing_page_id: i64,
    pub variant_type: String,
    pub page_url: String,
    pub product_id: i64,
}

/// An A/B test run against one landing page of one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AbTest {
    pub test_id: i64,
    pub test_name: String,
    pub start_date: String,
    pub end_date: String,
    pub landing_page_id: i64,
    pub product_id: i64,
}

/// A measured outcome of an A/B test. All rates are fractions in [0, 1],
/// stored exactly as supplied.
///
/// The table (and its key column) is called `results`; the struct carries a
/// fuller name to stay out of `std::result::Result`'s way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TestResult {
    pub results_id: i64,
    pub click_through_rate: f64,
    pub conversion_rate: f64,
    pub bounce_rate: f64,
    pub test_id: i64,
}
