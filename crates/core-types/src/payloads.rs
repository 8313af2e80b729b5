//! Request payloads for the CRUD surface.
//!
//! `*Create` structs carry the required fields of a new record; the id is
//! assigned by the record service, never by the caller. `*Update` structs
//! are partial: every field is an `Option`, and `None` (the field omitted
//! from the request, or set to JSON null) means "leave the stored value
//! untouched". An empty string or a zero is a legitimate `Some` value and is
//! never treated as omitted.
//!
//! `deny_unknown_fields` makes the API boundary reject misspelled or
//! extraneous fields instead of silently dropping them.

use serde::{Deserialize, Serialize};

// --- Customer payloads ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomerCreate {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}

// --- Product payloads ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductCreate {
    pub product_name: String,
    pub category: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub release_date: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductUpdate {
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub release_date: Option<String>,
}

// --- Landing page payloads ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LandingPageCreate {
    pub variant_type: String,
    pub page_url: String,
    pub product_id: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LandingPageUpdate {
    pub variant_type: Option<String>,
    pub page_url: Option<String>,
    pub product_id: Option<i64>,
}

// --- A/B test payloads ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AbTestCreate {
    pub test_name: String,
    pub start_date: String,
    pub end_date: String,
    pub landing_page_id: i64,
    pub product_id: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AbTestUpdate {
    pub test_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub landing_page_id: Option<i64>,
    pub product_id: Option<i64>,
}

// --- Result payloads ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestResultCreate {
    pub click_through_rate: f64,
    pub conversion_rate: f64,
    pub bounce_rate: f64,
    pub test_id: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestResultUpdate {
    pub click_through_rate: Option<f64>,
    pub conversion_rate: Option<f64>,
    pub bounce_rate: Option<f64>,
    pub test_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_fields_default_to_none() {
        let update: ProductUpdate = serde_json::from_str("{}").unwrap();
        assert!(update.product_name.is_none());
        assert!(update.release_date.is_none());
    }

    #[test]
    fn null_and_omitted_both_mean_keep() {
        let update: CustomerUpdate =
            serde_json::from_str(r#"{"name": null, "email": "a@b.c"}"#).unwrap();
        assert!(update.name.is_none());
        assert_eq!(update.email.as_deref(), Some("a@b.c"));
    }

    #[test]
    fn empty_string_is_a_value_not_omitted() {
        let update: CustomerUpdate = serde_json::from_str(r#"{"name": ""}"#).unwrap();
        assert_eq!(update.name.as_deref(), Some(""));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<CustomerCreate>(
            r#"{"name": "A", "email": "a@b.c", "nickname": "x"}"#
        )
        .is_err());
    }
}
