//! Fixture generation for the batch loader.
//!
//! Writes the five CSV files the `import` command consumes. Rows are
//! randomized but referentially consistent: ids run densely from 1, and every
//! foreign key points at a generated parent. Files that already exist are
//! left untouched so a curated data set never gets clobbered.

use chrono::NaiveDate;
use core_types::{AbTest, Customer, LandingPage, Product, TestResult};
use rand::rngs::ThreadRng;
use rand::Rng;
use std::path::Path;

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bob", "Charlie", "Diana", "Evan", "Fay", "George", "Hannah", "Ivan", "Jane",
];
const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Martinez",
    "Anderson",
];
const DOMAINS: &[&str] = &["gmail.com", "yahoo.com", "outlook.com"];
const PRODUCT_NAMES: &[(&str, &str)] = &[
    ("Smartphone", "Electronics"),
    ("Laptop", "Electronics"),
    ("Blender", "Home Appliances"),
    ("Air Conditioner", "Home Appliances"),
    ("Jacket", "Fashion"),
    ("Running Shoes", "Sports"),
    ("Perfume", "Beauty"),
    ("Novel", "Books"),
];
const DESCRIPTIONS: &[&str] = &[
    "High-quality",
    "Eco-friendly",
    "Portable",
    "Ergonomic",
    "Energy-saving",
    "Affordable",
    "Durable",
    "Stylish",
    "Innovative",
    "Compact",
];

/// How many rows to generate per table.
pub struct FixtureCounts {
    pub customers: usize,
    pub products: usize,
    pub landing_pages: usize,
    pub ab_tests: usize,
    pub results: usize,
}

/// Generates the five fixture files under `data_dir`.
pub fn generate(data_dir: &Path, counts: &FixtureCounts) -> anyhow::Result<()> {
    std::fs::create_dir_all(data_dir)?;
    let mut rng = rand::thread_rng();

    let customers: Vec<Customer> = (1..=counts.customers as i64)
        .map(|customer_id| {
            let first = pick(&mut rng, FIRST_NAMES);
            let last = pick(&mut rng, LAST_NAMES);
            Customer {
                customer_id,
                name: format!("{first} {last}"),
                // The id keeps generated emails unique; the schema insists.
                email: format!(
                    "{}.{}.{customer_id}@{}",
                    first.to_lowercase(),
                    last.to_lowercase(),
                    pick(&mut rng, DOMAINS)
                ),
            }
        })
        .collect();
    write_if_absent(&data_dir.join("customers.csv"), &customers)?;

    let products: Vec<Product> = (1..=counts.products as i64)
        .map(|product_id| {
            let (name, category) = PRODUCT_NAMES[rng.gen_range(0..PRODUCT_NAMES.len())];
            Product {
                product_id,
                product_name: format!("{name} Model {}", rng.gen_range(100..1000)),
                category: category.to_string(),
                description: Some(format!("{} {name}", pick(&mut rng, DESCRIPTIONS))),
                logo_url: Some(format!(
                    "http://example.com/{}_{product_id}.png",
                    name.replace(' ', "_").to_lowercase()
                )),
                release_date: random_date(&mut rng, ymd(2022, 1, 1), ymd(2023, 12, 31)),
            }
        })
        .collect();
    write_if_absent(&data_dir.join("products.csv"), &products)?;

    let landing_pages: Vec<LandingPage> = (1..=counts.landing_pages as i64)
        .map(|landing_page_id| {
            let variant = if rng.gen_bool(0.5) { "A" } else { "B" };
            LandingPage {
                landing_page_id,
                variant_type: variant.to_string(),
                page_url: format!("http://example.com/landing_{landing_page_id}"),
                product_id: rng.gen_range(1..=counts.products as i64),
            }
        })
        .collect();
    write_if_absent(&data_dir.join("landing_pages.csv"), &landing_pages)?;

    let ab_tests: Vec<AbTest> = (1..=counts.ab_tests as i64)
        .map(|test_id| AbTest {
            test_id,
            test_name: format!("Campaign_{test_id}"),
            start_date: random_date(&mut rng, ymd(2022, 1, 1), ymd(2023, 6, 30)),
            end_date: random_date(&mut rng, ymd(2023, 7, 1), ymd(2023, 12, 31)),
            landing_page_id: rng.gen_range(1..=counts.landing_pages as i64),
            product_id: rng.gen_range(1..=counts.products as i64),
        })
        .collect();
    write_if_absent(&data_dir.join("ab_testing.csv"), &ab_tests)?;

    let results: Vec<TestResult> = (1..=counts.results as i64)
        .map(|results_id| TestResult {
            results_id,
            click_through_rate: random_rate(&mut rng, 0.01, 0.30),
            conversion_rate: random_rate(&mut rng, 0.01, 0.25),
            bounce_rate: random_rate(&mut rng, 0.20, 0.70),
            test_id: rng.gen_range(1..=counts.ab_tests as i64),
        })
        .collect();
    write_if_absent(&data_dir.join("results.csv"), &results)?;

    Ok(())
}

fn pick<'a>(rng: &mut ThreadRng, pool: &'a [&'a str]) -> &'a str {
    pool[rng.gen_range(0..pool.len())]
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

fn random_date(rng: &mut ThreadRng, start: NaiveDate, end: NaiveDate) -> String {
    let days = (end - start).num_days();
    let date = start + chrono::Duration::days(rng.gen_range(0..=days));
    date.format("%Y-%m-%d").to_string()
}

/// A uniform rate in [low, high), rounded to two decimals like the source data.
fn random_rate(rng: &mut ThreadRng, low: f64, high: f64) -> f64 {
    (rng.gen_range(low..high) * 100.0).round() / 100.0
}

fn write_if_absent<T: serde::Serialize>(path: &Path, rows: &[T]) -> anyhow::Result<()> {
    if path.exists() {
        tracing::info!(file = %path.display(), "File already exists, skipping.");
        return Ok(());
    }
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn small_counts() -> FixtureCounts {
        FixtureCounts {
            customers: 4,
            products: 3,
            landing_pages: 5,
            ab_tests: 2,
            results: 7,
        }
    }

    #[test]
    fn generates_referentially_consistent_fixtures() {
        let dir = TempDir::new().unwrap();
        generate(dir.path(), &small_counts()).unwrap();

        let mut reader = csv::Reader::from_path(dir.path().join("customers.csv")).unwrap();
        let customers: Vec<Customer> = reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(customers.len(), 4);
        assert_eq!(customers[0].customer_id, 1);
        let mut emails: Vec<_> = customers.iter().map(|c| c.email.clone()).collect();
        emails.sort();
        emails.dedup();
        assert_eq!(emails.len(), 4, "emails must be unique");

        let mut reader = csv::Reader::from_path(dir.path().join("landing_pages.csv")).unwrap();
        let pages: Vec<LandingPage> = reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(pages.len(), 5);
        assert!(pages.iter().all(|p| (1..=3).contains(&p.product_id)));

        let mut reader = csv::Reader::from_path(dir.path().join("results.csv")).unwrap();
        let results: Vec<TestResult> = reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(results.len(), 7);
        assert!(results.iter().all(|r| (1..=2).contains(&r.test_id)));
        assert!(results
            .iter()
            .all(|r| (0.0..=1.0).contains(&r.click_through_rate)));
    }

    #[test]
    fn existing_files_are_not_clobbered() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("customers.csv");
        std::fs::write(&path, "customer_id,name,email\n1,Keep Me,keep@example.com\n").unwrap();

        generate(dir.path(), &small_counts()).unwrap();

        let kept = std::fs::read_to_string(&path).unwrap();
        assert!(kept.contains("Keep Me"));
        // The other files are still produced.
        assert!(dir.path().join("products.csv").exists());
    }
}
