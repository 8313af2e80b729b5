use core_types::{AbTestCreate, CustomerCreate, LandingPageCreate, ProductCreate, TestResultCreate};
use database::DbRepository;
use tempfile::TempDir;

/// Builds a repository over a fresh, fully migrated database in a temporary
/// directory. The `TempDir` must be kept alive for the duration of the test.
pub async fn test_repository() -> (TempDir, DbRepository) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let url = format!("sqlite://{}/test.db", dir.path().display());
    let pool = database::connect_with_url(&url)
        .await
        .expect("failed to open test database");
    database::run_migrations(&pool)
        .await
        .expect("failed to run migrations");
    (dir, DbRepository::new(pool))
}

pub fn customer(name: &str, email: &str) -> CustomerCreate {
    CustomerCreate {
        name: name.to_string(),
        email: email.to_string(),
    }
}

pub fn product(name: &str) -> ProductCreate {
    ProductCreate {
        product_name: name.to_string(),
        category: "Tools".to_string(),
        description: None,
        logo_url: None,
        release_date: "2024-01-01".to_string(),
    }
}

pub fn landing_page(product_id: i64, variant: &str) -> LandingPageCreate {
    LandingPageCreate {
        variant_type: variant.to_string(),
        page_url: format!("http://example.com/landing/{variant}"),
        product_id,
    }
}

pub fn test_result(test_id: i64, click_through_rate: f64) -> TestResultCreate {
    TestResultCreate {
        click_through_rate,
        conversion_rate: 0.12,
        bounce_rate: 0.4,
        test_id,
    }
}

pub fn ab_test(product_id: i64, landing_page_id: i64, name: &str) -> AbTestCreate {
    AbTestCreate {
        test_name: name.to_string(),
        start_date: "2024-02-01".to_string(),
        end_date: "2024-03-01".to_string(),
        landing_page_id,
        product_id,
    }
}
