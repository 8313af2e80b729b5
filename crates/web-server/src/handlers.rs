use crate::{error::AppError, AppState};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use core_types::{
    AbTest, AbTestCreate, AbTestUpdate, Customer, CustomerCreate, CustomerUpdate, LandingPage,
    LandingPageCreate, LandingPageUpdate, Product, ProductCreate, ProductUpdate, TestResult,
    TestResultCreate, TestResultUpdate,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Offset/limit pagination for every list endpoint.
#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
}
fn default_limit() -> i64 {
    100
}

/// Pagination plus the optional `test_id` filter on the results listing.
#[derive(Debug, Deserialize)]
pub struct ResultsQuery {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
    test_id: Option<i64>,
}

// ==============================================================================
// Customers
// ==============================================================================

/// # GET /customers/:customer_id
pub async fn get_customer(
    Path(customer_id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Customer>, AppError> {
    let customer = state.db_repo.get_customer(customer_id).await?;
    Ok(Json(customer))
}

/// # GET /customers
pub async fn list_customers(
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<Customer>>, AppError> {
    let customers = state
        .db_repo
        .list_customers(pagination.skip, pagination.limit)
        .await?;
    Ok(Json(customers))
}

/// # POST /customers
pub async fn create_customer(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(new_customer), _): WithRejection<Json<CustomerCreate>, AppError>,
) -> Result<Json<Customer>, AppError> {
    let customer = state.db_repo.create_customer(new_customer).await?;
    Ok(Json(customer))
}

/// # PUT /customers/:customer_id
pub async fn update_customer(
    Path(customer_id): Path<i64>,
    State(state): State<Arc<AppState>>,
    WithRejection(Json(update), _): WithRejection<Json<CustomerUpdate>, AppError>,
) -> Result<Json<Customer>, AppError> {
    let customer = state.db_repo.update_customer(customer_id, update).await?;
    Ok(Json(customer))
}

/// # DELETE /customers/:customer_id
pub async fn delete_customer(
    Path(customer_id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    state.db_repo.delete_customer(customer_id).await?;
    Ok(Json(json!({ "message": "Customer deleted successfully" })))
}

// ==============================================================================
// Products
// ==============================================================================

/// # GET /products/:product_id
pub async fn get_product(
    Path(product_id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Product>, AppError> {
    let product = state.db_repo.get_product(product_id).await?;
    Ok(Json(product))
}

/// # GET /products
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = state
        .db_repo
        .list_products(pagination.skip, pagination.limit)
        .await?;
    Ok(Json(products))
}

/// # POST /products
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(new_product), _): WithRejection<Json<ProductCreate>, AppError>,
) -> Result<Json<Product>, AppError> {
    let product = state.db_repo.create_product(new_product).await?;
    Ok(Json(product))
}

/// # PUT /products/:product_id
pub async fn update_product(
    Path(product_id): Path<i64>,
    State(state): State<Arc<AppState>>,
    WithRejection(Json(update), _): WithRejection<Json<ProductUpdate>, AppError>,
) -> Result<Json<Product>, AppError> {
    let product = state.db_repo.update_product(product_id, update).await?;
    Ok(Json(product))
}

/// # DELETE /products/:product_id
/// Cascades to the product's landing pages, A/B tests, and their results.
pub async fn delete_product(
    Path(product_id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    state.db_repo.delete_product(product_id).await?;
    Ok(Json(json!({ "message": "Product deleted successfully" })))
}

// ==============================================================================
// Landing pages
// ==============================================================================

/// # GET /landing-pages/:landing_page_id
pub async fn get_landing_page(
    Path(landing_page_id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<LandingPage>, AppError> {
    let page = state.db_repo.get_landing_page(landing_page_id).await?;
    Ok(Json(page))
}

/// # GET /landing-pages
pub async fn list_landing_pages(
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<LandingPage>>, AppError> {
    let pages = state
        .db_repo
        .list_landing_pages(pagination.skip, pagination.limit)
        .await?;
    Ok(Json(pages))
}

/// # POST /landing-pages
pub async fn create_landing_page(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(new_page), _): WithRejection<Json<LandingPageCreate>, AppError>,
) -> Result<Json<LandingPage>, AppError> {
    let page = state.db_repo.create_landing_page(new_page).await?;
    Ok(Json(page))
}

/// # PUT /landing-pages/:landing_page_id
pub async fn update_landing_page(
    Path(landing_page_id): Path<i64>,
    State(state): State<Arc<AppState>>,
    WithRejection(Json(update), _): WithRejection<Json<LandingPageUpdate>, AppError>,
) -> Result<Json<LandingPage>, AppError> {
    let page = state
        .db_repo
        .update_landing_page(landing_page_id, update)
        .await?;
    Ok(Json(page))
}

/// # DELETE /landing-pages/:landing_page_id
/// Cascades to the A/B tests that ran on this page and their results.
pub async fn delete_landing_page(
    Path(landing_page_id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    state.db_repo.delete_landing_page(landing_page_id).await?;
    Ok(Json(json!({ "message": "Landing page deleted successfully" })))
}

// ==============================================================================
// A/B tests
// ==============================================================================

/// # GET /ab-tests/:test_id
pub async fn get_ab_test(
    Path(test_id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<AbTest>, AppError> {
    let test = state.db_repo.get_ab_test(test_id).await?;
    Ok(Json(test))
}

/// # GET /ab-tests
pub async fn list_ab_tests(
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<AbTest>>, AppError> {
    let tests = state
        .db_repo
        .list_ab_tests(pagination.skip, pagination.limit)
        .await?;
    Ok(Json(tests))
}

/// # POST /ab-tests
pub async fn create_ab_test(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(new_test), _): WithRejection<Json<AbTestCreate>, AppError>,
) -> Result<Json<AbTest>, AppError> {
    let test = state.db_repo.create_ab_test(new_test).await?;
    Ok(Json(test))
}

/// # PUT /ab-tests/:test_id
pub async fn update_ab_test(
    Path(test_id): Path<i64>,
    State(state): State<Arc<AppState>>,
    WithRejection(Json(update), _): WithRejection<Json<AbTestUpdate>, AppError>,
) -> Result<Json<AbTest>, AppError> {
    let test = state.db_repo.update_ab_test(test_id, update).await?;
    Ok(Json(test))
}

/// # DELETE /ab-tests/:test_id
/// Cascades to the test's results.
pub async fn delete_ab_test(
    Path(test_id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    state.db_repo.delete_ab_test(test_id).await?;
    Ok(Json(json!({ "message": "A/B test deleted successfully" })))
}

// ==============================================================================
// Results
// ==============================================================================

/// # GET /results/:results_id
pub async fn get_result(
    Path(results_id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<TestResult>, AppError> {
    let result = state.db_repo.get_result(results_id).await?;
    Ok(Json(result))
}

/// # GET /results
/// Supports `?test_id=N` so the dashboard can chart one test's results.
pub async fn list_results(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ResultsQuery>,
) -> Result<Json<Vec<TestResult>>, AppError> {
    let results = state
        .db_repo
        .list_results(query.skip, query.limit, query.test_id)
        .await?;
    Ok(Json(results))
}

/// # POST /results
pub async fn create_result(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(new_result), _): WithRejection<Json<TestResultCreate>, AppError>,
) -> Result<Json<TestResult>, AppError> {
    let result = state.db_repo.create_result(new_result).await?;
    Ok(Json(result))
}

/// # PUT /results/:results_id
pub async fn update_result(
    Path(results_id): Path<i64>,
    State(state): State<Arc<AppState>>,
    WithRejection(Json(update), _): WithRejection<Json<TestResultUpdate>, AppError>,
) -> Result<Json<TestResult>, AppError> {
    let result = state.db_repo.update_result(results_id, update).await?;
    Ok(Json(result))
}

/// # DELETE /results/:results_id
pub async fn delete_result(
    Path(results_id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    state.db_repo.delete_result(results_id).await?;
    Ok(Json(json!({ "message": "Result deleted successfully" })))
}
