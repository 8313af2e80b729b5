use crate::DbError;
use core_types::{
    AbTest, AbTestCreate, AbTestUpdate, Customer, CustomerCreate, CustomerUpdate, LandingPage,
    LandingPageCreate, LandingPageUpdate, Product, ProductCreate, ProductUpdate, TestResult,
    TestResultCreate, TestResultUpdate,
};
use sqlx::SqlitePool;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic:
/// one get/list/create/update/delete group per entity, plus the explicit
/// cascade-delete routines for the Product -> LandingPage -> AbTest ->
/// TestResult ownership tree.
///
/// Id assignment: new rows receive `max(existing id) + 1`, computed by the
/// insert statement itself. A single statement is atomic and serialized by
/// SQLite's writer lock, so two concurrent creates on the same table receive
/// distinct ids. The scan covers rows inserted by the CSV loader as well, so
/// API creates after a batch import allocate above the imported maximum.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: SqlitePool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==========================================================================
    // Customers
    // ==========================================================================

    /// Fetches a single customer by id.
    pub async fn get_customer(&self, customer_id: i64) -> Result<Customer, DbError> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT customer_id, name, email FROM customers WHERE customer_id = ?",
        )
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound("Customer"))?;
        Ok(customer)
    }

    /// Fetches a page of customers in the store's natural order.
    /// Out-of-range offsets yield an empty page, never an error.
    pub async fn list_customers(&self, skip: i64, limit: i64) -> Result<Vec<Customer>, DbError> {
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT customer_id, name, email FROM customers LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;
        Ok(customers)
    }

    /// Inserts a new customer and returns the stored record, including the
    /// assigned id. A duplicate email surfaces as `ConstraintViolation`.
    pub async fn create_customer(&self, new_customer: CustomerCreate) -> Result<Customer, DbError> {
        let customer = sqlx::query_as::<_, Customer>(
            "INSERT INTO customers (customer_id, name, email) \
             VALUES ((SELECT COALESCE(MAX(customer_id), 0) + 1 FROM customers), ?, ?) \
             RETURNING customer_id, name, email",
        )
        .bind(&new_customer.name)
        .bind(&new_customer.email)
        .fetch_one(&self.pool)
        .await?;
        Ok(customer)
    }

    /// Applies a partial update: `Some` fields overwrite, `None` fields keep
    /// their stored value. Returns the updated record.
    pub async fn update_customer(
        &self,
        customer_id: i64,
        update: CustomerUpdate,
    ) -> Result<Customer, DbError> {
        let mut customer = self.get_customer(customer_id).await?;
        if let Some(name) = update.name {
            customer.name = name;
        }
        if let Some(email) = update.email {
            customer.email = email;
        }

        sqlx::query("UPDATE customers SET name = ?, email = ? WHERE customer_id = ?")
            .bind(&customer.name)
            .bind(&customer.email)
            .bind(customer_id)
            .execute(&self.pool)
            .await?;
        Ok(customer)
    }

    /// Deletes a customer. Customers own nothing, so no cascade is needed.
    pub async fn delete_customer(&self, customer_id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM customers WHERE customer_id = ?")
            .bind(customer_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound("Customer"));
        }
        Ok(())
    }

    // ==========================================================================
    // Products
    // ==========================================================================

    /// Fetches a single product by id.
    pub async fn get_product(&self, product_id: i64) -> Result<Product, DbError> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT product_id, product_name, category, description, logo_url, release_date \
             FROM products WHERE product_id = ?",
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound("Product"))?;
        Ok(product)
    }

    /// Fetches a page of products.
    pub async fn list_products(&self, skip: i64, limit: i64) -> Result<Vec<Product>, DbError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT product_id, product_name, category, description, logo_url, release_date \
             FROM products LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    /// Inserts a new product and returns the stored record.
    pub async fn create_product(&self, new_product: ProductCreate) -> Result<Product, DbError> {
        let product = sqlx::query_as::<_, Product>(
            "INSERT INTO products (product_id, product_name, category, description, logo_url, release_date) \
             VALUES ((SELECT COALESCE(MAX(product_id), 0) + 1 FROM products), ?, ?, ?, ?, ?) \
             RETURNING product_id, product_name, category, description, logo_url, release_date",
        )
        .bind(&new_product.product_name)
        .bind(&new_product.category)
        .bind(&new_product.description)
        .bind(&new_product.logo_url)
        .bind(&new_product.release_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(product)
    }

    /// Applies a partial update to a product.
    pub async fn update_product(
        &self,
        product_id: i64,
        update: ProductUpdate,
    ) -> Result<Product, DbError> {
        let mut product = self.get_product(product_id).await?;
        if let Some(product_name) = update.product_name {
            product.product_name = product_name;
        }
        if let Some(category) = update.category {
            product.category = category;
        }
        if let Some(description) = update.description {
            product.description = Some(description);
        }
        if let Some(logo_url) = update.logo_url {
            product.logo_url = Some(logo_url);
        }
        if let Some(release_date) = update.release_date {
            product.release_date = release_date;
        }

        sqlx::query(
            "UPDATE products SET product_name = ?, category = ?, description = ?, \
             logo_url = ?, release_date = ? WHERE product_id = ?",
        )
        .bind(&product.product_name)
        .bind(&product.category)
        .bind(&product.description)
        .bind(&product.logo_url)
        .bind(&product.release_date)
        .bind(product_id)
        .execute(&self.pool)
        .await?;
        Ok(product)
    }

    /// Deletes a product and everything it owns: its landing pages, the A/B
    /// tests attached to it or to those pages, and the results of those
    /// tests. Child rows go first so the foreign-key checks hold at every
    /// step; the whole cascade commits or rolls back as one transaction.
    pub async fn delete_product(&self, product_id: i64) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        let exists =
            sqlx::query_scalar::<_, i64>("SELECT product_id FROM products WHERE product_id = ?")
                .bind(product_id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Err(DbError::NotFound("Product"));
        }

        sqlx::query(
            "DELETE FROM results WHERE test_id IN ( \
                SELECT test_id FROM ab_testing \
                WHERE product_id = ?1 OR landing_page_id IN ( \
                    SELECT landing_page_id FROM landing_pages WHERE product_id = ?1))",
        )
        .bind(product_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "DELETE FROM ab_testing \
             WHERE product_id = ?1 OR landing_page_id IN ( \
                SELECT landing_page_id FROM landing_pages WHERE product_id = ?1)",
        )
        .bind(product_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM landing_pages WHERE product_id = ?")
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM products WHERE product_id = ?")
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    // ==========================================================================
    // Landing pages
    // ==========================================================================

    /// Fetches a single landing page by id.
    pub async fn get_landing_page(&self, landing_page_id: i64) -> Result<LandingPage, DbError> {
        let page = sqlx::query_as::<_, LandingPage>(
            "SELECT landing_page_id, variant_type, page_url, product_id \
             FROM landing_pages WHERE landing_page_id = ?",
        )
        .bind(landing_page_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound("Landing page"))?;
        Ok(page)
    }

    /// Fetches a page of landing pages.
    pub async fn list_landing_pages(
        &self,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<LandingPage>, DbError> {
        let pages = sqlx::query_as::<_, LandingPage>(
            "SELECT landing_page_id, variant_type, page_url, product_id \
             FROM landing_pages LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;
        Ok(pages)
    }

    /// Inserts a new landing page. A dangling `product_id` surfaces as
    /// `ConstraintViolation`.
    pub async fn create_landing_page(
        &self,
        new_page: LandingPageCreate,
    ) -> Result<LandingPage, DbError> {
        let page = sqlx::query_as::<_, LandingPage>(
            "INSERT INTO landing_pages (landing_page_id, variant_type, page_url, product_id) \
             VALUES ((SELECT COALESCE(MAX(landing_page_id), 0) + 1 FROM landing_pages), ?, ?, ?) \
             RETURNING landing_page_id, variant_type, page_url, product_id",
        )
        .bind(&new_page.variant_type)
        .bind(&new_page.page_url)
        .bind(new_page.product_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(page)
    }

    /// Applies a partial update to a landing page.
    pub async fn update_landing_page(
        &self,
        landing_page_id: i64,
        update: LandingPageUpdate,
    ) -> Result<LandingPage, DbError> {
        let mut page = self.get_landing_page(landing_page_id).await?;
        if let Some(variant_type) = update.variant_type {
            page.variant_type = variant_type;
        }
        if let Some(page_url) = update.page_url {
            page.page_url = page_url;
        }
        if let Some(product_id) = update.product_id {
            page.product_id = product_id;
        }

        sqlx::query(
            "UPDATE landing_pages SET variant_type = ?, page_url = ?, product_id = ? \
             WHERE landing_page_id = ?",
        )
        .bind(&page.variant_type)
        .bind(&page.page_url)
        .bind(page.product_id)
        .bind(landing_page_id)
        .execute(&self.pool)
        .await?;
        Ok(page)
    }

    /// Deletes a landing page, cascading to the A/B tests that ran on it and
    /// to their results.
    pub async fn delete_landing_page(&self, landing_page_id: i64) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT landing_page_id FROM landing_pages WHERE landing_page_id = ?",
        )
        .bind(landing_page_id)
        .fetch_optional(&mut *tx)
        .await?;
        if exists.is_none() {
            return Err(DbError::NotFound("Landing page"));
        }

        sqlx::query(
            "DELETE FROM results WHERE test_id IN ( \
                SELECT test_id FROM ab_testing WHERE landing_page_id = ?)",
        )
        .bind(landing_page_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM ab_testing WHERE landing_page_id = ?")
            .bind(landing_page_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM landing_pages WHERE landing_page_id = ?")
            .bind(landing_page_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    // ==========================================================================
    // A/B tests
    // ==========================================================================

    /// Fetches a single A/B test by id.
    pub async fn get_ab_test(&self, test_id: i64) -> Result<AbTest, DbError> {
        let test = sqlx::query_as::<_, AbTest>(
            "SELECT test_id, test_name, start_date, end_date, landing_page_id, product_id \
             FROM ab_testing WHERE test_id = ?",
        )
        .bind(test_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound("A/B test"))?;
        Ok(test)
    }

    /// Fetches a page of A/B tests.
    pub async fn list_ab_tests(&self, skip: i64, limit: i64) -> Result<Vec<AbTest>, DbError> {
        let tests = sqlx::query_as::<_, AbTest>(
            "SELECT test_id, test_name, start_date, end_date, landing_page_id, product_id \
             FROM ab_testing LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;
        Ok(tests)
    }

    /// Inserts a new A/B test. Both foreign keys must reference existing rows.
    pub async fn create_ab_test(&self, new_test: AbTestCreate) -> Result<AbTest, DbError> {
        let test = sqlx::query_as::<_, AbTest>(
            "INSERT INTO ab_testing (test_id, test_name, start_date, end_date, landing_page_id, product_id) \
             VALUES ((SELECT COALESCE(MAX(test_id), 0) + 1 FROM ab_testing), ?, ?, ?, ?, ?) \
             RETURNING test_id, test_name, start_date, end_date, landing_page_id, product_id",
        )
        .bind(&new_test.test_name)
        .bind(&new_test.start_date)
        .bind(&new_test.end_date)
        .bind(new_test.landing_page_id)
        .bind(new_test.product_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(test)
    }

    /// Applies a partial update to an A/B test.
    pub async fn update_ab_test(
        &self,
        test_id: i64,
        update: AbTestUpdate,
    ) -> Result<AbTest, DbError> {
        let mut test = self.get_ab_test(test_id).await?;
        if let Some(test_name) = update.test_name {
            test.test_name = test_name;
        }
        if let Some(start_date) = update.start_date {
            test.start_date = start_date;
        }
        if let Some(end_date) = update.end_date {
            test.end_date = end_date;
        }
        if let Some(landing_page_id) = update.landing_page_id {
            test.landing_page_id = landing_page_id;
        }
        if let Some(product_id) = update.product_id {
            test.product_id = product_id;
        }

        sqlx::query(
            "UPDATE ab_testing SET test_name = ?, start_date = ?, end_date = ?, \
             landing_page_id = ?, product_id = ? WHERE test_id = ?",
        )
        .bind(&test.test_name)
        .bind(&test.start_date)
        .bind(&test.end_date)
        .bind(test.landing_page_id)
        .bind(test.product_id)
        .bind(test_id)
        .execute(&self.pool)
        .await?;
        Ok(test)
    }

    /// Deletes an A/B test and its results.
    pub async fn delete_ab_test(&self, test_id: i64) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        let exists =
            sqlx::query_scalar::<_, i64>("SELECT test_id FROM ab_testing WHERE test_id = ?")
                .bind(test_id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Err(DbError::NotFound("A/B test"));
        }

        sqlx::query("DELETE FROM results WHERE test_id = ?")
            .bind(test_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM ab_testing WHERE test_id = ?")
            .bind(test_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    // ==========================================================================
    // Results
    // ==========================================================================

    /// Fetches a single test result by id.
    pub async fn get_result(&self, results_id: i64) -> Result<TestResult, DbError> {
        let result = sqlx::query_as::<_, TestResult>(
            "SELECT results_id, click_through_rate, conversion_rate, bounce_rate, test_id \
             FROM results WHERE results_id = ?",
        )
        .bind(results_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound("Result"))?;
        Ok(result)
    }

    /// Fetches a page of test results, optionally restricted to a single
    /// A/B test (the dashboard charts one test at a time).
    pub async fn list_results(
        &self,
        skip: i64,
        limit: i64,
        test_id: Option<i64>,
    ) -> Result<Vec<TestResult>, DbError> {
        let results = match test_id {
            Some(test_id) => {
                sqlx::query_as::<_, TestResult>(
                    "SELECT results_id, click_through_rate, conversion_rate, bounce_rate, test_id \
                     FROM results WHERE test_id = ? LIMIT ? OFFSET ?",
                )
                .bind(test_id)
                .bind(limit)
                .bind(skip)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, TestResult>(
                    "SELECT results_id, click_through_rate, conversion_rate, bounce_rate, test_id \
                     FROM results LIMIT ? OFFSET ?",
                )
                .bind(limit)
                .bind(skip)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(results)
    }

    /// Inserts a new test result. Rates are stored exactly as supplied; the
    /// schema enforces only their type.
    pub async fn create_result(&self, new_result: TestResultCreate) -> Result<TestResult, DbError> {
        let result = sqlx::query_as::<_, TestResult>(
            "INSERT INTO results (results_id, click_through_rate, conversion_rate, bounce_rate, test_id) \
             VALUES ((SELECT COALESCE(MAX(results_id), 0) + 1 FROM results), ?, ?, ?, ?) \
             RETURNING results_id, click_through_rate, conversion_rate, bounce_rate, test_id",
        )
        .bind(new_result.click_through_rate)
        .bind(new_result.conversion_rate)
        .bind(new_result.bounce_rate)
        .bind(new_result.test_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(result)
    }

    /// Applies a partial update to a test result.
    pub async fn update_result(
        &self,
        results_id: i64,
        update: TestResultUpdate,
    ) -> Result<TestResult, DbError> {
        let mut result = self.get_result(results_id).await?;
        if let Some(click_through_rate) = update.click_through_rate {
            result.click_through_rate = click_through_rate;
        }
        if let Some(conversion_rate) = update.conversion_rate {
            result.conversion_rate = conversion_rate;
        }
        if let Some(bounce_rate) = update.bounce_rate {
            result.bounce_rate = bounce_rate;
        }
        if let Some(test_id) = update.test_id {
            result.test_id = test_id;
        }

        sqlx::query(
            "UPDATE results SET click_through_rate = ?, conversion_rate = ?, bounce_rate = ?, \
             test_id = ? WHERE results_id = ?",
        )
        .bind(result.click_through_rate)
        .bind(result.conversion_rate)
        .bind(result.bounce_rate)
        .bind(result.test_id)
        .bind(results_id)
        .execute(&self.pool)
        .await?;
        Ok(result)
    }

    /// Deletes a test result. Results own nothing, so no cascade is needed.
    pub async fn delete_result(&self, results_id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM results WHERE results_id = ?")
            .bind(results_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound("Result"));
        }
        Ok(())
    }
}
