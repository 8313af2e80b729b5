use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use database::DbRepository;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub db_repo: DbRepository,
}

/// Builds the application router: one uniform CRUD block per entity, plus a
/// health probe. Kept separate from `run_server` so tests can drive the
/// router directly against a throwaway database.
pub fn app(state: Arc<AppState>) -> Router {
    // The dashboard is served from a different origin, so CORS stays open.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    // --- DEFINE THE APPLICATION ROUTES ---
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route(
            "/customers",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route(
            "/customers/:customer_id",
            get(handlers::get_customer)
                .put(handlers::update_customer)
                .delete(handlers::delete_customer),
        )
        .route(
            "/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/products/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route(
            "/landing-pages",
            get(handlers::list_landing_pages).post(handlers::create_landing_page),
        )
        .route(
            "/landing-pages/:landing_page_id",
            get(handlers::get_landing_page)
                .put(handlers::update_landing_page)
                .delete(handlers::delete_landing_page),
        )
        .route(
            "/ab-tests",
            get(handlers::list_ab_tests).post(handlers::create_ab_test),
        )
        .route(
            "/ab-tests/:test_id",
            get(handlers::get_ab_test)
                .put(handlers::update_ab_test)
                .delete(handlers::delete_ab_test),
        )
        .route(
            "/results",
            get(handlers::list_results).post(handlers::create_result),
        )
        .route(
            "/results/:results_id",
            get(handlers::get_result)
                .put(handlers::update_result)
                .delete(handlers::delete_result),
        )
        .with_state(state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024))
}

/// The main function to configure and run the web server.
pub async fn run_server(addr: SocketAddr) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let db_pool = database::connect().await?;
    database::run_migrations(&db_pool).await?;
    let db_repo = DbRepository::new(db_pool);

    let app_state = Arc::new(AppState { db_repo });
    let app = app(app_state);

    tracing::info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
