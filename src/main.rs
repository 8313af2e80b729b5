use clap::{Parser, Subcommand};
use database::connection::{connect, run_migrations};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod loader;
mod simulate;

/// The main entry point for the Marketpulse analytics application.
#[tokio::main]
async fn main() {
    // Load environment variables from the .env file, if present.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(args) => {
            if let Err(e) = handle_serve(args).await {
                eprintln!("Error while running the server: {}", e);
            }
        }
        Commands::Import(args) => {
            if let Err(e) = handle_import(args).await {
                eprintln!("Error during import: {}", e);
            }
        }
        Commands::Simulate(args) => {
            if let Err(e) = handle_simulate(args) {
                eprintln!("Error during simulation: {}", e);
            }
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A small business-analytics platform: customers, products, landing pages,
/// A/B tests, and their results.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the REST API server consumed by the dashboard.
    Serve(ServeArgs),
    /// Load the CSV fixture files into the database tables.
    Import(ImportArgs),
    /// Generate randomized CSV fixture files for the loader.
    Simulate(SimulateArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Override the configured TCP port.
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Parser)]
struct ImportArgs {
    /// Directory containing the CSV files. Defaults to the configured
    /// loader data directory.
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[derive(Parser)]
struct SimulateArgs {
    /// Directory to write the CSV files into. Defaults to the configured
    /// loader data directory.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// How many customers to generate.
    #[arg(long, default_value_t = 50)]
    customers: usize,

    /// How many products to generate.
    #[arg(long, default_value_t = 20)]
    products: usize,

    /// How many landing pages to generate.
    #[arg(long, default_value_t = 40)]
    landing_pages: usize,

    /// How many A/B tests to generate.
    #[arg(long, default_value_t = 20)]
    ab_tests: usize,

    /// How many test results to generate.
    #[arg(long, default_value_t = 100)]
    results: usize,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Starts the API server on the configured bind address.
async fn handle_serve(args: ServeArgs) -> anyhow::Result<()> {
    let settings = configuration::load_settings()?;
    let port = args.port.unwrap_or(settings.server.port);
    let addr: SocketAddr = format!("{}:{}", settings.server.host, port).parse()?;
    web_server::run_server(addr).await
}

/// Loads every fixture CSV found in the data directory into its table.
async fn handle_import(args: ImportArgs) -> anyhow::Result<()> {
    let db_pool = connect().await?;
    run_migrations(&db_pool).await?;

    let settings = configuration::load_settings()?;
    let data_dir = args
        .data_dir
        .unwrap_or_else(|| PathBuf::from(settings.loader.data_dir));

    loader::import_data_dir(&db_pool, &data_dir).await
}

/// Writes the five fixture CSV files, leaving any existing files untouched.
fn handle_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let settings = configuration::load_settings()?;
    let data_dir = args
        .data_dir
        .unwrap_or_else(|| PathBuf::from(settings.loader.data_dir));

    let counts = simulate::FixtureCounts {
        customers: args.customers,
        products: args.products,
        landing_pages: args.landing_pages,
        ab_tests: args.ab_tests,
        results: args.results,
    };
    simulate::generate(&data_dir, &counts)
}
