use agency_desk::{
    config::{self, database},
    core::{EntityStore, metrics, report},
    errors::Result,
    storage::SqliteStore,
};
use chrono::Local;
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application configuration
    let app_config = config::load_default_config()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;

    // 4. Open the snapshot database
    let database_url = database::get_database_url();
    let storage = SqliteStore::connect(&database_url)
        .await
        .inspect(|_| info!("Database initialized at {}", database_url))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Load the store, seeding sample data on first run
    let store = EntityStore::open(storage, app_config.store.seed_sample_data)
        .await
        .inspect_err(|e| error!("Failed to load entity store: {}", e))?;

    let orphaned = store.orphaned_policies();
    if !orphaned.is_empty() {
        info!(
            "{} policies reference advisers that no longer exist",
            orphaned.len()
        );
    }

    // 6. Log the dashboard
    let dashboard = metrics::build_dashboard(
        store.advisers(),
        store.policies(),
        &app_config.metrics,
        Local::now().date_naive(),
    );
    info!("\n{}", report::format_dashboard_summary(&dashboard)?);

    Ok(())
}
