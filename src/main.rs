use dotenvy::dotenv;
use product_catalog::{
    config::{database, settings},
    core::Product,
    errors::Result,
};
use serde_json::Value;
use std::io::Write;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load .env file so RUST_LOG and DATABASE_URL can come from it
    dotenv().ok(); // Make it non-fatal, env vars can be set externally

    // 2. Load settings (catalog.toml, then environment overrides)
    let settings = settings::load_default_settings()?;

    // 3. Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    info!("Successfully processed application settings.");

    // 4. Initialize database
    let db = database::init_db(&settings.database_url)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Dump the catalog, one JSON object per line
    let products = Product::all(&db).await?;
    let mut stdout = std::io::stdout().lock();
    for product in &products {
        writeln!(stdout, "{}", Value::Object(product.serialize()))?;
    }
    info!("Listed {} products", products.len());

    Ok(())
}
