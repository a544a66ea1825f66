use color_eyre::eyre::Result;
use dotenv::dotenv;
use tably_api::config::ApiConfig;
use tably_db::{create_pool, schema::initialize_database};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // Environment first: DATABASE_URL is required
    dotenv().ok();
    let config = ApiConfig::from_env()?;

    // Connect and bring the schema up to date before taking bookings
    let db_pool = create_pool(&config.database_url).await?;
    initialize_database(&db_pool).await?;

    tably_api::start_server(config, db_pool).await?;

    Ok(())
}
