use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use tably_db::schema::initialize_database;

/// Brings a database up to the current schema without starting the server.
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();

    // Same variable the server reads; there is no localhost fallback
    let database_url = std::env::var("DATABASE_URL")
        .wrap_err("DATABASE_URL environment variable must be set")?;

    println!("Connecting to database...");
    let db_pool = tably_db::create_pool(&database_url).await?;

    println!("Applying reservation schema...");
    initialize_database(&db_pool).await?;
    println!("Schema is up to date.");

    Ok(())
}
