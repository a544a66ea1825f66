//! Postgres gateway for the Tably reservation service: connection pool,
//! schema bootstrap, row types, and per-aggregate repositories.

pub mod models;
pub mod repositories;
pub mod schema;

pub mod mock;

use eyre::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub type DbPool = Pool<Postgres>;

pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Name of the database constraint behind an error, if that is what it is.
/// Lets callers map unique-index hits from plain updates to typed errors.
pub fn constraint_name(err: &eyre::Report) -> Option<&str> {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| match e {
            sqlx::Error::Database(db) => db.constraint(),
            _ => None,
        })
}
