//! # Authentication Module
//!
//! This module provides authentication-related utilities for the Tably API,
//! including password hashing and verification for restaurant owner access.
//!
//! The implementation uses Argon2, a secure password hashing algorithm,
//! to protect owner passwords from common attacks like rainbow tables
//! and brute force attempts.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHasher,
};
use eyre::Result;
use uuid::Uuid;

/// Hashes a password using the Argon2 algorithm
///
/// This function securely hashes passwords before storage in the database,
/// automatically generating a random salt and using industry-standard
/// parameters for Argon2.
///
/// # Arguments
///
/// * `password` - The plain text password to hash
///
/// # Returns
///
/// * `Result<String>` - The hashed password string or an error
///
/// # Security Notes
///
/// - Uses a random salt for each password
/// - Uses default Argon2 parameters (memory: 19MiB, iterations: 3, parallelism: 4)
/// - Returns password in PHC string format (includes algorithm, version, parameters, salt, and hash)
pub fn hash_password(password: &str) -> Result<String> {
    // Generate a fresh, random salt
    let salt = SaltString::generate(&mut OsRng);

    // Create default Argon2 instance
    let argon2 = Argon2::default();

    // Hash the password with salt
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Verifies a password against the stored hash for a restaurant
///
/// This function checks if the provided password matches the stored hash
/// for the specified restaurant, gating owner-side management endpoints.
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `restaurant_id` - UUID of the restaurant to authenticate
/// * `password` - Plain text password to verify
///
/// # Returns
///
/// * `Result<bool>` - True if password matches, false otherwise
///
/// # Security Notes
///
/// - Uses constant-time comparison to prevent timing attacks
/// - Delegates actual verification to the database layer
pub async fn verify_restaurant_password(
    pool: &sqlx::PgPool,
    restaurant_id: Uuid,
    password: &str,
) -> Result<bool> {
    // Delegate to the database repository for verification
    let is_valid =
        tably_db::repositories::restaurant::verify_password(pool, restaurant_id, password).await?;
    Ok(is_valid)
}
