pub mod availability;
pub mod closures;
pub mod health;
pub mod pricing;
pub mod reservations;
pub mod restaurant;
pub mod tables;
