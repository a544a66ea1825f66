pub mod closure;
pub mod pricing;
pub mod reservation;
pub mod restaurant;
pub mod table;
