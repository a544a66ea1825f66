//! Core domain logic for the Tably reservation service.
//!
//! Everything in this crate is I/O-free: the resolvers are pure functions
//! over data the caller has already fetched, and the collaborator traits in
//! [`integrations`] are the only asynchronous seams.

pub mod availability;
pub mod closures;
pub mod errors;
pub mod integrations;
pub mod models;
pub mod pricing;
pub mod slots;
