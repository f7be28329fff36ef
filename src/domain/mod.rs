//! Domain entities and scheduling rules, independent from persistence.

pub mod appointment;
pub mod client;
pub mod service;
pub mod stylist;
pub mod types;
