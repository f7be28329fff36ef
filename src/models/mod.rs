//! Diesel row types and their conversions into domain entities.

pub mod appointment;
pub mod client;
#[cfg(feature = "server")]
pub mod config;
pub mod service;
pub mod stylist;
