//! Core library exports for the salon scheduling service.
//!
//! With only the `data` feature the crate exposes the domain model, Diesel
//! models and repositories. The `server` feature adds forms, services and the
//! JSON HTTP routes used by the `pushkind-salon` binary.

#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "data")]
pub mod schema;
#[cfg(feature = "server")]
pub mod services;
