//! Incoming request payloads and their validation into domain types.

pub mod appointments;
pub mod clients;
pub mod services;
pub mod stylists;

/// Treat missing and blank optional text fields the same way.
fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
