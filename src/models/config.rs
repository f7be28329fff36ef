use serde::Deserialize;

/// Configuration options specific to the salon service.
///
/// Loaded from `config/default.yaml`, an optional `config/{APP_ENV}.yaml`
/// and `APP_`-prefixed environment variables.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Path of the SQLite database file.
    pub database_url: String,
    /// Interface the HTTP server binds to.
    pub address: String,
    pub port: u16,
    /// Apply embedded migrations on startup.
    #[serde(default)]
    pub run_migrations: bool,
}
