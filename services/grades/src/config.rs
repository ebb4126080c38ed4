use serde::Deserialize;

use gradebook_core::config::Config;

/// Grades service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct GradesConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3114). Env var: `GRADES_PORT`.
    #[serde(default = "default_port")]
    pub grades_port: u16,
    /// Apply pending migrations at startup. Env var: `RUN_MIGRATIONS`.
    #[serde(default)]
    pub run_migrations: bool,
}

fn default_port() -> u16 {
    3114
}

impl Config for GradesConfig {}
