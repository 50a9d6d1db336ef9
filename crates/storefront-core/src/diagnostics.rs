//! Read-only connectivity report.
//!
//! Never fails: every problem is rendered into a status string.

use serde::{Deserialize, Serialize};
use tracing::debug;

use storefront_state::DocumentStore;

/// Collection names included in the report
pub const MAX_LISTED_COLLECTIONS: usize = 10;
const MAX_ERROR_CHARS: usize = 50;

/// Which configuration variables are present in the environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnvPresence {
    pub database_url: bool,
    pub database_name: bool,
}

impl EnvPresence {
    /// Inspect `DATABASE_URL` and `DATABASE_NAME`.
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var_os("DATABASE_URL").is_some(),
            database_name: std::env::var_os("DATABASE_NAME").is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsReport {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

fn set_or_not(present: bool) -> String {
    let status = if present { "✅ Set" } else { "❌ Not Set" };
    status.to_string()
}

fn truncate(message: &str) -> String {
    message.chars().take(MAX_ERROR_CHARS).collect()
}

/// Probe the store and the environment.
pub async fn diagnose(store: &dyn DocumentStore, env: EnvPresence) -> DiagnosticsReport {
    let mut report = DiagnosticsReport {
        backend: "✅ Running".to_string(),
        database: "❌ Not Available".to_string(),
        database_url: set_or_not(env.database_url),
        database_name: set_or_not(env.database_name),
        connection_status: "Not Connected".to_string(),
        collections: Vec::new(),
    };

    if !store.is_available() {
        report.database = "⚠️  Available but not initialized".to_string();
        return report;
    }

    report.database = "✅ Available".to_string();
    report.connection_status = "Connected".to_string();

    match store.list_collections().await {
        Ok(mut collections) => {
            collections.truncate(MAX_LISTED_COLLECTIONS);
            report.collections = collections;
            report.database = "✅ Connected & Working".to_string();
        }
        Err(err) => {
            debug!(error = %err, "Collection listing failed");
            report.database = format!("⚠️  Connected but Error: {}", truncate(&err.to_string()));
        }
    }
    report
}
